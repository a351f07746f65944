//! Backend compiler contract.

use crate::criteria::{Comparator, Criteria};
use crate::error::{CriteriaError, CriteriaResult};
use crate::record::FieldMapping;
use crate::value::Value;

/// Builds a backend's native filter expression, one criteria node at a time.
///
/// [`compile`] walks the tree depth-first and calls back into the compiler
/// for every node, so adding a criteria kind forces every backend to answer
/// for it. Combinators default to [`CriteriaError::UnsupportedCriteriaType`]
/// for backends that cannot express them.
pub trait Compiler {
    /// The backend's native filter expression.
    type Output;

    /// Compiles an attribute comparison on an already-mapped backend field.
    fn compile_attr(
        &self,
        backend_field: &str,
        value: &Value,
        comparison: Comparator,
    ) -> CriteriaResult<Self::Output>;

    /// Combines compiled operands into a conjunction.
    fn compile_and(&self, operands: Vec<Self::Output>) -> CriteriaResult<Self::Output> {
        let _ = operands;
        Err(CriteriaError::unsupported("and"))
    }

    /// Combines compiled operands into a disjunction.
    fn compile_or(&self, operands: Vec<Self::Output>) -> CriteriaResult<Self::Output> {
        let _ = operands;
        Err(CriteriaError::unsupported("or"))
    }

    /// Negates a compiled operand.
    fn compile_not(&self, operand: Self::Output) -> CriteriaResult<Self::Output> {
        let _ = operand;
        Err(CriteriaError::unsupported("not"))
    }
}

/// Compiles `criteria` for subject type `S` with `compiler`.
///
/// Attribute names are translated through `S`'s [`FieldMapping`]. The first
/// failure anywhere in the tree aborts the whole compilation.
///
/// # Errors
///
/// - [`CriteriaError::FieldNotFound`] if `S` does not declare a referenced field
/// - [`CriteriaError::UnmappedField`] if a referenced field has no backend name
/// - [`CriteriaError::UnsupportedCriteriaType`] if the backend rejects a node kind
pub fn compile<S, C>(criteria: &Criteria, compiler: &C) -> CriteriaResult<C::Output>
where
    S: FieldMapping + ?Sized,
    C: Compiler + ?Sized,
{
    match criteria {
        Criteria::Attr(attr) => {
            let descriptor = S::describe_field(&attr.name)
                .ok_or_else(|| CriteriaError::field_not_found(&attr.name))?;
            let backend_field = descriptor
                .backend_name()
                .ok_or_else(|| CriteriaError::unmapped_field(&attr.name))?;
            compiler.compile_attr(backend_field, &attr.value, attr.comparison)
        }
        Criteria::And(operands) => {
            let compiled = compile_all::<S, C>(operands, compiler)?;
            compiler.compile_and(compiled)
        }
        Criteria::Or(operands) => {
            let compiled = compile_all::<S, C>(operands, compiler)?;
            compiler.compile_or(compiled)
        }
        Criteria::Not(operand) => {
            let compiled = compile::<S, C>(operand, compiler)?;
            compiler.compile_not(compiled)
        }
    }
}

fn compile_all<S, C>(operands: &[Criteria], compiler: &C) -> CriteriaResult<Vec<C::Output>>
where
    S: FieldMapping + ?Sized,
    C: Compiler + ?Sized,
{
    operands
        .iter()
        .map(|operand| compile::<S, C>(operand, compiler))
        .collect()
}
