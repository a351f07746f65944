//! Criteria to document filter compilation.

use crate::filter::{to_json, DocumentFilter};
use mirrordb_core::{Comparator, Criteria, FieldMapping, Value};
use mirrordb_criteria::{compile, Compiler, CriteriaResult};

/// Compiles criteria into [`DocumentFilter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCompiler;

impl DocumentCompiler {
    /// Compiles `criteria` for documents of type `S`.
    ///
    /// # Errors
    ///
    /// Fails if a referenced field is undeclared or has no document key.
    pub fn compile<S: FieldMapping + ?Sized>(
        &self,
        criteria: &Criteria,
    ) -> CriteriaResult<DocumentFilter> {
        compile::<S, _>(criteria, self)
    }
}

impl Compiler for DocumentCompiler {
    type Output = DocumentFilter;

    fn compile_attr(
        &self,
        backend_field: &str,
        value: &Value,
        comparison: Comparator,
    ) -> CriteriaResult<DocumentFilter> {
        Ok(DocumentFilter::Field {
            path: backend_field.to_string(),
            operator: comparison,
            value: to_json(value),
        })
    }

    fn compile_and(&self, operands: Vec<DocumentFilter>) -> CriteriaResult<DocumentFilter> {
        Ok(DocumentFilter::And(operands))
    }

    fn compile_or(&self, operands: Vec<DocumentFilter>) -> CriteriaResult<DocumentFilter> {
        Ok(DocumentFilter::Or(operands))
    }

    fn compile_not(&self, operand: DocumentFilter) -> CriteriaResult<DocumentFilter> {
        Ok(DocumentFilter::Not(Box::new(operand)))
    }
}
