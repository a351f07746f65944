//! Criteria AST and the generic in-memory evaluator.

use crate::record::Record;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of an attribute criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    /// Equal.
    #[default]
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl Comparator {
    /// All comparators, in declaration order.
    pub const ALL: [Comparator; 6] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Gt,
        Comparator::Gte,
        Comparator::Lt,
        Comparator::Lte,
    ];

    /// Returns the short name (`eq`, `ne`, `gt`, `gte`, `lt`, `lte`).
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Ne => "ne",
            Comparator::Gt => "gt",
            Comparator::Gte => "gte",
            Comparator::Lt => "lt",
            Comparator::Lte => "lte",
        }
    }

    /// Applies the comparator to a field value and an operand.
    ///
    /// `Eq`/`Ne` use structural equality. Ordering comparators only hold
    /// between integers, floats or strings of the same kind; any other
    /// combination yields `false`.
    pub fn apply(self, field: &Value, operand: &Value) -> bool {
        match self {
            Comparator::Eq => field == operand,
            Comparator::Ne => field != operand,
            Comparator::Gt => matches!(field.compare(operand), Some(Ordering::Greater)),
            Comparator::Gte => matches!(
                field.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Comparator::Lt => matches!(field.compare(operand), Some(Ordering::Less)),
            Comparator::Lte => matches!(
                field.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown comparator: {s}"))
    }
}

/// Attribute comparison: `field <comparison> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    /// Attribute name; must start with an ASCII capital letter.
    pub name: String,
    /// Operand compared against the field value.
    pub value: Value,
    /// Comparison operator.
    #[serde(default)]
    pub comparison: Comparator,
}

impl Attr {
    /// Creates an attribute comparison.
    pub fn new(name: impl Into<String>, value: impl Into<Value>, comparison: Comparator) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comparison,
        }
    }

    /// Evaluates the comparison against `subject`.
    ///
    /// An absent field does not satisfy the comparison.
    ///
    /// # Panics
    ///
    /// Panics if the attribute name is empty or does not start with an
    /// ASCII capital letter. Such a criteria can never name an exposed
    /// field and is a bug in the code that built it.
    pub fn is_satisfied_by<R: Record + ?Sized>(&self, subject: &R) -> bool {
        assert!(!self.name.is_empty(), "attribute name cannot be empty");
        assert!(
            self.name.starts_with(|c: char| c.is_ascii_uppercase()),
            "attribute name must be an exported field (start with a capital letter): {}",
            self.name
        );

        match subject.field(&self.name) {
            Some(value) => self.comparison.apply(&value, &self.value),
            None => false,
        }
    }
}

/// A composable boolean predicate over entity fields.
///
/// # JSON form
///
/// ```json
/// {"and": [
///     {"attr": {"name": "Age", "value": 18, "comparison": "gte"}},
///     {"not": {"attr": {"name": "Status", "value": "banned"}}}
/// ]}
/// ```
///
/// A missing `comparison` defaults to `eq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criteria {
    /// Attribute comparison.
    Attr(Attr),
    /// Conjunction.
    And(Vec<Criteria>),
    /// Disjunction.
    Or(Vec<Criteria>),
    /// Negation.
    Not(Box<Criteria>),
}

impl Criteria {
    /// Creates an attribute criteria.
    pub fn attr(name: impl Into<String>, value: impl Into<Value>, comparison: Comparator) -> Self {
        Criteria::Attr(Attr::new(name, value, comparison))
    }

    /// `name == value`.
    pub fn eq(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr(name, value, Comparator::Eq)
    }

    /// `name != value`.
    pub fn ne(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr(name, value, Comparator::Ne)
    }

    /// `name > value`.
    pub fn gt(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr(name, value, Comparator::Gt)
    }

    /// `name >= value`.
    pub fn gte(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr(name, value, Comparator::Gte)
    }

    /// `name < value`.
    pub fn lt(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr(name, value, Comparator::Lt)
    }

    /// `name <= value`.
    pub fn lte(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::attr(name, value, Comparator::Lte)
    }

    /// Conjunction of `operands`.
    pub fn and(operands: Vec<Criteria>) -> Self {
        Criteria::And(operands)
    }

    /// Disjunction of `operands`.
    pub fn or(operands: Vec<Criteria>) -> Self {
        Criteria::Or(operands)
    }

    /// Negation of `operand`.
    pub fn not(operand: Criteria) -> Self {
        Criteria::Not(Box::new(operand))
    }

    /// Returns the node kind (`attr`, `and`, `or`, `not`).
    pub fn kind(&self) -> &'static str {
        match self {
            Criteria::Attr(_) => "attr",
            Criteria::And(_) => "and",
            Criteria::Or(_) => "or",
            Criteria::Not(_) => "not",
        }
    }

    /// Evaluates the criteria against `subject`.
    ///
    /// An empty `And` is vacuously true. An empty `Or` is also true; this
    /// is existing behavior that callers rely on, not the conventional
    /// empty disjunction.
    ///
    /// # Panics
    ///
    /// Panics on an attribute criteria with an invalid name, see
    /// [`Attr::is_satisfied_by`].
    pub fn is_satisfied_by<R: Record + ?Sized>(&self, subject: &R) -> bool {
        match self {
            Criteria::Attr(attr) => attr.is_satisfied_by(subject),
            Criteria::And(operands) => operands.iter().all(|c| c.is_satisfied_by(subject)),
            Criteria::Or(operands) => {
                operands.is_empty() || operands.iter().any(|c| c.is_satisfied_by(subject))
            }
            Criteria::Not(operand) => !operand.is_satisfied_by(subject),
        }
    }
}

impl From<Attr> for Criteria {
    fn from(attr: Attr) -> Self {
        Criteria::Attr(attr)
    }
}
