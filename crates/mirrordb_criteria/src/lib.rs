//! # MirrorDB Criteria
//!
//! Backend-agnostic boolean predicates over entity fields.
//!
//! A [`Criteria`] tree is built once and then either:
//! - evaluated in memory against any [`Record`] with
//!   [`Criteria::is_satisfied_by`], or
//! - translated into a backend's native filter representation with
//!   [`compile`], using the [`FieldMapping`] the subject type declares and a
//!   backend-provided [`Compiler`].
//!
//! ## Example
//!
//! ```rust
//! use mirrordb_criteria::{Criteria, Record, Value};
//!
//! struct Point {
//!     x: i64,
//!     label: String,
//! }
//!
//! impl Record for Point {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "X" => Some(Value::Integer(self.x)),
//!             "Label" => Some(Value::Text(self.label.clone())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let point = Point { x: 3, label: "origin".into() };
//! let criteria = Criteria::and(vec![
//!     Criteria::gt("X", 1),
//!     Criteria::not(Criteria::eq("Label", "edge")),
//! ]);
//! assert!(criteria.is_satisfied_by(&point));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod compiler;
mod criteria;
mod error;
mod record;
mod value;

pub use compiler::{compile, Compiler};
pub use criteria::{Attr, Comparator, Criteria};
pub use error::{CriteriaError, CriteriaResult};
pub use record::{FieldDescriptor, FieldMapping, Record};
pub use value::Value;
