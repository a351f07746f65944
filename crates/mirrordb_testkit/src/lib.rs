//! # MirrorDB Testkit
//!
//! Test utilities for MirrorDB.
//!
//! This crate provides:
//! - [`Item`], a test entity with hooks and a backend field mapping
//! - [`SpyRepository`], a repository that records calls and injects failures
//! - [`EventLog`], a recorder for proxy store lifecycle events
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use mirrordb_testkit::prelude::*;
//! use mirrordb_core::{Context, Repository};
//!
//! let spy = SpyRepository::new(vec![Item::with_id("1", "a")]);
//! spy.read_all(&Context::new()).unwrap();
//! assert_eq!(spy.calls(), ["read_all"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
