//! # MirrorDB Document
//!
//! A document-store backend for MirrorDB.
//!
//! This crate provides:
//! - [`DocumentCollection`], a shared collection of JSON documents
//! - [`DocumentFilter`], the store's native filter expression
//! - [`DocumentCompiler`], which compiles criteria into filters
//! - [`DocumentRepository`], a [`mirrordb_core::Repository`] over a collection
//! - [`Document`], a schemaless entity backed by a JSON object
//!
//! ## Example
//!
//! ```rust
//! use mirrordb_core::{Context, Criteria, Repository};
//! use mirrordb_document::{Document, DocumentCollection, DocumentRepository};
//! use serde_json::json;
//!
//! let repo = DocumentRepository::<Document>::new(DocumentCollection::new("people"));
//! let ctx = Context::new();
//!
//! let doc: Document = serde_json::from_value(json!({"name": "ann", "age": 30})).unwrap();
//! let created = repo.create(&ctx, doc).unwrap();
//!
//! let adults = repo.match_all(&ctx, &Criteria::gte("Age", 18)).unwrap();
//! assert_eq!(adults, vec![created]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod compiler;
mod document;
mod filter;
mod repository;

pub use collection::{DocumentCollection, ID_KEY};
pub use compiler::DocumentCompiler;
pub use document::{key_for, Document};
pub use filter::{Doc, DocumentFilter};
pub use repository::DocumentRepository;
