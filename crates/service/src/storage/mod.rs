//! Storage abstractions for service layer
//!
//! One JSON document per resource, each behind its own lock, plus the
//! file-system capability the documents are written through.

pub mod fs;
pub mod json_document;

pub use fs::{DocumentFs, TokioFs};
pub use json_document::{JsonDocumentStore, Loaded};
