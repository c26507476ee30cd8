//! Paths and keys that address collections, documents and fields

#![allow(missing_docs)]

pub mod document_key;
pub mod field_path;
pub mod resource_path;

pub use document_key::DocumentKey;
pub use field_path::{FieldPath, IntoFieldPath};
pub use resource_path::ResourcePath;
