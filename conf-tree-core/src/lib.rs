//! Path-addressed hierarchical configuration documents.
//!
//! This crate provides the generic document primitives used by appliance
//! control-plane tools: an XML-backed tree node type with slash-separated
//! path addressing, parse/write support, and a [`ConfigStore`] contract for
//! components that read and mutate a shared configuration document.

pub mod node;
pub mod store;
pub mod xml;

pub use node::ConfNode;
pub use store::{ConfigStore, DocumentStore, StoreError};
pub use xml::{parse, parse_file, write, write_file, ParseError, WriteError};
