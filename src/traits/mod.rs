//! Core traits for the bean factory.

mod metadata;

pub use metadata::ComponentMetadata;
