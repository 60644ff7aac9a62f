//! TypeScript code generation for data records.
//!
//! [`TypeScriptTransformer`] turns one reflected record into an
//! `export type` alias. [`TypeScriptGenerator`] runs it over a whole
//! registry and produces the definition file.

mod generator;
mod transformer;

pub use generator::{json_path, TypeScriptGenerator};
pub use transformer::{
    property_entry, PropertyEntry, RecordDefinition, TransformedType, TypeScriptTransformer,
};
