//! datashape - TypeScript definitions for Rust data records.
//!
//! Reflects structs marked as data records, maps every property type to a
//! TypeScript union and writes the result as one definition file.

pub use datashape_codegen::{
    json_path, parse_project, parse_source, RecordDefinition, TransformedType,
    TypeScriptGenerator, TypeScriptTransformer,
};
pub use datashape_core::{
    config, schema, text, DataShapeConfig, DataShapeError, Result, TypeScriptConfig,
};
