pub mod parser;
pub mod typescript;

pub use datashape_core::{DataShapeError as Error, Result};
pub use parser::{parse_project, parse_source};
pub use typescript::{
    json_path, RecordDefinition, TransformedType, TypeScriptGenerator, TypeScriptTransformer,
};
