use thiserror::Error;

/// Core error type for datashape operations.
#[derive(Error, Debug)]
pub enum DataShapeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported type for property `{property}`: {declared}")]
    UnsupportedType { property: String, declared: String },

    #[error("Missing element type for collection property `{property}`")]
    MissingElementType { property: String },

    #[error("`{0}` is not a data record")]
    NotTransformable(String),
}

impl DataShapeError {
    /// Attach a property name to a property-less type error.
    pub fn for_property(self, property: &str) -> Self {
        match self {
            DataShapeError::UnsupportedType { declared, .. } => DataShapeError::UnsupportedType {
                property: property.to_string(),
                declared,
            },
            DataShapeError::MissingElementType { .. } => DataShapeError::MissingElementType {
                property: property.to_string(),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for DataShapeError {
    fn from(e: serde_json::Error) -> Self {
        DataShapeError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for DataShapeError {
    fn from(e: toml::de::Error) -> Self {
        DataShapeError::Config(format!("Failed to parse config: {}", e))
    }
}

/// Result type alias using DataShapeError.
pub type Result<T> = std::result::Result<T, DataShapeError>;
