pub mod config;
pub mod error;
pub mod schema;
pub mod text;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{DataShapeConfig, TypeScriptConfig};
pub use error::{DataShapeError, Result};
pub use schema::{
    BaseKind, CollectionKind, Modifier, Modifiers, NameMapper, Primitive, PropertyRule,
    ReflectedClass, ReflectedProperty, ReflectedType, RuleKind, SchemaRegistry, TypeDescriptor,
};
