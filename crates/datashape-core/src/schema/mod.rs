mod reflect;
mod registry;
mod types;

pub use reflect::{
    to_camel_case, to_snake_case, NameMapper, PropertyRule, ReflectedClass, ReflectedProperty,
    ReflectedType, RuleKind,
};
pub use registry::SchemaRegistry;
pub use types::{BaseKind, CollectionKind, Modifier, Modifiers, Primitive, TypeDescriptor};
