use serde::{Deserialize, Serialize};

use super::reflect::ReflectedType;
use crate::error::{DataShapeError, Result};

/// Element type of a primitive array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    Int,
    Float,
    String,
    Unknown,
}

/// Core kind of a property type, before modifiers are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseKind {
    /// The `null` type on its own
    Null,
    /// Boolean
    Bool,
    /// Any integer width
    Int,
    /// Any float width
    Float,
    /// String or char
    String,
    /// Array of a primitive
    Array(Primitive),
    /// Another data record, referenced by name
    Record(String),
    /// Untyped value
    Unknown,
}

/// Collection wrapper around an element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    /// Plain list of records
    Plain,
    /// Length-aware (offset) paginated list
    OffsetPaginated,
    /// Cursor paginated list
    CursorPaginated,
}

/// Modifier flags a declared type union can carry besides its core type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Value may be `null`.
    Nullable,
    /// Value may be absent from the payload.
    Optional,
    /// Value is resolved on demand.
    Lazy,
}

/// Orthogonal set of [`Modifier`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    nullable: bool,
    optional: bool,
    lazy: bool,
}

impl Modifiers {
    /// Empty modifier set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Return the set with `modifier` added.
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    pub fn insert(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Nullable => self.nullable = true,
            Modifier::Optional => self.optional = true,
            Modifier::Lazy => self.lazy = true,
        }
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Nullable => self.nullable,
            Modifier::Optional => self.optional,
            Modifier::Lazy => self.lazy,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.nullable || self.optional || self.lazy)
    }
}

/// Shape of one property type, decomposed from its declared union.
///
/// When `collection` is set, `base` is always [`BaseKind::Record`] holding
/// the element record; use [`TypeDescriptor::collection_of`] to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Core kind.
    pub base: BaseKind,

    /// Collection wrapper around the element record.
    pub collection: Option<CollectionKind>,

    /// Modifier flags.
    pub modifiers: Modifiers,
}

impl TypeDescriptor {
    /// Create a descriptor without collection wrapper or modifiers.
    pub fn new(base: BaseKind) -> Self {
        Self {
            base,
            collection: None,
            modifiers: Modifiers::none(),
        }
    }

    /// Create a collection descriptor over `element`.
    pub fn collection_of(kind: CollectionKind, element: impl Into<String>) -> Self {
        Self {
            base: BaseKind::Record(element.into()),
            collection: Some(kind),
            modifiers: Modifiers::none(),
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Element record name of a collection descriptor.
    pub fn element_record(&self) -> Option<&str> {
        match (&self.collection, &self.base) {
            (Some(_), BaseKind::Record(name)) => Some(name),
            _ => None,
        }
    }

    /// Check whether a declared type can be mapped at all.
    ///
    /// A collection whose declared element is anything but a data record is
    /// rejected here; an element given only by an override is checked by
    /// [`build`](Self::build).
    pub fn can_represent(declared: &ReflectedType) -> bool {
        decompose(declared).is_ok()
    }

    /// Decompose a declared type into a descriptor.
    ///
    /// `element_override` comes from an explicit collection-element rule and
    /// takes precedence over an element inferred from the declaration. It
    /// must name a data record.
    pub fn build(
        declared: &ReflectedType,
        element_override: Option<&ReflectedType>,
    ) -> Result<Self> {
        let decomposed = decompose(declared)?;

        let mut descriptor = match decomposed.core {
            Core::Base(base) => Self::new(base),
            Core::Collection { kind, inferred } => {
                let element = match element_override {
                    Some(ReflectedType::Record(name)) => name.clone(),
                    Some(other) => {
                        return Err(DataShapeError::UnsupportedType {
                            property: String::new(),
                            declared: ReflectedType::collection(kind, Some(other.clone()))
                                .to_string(),
                        })
                    }
                    None => inferred.ok_or_else(|| DataShapeError::MissingElementType {
                        property: String::new(),
                    })?,
                };
                Self::collection_of(kind, element)
            }
        };
        descriptor.modifiers = decomposed.modifiers;

        Ok(descriptor)
    }
}

enum Core {
    Base(BaseKind),
    Collection {
        kind: CollectionKind,
        inferred: Option<String>,
    },
}

struct Decomposed {
    core: Core,
    modifiers: Modifiers,
}

fn decompose(declared: &ReflectedType) -> Result<Decomposed> {
    let unsupported = || DataShapeError::UnsupportedType {
        property: String::new(),
        declared: declared.to_string(),
    };

    let mut modifiers = Modifiers::none();
    let mut has_null = false;
    let mut core: Option<&ReflectedType> = None;

    for member in declared.members() {
        match member {
            ReflectedType::Null => has_null = true,
            ReflectedType::Optional => modifiers.insert(Modifier::Optional),
            ReflectedType::Lazy => modifiers.insert(Modifier::Lazy),
            other => match core {
                None => core = Some(other),
                Some(existing) if existing == other => {}
                Some(_) => return Err(unsupported()),
            },
        }
    }

    let core = match core {
        Some(core) => {
            if has_null {
                modifiers.insert(Modifier::Nullable);
            }
            classify(core).ok_or_else(unsupported)?
        }
        None if has_null => Core::Base(BaseKind::Null),
        None => return Err(unsupported()),
    };

    Ok(Decomposed { core, modifiers })
}

fn classify(core: &ReflectedType) -> Option<Core> {
    let base = match core {
        ReflectedType::Bool => BaseKind::Bool,
        ReflectedType::Int => BaseKind::Int,
        ReflectedType::Float => BaseKind::Float,
        ReflectedType::String => BaseKind::String,
        ReflectedType::Mixed => BaseKind::Unknown,
        ReflectedType::Record(name) => BaseKind::Record(name.clone()),
        ReflectedType::Array(inner) => match inner.as_ref() {
            ReflectedType::Record(name) => {
                return Some(Core::Collection {
                    kind: CollectionKind::Plain,
                    inferred: Some(name.clone()),
                })
            }
            other => BaseKind::Array(primitive(other)?),
        },
        ReflectedType::Collection { kind, element } => {
            let inferred = match element.as_deref() {
                Some(ReflectedType::Record(name)) => Some(name.clone()),
                Some(_) => return None,
                None => None,
            };
            return Some(Core::Collection {
                kind: *kind,
                inferred,
            });
        }
        _ => return None,
    };

    Some(Core::Base(base))
}

fn primitive(ty: &ReflectedType) -> Option<Primitive> {
    match ty {
        ReflectedType::Bool => Some(Primitive::Bool),
        ReflectedType::Int => Some(Primitive::Int),
        ReflectedType::Float => Some(Primitive::Float),
        ReflectedType::String => Some(Primitive::String),
        ReflectedType::Mixed => Some(Primitive::Unknown),
        _ => None,
    }
}
