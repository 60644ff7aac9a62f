//! Reflected description of records, as produced by a reflector.
//!
//! These types are the boundary between whatever reads the host declarations
//! and the type-mapping engine: declared type unions, property metadata rules
//! and the per-record "is this a data object" classification.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::CollectionKind;

/// A declared property type, possibly a union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReflectedType {
    Null,
    Bool,
    Int,
    Float,
    String,
    /// Untyped value
    Mixed,
    /// Union sentinel: the value may be absent.
    Optional,
    /// Union sentinel: the value is resolved on demand.
    Lazy,
    /// Array of another type
    Array(Box<ReflectedType>),
    /// Record collection, with the element inferred from the declaration if any
    Collection {
        kind: CollectionKind,
        element: Option<Box<ReflectedType>>,
    },
    /// A type known to be a data record
    Record(String),
    /// A named type the reflector could not classify
    Named(String),
    /// Union of several members
    Union(Vec<ReflectedType>),
}

/// Bare name conventionally imported from `serde_json`.
const UNTYPED_VALUE: &str = "Value";

impl ReflectedType {
    /// Collection of `kind` over an optional element type.
    pub fn collection(kind: CollectionKind, element: Option<ReflectedType>) -> Self {
        ReflectedType::Collection {
            kind,
            element: element.map(Box::new),
        }
    }

    /// Wrap `self` into a union with `member`.
    pub fn or(self, member: ReflectedType) -> Self {
        match self {
            ReflectedType::Union(mut members) => {
                members.push(member);
                ReflectedType::Union(members)
            }
            other => ReflectedType::Union(vec![other, member]),
        }
    }

    /// Flattened union members, in declaration order.
    pub fn members(&self) -> Vec<&ReflectedType> {
        let mut members = Vec::new();
        self.collect_members(&mut members);
        members
    }

    fn collect_members<'a>(&'a self, out: &mut Vec<&'a ReflectedType>) {
        match self {
            ReflectedType::Union(members) => {
                for member in members {
                    member.collect_members(out);
                }
            }
            other => out.push(other),
        }
    }

    /// Turn `Named` references to known records into `Record`.
    ///
    /// A bare `Value` that is not a record is the untyped JSON value.
    pub fn resolve_records(&self, records: &HashSet<String>) -> Self {
        match self {
            ReflectedType::Named(name) if records.contains(name) => {
                ReflectedType::Record(name.clone())
            }
            ReflectedType::Named(name) if name == UNTYPED_VALUE => ReflectedType::Mixed,
            ReflectedType::Array(inner) => {
                ReflectedType::Array(Box::new(inner.resolve_records(records)))
            }
            ReflectedType::Collection { kind, element } => ReflectedType::Collection {
                kind: *kind,
                element: element
                    .as_ref()
                    .map(|element| Box::new(element.resolve_records(records))),
            },
            ReflectedType::Union(members) => ReflectedType::Union(
                members.iter().map(|m| m.resolve_records(records)).collect(),
            ),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ReflectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectedType::Null => f.write_str("null"),
            ReflectedType::Bool => f.write_str("bool"),
            ReflectedType::Int => f.write_str("int"),
            ReflectedType::Float => f.write_str("float"),
            ReflectedType::String => f.write_str("string"),
            ReflectedType::Mixed => f.write_str("mixed"),
            ReflectedType::Optional => f.write_str("Optional"),
            ReflectedType::Lazy => f.write_str("Lazy"),
            ReflectedType::Array(inner) => write!(f, "{}[]", inner),
            ReflectedType::Collection { kind, element } => {
                let name = match kind {
                    CollectionKind::Plain => "DataCollection",
                    CollectionKind::OffsetPaginated => "PaginatedDataCollection",
                    CollectionKind::CursorPaginated => "CursorPaginatedDataCollection",
                };
                match element {
                    Some(element) => write!(f, "{}<{}>", name, element),
                    None => f.write_str(name),
                }
            }
            ReflectedType::Record(name) | ReflectedType::Named(name) => f.write_str(name),
            ReflectedType::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
        }
    }
}

/// Kinds of metadata rule a property can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    OutputName,
    CollectionElement,
}

/// Declarative metadata attached to a property or record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyRule {
    /// Rename the property in generated output.
    MapOutputName(NameMapper),
    /// Element record of a collection property.
    DataCollectionOf(ReflectedType),
}

impl PropertyRule {
    /// Resolve record references held by the rule.
    pub fn resolve_records(&self, records: &HashSet<String>) -> Self {
        match self {
            PropertyRule::DataCollectionOf(element) => {
                PropertyRule::DataCollectionOf(element.resolve_records(records))
            }
            other => other.clone(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            PropertyRule::MapOutputName(_) => RuleKind::OutputName,
            PropertyRule::DataCollectionOf(_) => RuleKind::CollectionElement,
        }
    }
}

/// Mapping from a declared property name to its output key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameMapper {
    SnakeCase,
    CamelCase,
    Literal(String),
}

impl NameMapper {
    pub fn map(&self, name: &str) -> String {
        match self {
            NameMapper::SnakeCase => to_snake_case(name),
            NameMapper::CamelCase => to_camel_case(name),
            NameMapper::Literal(literal) => literal.clone(),
        }
    }
}

/// One reflected property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedProperty {
    /// Declared name.
    pub name: String,

    /// Declared type.
    pub declared: ReflectedType,

    /// Attached metadata rules.
    pub rules: Vec<PropertyRule>,
}

impl ReflectedProperty {
    pub fn new(name: impl Into<String>, declared: ReflectedType) -> Self {
        Self {
            name: name.into(),
            declared,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: PropertyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// First rule of the given kind attached directly to this property.
    pub fn rule(&self, kind: RuleKind) -> Option<&PropertyRule> {
        self.rules.iter().find(|rule| rule.kind() == kind)
    }
}

/// One reflected record declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedClass {
    /// Declared name.
    pub name: String,

    /// Whether the reflector classified this as a data record.
    pub is_data: bool,

    /// Rules declared on the record itself.
    pub rules: Vec<PropertyRule>,

    /// Properties in declaration order.
    pub properties: Vec<ReflectedProperty>,
}

impl ReflectedClass {
    /// Create an empty data record.
    pub fn data(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_data: true,
            rules: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Create an empty record that is not a data object.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            is_data: false,
            ..Self::data(name)
        }
    }

    pub fn with_property(mut self, property: ReflectedProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_rule(mut self, rule: PropertyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Look up the rule of `kind` that applies to `property`.
    ///
    /// A property rule wins. Output-name rules declared on the record apply
    /// to every property without one of its own.
    pub fn rule_for<'a>(
        &'a self,
        property: &'a ReflectedProperty,
        kind: RuleKind,
    ) -> Option<&'a PropertyRule> {
        property.rule(kind).or_else(|| match kind {
            RuleKind::OutputName => self.rules.iter().find(|rule| rule.kind() == kind),
            RuleKind::CollectionElement => None,
        })
    }

    /// Output key of `property` after applying any rename rule.
    pub fn output_name(&self, property: &ReflectedProperty) -> String {
        match self.rule_for(property, RuleKind::OutputName) {
            Some(PropertyRule::MapOutputName(mapper)) => mapper.map(&property.name),
            _ => property.name.clone(),
        }
    }

    /// Explicit collection element override for `property`.
    pub fn element_override<'a>(
        &'a self,
        property: &'a ReflectedProperty,
    ) -> Option<&'a ReflectedType> {
        match self.rule_for(property, RuleKind::CollectionElement) {
            Some(PropertyRule::DataCollectionOf(element)) => Some(element),
            _ => None,
        }
    }
}

/// Convert a string to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a string to camelCase.
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = !result.is_empty();
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
