use serde::{Deserialize, Serialize};

use datashape_core::schema::{
    BaseKind, Modifier, Primitive, ReflectedClass, ReflectedProperty, TypeDescriptor,
};
use datashape_core::{DataShapeError, Result, TypeScriptConfig};

/// Output of a single record transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedType {
    /// Name the type was emitted under.
    pub name: String,

    /// Generated TypeScript.
    pub transformed: String,
}

/// One property ready for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Output key after renaming.
    pub output_name: String,

    /// Decomposed type.
    pub descriptor: TypeDescriptor,
}

/// A record ready for emission: output name and properties in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefinition {
    pub name: String,
    pub properties: Vec<PropertyEntry>,
}

impl RecordDefinition {
    /// Resolve every property of `class`, stopping at the first failure.
    pub fn from_class(class: &ReflectedClass, name: &str) -> Result<Self> {
        let properties = class
            .properties
            .iter()
            .map(|property| property_entry(class, property))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            properties,
        })
    }

    /// Names of the records this definition refers to, collection elements included.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter_map(|entry| match &entry.descriptor.base {
                BaseKind::Record(name) => Some(name.as_str()),
                _ => None,
            })
    }
}

/// Turns reflected data records into TypeScript type aliases.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptTransformer {
    config: TypeScriptConfig,
}

impl TypeScriptTransformer {
    pub fn new(config: TypeScriptConfig) -> Self {
        Self { config }
    }

    /// Whether `candidate` was classified as a data record.
    pub fn can_transform(&self, candidate: &ReflectedClass) -> bool {
        candidate.is_data
    }

    /// Emit `export type <name> = { ... };` for `candidate`.
    ///
    /// Guard with [`can_transform`](Self::can_transform) first; a candidate
    /// that is not a data record is rejected rather than emitted.
    pub fn transform(&self, candidate: &ReflectedClass, name: &str) -> Result<TransformedType> {
        if !self.can_transform(candidate) {
            return Err(DataShapeError::NotTransformable(candidate.name.clone()));
        }

        let record = RecordDefinition::from_class(candidate, name)?;
        tracing::debug!(
            record = %candidate.name,
            name,
            fields = record.properties.len(),
            "Transforming record"
        );

        Ok(TransformedType {
            name: record.name.clone(),
            transformed: self.emit(&record),
        })
    }

    /// Render a record definition as a type alias.
    pub fn emit(&self, record: &RecordDefinition) -> String {
        if record.properties.is_empty() {
            return format!("export type {} = {{}};", record.name);
        }

        let mut out = format!("export type {} = {{\n", record.name);
        for entry in &record.properties {
            out.push_str(&self.config.indent);
            out.push_str(&entry.output_name);
            out.push_str(": ");
            out.push_str(&self.union_expression(&entry.descriptor));
            out.push_str(";\n");
        }
        out.push_str("};");
        out
    }

    /// Full union for a descriptor: core, then `undefined`, then `null`.
    pub fn union_expression(&self, descriptor: &TypeDescriptor) -> String {
        let mut alternatives = vec![self.core_expression(descriptor)];

        if descriptor.modifiers.contains(Modifier::Optional) {
            alternatives.push("undefined".to_string());
        }
        if descriptor.modifiers.contains(Modifier::Nullable) {
            alternatives.push("null".to_string());
        }

        alternatives.join(" | ")
    }

    /// The type expression without any modifier alternatives.
    pub fn core_expression(&self, descriptor: &TypeDescriptor) -> String {
        let base = self.base_expression(&descriptor.base);
        match descriptor.collection {
            Some(kind) => self.config.render_collection(kind, &base),
            None => base,
        }
    }

    fn base_expression(&self, base: &BaseKind) -> String {
        match base {
            BaseKind::Null => "null".to_string(),
            BaseKind::Bool => "boolean".to_string(),
            BaseKind::Int | BaseKind::Float => "number".to_string(),
            BaseKind::String => "string".to_string(),
            BaseKind::Unknown => "unknown".to_string(),
            BaseKind::Array(primitive) => format!("Array<{}>", primitive_expression(*primitive)),
            BaseKind::Record(name) => self.config.render_record(name),
        }
    }
}

fn primitive_expression(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Bool => "boolean",
        Primitive::Int | Primitive::Float => "number",
        Primitive::String => "string",
        Primitive::Unknown => "unknown",
    }
}

/// Resolve the output key and descriptor of one property.
pub fn property_entry(class: &ReflectedClass, property: &ReflectedProperty) -> Result<PropertyEntry> {
    let descriptor = TypeDescriptor::build(&property.declared, class.element_override(property))
        .map_err(|e| e.for_property(&property.name))?;

    Ok(PropertyEntry {
        output_name: class.output_name(property),
        descriptor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use datashape_core::schema::{CollectionKind, Modifiers, ReflectedType};

    fn transformer() -> TypeScriptTransformer {
        TypeScriptTransformer::new(TypeScriptConfig::default())
    }

    fn with(modifiers: &[Modifier], descriptor: TypeDescriptor) -> TypeDescriptor {
        modifiers
            .iter()
            .fold(descriptor, |d, m| d.with_modifier(*m))
    }

    #[test]
    fn test_single_alternative_without_modifiers() {
        let t = transformer();
        let bases = [
            (BaseKind::Null, "null"),
            (BaseKind::Bool, "boolean"),
            (BaseKind::Int, "number"),
            (BaseKind::Float, "number"),
            (BaseKind::String, "string"),
            (BaseKind::Unknown, "unknown"),
            (BaseKind::Array(Primitive::String), "Array<string>"),
            (BaseKind::Record("SongData".into()), "SongData"),
        ];

        for (base, expected) in bases {
            let expression = t.union_expression(&TypeDescriptor::new(base));
            assert_eq!(expression, expected);
            assert!(!expression.contains(" | "));
        }
    }

    #[test]
    fn test_alternative_order_is_fixed() {
        let t = transformer();
        let cases = [
            (vec![], "number"),
            (vec![Modifier::Optional], "number | undefined"),
            (vec![Modifier::Nullable], "number | null"),
            (
                vec![Modifier::Optional, Modifier::Nullable],
                "number | undefined | null",
            ),
            (
                vec![Modifier::Nullable, Modifier::Optional],
                "number | undefined | null",
            ),
        ];

        for (modifiers, expected) in cases {
            let descriptor = with(&modifiers, TypeDescriptor::new(BaseKind::Int));
            assert_eq!(t.union_expression(&descriptor), expected);
        }
    }

    #[test]
    fn test_lazy_is_transparent_for_every_combination() {
        let t = transformer();
        let kinds = [
            CollectionKind::Plain,
            CollectionKind::OffsetPaginated,
            CollectionKind::CursorPaginated,
        ];

        for kind in kinds {
            for optional in [false, true] {
                for nullable in [false, true] {
                    let mut modifiers = Vec::new();
                    if optional {
                        modifiers.push(Modifier::Optional);
                    }
                    if nullable {
                        modifiers.push(Modifier::Nullable);
                    }
                    let eager = with(&modifiers, TypeDescriptor::collection_of(kind, "Song"));
                    let lazy = eager.clone().with_modifier(Modifier::Lazy);

                    let expression = t.union_expression(&lazy);
                    assert_eq!(expression, t.union_expression(&eager));
                    assert_eq!(expression.contains("undefined"), optional);
                    assert_eq!(expression.ends_with("null"), nullable);
                }
            }
        }
    }

    #[test]
    fn test_collection_kinds_share_element() {
        let t = transformer();
        let cores: Vec<String> = [
            CollectionKind::Plain,
            CollectionKind::OffsetPaginated,
            CollectionKind::CursorPaginated,
        ]
        .into_iter()
        .map(|kind| t.core_expression(&TypeDescriptor::collection_of(kind, "SongData")))
        .collect();

        assert_eq!(
            cores,
            vec![
                "Array<SongData>",
                "PaginatedCollection<SongData>",
                "CursorPaginatedCollection<SongData>",
            ]
        );
    }

    #[test]
    fn test_configured_renderings() {
        let t = TypeScriptTransformer::new(TypeScriptConfig {
            indent: "\t".to_string(),
            record_reference: "App.{name}".to_string(),
            collection: "{element}[]".to_string(),
            ..Default::default()
        });

        assert_eq!(
            t.union_expression(
                &TypeDescriptor::collection_of(CollectionKind::Plain, "Song")
                    .with_modifier(Modifier::Nullable)
            ),
            "App.Song[] | null"
        );

        let class = ReflectedClass::data("Album").with_property(ReflectedProperty::new(
            "cover",
            ReflectedType::Record("Image".into()),
        ));
        let result = t.transform(&class, "Album").unwrap();
        assert_eq!(result.transformed, "export type Album = {\n\tcover: App.Image;\n};");
    }

    #[test]
    fn test_empty_record() {
        let result = transformer()
            .transform(&ReflectedClass::data("Empty"), "Empty")
            .unwrap();
        assert_eq!(result.transformed, "export type Empty = {};");
    }

    #[test]
    fn test_non_data_candidate_is_rejected() {
        let t = transformer();
        let candidate = ReflectedClass::plain("Helper")
            .with_property(ReflectedProperty::new("id", ReflectedType::Int));

        assert!(!t.can_transform(&candidate));
        assert!(matches!(
            t.transform(&candidate, "Helper"),
            Err(DataShapeError::NotTransformable(name)) if name == "Helper"
        ));
    }

    #[test]
    fn test_errors_name_the_property() {
        let t = transformer();
        let missing = ReflectedClass::data("Album").with_property(ReflectedProperty::new(
            "songs",
            ReflectedType::Collection {
                kind: CollectionKind::Plain,
                element: None,
            },
        ));
        assert!(matches!(
            t.transform(&missing, "Album"),
            Err(DataShapeError::MissingElementType { property }) if property == "songs"
        ));

        let unsupported = ReflectedClass::data("Album").with_property(ReflectedProperty::new(
            "id",
            ReflectedType::Named("Uuid".into()),
        ));
        assert!(matches!(
            t.transform(&unsupported, "Album"),
            Err(DataShapeError::UnsupportedType { property, declared })
                if property == "id" && declared == "Uuid"
        ));
    }

    #[test]
    fn test_transform_is_idempotent() {
        let t = transformer();
        let class = ReflectedClass::data("Song")
            .with_property(ReflectedProperty::new(
                "title",
                ReflectedType::String.or(ReflectedType::Null),
            ))
            .with_property(ReflectedProperty::new("plays", ReflectedType::Int));

        let first = t.transform(&class, "Song").unwrap();
        let second = t.transform(&class, "Song").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_record_definition() {
        let record = RecordDefinition {
            name: "Song".to_string(),
            properties: vec![
                PropertyEntry {
                    output_name: "title".to_string(),
                    descriptor: TypeDescriptor::new(BaseKind::String),
                },
                PropertyEntry {
                    output_name: "album".to_string(),
                    descriptor: TypeDescriptor::new(BaseKind::Record("Album".into()))
                        .with_modifier(Modifier::Nullable)
                        .with_modifier(Modifier::Lazy),
                },
            ],
        };

        assert_eq!(
            transformer().emit(&record),
            "export type Song = {\n    title: string;\n    album: Album | null;\n};"
        );
    }

    #[test]
    fn test_record_references() {
        let record = RecordDefinition {
            name: "Album".to_string(),
            properties: vec![
                PropertyEntry {
                    output_name: "title".to_string(),
                    descriptor: TypeDescriptor::new(BaseKind::String),
                },
                PropertyEntry {
                    output_name: "artist".to_string(),
                    descriptor: TypeDescriptor::new(BaseKind::Record("Artist".into())),
                },
                PropertyEntry {
                    output_name: "songs".to_string(),
                    descriptor: TypeDescriptor::collection_of(CollectionKind::Plain, "Song"),
                },
            ],
        };

        assert_eq!(record.references().collect::<Vec<_>>(), vec!["Artist", "Song"]);
    }

    #[test]
    fn test_property_entry() {
        let class = ReflectedClass::data("Song");
        let property = ReflectedProperty::new(
            "plays",
            ReflectedType::Optional.or(ReflectedType::Int),
        );

        let entry = property_entry(&class, &property).unwrap();
        assert_eq!(entry.output_name, "plays");
        assert_eq!(entry.descriptor.base, BaseKind::Int);
        assert_eq!(
            entry.descriptor.modifiers,
            Modifiers::none().with(Modifier::Optional)
        );
    }
}
