//! Rust source parser for reflecting data records.
//!
//! This module parses Rust source files to extract struct declarations and
//! their field types without requiring compilation.

use std::path::Path;

use datashape_core::schema::{
    CollectionKind, NameMapper, PropertyRule, ReflectedClass, ReflectedProperty, ReflectedType,
    SchemaRegistry,
};
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Fields, GenericArgument, Ident, Lit, LitStr, Meta, PathArguments};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Parse all Rust source files in a directory and reflect their records.
pub fn parse_project(src_dir: &Path) -> Result<SchemaRegistry> {
    if !src_dir.is_dir() {
        return Err(Error::Parse(format!(
            "Source directory not found: {}",
            src_dir.display()
        )));
    }

    let registry = SchemaRegistry::new();

    for entry in WalkDir::new(src_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "rs").unwrap_or(false))
    {
        let content = std::fs::read_to_string(entry.path())?;
        if let Err(e) = parse_file(&content, &registry) {
            tracing::debug!(file = ?entry.path(), error = %e, "Failed to parse file");
        }
    }

    registry.resolve_references();
    tracing::debug!(records = registry.len(), "Reflected project sources");

    Ok(registry)
}

/// Parse a single source text and reflect its records.
pub fn parse_source(content: &str) -> Result<SchemaRegistry> {
    let registry = SchemaRegistry::new();
    parse_file(content, &registry)?;
    registry.resolve_references();
    Ok(registry)
}

/// Parse a single Rust source file into `registry`, without resolving references.
fn parse_file(content: &str, registry: &SchemaRegistry) -> Result<()> {
    let file = syn::parse_file(content).map_err(|e| Error::Parse(e.to_string()))?;

    for item in file.items {
        if let syn::Item::Struct(item_struct) = item {
            if let Some(class) = parse_struct(&item_struct) {
                registry.register(class);
            }
        }
    }

    Ok(())
}

/// Check if attributes mark a data record: #[data], #[datashape::data] or #[derive(Data)].
fn has_data_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        let path = attr.path();
        if path.is_ident("data")
            || path.segments.len() == 2
                && path.segments[0].ident == "datashape"
                && path.segments[1].ident == "data"
        {
            return true;
        }

        path.is_ident("derive")
            && attr
                .parse_args_with(Punctuated::<syn::Path, syn::Token![,]>::parse_terminated)
                .map(|derives| {
                    derives
                        .iter()
                        .any(|d| d.segments.last().is_some_and(|s| s.ident == "Data"))
                })
                .unwrap_or(false)
    })
}

/// Reflect a struct with named fields.
fn parse_struct(item: &syn::ItemStruct) -> Option<ReflectedClass> {
    let Fields::Named(fields) = &item.fields else {
        return None;
    };

    let name = item.ident.to_string();
    let mut class = if has_data_attr(&item.attrs) {
        ReflectedClass::data(&name)
    } else {
        ReflectedClass::plain(&name)
    };

    if let Some(mapper) = get_output_name_rule(&item.attrs) {
        class.rules.push(PropertyRule::MapOutputName(mapper));
    }

    for field in &fields.named {
        if let Some(ident) = &field.ident {
            class
                .properties
                .push(parse_field(ident.to_string(), &field.ty, &field.attrs));
        }
    }

    Some(class)
}

/// Reflect one field.
fn parse_field(name: String, ty: &syn::Type, attrs: &[Attribute]) -> ReflectedProperty {
    let doc_element = get_doc_comment(attrs).as_deref().and_then(element_from_doc);

    let mut property = ReflectedProperty::new(name, type_to_reflected(ty, doc_element.as_deref()));

    if let Some(mapper) = get_output_name_rule(attrs) {
        property.rules.push(PropertyRule::MapOutputName(mapper));
    }
    if let Some(element) = get_collection_of(attrs) {
        property.rules.push(PropertyRule::DataCollectionOf(element));
    }

    property
}

/// Convert a syn::Type to a reflected type.
///
/// `doc_element` is the element type found in a doc annotation, used by
/// collections declared without a generic argument.
fn type_to_reflected(ty: &syn::Type, doc_element: Option<&str>) -> ReflectedType {
    match ty {
        syn::Type::Reference(r) => type_to_reflected(&r.elem, doc_element),
        syn::Type::Paren(p) => type_to_reflected(&p.elem, doc_element),
        syn::Type::Group(g) => type_to_reflected(&g.elem, doc_element),
        syn::Type::Slice(s) => ReflectedType::Array(Box::new(type_to_reflected(&s.elem, None))),
        syn::Type::Array(a) => ReflectedType::Array(Box::new(type_to_reflected(&a.elem, None))),
        syn::Type::Tuple(t) if t.elems.is_empty() => ReflectedType::Null,
        syn::Type::Path(type_path) if type_path.qself.is_none() => {
            path_to_reflected(&type_path.path, doc_element).unwrap_or_else(|| named(ty))
        }
        _ => named(ty),
    }
}

fn path_to_reflected(path: &syn::Path, doc_element: Option<&str>) -> Option<ReflectedType> {
    let segment = path.segments.last()?;
    let ident = segment.ident.to_string();
    let args = generic_types(&segment.arguments);

    let reflected = match (ident.as_str(), args.as_slice()) {
        ("bool", []) => ReflectedType::Bool,
        (
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "u128" | "usize",
            [],
        ) => ReflectedType::Int,
        ("f32" | "f64", []) => ReflectedType::Float,
        ("String" | "str" | "char", []) => ReflectedType::String,
        ("Value", []) if is_serde_json(path) => ReflectedType::Mixed,
        ("Option", [inner]) => type_to_reflected(inner, doc_element).or(ReflectedType::Null),
        ("Optional", [inner]) => type_to_reflected(inner, doc_element).or(ReflectedType::Optional),
        ("Lazy", [inner]) => type_to_reflected(inner, doc_element).or(ReflectedType::Lazy),
        ("Box", [inner]) => type_to_reflected(inner, doc_element),
        ("Vec", [inner]) => ReflectedType::Array(Box::new(type_to_reflected(inner, None))),
        (collection, []) | (collection, [_]) => {
            let kind = collection_kind(collection)?;
            let element = match args.first() {
                Some(element) => Some(type_to_reflected(element, None)),
                None => doc_element.map(|name| ReflectedType::Named(name.to_string())),
            };
            ReflectedType::collection(kind, element)
        }
        _ => return None,
    };

    Some(reflected)
}

fn collection_kind(ident: &str) -> Option<CollectionKind> {
    match ident {
        "DataCollection" => Some(CollectionKind::Plain),
        "PaginatedDataCollection" => Some(CollectionKind::OffsetPaginated),
        "CursorPaginatedDataCollection" => Some(CollectionKind::CursorPaginated),
        _ => None,
    }
}

/// Type arguments of a path segment, ignoring lifetimes and consts.
fn generic_types(arguments: &PathArguments) -> Vec<&syn::Type> {
    match arguments {
        PathArguments::AngleBracketed(angle) => angle
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether `path` is spelled `serde_json::Value`.
fn is_serde_json(path: &syn::Path) -> bool {
    let segments: Vec<_> = path.segments.iter().collect();
    matches!(segments.as_slice(), [.., module, _] if module.ident == "serde_json")
}

/// Fallback for types we do not map: keep the declared text.
fn named(ty: &syn::Type) -> ReflectedType {
    let type_str = quote::quote!(#ty).to_string().replace(' ', "");
    let name = match ty {
        syn::Type::Path(type_path)
            if type_path.qself.is_none()
                && type_path
                    .path
                    .segments
                    .last()
                    .is_some_and(|s| s.arguments.is_none()) =>
        {
            type_path
                .path
                .segments
                .last()
                .map(|s| s.ident.to_string())
                .unwrap_or(type_str)
        }
        _ => type_str,
    };
    ReflectedType::Named(name)
}

/// Get the #[map_output_name(...)] rule from attributes.
fn get_output_name_rule(attrs: &[Attribute]) -> Option<NameMapper> {
    let attr = attrs
        .iter()
        .find(|attr| attr.path().is_ident("map_output_name"))?;

    if let Ok(literal) = attr.parse_args::<LitStr>() {
        return Some(NameMapper::Literal(literal.value()));
    }

    let mapper = attr.parse_args::<Ident>().ok()?;
    match mapper.to_string().as_str() {
        "snake_case" | "SnakeCase" | "SnakeCaseMapper" => Some(NameMapper::SnakeCase),
        "camel_case" | "CamelCase" | "CamelCaseMapper" => Some(NameMapper::CamelCase),
        other => {
            tracing::debug!(mapper = other, "Unknown output name mapper");
            None
        }
    }
}

/// Get the #[data_collection_of(T)] element from attributes.
fn get_collection_of(attrs: &[Attribute]) -> Option<ReflectedType> {
    let attr = attrs
        .iter()
        .find(|attr| attr.path().is_ident("data_collection_of"))?;
    let ty = attr.parse_args::<syn::Type>().ok()?;
    Some(type_to_reflected(&ty, None))
}

/// Element type from a `@var T[]` or `@var DataCollection<T>` doc line.
fn element_from_doc(doc: &str) -> Option<String> {
    let annotation = doc.lines().find_map(|line| {
        line.trim()
            .strip_prefix("@var")
            .map(|rest| rest.trim().split_whitespace().next().unwrap_or(""))
    })?;

    let inner = if let Some(inner) = annotation.strip_suffix("[]") {
        inner
    } else {
        let (_, rest) = annotation.split_once('<')?;
        rest.strip_suffix('>')?
    };

    let name = inner
        .rsplit(|c: char| c == '\\' || c == ':')
        .next()
        .unwrap_or(inner)
        .trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Get string value from attribute like #[attr = "value"].
fn get_attribute_string_value(attr: &Attribute) -> Option<String> {
    if let Meta::NameValue(nv) = &attr.meta {
        if let Expr::Lit(lit) = &nv.value {
            if let Lit::Str(s) = &lit.lit {
                return Some(s.value());
            }
        }
    }
    None
}

/// Get documentation comment from attributes.
fn get_doc_comment(attrs: &[Attribute]) -> Option<String> {
    let docs: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if attr.path().is_ident("doc") {
                get_attribute_string_value(attr)
            } else {
                None
            }
        })
        .collect();

    if docs.is_empty() {
        None
    } else {
        Some(
            docs.into_iter()
                .map(|s| s.trim().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}
