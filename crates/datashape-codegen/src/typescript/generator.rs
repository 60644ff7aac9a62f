use std::collections::HashSet;
use std::path::{Path, PathBuf};

use datashape_core::schema::SchemaRegistry;
use datashape_core::{DataShapeError, Result, TypeScriptConfig};

use super::transformer::{
    property_entry, RecordDefinition, TransformedType, TypeScriptTransformer,
};

const HEADER: &str = "// Auto-generated by datashape - DO NOT EDIT";

/// Generates one definition file for every data record in a registry.
pub struct TypeScriptGenerator {
    transformer: TypeScriptTransformer,
}

impl TypeScriptGenerator {
    /// Create a new TypeScript generator.
    pub fn new(config: TypeScriptConfig) -> Self {
        Self {
            transformer: TypeScriptTransformer::new(config),
        }
    }

    /// Transform every data record, ordered by record name.
    ///
    /// Records with a property type that cannot be represented are skipped,
    /// and so is every record that references a skipped one, directly or
    /// through other records. A collection without an element type fails
    /// the whole run.
    pub fn transform_all(&self, registry: &SchemaRegistry) -> Result<Vec<TransformedType>> {
        let mut records = Vec::new();

        for class in registry.all_data() {
            let mut properties = Vec::with_capacity(class.properties.len());
            let mut unsupported = None;

            for property in &class.properties {
                match property_entry(&class, property) {
                    Ok(entry) => properties.push(entry),
                    Err(DataShapeError::UnsupportedType { property, declared }) => {
                        unsupported.get_or_insert((property, declared));
                    }
                    Err(e) => return Err(e),
                }
            }

            match unsupported {
                Some((property, declared)) => tracing::warn!(
                    record = %class.name,
                    property = %property,
                    declared = %declared,
                    "Skipping record with unsupported property type"
                ),
                None => records.push(RecordDefinition {
                    name: class.name.clone(),
                    properties,
                }),
            }
        }

        retain_complete(&mut records);

        Ok(records
            .iter()
            .map(|record| TransformedType {
                name: record.name.clone(),
                transformed: self.transformer.emit(record),
            })
            .collect())
    }

    /// Render the full definition file.
    pub fn generate(&self, registry: &SchemaRegistry) -> Result<String> {
        let types = self.transform_all(registry)?;
        tracing::info!(count = types.len(), "Generated TypeScript definitions");

        let mut out = String::from(HEADER);
        out.push('\n');
        for ty in &types {
            out.push('\n');
            out.push_str(&ty.transformed);
            out.push('\n');
        }
        Ok(out)
    }

    /// Render the definitions as a JSON array of `{ name, transformed }`.
    pub fn generate_json(&self, registry: &SchemaRegistry) -> Result<String> {
        let types = self.transform_all(registry)?;
        Ok(serde_json::to_string_pretty(&types)?)
    }

    /// Generate and write the definition file, creating parent directories.
    pub fn write(&self, registry: &SchemaRegistry, path: &Path) -> Result<()> {
        write_file(path, &self.generate(registry)?)
    }

    /// Generate and write the JSON rendering, creating parent directories.
    pub fn write_json(&self, registry: &SchemaRegistry, path: &Path) -> Result<()> {
        write_file(path, &self.generate_json(registry)?)
    }
}

/// Path of the JSON rendering next to a definition file:
/// `types/generated.d.ts` becomes `types/generated.json`.
pub fn json_path(definitions: &Path) -> PathBuf {
    let stem = definitions
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            name.strip_suffix(".d.ts")
                .or_else(|| name.strip_suffix(".ts"))
                .unwrap_or(name)
        })
        .unwrap_or("generated");

    definitions.with_file_name(format!("{}.json", stem))
}

/// Drop records referencing a record that is not emitted, until none do.
fn retain_complete(records: &mut Vec<RecordDefinition>) {
    loop {
        let emitted: HashSet<String> = records.iter().map(|r| r.name.clone()).collect();
        let before = records.len();

        records.retain(|record| {
            match record.references().find(|name| !emitted.contains(*name)) {
                Some(missing) => {
                    tracing::warn!(
                        record = %record.name,
                        references = %missing,
                        "Skipping record that references a skipped record"
                    );
                    false
                }
                None => true,
            }
        });

        if records.len() == before {
            break;
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    tracing::info!(path = %path.display(), "Wrote TypeScript definitions");
    Ok(())
}
