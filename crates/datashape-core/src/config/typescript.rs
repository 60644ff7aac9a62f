use serde::{Deserialize, Serialize};

use crate::error::{DataShapeError, Result};
use crate::schema::CollectionKind;

/// Placeholder for a record name in `record_reference`.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Placeholder for the element type in collection templates.
pub const ELEMENT_PLACEHOLDER: &str = "{element}";

/// TypeScript rendering conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScriptConfig {
    /// Indentation of field lines.
    #[serde(default = "default_indent")]
    pub indent: String,

    /// How a reference to another record is written.
    #[serde(default = "default_record_reference")]
    pub record_reference: String,

    /// Plain record collection.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Offset paginated record collection.
    #[serde(default = "default_paginated_collection")]
    pub paginated_collection: String,

    /// Cursor paginated record collection.
    #[serde(default = "default_cursor_paginated_collection")]
    pub cursor_paginated_collection: String,
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            record_reference: default_record_reference(),
            collection: default_collection(),
            paginated_collection: default_paginated_collection(),
            cursor_paginated_collection: default_cursor_paginated_collection(),
        }
    }
}

impl TypeScriptConfig {
    /// Template for a collection kind.
    pub fn collection_template(&self, kind: CollectionKind) -> &str {
        match kind {
            CollectionKind::Plain => &self.collection,
            CollectionKind::OffsetPaginated => &self.paginated_collection,
            CollectionKind::CursorPaginated => &self.cursor_paginated_collection,
        }
    }

    /// Render a reference to record `name`.
    pub fn render_record(&self, name: &str) -> String {
        self.record_reference.replace(NAME_PLACEHOLDER, name)
    }

    /// Render a collection of `element`, which is already a rendered type.
    pub fn render_collection(&self, kind: CollectionKind, element: &str) -> String {
        self.collection_template(kind)
            .replace(ELEMENT_PLACEHOLDER, element)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.record_reference.contains(NAME_PLACEHOLDER) {
            return Err(DataShapeError::Config(format!(
                "typescript.record_reference must contain {}",
                NAME_PLACEHOLDER
            )));
        }

        let templates = [
            ("collection", &self.collection),
            ("paginated_collection", &self.paginated_collection),
            ("cursor_paginated_collection", &self.cursor_paginated_collection),
        ];
        for (key, template) in templates {
            if !template.contains(ELEMENT_PLACEHOLDER) {
                return Err(DataShapeError::Config(format!(
                    "typescript.{} must contain {}",
                    key, ELEMENT_PLACEHOLDER
                )));
            }
        }

        Ok(())
    }
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_record_reference() -> String {
    NAME_PLACEHOLDER.to_string()
}

fn default_collection() -> String {
    "Array<{element}>".to_string()
}

fn default_paginated_collection() -> String {
    "PaginatedCollection<{element}>".to_string()
}

fn default_cursor_paginated_collection() -> String {
    "CursorPaginatedCollection<{element}>".to_string()
}
