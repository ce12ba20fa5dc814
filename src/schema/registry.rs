//! Schema registry - embedded JSON schemas

use rust_embed::Embed;
use std::collections::HashMap;

use crate::core::EntityPrefix;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// JSON schemas for record validation, keyed by record type
pub struct SchemaRegistry {
    schemas: HashMap<EntityPrefix, String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        for prefix in EntityPrefix::all() {
            let filename = format!("{}.schema.json", prefix.as_str().to_lowercase());
            match EmbeddedSchemas::get(&filename) {
                Some(file) => match std::str::from_utf8(&file.data) {
                    Ok(content) => {
                        schemas.insert(*prefix, content.to_string());
                    }
                    Err(e) => tracing::warn!(%filename, error = %e, "schema is not UTF-8"),
                },
                None => tracing::debug!(%filename, "no embedded schema"),
            }
        }

        Self { schemas }
    }

    pub fn get(&self, prefix: EntityPrefix) -> Option<&str> {
        self.schemas.get(&prefix).map(|s| s.as_str())
    }

    pub fn has_schema(&self, prefix: EntityPrefix) -> bool {
        self.schemas.contains_key(&prefix)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
