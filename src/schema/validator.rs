//! Record validation against the embedded JSON schemas

use miette::Diagnostic;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::EntityPrefix;
use crate::schema::registry::SchemaRegistry;
use crate::yaml::YamlSyntaxError;

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer into the record ("" for the root)
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),

    #[error("{filename}: {} schema violation(s)", .violations.len())]
    #[diagnostic(code(gear::schema::violation))]
    Schema {
        filename: String,
        violations: Vec<Violation>,
        #[help]
        details: String,
    },

    #[error("no schema available for {0} records")]
    #[diagnostic(code(gear::schema::missing))]
    NoSchema(EntityPrefix),

    #[error("schema for {prefix} is invalid: {message}")]
    #[diagnostic(code(gear::schema::invalid))]
    BadSchema {
        prefix: EntityPrefix,
        message: String,
    },
}

impl ValidationError {
    pub fn violation_count(&self) -> usize {
        match self {
            ValidationError::Schema { violations, .. } => violations.len(),
            _ => 1,
        }
    }
}

/// Compiles the registry's schemas once and validates record text
pub struct Validator {
    compiled: HashMap<EntityPrefix, jsonschema::Validator>,
}

impl Validator {
    pub fn new(registry: &SchemaRegistry) -> Result<Self, ValidationError> {
        let mut compiled = HashMap::new();
        for prefix in EntityPrefix::all() {
            let Some(raw) = registry.get(*prefix) else {
                continue;
            };
            let schema: serde_json::Value =
                serde_json::from_str(raw).map_err(|e| ValidationError::BadSchema {
                    prefix: *prefix,
                    message: e.to_string(),
                })?;
            let validator =
                jsonschema::validator_for(&schema).map_err(|e| ValidationError::BadSchema {
                    prefix: *prefix,
                    message: e.to_string(),
                })?;
            compiled.insert(*prefix, validator);
        }
        Ok(Self { compiled })
    }

    /// Validate YAML record text as a record of type `prefix`
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        prefix: EntityPrefix,
    ) -> Result<(), ValidationError> {
        let validator = self
            .compiled
            .get(&prefix)
            .ok_or(ValidationError::NoSchema(prefix))?;

        let instance: serde_json::Value = serde_yml::from_str(content)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename))?;

        let violations: Vec<Violation> = validator
            .iter_errors(&instance)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            let details = violations
                .iter()
                .map(|v| format!("- {}", v))
                .collect::<Vec<_>>()
                .join("\n");
            Err(ValidationError::Schema {
                filename: filename.to_string(),
                violations,
                details,
            })
        }
    }
}
