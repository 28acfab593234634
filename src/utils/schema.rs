//! JSON schema validation for inbound payloads.
//!
//! The rules live in a JSON Schema document (draft 2020-12) that is loaded
//! at startup and compiled once; the validator itself knows nothing about
//! the shape it checks.

use std::path::Path;

use jsonschema::{Draft, Validator};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema document {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema document {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// A compiled schema that checks payloads without modifying them.
pub struct SchemaValidator {
    validator: Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Compile a schema document.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| SchemaError::Invalid(err.to_string()))?;
        Ok(Self { validator })
    }

    /// Parse and compile a schema document stored on disk.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: display.clone(),
            source,
        })?;
        let schema: Value = serde_json::from_str(&raw).map_err(|source| SchemaError::Parse {
            path: display,
            source,
        })?;
        Self::new(&schema)
    }

    /// Check `instance`, returning one diagnostic per violated constraint.
    ///
    /// Each diagnostic starts with the JSON pointer of the offending value
    /// (`/` for the document root). The error list is never empty.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|err| {
                let path = err.instance_path().to_string();
                let path = if path.is_empty() { "/" } else { path.as_str() };
                format!("{}: {}", path, err)
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
