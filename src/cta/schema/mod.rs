//! Schema Management
//!
//! Avro schemas are resolved through a [`SchemaStore`]: the Confluent-compatible
//! [`SchemaRegistryClient`] in production, or the [`MemorySchemaStore`] for
//! tests and local development.

pub mod memory;
pub mod registry_client;

pub use memory::MemorySchemaStore;
pub use registry_client::SchemaRegistryClient;

use apache_avro::Schema as AvroSchema;
use async_trait::async_trait;
use std::sync::Arc;

/// Error types for schema management operations
#[derive(Debug)]
pub enum SchemaError {
    NotFound { source: String },
    Provider { source: String, message: String },
    Validation { message: String },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::NotFound { source } => write!(f, "Schema not found: {}", source),
            SchemaError::Provider { source, message } => {
                write!(f, "Schema provider error: {} - {}", source, message)
            }
            SchemaError::Validation { message } => {
                write!(f, "Schema validation error: {}", message)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Registers writer schemas and resolves them back by id
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Register `schema` under `subject` and return its global id.
    /// Registering an identical schema again returns the same id.
    async fn register(&self, subject: &str, schema: &AvroSchema) -> SchemaResult<u32>;

    /// Look up a schema by the id carried in a framed payload
    async fn schema_by_id(&self, id: u32) -> SchemaResult<Arc<AvroSchema>>;
}

/// JSON text of a schema as submitted to a registry
pub(crate) fn schema_json(schema: &AvroSchema) -> SchemaResult<String> {
    serde_json::to_string(schema).map_err(|e| SchemaError::Validation {
        message: format!("Failed to render schema as JSON: {}", e),
    })
}
