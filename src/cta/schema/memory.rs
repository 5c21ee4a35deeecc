//! In-memory schema store
//!
//! Suitable for testing and development. All data is lost when the process
//! terminates.

use super::{SchemaError, SchemaResult, SchemaStore, schema_json};
use apache_avro::Schema as AvroSchema;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory schema store for tests
#[derive(Default)]
pub struct MemorySchemaStore {
    /// subject -> (schema json, id) in registration order
    subjects: RwLock<HashMap<String, Vec<(String, u32)>>>,
    schemas_by_id: RwLock<HashMap<u32, Arc<AvroSchema>>>,
    next_id: AtomicU32,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Versions registered under a subject
    pub fn versions(&self, subject: &str) -> usize {
        self.subjects
            .read()
            .map(|subjects| subjects.get(subject).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn lock_error(kind: &str) -> SchemaError {
    SchemaError::Provider {
        source: "memory".to_string(),
        message: format!("Failed to acquire {} lock", kind),
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn register(&self, subject: &str, schema: &AvroSchema) -> SchemaResult<u32> {
        let text = schema_json(schema)?;
        let mut subjects = self.subjects.write().map_err(|_| lock_error("write"))?;
        let versions = subjects.entry(subject.to_string()).or_default();

        if let Some((_, id)) = versions.iter().find(|(existing, _)| *existing == text) {
            return Ok(*id);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        versions.push((text, id));
        self.schemas_by_id
            .write()
            .map_err(|_| lock_error("write"))?
            .insert(id, Arc::new(schema.clone()));

        Ok(id)
    }

    async fn schema_by_id(&self, id: u32) -> SchemaResult<Arc<AvroSchema>> {
        let schemas = self.schemas_by_id.read().map_err(|_| lock_error("read"))?;
        schemas.get(&id).cloned().ok_or_else(|| SchemaError::NotFound {
            source: format!("Schema with ID {} not found", id),
        })
    }
}
