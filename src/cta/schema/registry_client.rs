//! Confluent Schema Registry client
//!
//! Registers the Avro schemas producers write with and resolves schema ids
//! found in consumed payloads. Both directions are cached for the lifetime of
//! the client, since ids are immutable once assigned.

use super::{SchemaError, SchemaResult, SchemaStore, schema_json};
use apache_avro::Schema as AvroSchema;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

#[derive(Serialize)]
struct RegisterRequest<'a> {
    schema: &'a str,
}

#[derive(Deserialize)]
struct RegisterResponse {
    id: u32,
}

#[derive(Deserialize)]
struct SchemaByIdResponse {
    schema: String,
}

/// HTTP client for a Confluent-compatible schema registry
pub struct SchemaRegistryClient {
    base_url: String,
    http_client: reqwest::Client,
    ids_by_subject: RwLock<HashMap<(String, String), u32>>,
    schemas_by_id: RwLock<HashMap<u32, Arc<AvroSchema>>>,
}

impl SchemaRegistryClient {
    pub fn new(base_url: &str, timeout: Duration) -> SchemaResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| provider_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            ids_by_subject: RwLock::new(HashMap::new()),
            schemas_by_id: RwLock::new(HashMap::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cached_id(&self, subject: &str, text: &str) -> Option<u32> {
        self.ids_by_subject
            .read()
            .ok()?
            .get(&(subject.to_string(), text.to_string()))
            .copied()
    }

    fn cached_schema(&self, id: u32) -> Option<Arc<AvroSchema>> {
        self.schemas_by_id.read().ok()?.get(&id).cloned()
    }

    async fn check_status(response: reqwest::Response) -> SchemaResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SchemaError::NotFound { source: body });
        }
        Err(provider_error(format!("HTTP {}: {}", status, body)))
    }
}

fn provider_error(message: String) -> SchemaError {
    SchemaError::Provider {
        source: "confluent".to_string(),
        message,
    }
}

#[async_trait]
impl SchemaStore for SchemaRegistryClient {
    async fn register(&self, subject: &str, schema: &AvroSchema) -> SchemaResult<u32> {
        let text = schema_json(schema)?;
        if let Some(id) = self.cached_id(subject, &text) {
            return Ok(id);
        }

        let url = format!("{}/subjects/{}/versions", self.base_url, subject);
        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .json(&RegisterRequest { schema: &text })
            .send()
            .await
            .map_err(|e| provider_error(format!("Request to {} failed: {}", url, e)))?;

        let registered: RegisterResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse response: {}", e)))?;

        debug!("Registered schema id {} for subject {}", registered.id, subject);

        if let Ok(mut ids) = self.ids_by_subject.write() {
            ids.insert((subject.to_string(), text), registered.id);
        }
        if let Ok(mut schemas) = self.schemas_by_id.write() {
            schemas
                .entry(registered.id)
                .or_insert_with(|| Arc::new(schema.clone()));
        }

        Ok(registered.id)
    }

    async fn schema_by_id(&self, id: u32) -> SchemaResult<Arc<AvroSchema>> {
        if let Some(schema) = self.cached_schema(id) {
            return Ok(schema);
        }

        let url = format!("{}/schemas/ids/{}", self.base_url, id);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| provider_error(format!("Request to {} failed: {}", url, e)))?;

        let fetched: SchemaByIdResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse response: {}", e)))?;

        let schema = AvroSchema::parse_str(&fetched.schema).map_err(|e| SchemaError::Validation {
            message: format!("Registry returned an invalid schema for id {}: {}", id, e),
        })?;
        let schema = Arc::new(schema);

        if let Ok(mut schemas) = self.schemas_by_id.write() {
            schemas.insert(id, schema.clone());
        }

        Ok(schema)
    }
}
