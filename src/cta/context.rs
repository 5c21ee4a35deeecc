//! Shared application state
//!
//! Producers and consumers are built against an [`AppContext`], which owns the
//! topic registry, the admin client used to provision topics and the schema
//! store. Cloning the context shares all three.

use crate::cta::config::CtaSettings;
use crate::cta::error::{CtaError, CtaResult};
use crate::cta::kafka::admin_client::{KafkaAdminClient, TopicAdmin};
use crate::cta::kafka::common_config::CommonKafkaConfig;
use crate::cta::kafka::topic_registry::TopicRegistry;
use crate::cta::schema::{SchemaRegistryClient, SchemaStore};
use log::info;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    settings: CtaSettings,
    topics: Arc<TopicRegistry>,
    admin: Arc<dyn TopicAdmin>,
    schemas: Arc<dyn SchemaStore>,
}

impl AppContext {
    /// Context talking to the configured cluster and schema registry
    pub fn connect(settings: CtaSettings) -> CtaResult<Self> {
        if settings.brokers.is_empty() {
            return Err(CtaError::config("no bootstrap servers configured"));
        }
        let common = CommonKafkaConfig::from_settings(&settings);
        let admin = KafkaAdminClient::new(&common)
            .map_err(|e| CtaError::kafka(e, "Failed to create admin client"))?;
        let schemas = SchemaRegistryClient::new(&settings.schema_registry_url, common.request_timeout)?;

        info!(
            "Connected context to {} (schema registry {})",
            settings.bootstrap_servers(),
            settings.schema_registry_url
        );

        Ok(Self::with_components(settings, Arc::new(admin), Arc::new(schemas)))
    }

    /// Context over caller-provided admin and schema store
    pub fn with_components(
        settings: CtaSettings,
        admin: Arc<dyn TopicAdmin>,
        schemas: Arc<dyn SchemaStore>,
    ) -> Self {
        Self {
            settings,
            topics: Arc::new(TopicRegistry::new()),
            admin,
            schemas,
        }
    }

    pub fn settings(&self) -> &CtaSettings {
        &self.settings
    }

    pub fn topics(&self) -> &TopicRegistry {
        &self.topics
    }

    pub fn admin(&self) -> Arc<dyn TopicAdmin> {
        self.admin.clone()
    }

    pub fn schemas(&self) -> Arc<dyn SchemaStore> {
        self.schemas.clone()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .field("topics", &self.topics)
            .finish_non_exhaustive()
    }
}
