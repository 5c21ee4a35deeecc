//! Registry of topics this application has already provisioned
//!
//! A name enters the registry after its first create request, whatever the
//! broker answered, and never leaves it. The guard is per registry: another
//! process, or a restart, issues the create request again and the broker
//! reports the topic as already existing.

use super::admin_client::{TopicAdmin, TopicCreation, TopicSpec};
use log::{error, info};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of [`TopicRegistry::ensure_topic`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicProvision {
    /// The registry already knew the name; no request was sent
    AlreadyKnown,
    /// The broker created the topic or reported it as existing
    Created,
    /// The create request failed; the name is still recorded
    Failed(String),
}

/// Created-topic registry with an injectable lock
#[derive(Debug, Default)]
pub struct TopicRegistry {
    known: Arc<Mutex<HashSet<String>>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry backed by a set shared with other owners
    pub fn with_shared(known: Arc<Mutex<HashSet<String>>>) -> Self {
        Self { known }
    }

    /// Create `spec.name` unless this registry has seen it before.
    ///
    /// The lock is held across the remote call, so concurrent calls for the
    /// same name send exactly one request.
    pub async fn ensure_topic(&self, admin: &dyn TopicAdmin, spec: &TopicSpec) -> TopicProvision {
        let mut known = self.known.lock().await;
        if known.contains(&spec.name) {
            return TopicProvision::AlreadyKnown;
        }

        let provision = match admin.create_topic(spec).await {
            Ok(TopicCreation::Created) => {
                info!(
                    "Created topic: {} with {} partitions, {} replicas",
                    spec.name, spec.num_partitions, spec.num_replicas
                );
                TopicProvision::Created
            }
            Ok(TopicCreation::AlreadyExists) => {
                info!("Topic {} already exists, continuing...", spec.name);
                TopicProvision::Created
            }
            Err(e) => {
                error!("Failed to create topic {}: {}", spec.name, e);
                TopicProvision::Failed(e.to_string())
            }
        };

        known.insert(spec.name.clone());
        provision
    }

    /// Whether the name has been provisioned through this registry
    pub async fn is_known(&self, name: &str) -> bool {
        self.known.lock().await.contains(name)
    }

    /// Snapshot of every provisioned name
    pub async fn known_topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.known.lock().await.iter().cloned().collect();
        names.sort();
        names
    }
}
