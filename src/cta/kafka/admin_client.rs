//! Admin client utilities for Kafka topic management
//!
//! Topics are created with a fixed delete-policy configuration. The
//! [`TopicAdmin`] trait is the seam the topic registry provisions through.

use super::client_config_builder::ClientConfigBuilder;
use super::client_context::LoggingClientContext;
use super::common_config::CommonKafkaConfig;
use super::kafka_error::KafkaClientError;
use async_trait::async_trait;
use log::info;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use std::time::Duration;

/// Topic-level configuration applied to every created topic
pub const TOPIC_CONFIG: [(&str, &str); 4] = [
    ("cleanup.policy", "delete"),
    ("compression.type", "lz4"),
    ("delete.retention.ms", "2000"),
    ("file.delete.delay.ms", "2000"),
];

/// A topic to provision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub num_partitions: i32,
    pub num_replicas: i32,
}

impl TopicSpec {
    pub fn new(name: impl Into<String>, num_partitions: i32, num_replicas: i32) -> Self {
        Self {
            name: name.into(),
            num_partitions,
            num_replicas,
        }
    }
}

/// Successful answer of a create request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicCreation {
    Created,
    /// The broker already had the topic
    AlreadyExists,
}

/// Remote topic administration
#[async_trait]
pub trait TopicAdmin: Send + Sync {
    /// Issue one create request and wait for the broker's answer
    async fn create_topic(&self, spec: &TopicSpec) -> Result<TopicCreation, KafkaClientError>;
}

/// Admin client for managing Kafka topics
pub struct KafkaAdminClient {
    admin: AdminClient<LoggingClientContext>,
    operation_timeout: Duration,
}

impl KafkaAdminClient {
    /// Create a new admin client
    pub fn new(common: &CommonKafkaConfig) -> Result<Self, KafkaError> {
        let admin: AdminClient<LoggingClientContext> = ClientConfigBuilder::from_common(common)
            .build()
            .create_with_context(LoggingClientContext::new("admin"))?;

        Ok(Self {
            admin,
            operation_timeout: common.request_timeout,
        })
    }

    fn admin_options(&self) -> AdminOptions {
        AdminOptions::new()
            .operation_timeout(Some(self.operation_timeout))
            .request_timeout(Some(self.operation_timeout))
    }

    /// Delete a topic (useful for cleanup)
    pub async fn delete_topic(&self, topic_name: &str) -> Result<(), KafkaClientError> {
        let results = self
            .admin
            .delete_topics(&[topic_name], &self.admin_options())
            .await?;

        for result in results {
            match result {
                Ok(topic) => info!("Deleted topic: {}", topic),
                Err((topic, RDKafkaErrorCode::UnknownTopicOrPartition)) => {
                    info!("Topic {} does not exist, nothing to delete", topic)
                }
                Err((_, code)) => return Err(KafkaError::AdminOp(code).into()),
            }
        }

        Ok(())
    }

    /// Check if a topic exists in the cluster metadata
    pub fn topic_exists(&self, topic_name: &str, timeout: Duration) -> Result<bool, KafkaClientError> {
        let metadata = self.admin.inner().fetch_metadata(None, timeout)?;

        Ok(metadata
            .topics()
            .iter()
            .any(|topic| topic.name() == topic_name))
    }
}

#[async_trait]
impl TopicAdmin for KafkaAdminClient {
    async fn create_topic(&self, spec: &TopicSpec) -> Result<TopicCreation, KafkaClientError> {
        let mut new_topic = NewTopic::new(
            &spec.name,
            spec.num_partitions,
            TopicReplication::Fixed(spec.num_replicas),
        );
        for (key, value) in TOPIC_CONFIG {
            new_topic = new_topic.set(key, value);
        }

        let results = self
            .admin
            .create_topics(&[new_topic], &self.admin_options())
            .await?;

        let mut outcome = TopicCreation::Created;
        for result in results {
            match result {
                Ok(_) => {}
                Err((_, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    outcome = TopicCreation::AlreadyExists;
                }
                Err((_, code)) => return Err(KafkaError::AdminOp(code).into()),
            }
        }

        Ok(outcome)
    }
}
