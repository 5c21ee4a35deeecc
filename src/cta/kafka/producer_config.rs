use super::client_config_builder::ClientConfigBuilder;
use super::common_config::CommonKafkaConfig;
use crate::cta::config::CtaSettings;
use rdkafka::config::ClientConfig;
use std::time::Duration;

/// Client id every producer of the simulation announces
pub const PRODUCER_CLIENT_ID: &str = "1";

/// Configuration for a [`KafkaProducer`](super::KafkaProducer)
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Common configuration shared with consumer
    pub common: CommonKafkaConfig,
    /// Topic the producer writes to and provisions on construction
    pub topic_name: String,
    /// Partitions requested when the topic is created
    pub num_partitions: i32,
    /// Replication factor requested when the topic is created
    pub num_replicas: i32,
    /// Upper bound for `flush()` and for the flush performed by `close()`
    pub flush_timeout: Duration,
    /// Local delivery timeout of a single send
    pub message_timeout: Duration,
}

impl ProducerConfig {
    /// Producer for `topic_name` against the configured cluster
    pub fn new(settings: &CtaSettings, topic_name: impl Into<String>) -> Self {
        Self::with_common(CommonKafkaConfig::from_settings(settings), topic_name)
    }

    /// Producer built on an explicit common configuration
    pub fn with_common(common: CommonKafkaConfig, topic_name: impl Into<String>) -> Self {
        Self {
            common: common.client_id(PRODUCER_CLIENT_ID),
            topic_name: topic_name.into(),
            num_partitions: 1,
            num_replicas: 1,
            flush_timeout: Duration::from_millis(1000),
            message_timeout: Duration::from_secs(30),
        }
    }

    /// Set partition and replica counts used at topic creation
    pub fn topology(mut self, num_partitions: i32, num_replicas: i32) -> Self {
        self.num_partitions = num_partitions;
        self.num_replicas = num_replicas;
        self
    }

    /// Set the flush timeout
    pub fn flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }

    /// Set the per-message delivery timeout
    pub fn message_timeout(mut self, timeout: Duration) -> Self {
        self.message_timeout = timeout;
        self
    }

    /// Add custom configuration property
    pub fn custom_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common = self.common.custom_property(key, value);
        self
    }

    /// librdkafka properties for this producer
    pub fn client_config(&self) -> ClientConfig {
        ClientConfigBuilder::from_common(&self.common)
            .message_timeout(self.message_timeout)
            .build()
    }
}
