use super::client_config_builder::ClientConfigBuilder;
use super::common_config::CommonKafkaConfig;
use crate::cta::config::CtaSettings;
use rdkafka::config::ClientConfig;
use std::time::Duration;

/// Configuration for a [`KafkaConsumer`](super::KafkaConsumer)
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Common configuration shared with producer
    pub common: CommonKafkaConfig,
    /// Topic name or `^`-prefixed regex; doubles as the consumer group id
    pub topic_pattern: String,
    /// Decode keys and values as framed Avro through the schema registry
    pub is_avro: bool,
    /// Start every assigned partition from the beginning of the log
    pub offset_earliest: bool,
    /// Idle wait between drain cycles
    pub sleep_interval: Duration,
    /// Upper bound of a single poll
    pub consume_timeout: Duration,
}

impl ConsumerConfig {
    /// Consumer for `topic_pattern` against the configured cluster
    pub fn new(settings: &CtaSettings, topic_pattern: impl Into<String>) -> Self {
        Self::with_common(CommonKafkaConfig::from_settings(settings), topic_pattern)
    }

    /// Consumer built on an explicit common configuration
    pub fn with_common(common: CommonKafkaConfig, topic_pattern: impl Into<String>) -> Self {
        Self {
            common,
            topic_pattern: topic_pattern.into(),
            is_avro: true,
            offset_earliest: false,
            sleep_interval: Duration::from_secs(1),
            consume_timeout: Duration::from_millis(100),
        }
    }

    /// Enable or disable Avro decoding
    pub fn avro(mut self, is_avro: bool) -> Self {
        self.is_avro = is_avro;
        self
    }

    /// Enable or disable replay from the earliest offset
    pub fn offset_earliest(mut self, earliest: bool) -> Self {
        self.offset_earliest = earliest;
        self
    }

    /// Set the idle wait between drain cycles
    pub fn sleep_interval(mut self, interval: Duration) -> Self {
        self.sleep_interval = interval;
        self
    }

    /// Set the single poll timeout
    pub fn consume_timeout(mut self, timeout: Duration) -> Self {
        self.consume_timeout = timeout;
        self
    }

    /// Add custom configuration property
    pub fn custom_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common = self.common.custom_property(key, value);
        self
    }

    /// Consumer group, which is the topic pattern itself
    pub fn group_id(&self) -> &str {
        &self.topic_pattern
    }

    /// librdkafka properties for this consumer
    pub fn client_config(&self) -> ClientConfig {
        ClientConfigBuilder::from_common(&self.common)
            .group_id(self.group_id())
            .earliest_offsets(self.offset_earliest)
            .build()
    }
}
