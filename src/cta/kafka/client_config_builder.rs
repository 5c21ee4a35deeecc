use super::common_config::CommonKafkaConfig;
use rdkafka::config::ClientConfig;
use std::time::Duration;

/// Translates the crate's config structs into librdkafka properties
///
/// Every role starts from [`from_common`](Self::from_common); the consumer and
/// producer configs then add their own keys through the role setters.
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Connection properties shared by admin, producer and consumer clients
    pub fn from_common(common: &CommonKafkaConfig) -> Self {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &common.brokers)
            .set("compression.type", common.compression.as_str())
            .set(
                "request.timeout.ms",
                common.request_timeout.as_millis().to_string(),
            );
        if let Some(id) = &common.client_id {
            config.set("client.id", id);
        }

        let builder = Self { config };
        common
            .custom_config
            .iter()
            .fold(builder, |builder, (key, value)| builder.property(key, value))
    }

    /// Consumer group; the subscription pattern doubles as group id
    pub fn group_id(self, group: &str) -> Self {
        self.property("group.id", group)
    }

    /// Reset to the earliest retained offset when the group has no commit
    pub fn earliest_offsets(self, earliest: bool) -> Self {
        if earliest {
            self.property("auto.offset.reset", "earliest")
        } else {
            self
        }
    }

    /// Local delivery timeout of a produced message
    pub fn message_timeout(self, timeout: Duration) -> Self {
        self.property("message.timeout.ms", &timeout.as_millis().to_string())
    }

    /// Set a raw librdkafka property
    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.config.set(key, value);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
