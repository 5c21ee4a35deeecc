use crate::cta::config::CtaSettings;
use std::collections::HashMap;
use std::time::Duration;

/// Compression codec applied by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Gzip,
    Snappy,
    Lz4,
    Zstd,
}

impl CompressionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionType::None => "none",
            CompressionType::Gzip => "gzip",
            CompressionType::Snappy => "snappy",
            CompressionType::Lz4 => "lz4",
            CompressionType::Zstd => "zstd",
        }
    }
}

impl Default for CompressionType {
    fn default() -> Self {
        CompressionType::Lz4
    }
}

/// Connection fields shared between producer and consumer
///
/// Frozen into the client when a wrapper is constructed; later changes to a
/// clone do not affect a running client.
#[derive(Debug, Clone)]
pub struct CommonKafkaConfig {
    /// Kafka broker list (e.g., "PLAINTEXT://broker1:9092,PLAINTEXT://broker2:9092")
    pub brokers: String,
    /// Client ID for this producer/consumer instance
    pub client_id: Option<String>,
    /// Compression codec
    pub compression: CompressionType,
    /// Request timeout for Kafka operations
    pub request_timeout: Duration,
    /// Additional custom configuration properties
    pub custom_config: HashMap<String, String>,
}

impl Default for CommonKafkaConfig {
    fn default() -> Self {
        Self::from_settings(&CtaSettings::default())
    }
}

impl CommonKafkaConfig {
    /// Create a new common configuration with brokers
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            client_id: None,
            compression: CompressionType::default(),
            request_timeout: Duration::from_secs(30),
            custom_config: HashMap::new(),
        }
    }

    /// Brokers taken from application settings; the schema registry is
    /// reached through the [`AppContext`](crate::AppContext) schema store
    pub fn from_settings(settings: &CtaSettings) -> Self {
        Self::new(settings.bootstrap_servers())
    }

    /// Set client ID
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set compression codec
    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Add custom configuration property
    pub fn custom_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_config.insert(key.into(), value.into());
        self
    }
}
