//! Connection settings shared by every producer, consumer and admin client.
//!
//! Defaults point at the local three-broker cluster and schema registry used
//! by the CTA simulation. Both can be overridden from the environment:
//!
//! - `CTA_BOOTSTRAP_SERVERS` - comma separated broker list
//! - `CTA_SCHEMA_REGISTRY_URL` - schema registry base URL

/// Environment variable holding the comma separated bootstrap server list
pub const BOOTSTRAP_SERVERS_ENV: &str = "CTA_BOOTSTRAP_SERVERS";

/// Environment variable holding the schema registry base URL
pub const SCHEMA_REGISTRY_URL_ENV: &str = "CTA_SCHEMA_REGISTRY_URL";

/// Brokers of the reference environment
pub const DEFAULT_BROKER_URLS: [&str; 3] = [
    "PLAINTEXT://localhost:9092",
    "PLAINTEXT://localhost:9093",
    "PLAINTEXT://localhost:9094",
];

/// Schema registry of the reference environment
pub const DEFAULT_SCHEMA_REGISTRY_URL: &str = "http://localhost:8081";

/// Broker and schema registry endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaSettings {
    /// Bootstrap brokers, in the order they are handed to librdkafka
    pub brokers: Vec<String>,
    /// Base URL of the Confluent-compatible schema registry
    pub schema_registry_url: String,
}

impl Default for CtaSettings {
    fn default() -> Self {
        Self {
            brokers: DEFAULT_BROKER_URLS.iter().map(|s| s.to_string()).collect(),
            schema_registry_url: DEFAULT_SCHEMA_REGISTRY_URL.to_string(),
        }
    }
}

impl CtaSettings {
    /// Create settings for an explicit broker list
    pub fn new(brokers: &str, schema_registry_url: impl Into<String>) -> Self {
        Self {
            brokers: parse_broker_list(brokers),
            schema_registry_url: schema_registry_url.into(),
        }
    }

    /// Load settings, falling back to the reference defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(BOOTSTRAP_SERVERS_ENV) {
            let brokers = parse_broker_list(&raw);
            if brokers.is_empty() {
                log::warn!(
                    "{} is set but contains no brokers, using defaults",
                    BOOTSTRAP_SERVERS_ENV
                );
            } else {
                settings.brokers = brokers;
            }
        }

        if let Some(url) = lookup(SCHEMA_REGISTRY_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                settings.schema_registry_url = url.trim_end_matches('/').to_string();
            }
        }

        settings
    }

    /// Broker list joined the way `bootstrap.servers` expects it
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }
}

fn parse_broker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
