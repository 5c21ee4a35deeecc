use super::utils::convert_kafka_log_level;
use log::error;
use rdkafka::ClientContext;
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::error::KafkaError;

/// Client context that forwards librdkafka logs and global errors to `log`
#[derive(Debug, Clone, Default)]
pub struct LoggingClientContext {
    label: String,
}

impl LoggingClientContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl ClientContext for LoggingClientContext {
    fn log(&self, level: RDKafkaLogLevel, fac: &str, message: &str) {
        // `fac` names the librdkafka subsystem, e.g. "BROKER" or "TOPIC"
        log::log!(
            convert_kafka_log_level(level),
            "Kafka log [{}] ({}): {}",
            self.label,
            fac,
            message
        );
    }

    fn error(&self, error: KafkaError, reason: &str) {
        error!(
            "Kafka client error [{}]: {:?}, reason: {}",
            self.label, error, reason
        );
    }
}
