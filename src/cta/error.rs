/*!
# Application Error Types

Top-level error for wiring producers, consumers and the stream agent together.
Per-message failures never surface here; they are reported as drain outcomes.
*/

use crate::cta::kafka::kafka_error::KafkaClientError;
use crate::cta::schema::SchemaError;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum CtaError {
    /// Kafka-related errors with context
    #[error("Kafka operation failed: {message}")]
    Kafka {
        #[source]
        source: KafkaClientError,
        message: String,
    },

    /// Schema registry errors
    #[error("Schema operation failed")]
    Schema(#[from] SchemaError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CtaError {
    /// Helper to create Kafka errors with context
    pub fn kafka(source: impl Into<KafkaClientError>, message: impl Into<String>) -> Self {
        Self::Kafka {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Helper to create configuration errors
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<KafkaClientError> for CtaError {
    fn from(err: KafkaClientError) -> Self {
        CtaError::Kafka {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Type alias for Results using CtaError
pub type CtaResult<T> = Result<T, CtaError>;
