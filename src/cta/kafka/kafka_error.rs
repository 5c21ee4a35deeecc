use crate::cta::schema::SchemaError;
use crate::cta::serialization::SerializationError;
use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;

/// Failure of a producer, consumer or admin call
///
/// librdkafka timeouts (local message expiry, request and operation
/// timeouts) surface as [`Timeout`](Self::Timeout) rather than as a wrapped
/// [`KafkaError`].
#[derive(Debug)]
pub enum KafkaClientError {
    /// Underlying Kafka library error
    KafkaError(KafkaError),
    /// Serialization/deserialization error
    SerializationError(SerializationError),
    /// Schema registry error
    Schema(SchemaError),
    /// A send, admin request or poll ran out of time
    Timeout,
    /// The producer or consumer was already closed
    Closed,
}

impl std::fmt::Display for KafkaClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KafkaClientError::KafkaError(e) => write!(f, "Kafka error: {}", e),
            KafkaClientError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            KafkaClientError::Schema(e) => write!(f, "Schema error: {}", e),
            KafkaClientError::Timeout => write!(f, "Timeout waiting for operation"),
            KafkaClientError::Closed => write!(f, "Client already closed"),
        }
    }
}

impl std::error::Error for KafkaClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KafkaClientError::KafkaError(e) => Some(e),
            KafkaClientError::SerializationError(e) => Some(e),
            KafkaClientError::Schema(e) => Some(e),
            KafkaClientError::Timeout | KafkaClientError::Closed => None,
        }
    }
}

impl From<KafkaError> for KafkaClientError {
    fn from(err: KafkaError) -> Self {
        match err.rdkafka_error_code() {
            Some(
                RDKafkaErrorCode::MessageTimedOut
                | RDKafkaErrorCode::RequestTimedOut
                | RDKafkaErrorCode::OperationTimedOut,
            ) => KafkaClientError::Timeout,
            _ => KafkaClientError::KafkaError(err),
        }
    }
}

impl From<SerializationError> for KafkaClientError {
    fn from(err: SerializationError) -> Self {
        KafkaClientError::SerializationError(err)
    }
}

impl From<SchemaError> for KafkaClientError {
    fn from(err: SchemaError) -> Self {
        KafkaClientError::Schema(err)
    }
}

pub type ProducerError = KafkaClientError;
pub type ConsumerError = KafkaClientError;
