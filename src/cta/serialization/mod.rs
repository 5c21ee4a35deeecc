//! Serialization for Kafka payloads
//!
//! Avro values travel in Confluent framing (see [`avro`]); the stations table
//! and its changelog use plain JSON (see [`json`]).

pub mod avro;
pub mod json;

pub use avro::{ConfluentAvroCodec, from_avro, to_avro};
pub use json::{from_json, to_json};

/// Serialization error type
#[derive(Debug)]
pub enum SerializationError {
    SerializationFailed(String),
    DeserializationFailed(String),
    /// Payload is not in the expected wire framing
    InvalidFraming(String),
    SchemaError(String),
}

impl SerializationError {
    pub fn json_error(context: &str, err: serde_json::Error) -> Self {
        SerializationError::DeserializationFailed(format!("{}: {}", context, err))
    }

    pub fn avro_error(context: &str, err: apache_avro::Error) -> Self {
        SerializationError::DeserializationFailed(format!("{}: {}", context, err))
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::SerializationFailed(msg) => {
                write!(f, "Serialization failed: {}", msg)
            }
            SerializationError::DeserializationFailed(msg) => {
                write!(f, "Deserialization failed: {}", msg)
            }
            SerializationError::InvalidFraming(msg) => write!(f, "Invalid framing: {}", msg),
            SerializationError::SchemaError(msg) => write!(f, "Schema error: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}
