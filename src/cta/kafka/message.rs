use crate::cta::serialization::{SerializationError, from_json};
use apache_avro::types::Value as AvroValue;
use serde::Deserialize;

/// Decoded key or value of a consumed record
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Absent payload (tombstone or keyless record)
    Null,
    /// Framed Avro decoded against its writer schema
    Avro(AvroValue),
    /// Bytes as received, for consumers without schema decoding
    Raw(Vec<u8>),
}

impl Payload {
    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    pub fn as_avro(&self) -> Option<&AvroValue> {
        match self {
            Payload::Avro(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a raw payload holding JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, SerializationError> {
        match self {
            Payload::Raw(bytes) => from_json(bytes),
            Payload::Null => Err(SerializationError::DeserializationFailed(
                "payload is empty".to_string(),
            )),
            Payload::Avro(_) => Err(SerializationError::DeserializationFailed(
                "payload is Avro, not JSON".to_string(),
            )),
        }
    }
}

/// A record handed to a [`RecordHandler`](super::RecordHandler)
///
/// Records are read once per poll and dropped after the handler returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedRecord {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Creation or append time in milliseconds, when the broker provides one
    pub timestamp: Option<i64>,
    pub key: Payload,
    pub value: Payload,
}

impl ConsumedRecord {
    pub fn new(topic: impl Into<String>, partition: i32, offset: i64, key: Payload, value: Payload) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            timestamp: None,
            key,
            value,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn key(&self) -> &Payload {
        &self.key
    }

    pub fn value(&self) -> &Payload {
        &self.value
    }
}
