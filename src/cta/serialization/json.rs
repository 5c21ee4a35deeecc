use super::SerializationError;
use serde::{Deserialize, Serialize};

/// Serialize a struct to JSON bytes
pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(value).map_err(|e| {
        SerializationError::SerializationFailed(format!("Failed to serialize to JSON bytes: {}", e))
    })
}

/// Deserialize JSON bytes to a struct
pub fn from_json<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes)
        .map_err(|e| SerializationError::json_error("Failed to deserialize from JSON bytes", e))
}
