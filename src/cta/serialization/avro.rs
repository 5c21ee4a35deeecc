//! Avro payloads in Confluent framing
//!
//! A framed payload is the magic byte `0`, the writer schema id as a 4-byte
//! big-endian integer, then the Avro binary datum.

use super::SerializationError;
use crate::cta::schema::{SchemaStore, schema_json};
use apache_avro::{Schema as AvroSchema, from_avro_datum, to_avro_datum, types::Value as AvroValue};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, RwLock};

pub const MAGIC_BYTE: u8 = 0;
pub const HEADER_LEN: usize = 5;

/// Serialize a value to Avro bytes using a schema
pub fn to_avro(value: &AvroValue, schema: &AvroSchema) -> Result<Vec<u8>, SerializationError> {
    let resolved = value.clone().resolve(schema).map_err(|e| {
        SerializationError::SerializationFailed(format!("Value does not match schema: {}", e))
    })?;
    to_avro_datum(schema, resolved).map_err(|e| {
        SerializationError::SerializationFailed(format!("Failed to serialize to Avro bytes: {}", e))
    })
}

/// Deserialize Avro bytes to a value using a schema
pub fn from_avro(bytes: &[u8], schema: &AvroSchema) -> Result<AvroValue, SerializationError> {
    let mut cursor = Cursor::new(bytes);
    from_avro_datum(schema, &mut cursor, None)
        .map_err(|e| SerializationError::avro_error("Failed to deserialize from Avro bytes", e))
}

/// Prefix a datum with the Confluent header
pub fn frame(schema_id: u32, datum: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(HEADER_LEN + datum.len());
    framed.push(MAGIC_BYTE);
    framed.extend_from_slice(&schema_id.to_be_bytes());
    framed.extend_from_slice(datum);
    framed
}

/// Split a framed payload into schema id and datum
pub fn unframe(bytes: &[u8]) -> Result<(u32, &[u8]), SerializationError> {
    if bytes.len() < HEADER_LEN {
        return Err(SerializationError::InvalidFraming(format!(
            "payload of {} bytes is shorter than the {} byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    if bytes[0] != MAGIC_BYTE {
        return Err(SerializationError::InvalidFraming(format!(
            "unknown magic byte {}",
            bytes[0]
        )));
    }
    let id = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
    Ok((id, &bytes[HEADER_LEN..]))
}

/// Encodes and decodes framed Avro payloads against a schema store
pub struct ConfluentAvroCodec {
    store: Arc<dyn SchemaStore>,
    /// (subject, schema json) -> registered id
    subject_ids: RwLock<HashMap<(String, String), u32>>,
}

impl ConfluentAvroCodec {
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self {
            store,
            subject_ids: RwLock::new(HashMap::new()),
        }
    }

    /// Encode `value` with `schema`, registering the schema under `subject`
    /// on first use.
    pub async fn encode(
        &self,
        subject: &str,
        schema: &AvroSchema,
        value: &AvroValue,
    ) -> Result<Vec<u8>, SerializationError> {
        let datum = to_avro(value, schema)?;
        let id = self.subject_id(subject, schema).await?;
        Ok(frame(id, &datum))
    }

    /// Decode a framed payload with the writer schema it names
    pub async fn decode(&self, bytes: &[u8]) -> Result<AvroValue, SerializationError> {
        let (id, datum) = unframe(bytes)?;
        let schema = self
            .store
            .schema_by_id(id)
            .await
            .map_err(|e| SerializationError::SchemaError(e.to_string()))?;
        from_avro(datum, &schema)
    }

    async fn subject_id(&self, subject: &str, schema: &AvroSchema) -> Result<u32, SerializationError> {
        let key = (
            subject.to_string(),
            schema_json(schema).map_err(|e| SerializationError::SchemaError(e.to_string()))?,
        );
        let cached = self
            .subject_ids
            .read()
            .ok()
            .and_then(|ids| ids.get(&key).copied());
        if let Some(id) = cached {
            return Ok(id);
        }

        let id = self
            .store
            .register(subject, schema)
            .await
            .map_err(|e| SerializationError::SchemaError(e.to_string()))?;

        if let Ok(mut ids) = self.subject_ids.write() {
            ids.insert(key, id);
        }
        Ok(id)
    }
}

/// Field of a record value, looking through a nullable union
pub fn record_field<'a>(value: &'a AvroValue, name: &str) -> Option<&'a AvroValue> {
    match value {
        AvroValue::Record(fields) => fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, v)| unwrap_union(v)),
        AvroValue::Union(_, inner) => record_field(inner, name),
        _ => None,
    }
}

fn unwrap_union(value: &AvroValue) -> &AvroValue {
    match value {
        AvroValue::Union(_, inner) => unwrap_union(inner),
        other => other,
    }
}

/// Numeric record field widened to `f64`
pub fn field_as_f64(value: &AvroValue, name: &str) -> Result<f64, SerializationError> {
    match record_field(value, name) {
        Some(AvroValue::Double(v)) => Ok(*v),
        Some(AvroValue::Float(v)) => Ok(f64::from(*v)),
        Some(AvroValue::Int(v)) => Ok(f64::from(*v)),
        Some(AvroValue::Long(v)) => Ok(*v as f64),
        Some(other) => Err(SerializationError::SchemaError(format!(
            "field '{}' is not numeric: {:?}",
            name, other
        ))),
        None => Err(SerializationError::SchemaError(format!(
            "missing field '{}'",
            name
        ))),
    }
}

/// String or enum symbol record field
pub fn field_as_string(value: &AvroValue, name: &str) -> Result<String, SerializationError> {
    match record_field(value, name) {
        Some(AvroValue::String(s)) => Ok(s.clone()),
        Some(AvroValue::Enum(_, symbol)) => Ok(symbol.clone()),
        Some(other) => Err(SerializationError::SchemaError(format!(
            "field '{}' is not a string: {:?}",
            name, other
        ))),
        None => Err(SerializationError::SchemaError(format!(
            "missing field '{}'",
            name
        ))),
    }
}
