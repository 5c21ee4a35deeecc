use crate::cta::kafka::message::{ConsumedRecord, Payload};
use crate::cta::kafka::poll_loop::{HandlerError, RecordHandler};
use crate::cta::serialization::SerializationError;
use crate::cta::serialization::avro::{field_as_f64, field_as_string};
use async_trait::async_trait;
use log::info;

pub const DEFAULT_TEMPERATURE: f64 = 70.0;
pub const DEFAULT_STATUS: &str = "sunny";

/// Latest weather reading; each message overwrites both fields
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    pub temperature: f64,
    pub status: String,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

impl Weather {
    /// Overwrite temperature and status from an Avro weather record.
    ///
    /// Nothing is updated unless both fields decode.
    pub fn process_message(&mut self, record: &ConsumedRecord) -> Result<(), SerializationError> {
        let value = match record.value() {
            Payload::Avro(value) => value,
            Payload::Null => {
                return Err(SerializationError::DeserializationFailed(
                    "weather record has no value".to_string(),
                ));
            }
            Payload::Raw(_) => {
                return Err(SerializationError::DeserializationFailed(
                    "weather record is not Avro".to_string(),
                ));
            }
        };

        let temperature = field_as_f64(value, "temperature")?;
        let status = field_as_string(value, "status")?;

        self.temperature = temperature;
        self.status = status;
        info!(
            "Weather updated: temperature {} status {}",
            self.temperature, self.status
        );
        Ok(())
    }
}

#[async_trait]
impl RecordHandler for Weather {
    async fn handle(&mut self, record: &ConsumedRecord) -> Result<(), HandlerError> {
        self.process_message(record)?;
        Ok(())
    }
}
