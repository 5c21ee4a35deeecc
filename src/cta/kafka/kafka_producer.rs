use super::admin_client::TopicSpec;
use super::client_context::LoggingClientContext;
use super::kafka_error::{KafkaClientError, ProducerError};
use super::producer_config::ProducerConfig;
use super::topic_registry::TopicProvision;
use super::utils;
use crate::cta::context::AppContext;
use crate::cta::serialization::{ConfluentAvroCodec, SerializationError};
use apache_avro::Schema as AvroSchema;
use apache_avro::types::Value as AvroValue;
use log::{debug, error, info, warn};
use rdkafka::producer::future_producer::Delivery;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use serde::Serialize;

/// Producer bound to a single topic, provisioned before the client opens
///
/// Keys and values sent with [`send_avro`](Self::send_avro) or
/// [`send_record`](Self::send_record) are encoded in Confluent framing with
/// the schemas given at construction, registered under `<topic>-key` and
/// `<topic>-value`.
pub struct KafkaProducer {
    config: ProducerConfig,
    producer: Option<FutureProducer<LoggingClientContext>>,
    key_schema: Option<AvroSchema>,
    value_schema: Option<AvroSchema>,
    codec: ConfluentAvroCodec,
}

impl KafkaProducer {
    /// Producer without schemas, for pre-encoded payloads
    pub async fn new(config: ProducerConfig, ctx: &AppContext) -> Result<Self, ProducerError> {
        Self::build(config, None, None, ctx).await
    }

    /// Producer encoding keys with `key_schema` and values with `value_schema`
    pub async fn with_schemas(
        config: ProducerConfig,
        key_schema: AvroSchema,
        value_schema: Option<AvroSchema>,
        ctx: &AppContext,
    ) -> Result<Self, ProducerError> {
        Self::build(config, Some(key_schema), value_schema, ctx).await
    }

    async fn build(
        config: ProducerConfig,
        key_schema: Option<AvroSchema>,
        value_schema: Option<AvroSchema>,
        ctx: &AppContext,
    ) -> Result<Self, ProducerError> {
        let spec = TopicSpec::new(
            config.topic_name.clone(),
            config.num_partitions,
            config.num_replicas,
        );
        if let TopicProvision::Failed(reason) =
            ctx.topics().ensure_topic(ctx.admin().as_ref(), &spec).await
        {
            warn!(
                "Continuing without confirmed topic {}: {}",
                config.topic_name, reason
            );
        }

        let producer: FutureProducer<LoggingClientContext> = config
            .client_config()
            .create_with_context(LoggingClientContext::new(config.topic_name.clone()))?;

        info!(
            "Created KafkaProducer connected to {} for topic {}",
            config.common.brokers, config.topic_name
        );

        Ok(Self {
            codec: ConfluentAvroCodec::new(ctx.schemas()),
            config,
            producer: Some(producer),
            key_schema,
            value_schema,
        })
    }

    pub fn topic(&self) -> &str {
        &self.config.topic_name
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.producer.is_none()
    }

    /// Current wall-clock time in milliseconds, used as event key
    pub fn time_millis() -> i64 {
        utils::time_millis()
    }

    /// Produce already encoded bytes
    pub async fn send_raw(
        &self,
        key: Option<&[u8]>,
        payload: Option<&[u8]>,
    ) -> Result<Delivery, ProducerError> {
        let producer = self.producer.as_ref().ok_or(KafkaClientError::Closed)?;
        let topic = self.topic();

        let mut record: FutureRecord<'_, [u8], [u8]> = FutureRecord::to(topic);
        if let Some(key) = key {
            record = record.key(key);
        }
        if let Some(payload) = payload {
            record = record.payload(payload);
        }

        match producer
            .send(record, Timeout::After(self.config.message_timeout))
            .await
        {
            Ok(delivery) => {
                debug!(
                    "Message sent to topic '{}' partition {} offset {}",
                    topic, delivery.partition, delivery.offset
                );
                Ok(delivery)
            }
            Err((err, _)) => {
                error!("Failed to send message to topic '{}': {}", topic, err);
                Err(err.into())
            }
        }
    }

    /// Encode with the configured schemas and produce
    pub async fn send_avro(
        &self,
        key: &AvroValue,
        value: Option<&AvroValue>,
    ) -> Result<Delivery, ProducerError> {
        if self.is_closed() {
            return Err(KafkaClientError::Closed);
        }
        let key_schema = self.key_schema.as_ref().ok_or_else(|| {
            SerializationError::SchemaError(format!("no key schema for {}", self.topic()))
        })?;
        let key_bytes = self
            .codec
            .encode(&format!("{}-key", self.topic()), key_schema, key)
            .await?;

        let value_bytes = match value {
            None => None,
            Some(value) => {
                let value_schema = self.value_schema.as_ref().ok_or_else(|| {
                    SerializationError::SchemaError(format!(
                        "no value schema for {}",
                        self.topic()
                    ))
                })?;
                Some(
                    self.codec
                        .encode(&format!("{}-value", self.topic()), value_schema, value)
                        .await?,
                )
            }
        };

        self.send_raw(Some(&key_bytes), value_bytes.as_deref()).await
    }

    /// Serialize `key` and `value` through Avro and produce
    pub async fn send_record<K, V>(&self, key: &K, value: &V) -> Result<Delivery, ProducerError>
    where
        K: Serialize,
        V: Serialize,
    {
        let key = apache_avro::to_value(key)
            .map_err(|e| SerializationError::avro_error("Failed to convert key", e))?;
        let value = apache_avro::to_value(value)
            .map_err(|e| SerializationError::avro_error("Failed to convert value", e))?;
        self.send_avro(&key, Some(&value)).await
    }

    /// Wait up to `flush_timeout` for outstanding sends
    pub fn flush(&self) -> Result<(), ProducerError> {
        let producer = self.producer.as_ref().ok_or(KafkaClientError::Closed)?;
        producer.flush(Timeout::After(self.config.flush_timeout))?;
        Ok(())
    }

    /// Flush within `flush_timeout`, then release the connection.
    ///
    /// Messages still in flight after the flush are dropped with the client.
    pub fn close(&mut self) -> Result<(), ProducerError> {
        let Some(producer) = self.producer.take() else {
            return Ok(());
        };

        info!("Closing producer for {}", self.config.topic_name);
        if let Err(e) = producer.flush(Timeout::After(self.config.flush_timeout)) {
            warn!(
                "Flush of {} did not complete within {:?}: {}",
                self.config.topic_name, self.config.flush_timeout, e
            );
        }

        let lost = producer.in_flight_count();
        if lost > 0 {
            warn!(
                "{} messages to {} still in flight at close, dropping them",
                lost, self.config.topic_name
            );
        }
        Ok(())
    }
}

impl Drop for KafkaProducer {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
