//! Subscribed consumer driving a [`RecordHandler`]
//!
//! A consumer subscribes at construction time (a `^`-prefixed pattern is a
//! regex subscription), joins the group named after the pattern and is then
//! driven by [`KafkaConsumer::consume`] until its stop signal fires.

use super::assignment::AssignmentContext;
use super::consumer_config::ConsumerConfig;
use super::kafka_error::{ConsumerError, KafkaClientError};
use super::message::{ConsumedRecord, Payload};
use super::poll_loop::{self, ConsumeStats, DrainOutcome, PollSource, RecordHandler, StopSignal};
use crate::cta::context::AppContext;
use crate::cta::serialization::ConfluentAvroCodec;
use async_trait::async_trait;
use log::{debug, info, warn};
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message as KafkaMessage;
use rdkafka::topic_partition_list::TopicPartitionList;
use std::time::Duration;
use tokio::time;

/// Lifecycle of a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Subscribed,
    Closed,
}

/// Subscription yielding decoded records, one bounded poll at a time
pub struct KafkaRecordSource {
    consumer: Option<StreamConsumer<AssignmentContext>>,
    codec: Option<ConfluentAvroCodec>,
    poll_timeout: Duration,
    topic_pattern: String,
}

impl KafkaRecordSource {
    /// Create the client and subscribe it to `config.topic_pattern`
    pub fn subscribe(config: &ConsumerConfig, ctx: &AppContext) -> Result<Self, ConsumerError> {
        let context = AssignmentContext::new(config.topic_pattern.clone(), config.offset_earliest);
        let consumer: StreamConsumer<AssignmentContext> =
            config.client_config().create_with_context(context)?;
        consumer.subscribe(&[config.topic_pattern.as_str()])?;

        info!(
            "Subscribed to {} (group {}, avro: {}, earliest: {})",
            config.topic_pattern,
            config.group_id(),
            config.is_avro,
            config.offset_earliest
        );

        Ok(Self {
            consumer: Some(consumer),
            codec: config
                .is_avro
                .then(|| ConfluentAvroCodec::new(ctx.schemas())),
            poll_timeout: config.consume_timeout,
            topic_pattern: config.topic_pattern.clone(),
        })
    }

    pub fn state(&self) -> ConsumerState {
        if self.consumer.is_some() {
            ConsumerState::Subscribed
        } else {
            ConsumerState::Closed
        }
    }

    /// Leave the group and release the client; closing twice is a no-op
    pub fn close(&mut self) {
        if let Some(consumer) = self.consumer.take() {
            info!("Closing consumer for {}", self.topic_pattern);
            consumer.unsubscribe();
        }
    }

    /// Next offset to read on `partition`, or `low` before the first message
    fn next_offset(positions: &TopicPartitionList, topic: &str, partition: i32, low: i64) -> i64 {
        positions
            .find_partition(topic, partition)
            .and_then(|element| element.offset().to_raw())
            .filter(|offset| *offset >= 0)
            .unwrap_or(low)
    }

    async fn decode(&self, bytes: Option<Vec<u8>>) -> Result<Payload, ConsumerError> {
        match (bytes, &self.codec) {
            (None, _) => Ok(Payload::Null),
            (Some(bytes), Some(codec)) => Ok(Payload::Avro(codec.decode(&bytes).await?)),
            (Some(bytes), None) => Ok(Payload::Raw(bytes)),
        }
    }
}

#[async_trait]
impl PollSource for KafkaRecordSource {
    fn label(&self) -> &str {
        &self.topic_pattern
    }

    async fn poll(&mut self) -> Option<Result<ConsumedRecord, ConsumerError>> {
        let Some(consumer) = self.consumer.as_ref() else {
            return Some(Err(KafkaClientError::Closed));
        };

        let message = match time::timeout(self.poll_timeout, consumer.recv()).await {
            Err(_) => return None,
            Ok(Err(e)) => return Some(Err(e.into())),
            Ok(Ok(message)) => message,
        };

        let topic = message.topic().to_string();
        let partition = message.partition();
        let offset = message.offset();
        let timestamp = message.timestamp().to_millis();
        let key = message.key().map(<[u8]>::to_vec);
        let value = message.payload().map(<[u8]>::to_vec);
        drop(message);

        debug!(
            "Message received: topic={} partition={} offset={}",
            topic, partition, offset
        );

        let record = match (self.decode(key).await, self.decode(value).await) {
            (Ok(key), Ok(value)) => ConsumedRecord::new(topic, partition, offset, key, value),
            (Err(e), _) | (_, Err(e)) => return Some(Err(e)),
        };

        Some(Ok(match timestamp {
            Some(ts) => record.with_timestamp(ts),
            None => record,
        }))
    }

    /// Caught up once partitions are assigned and every one of them has been
    /// read up to its high watermark
    fn caught_up(&self) -> Result<bool, ConsumerError> {
        let consumer = self.consumer.as_ref().ok_or(KafkaClientError::Closed)?;
        let assignment = consumer.assignment()?;
        if assignment.count() == 0 {
            debug!("{} has no partitions assigned yet", self.topic_pattern);
            return Ok(false);
        }

        let positions = consumer.position()?;
        for element in assignment.elements() {
            let (low, high) =
                consumer.fetch_watermarks(element.topic(), element.partition(), self.poll_timeout)?;
            let next = Self::next_offset(&positions, element.topic(), element.partition(), low);
            if next < high {
                debug!(
                    "{} [{}] at offset {} of {}",
                    element.topic(),
                    element.partition(),
                    next,
                    high
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Consumer owning its subscription and the handler it feeds
pub struct KafkaConsumer<H: RecordHandler> {
    config: ConsumerConfig,
    source: KafkaRecordSource,
    handler: H,
}

impl<H: RecordHandler> KafkaConsumer<H> {
    /// Subscribe to `config.topic_pattern`; records go to `handler`
    pub fn new(config: ConsumerConfig, handler: H, ctx: &AppContext) -> Result<Self, ConsumerError> {
        let source = KafkaRecordSource::subscribe(&config, ctx)?;
        Ok(Self {
            config,
            source,
            handler,
        })
    }

    /// Poll once and dispatch the record, if any
    pub async fn drain_once(&mut self) -> DrainOutcome {
        poll_loop::drain_once(&mut self.source, &mut self.handler).await
    }

    /// Run the poll loop until `stop` fires
    pub async fn consume(&mut self, stop: StopSignal) -> ConsumeStats {
        if self.source.state() == ConsumerState::Closed {
            warn!("consume() called on closed consumer {}", self.config.topic_pattern);
        }
        poll_loop::run_poll_loop(
            &mut self.source,
            &mut self.handler,
            self.config.sleep_interval,
            stop,
        )
        .await
    }

    pub fn close(&mut self) {
        self.source.close();
    }

    pub fn state(&self) -> ConsumerState {
        self.source.state()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }
}

impl<H: RecordHandler> Drop for KafkaConsumer<H> {
    fn drop(&mut self) {
        self.close();
    }
}
