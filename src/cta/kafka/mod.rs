//! Kafka client wrappers
//!
//! Topic provisioning, producer and consumer construction on top of
//! `rdkafka`, and the cooperative poll loop that feeds consumed records to a
//! [`RecordHandler`].

pub mod admin_client;
pub mod assignment;
pub mod client_config_builder;
pub mod client_context;
pub mod common_config;
pub mod consumer_config;
pub mod kafka_consumer;
pub mod kafka_error;
pub mod kafka_producer;
pub mod message;
pub mod poll_loop;
pub mod producer_config;
pub mod topic_registry;
pub mod utils;

pub use admin_client::{KafkaAdminClient, TOPIC_CONFIG, TopicAdmin, TopicCreation, TopicSpec};
pub use assignment::{AssignmentContext, prepare_assignment};
pub use client_config_builder::ClientConfigBuilder;
pub use client_context::LoggingClientContext;
pub use common_config::{CommonKafkaConfig, CompressionType};
pub use consumer_config::ConsumerConfig;
pub use kafka_consumer::{ConsumerState, KafkaConsumer, KafkaRecordSource};
pub use kafka_error::{ConsumerError, KafkaClientError, ProducerError};
pub use kafka_producer::KafkaProducer;
pub use message::{ConsumedRecord, Payload};
pub use poll_loop::{
    ConsumeStats, DrainOutcome, DropReason, FnHandler, HandlerError, PollSource, RecordHandler,
    StopHandle, StopSignal, drain_once, handler_fn, run_poll_loop, stop_channel,
};
pub use producer_config::{PRODUCER_CLIENT_ID, ProducerConfig};
pub use topic_registry::{TopicProvision, TopicRegistry};
