//! # ctastreams
//!
//! Kafka plumbing for the CTA transit feeds: producers that provision their
//! topic before first use, consumers that drain a subscription into a record
//! handler on a cooperative poll loop, and the `stations-stream` agent that
//! materializes the station line table.
//!
//! ## Features
//!
//! - **Topic provisioning**: idempotent `ensure_topic` backed by an explicit
//!   [`TopicRegistry`](cta::kafka::TopicRegistry) instead of global state
//! - **Avro over Confluent framing**: keys and values encoded against a schema
//!   registry, built on `rdkafka`, `apache-avro` & `tokio`
//! - **Explicit drain outcomes**: every poll reports `Processed`, `Idle` or
//!   `Dropped(reason)` so callers can decide on dead-lettering
//! - **Stoppable consume loop**: suspends on the tokio timer between drain
//!   cycles and exits when its stop handle fires
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ctastreams::cta::config::CtaSettings;
//! use ctastreams::cta::context::AppContext;
//! use ctastreams::cta::kafka::{stop_channel, ConsumerConfig, KafkaConsumer};
//! use ctastreams::cta::models::Weather;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AppContext::connect(CtaSettings::from_env())?;
//!
//!     let config = ConsumerConfig::new(ctx.settings(), "org.chicago.cta.weather.v1")
//!         .offset_earliest(true);
//!     let mut consumer = KafkaConsumer::new(config, Weather::default(), &ctx)?;
//!
//!     let (stop, signal) = stop_channel();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         stop.stop();
//!     });
//!
//!     let stats = consumer.consume(signal).await;
//!     println!("processed {} records", stats.processed);
//!     println!("current temperature {}", consumer.handler().temperature);
//!     consumer.close();
//!     Ok(())
//! }
//! ```

#![allow(clippy::derivable_impls)]
#![allow(clippy::collapsible_if)]

pub mod cta;

pub use cta::context::AppContext;
pub use cta::error::{CtaError, CtaResult};
pub use cta::kafka::{
    ConsumedRecord, ConsumerConfig, ConsumerError, DrainOutcome, DropReason, KafkaAdminClient,
    KafkaClientError, KafkaConsumer, KafkaProducer, Payload, ProducerConfig, ProducerError,
    RecordHandler, TopicRegistry,
};
pub use cta::models::Weather;
pub use cta::stream::{Line, Station, StationTable, StationsAgent, TransformedStation};
