//! Stations table stream
//!
//! Consumes station records from `org.cta.stations`, classifies each station's
//! line and materializes the result in the `cta.stations.table` table, backed
//! by the `org.cta.stations.table` changelog.

pub mod agent;
pub mod station;
pub mod table;

pub use agent::{ChangelogSink, StationsAgent};
pub use station::{Line, Station, TransformedStation, classify_line};
pub use table::StationTable;

use crate::cta::config::CtaSettings;
use crate::cta::kafka::ConsumerConfig;
use std::time::Duration;

/// Topics and identity of the stations stream application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamAppConfig {
    pub app_id: String,
    pub input_topic: String,
    pub table_name: String,
    pub changelog_topic: String,
    pub table_partitions: i32,
    /// Poll timeout while replaying the changelog
    pub recovery_poll_timeout: Duration,
    /// Consecutive idle polls tolerated before the changelog reaches its end
    pub recovery_max_idle_polls: u32,
}

impl Default for StreamAppConfig {
    fn default() -> Self {
        Self {
            app_id: "stations-stream".to_string(),
            input_topic: "org.cta.stations".to_string(),
            table_name: "cta.stations.table".to_string(),
            changelog_topic: "org.cta.stations.table".to_string(),
            table_partitions: 1,
            recovery_poll_timeout: Duration::from_secs(1),
            recovery_max_idle_polls: 30,
        }
    }
}

impl StreamAppConfig {
    /// Changelog replay: every partition is read from the beginning
    pub fn replay_config(&self, settings: &CtaSettings) -> ConsumerConfig {
        ConsumerConfig::new(settings, &self.changelog_topic)
            .avro(false)
            .offset_earliest(true)
            .consume_timeout(self.recovery_poll_timeout)
    }

    /// Input stream: a new group starts at the beginning, a known group
    /// resumes from its committed offsets
    pub fn input_config(&self, settings: &CtaSettings, sleep_interval: Duration) -> ConsumerConfig {
        ConsumerConfig::new(settings, &self.input_topic)
            .avro(false)
            .offset_earliest(false)
            .custom_property("auto.offset.reset", "earliest")
            .sleep_interval(sleep_interval)
    }
}
