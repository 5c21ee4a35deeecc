use super::station::{Station, TransformedStation};
use super::table::StationTable;
use crate::cta::kafka::kafka_error::ProducerError;
use crate::cta::kafka::kafka_producer::KafkaProducer;
use crate::cta::kafka::message::ConsumedRecord;
use crate::cta::kafka::poll_loop::{self, DrainOutcome, DropReason, HandlerError, PollSource, RecordHandler};
use crate::cta::serialization::to_json;
use async_trait::async_trait;
use log::{debug, info, warn};

/// Destination of table updates
#[async_trait]
pub trait ChangelogSink: Send + Sync {
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<(), ProducerError>;
}

#[async_trait]
impl ChangelogSink for KafkaProducer {
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<(), ProducerError> {
        self.send_raw(Some(key), Some(value)).await.map(|_| ())
    }
}

/// Table-building agent over the stations stream
///
/// Each station record is classified, written to the table and published to
/// the changelog so the table can be rebuilt with [`recover`](Self::recover).
pub struct StationsAgent<S: ChangelogSink> {
    table: StationTable,
    changelog: S,
}

impl<S: ChangelogSink> StationsAgent<S> {
    pub fn new(table: StationTable, changelog: S) -> Self {
        Self { table, changelog }
    }

    pub fn table(&self) -> &StationTable {
        &self.table
    }

    pub fn changelog(&self) -> &S {
        &self.changelog
    }

    pub fn changelog_mut(&mut self) -> &mut S {
        &mut self.changelog
    }

    /// Transform, publish and store one station.
    ///
    /// The table is written only after the changelog accepted the record.
    pub async fn process(&self, station: &Station) -> Result<TransformedStation, HandlerError> {
        let transformed = TransformedStation::from(station);
        let key = to_json(&transformed.station_id)?;
        let value = to_json(&transformed)?;
        self.changelog.publish(&key, &value).await?;

        let previous = self.table.upsert(transformed.clone());

        match previous {
            Some(previous) if previous.line != transformed.line => info!(
                "Station {} moved from line {} to {}",
                transformed.station_id, previous.line, transformed.line
            ),
            Some(_) => debug!("Station {} updated", transformed.station_id),
            None => debug!(
                "Station {} added on line {}",
                transformed.station_id, transformed.line
            ),
        }
        Ok(transformed)
    }

    /// Replay a changelog into the table until the source has caught up.
    ///
    /// An idle poll ends the replay once [`PollSource::caught_up`] holds.
    /// After `max_idle_polls` consecutive idle polls short of the end the
    /// replay gives up with a warning. A transport failure also ends it.
    /// Returns the number of applied records.
    pub async fn recover<P>(&mut self, source: &mut P, max_idle_polls: u32) -> u64
    where
        P: PollSource + ?Sized,
    {
        let mut restorer = self.table.clone();
        let mut applied = 0;
        let mut idle_polls = 0;
        loop {
            match poll_loop::drain_once(source, &mut restorer).await {
                DrainOutcome::Processed => {
                    applied += 1;
                    idle_polls = 0;
                }
                DrainOutcome::Idle => match source.caught_up() {
                    Ok(true) => break,
                    Ok(false) => {
                        idle_polls += 1;
                        if idle_polls >= max_idle_polls {
                            warn!(
                                "Changelog replay of {} stopped after {} idle polls short of the end",
                                source.label(),
                                idle_polls
                            );
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Cannot tell whether {} is fully replayed: {}", source.label(), e);
                        break;
                    }
                },
                DrainOutcome::Dropped(DropReason::Transport(reason)) => {
                    warn!("Changelog replay interrupted: {}", reason);
                    break;
                }
                DrainOutcome::Dropped(_) => {}
            }
        }
        info!(
            "Recovered {} changelog records from {}, table holds {} stations",
            applied,
            source.label(),
            self.table.len()
        );
        applied
    }
}

#[async_trait]
impl<S: ChangelogSink> RecordHandler for StationsAgent<S> {
    async fn handle(&mut self, record: &ConsumedRecord) -> Result<(), HandlerError> {
        let station: Station = record.value().json()?;
        self.process(&station).await?;
        Ok(())
    }
}
