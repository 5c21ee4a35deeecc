//! In-memory keyed table materialized from the stations stream
//!
//! Entries are keyed by station id and overwritten on every update. The
//! changelog carries JSON keys and values; a null value removes the key.

use super::station::TransformedStation;
use crate::cta::kafka::message::{ConsumedRecord, Payload};
use crate::cta::kafka::poll_loop::{HandlerError, RecordHandler};
use crate::cta::serialization::SerializationError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to the station table; clones see the same entries
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    entries: Arc<RwLock<HashMap<i64, TransformedStation>>>,
}

impl StationTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<i64, TransformedStation>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<i64, TransformedStation>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite, returning the previous entry
    pub fn upsert(&self, station: TransformedStation) -> Option<TransformedStation> {
        self.write().insert(station.station_id, station)
    }

    pub fn remove(&self, station_id: i64) -> Option<TransformedStation> {
        self.write().remove(&station_id)
    }

    pub fn get(&self, station_id: i64) -> Option<TransformedStation> {
        self.read().get(&station_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Every entry, ordered by station id
    pub fn snapshot(&self) -> Vec<TransformedStation> {
        let mut entries: Vec<TransformedStation> = self.read().values().cloned().collect();
        entries.sort_by_key(|s| s.station_id);
        entries
    }

    /// Apply one changelog record
    pub fn apply_changelog(&self, record: &ConsumedRecord) -> Result<(), SerializationError> {
        match record.value() {
            Payload::Null => {
                let station_id: i64 = record.key().json()?;
                self.remove(station_id);
            }
            value => {
                let station: TransformedStation = value.json()?;
                self.upsert(station);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecordHandler for StationTable {
    async fn handle(&mut self, record: &ConsumedRecord) -> Result<(), HandlerError> {
        self.apply_changelog(record)?;
        Ok(())
    }
}
