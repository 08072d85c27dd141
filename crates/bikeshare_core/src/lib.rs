mod error;
pub mod import;
mod models;
mod store;

pub use crate::error::*;
pub use crate::models::*;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::{StationStore, UndoLog};

/// What [`StationRepository::update`] did with the submitted station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The station was stored under a new identifier.
    Created(Station),
    /// A complete station overwrote the stored record.
    Replaced(Station),
    /// A partial station was merged into the stored record.
    Merged(Station),
}

impl UpdateOutcome {
    pub fn station(&self) -> &Station {
        match self {
            UpdateOutcome::Created(station)
            | UpdateOutcome::Replaced(station)
            | UpdateOutcome::Merged(station) => station,
        }
    }

    pub fn into_station(self) -> Station {
        match self {
            UpdateOutcome::Created(station)
            | UpdateOutcome::Replaced(station)
            | UpdateOutcome::Merged(station) => station,
        }
    }
}

/// In-memory station collection.
///
/// The repository is the only authority on station identifiers. Every
/// mutation runs under a single write lock; reads share a read lock and
/// return owned copies.
#[derive(Debug, Default)]
pub struct StationRepository {
    store: RwLock<StationStore>,
}

impl StationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `stations`, or fails without keeping any
    /// of them.
    pub fn with_stations(
        stations: impl IntoIterator<Item = Station>,
    ) -> Result<Self, StationError> {
        let repository = Self::new();
        repository.add_batch(stations, false)?;
        Ok(repository)
    }

    // A panic inside a critical section cannot leave the store half-updated,
    // so a poisoned lock is still safe to use.
    fn read_store(&self) -> RwLockReadGuard<'_, StationStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, StationStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Preview of the identifier the next station without one would receive.
    ///
    /// Nothing is reserved: two callers may see the same value, and another
    /// creation may take it first. Assignment inside [`add`](Self::add) and
    /// [`update`](Self::update) computes and stores the identifier under one
    /// lock, so concurrent creations never share an identifier.
    pub fn peek_identifier(&self) -> Result<u32, StationError> {
        self.read_store().next_identifier()
    }

    pub fn add(&self, station: Station, allow_duplicate_ids: bool) -> Result<Station, StationError> {
        let mut store = self.write_store();
        match store.insert(station, allow_duplicate_ids, &mut UndoLog::default()) {
            Ok(stored) => {
                tracing::info!("Added station {:?}", stored.id);
                Ok(stored)
            }
            Err(error) => {
                tracing::warn!("Rejected station: {}", error);
                Err(error)
            }
        }
    }

    /// Adds every station in order, or none of them.
    ///
    /// On the first failure all additions made by this call are undone
    /// before the lock is released, and that failure is returned.
    pub fn add_batch(
        &self,
        stations: impl IntoIterator<Item = Station>,
        allow_duplicate_ids: bool,
    ) -> Result<Vec<Station>, StationError> {
        let mut store = self.write_store();
        let mut log = UndoLog::default();
        let mut added = Vec::new();

        for station in stations {
            match store.insert(station, allow_duplicate_ids, &mut log) {
                Ok(stored) => added.push(stored),
                Err(error) => {
                    tracing::warn!(
                        "Batch rejected after {} stations, rolling back: {}",
                        added.len(),
                        error
                    );
                    log.rollback(&mut store);
                    return Err(error);
                }
            }
        }

        tracing::info!("Imported {} stations", added.len());
        Ok(added)
    }

    pub fn read(&self, id: u32) -> Option<Station> {
        tracing::debug!("Reading station {}", id);
        self.read_store().get(id).cloned()
    }

    /// Snapshot of every station in insertion order.
    pub fn read_all(&self) -> Vec<Station> {
        self.read_store().stations().to_vec()
    }

    /// Creates, replaces or partially updates a station.
    ///
    /// - incomplete without identifier: rejected
    /// - incomplete with identifier: supplied fields merged into the stored record
    /// - complete without identifier: created under a new identifier
    /// - complete with identifier: replaces the stored record, or is created
    ///   under that identifier
    pub fn update(&self, station: Station) -> Result<UpdateOutcome, StationError> {
        let result = self.apply_update(station);
        if let Err(error) = &result {
            tracing::warn!("Rejected station update: {}", error);
        }
        result
    }

    fn apply_update(&self, station: Station) -> Result<UpdateOutcome, StationError> {
        if station.is_incomplete() && station.is_new() {
            return Err(StationError::IncompleteNewStation);
        }

        let mut store = self.write_store();
        let mut log = UndoLog::default();

        let Some(id) = station.id else {
            let stored = store.insert(station, false, &mut log)?;
            tracing::info!("Created station {:?}", stored.id);
            return Ok(UpdateOutcome::Created(stored));
        };

        if station.is_incomplete() {
            let Some(target) = store.get_mut(id) else {
                return Err(StationError::NotFound { id });
            };
            target.merge(&station);
            tracing::info!("Merged partial update into station {}", id);
            return Ok(UpdateOutcome::Merged(target.clone()));
        }

        let existed = store.contains(id);
        let stored = store.insert(station, true, &mut log)?;
        if existed {
            tracing::info!("Replaced station {}", id);
            Ok(UpdateOutcome::Replaced(stored))
        } else {
            tracing::info!("Created station {}", id);
            Ok(UpdateOutcome::Created(stored))
        }
    }

    /// Removes the station with `id`; `None` when there is no such station.
    pub fn delete(&self, id: u32) -> Option<Station> {
        let removed = self.write_store().remove(id);
        match &removed {
            Some(_) => tracing::info!("Deleted station {}", id),
            None => tracing::debug!("No station {} to delete", id),
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
