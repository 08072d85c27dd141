use std::collections::BTreeMap;

use crate::{Station, StationError};

/// The station collection and its identifier index.
///
/// Every stored station carries an identifier, and `id_index` maps each of
/// them to the station's position in `stations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StationStore {
    stations: Vec<Station>,
    id_index: BTreeMap<u32, usize>,
}

/// Inverse of one primitive mutation of a [`StationStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Undo {
    RemoveId(u32),
    TruncateTo(usize),
    RestoreAt { index: usize, station: Station },
}

/// Inverse operations recorded while a batch is applied.
#[derive(Debug, Default)]
pub(crate) struct UndoLog {
    entries: Vec<Undo>,
}

impl UndoLog {
    pub(crate) fn record(&mut self, undo: Undo) {
        self.entries.push(undo);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Applies the recorded inverses newest first.
    pub(crate) fn rollback(self, store: &mut StationStore) {
        for undo in self.entries.into_iter().rev() {
            store.apply(undo);
        }
    }
}

impl StationStore {
    pub(crate) fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub(crate) fn len(&self) -> usize {
        self.stations.len()
    }

    pub(crate) fn contains(&self, id: u32) -> bool {
        self.id_index.contains_key(&id)
    }

    pub(crate) fn get(&self, id: u32) -> Option<&Station> {
        self.id_index.get(&id).map(|&index| &self.stations[index])
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut Station> {
        self.id_index
            .get(&id)
            .map(|&index| &mut self.stations[index])
    }

    /// One past the largest identifier in use, or 1 when empty.
    pub(crate) fn next_identifier(&self) -> Result<u32, StationError> {
        match self.id_index.last_key_value() {
            None => Ok(1),
            Some((&max, _)) => max
                .checked_add(1)
                .ok_or(StationError::IdentifiersExhausted),
        }
    }

    /// Stores `station`, recording the inverse of every mutation in `log`.
    ///
    /// A station without an identifier receives the next free one. A taken
    /// identifier overwrites the stored record when `allow_duplicate_ids`
    /// is set and fails otherwise. Incomplete stations are never stored.
    /// Nothing is mutated on failure.
    pub(crate) fn insert(
        &mut self,
        station: Station,
        allow_duplicate_ids: bool,
        log: &mut UndoLog,
    ) -> Result<Station, StationError> {
        if let Some(invalid) = station.missing_fields() {
            return Err(invalid.into());
        }

        let id = match station.id {
            None => self.next_identifier()?,
            Some(0) => return Err(StationError::non_positive_identifier()),
            Some(id) => id,
        };

        if let Some(&index) = self.id_index.get(&id) {
            if !allow_duplicate_ids {
                return Err(StationError::duplicate_identifier());
            }
            let stored = station.with_id(id);
            let previous = std::mem::replace(&mut self.stations[index], stored.clone());
            log.record(Undo::RestoreAt {
                index,
                station: previous,
            });
            return Ok(stored);
        }

        let stored = station.with_id(id);
        let index = self.stations.len();
        self.id_index.insert(id, index);
        log.record(Undo::RemoveId(id));
        self.stations.push(stored.clone());
        log.record(Undo::TruncateTo(index));
        Ok(stored)
    }

    /// Removes the station with `id`, shifting the index entries of every
    /// station stored after it.
    pub(crate) fn remove(&mut self, id: u32) -> Option<Station> {
        let index = self.id_index.remove(&id)?;
        let removed = self.stations.remove(index);
        for position in self.id_index.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        Some(removed)
    }

    fn apply(&mut self, undo: Undo) {
        match undo {
            Undo::RemoveId(id) => {
                self.id_index.remove(&id);
            }
            Undo::TruncateTo(len) => self.stations.truncate(len),
            Undo::RestoreAt { index, station } => {
                if let Some(slot) = self.stations.get_mut(index) {
                    *slot = station;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.id_index.len(), self.stations.len());
        for (&id, &index) in &self.id_index {
            assert_eq!(self.stations[index].id, Some(id));
        }
    }
}
