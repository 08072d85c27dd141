//! Readers turning station data files into [`Station`] records for
//! [`StationRepository::add_batch`](crate::StationRepository::add_batch).

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Station;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read station file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid station CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid station JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Station {id} has no name in any language")]
    MissingName { id: u32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    #[default]
    Csv,
    Json,
}

/// One row of the city-bike station dataset. Columns other than the
/// identifier and the localized names are ignored.
#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "Nimi", default)]
    nimi: Option<String>,
    #[serde(rename = "Namn", default)]
    namn: Option<String>,
    #[serde(rename = "Name", default)]
    name: Option<String>,
}

impl StationRow {
    /// Keeps the first available name, preferring Finnish, then Swedish,
    /// then English.
    fn into_station(self) -> Result<Station, ImportError> {
        let id = self.id;
        [(self.nimi, "fi"), (self.namn, "sv"), (self.name, "en")]
            .into_iter()
            .find_map(|(name, lang)| {
                name.filter(|n| !n.is_empty())
                    .map(|n| Station::new(Some(id), n, lang))
            })
            .ok_or(ImportError::MissingName { id })
    }
}

/// Parses the station CSV, matching columns by header.
pub fn read_csv(reader: impl Read) -> Result<Vec<Station>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<StationRow>()
        .map(|row| row?.into_station())
        .collect()
}

/// Parses a JSON array of stations.
pub fn read_json(reader: impl Read) -> Result<Vec<Station>, ImportError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_file(path: &Path, format: ImportFormat) -> Result<Vec<Station>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stations = match format {
        ImportFormat::Csv => read_csv(file)?,
        ImportFormat::Json => read_json(file)?,
    };
    tracing::info!("Read {} stations from {}", stations.len(), path.display());
    Ok(stations)
}
