//! Per-day listing persistence
//!
//! Each crawled day is persisted as one CSV under the listing directory,
//! one row per (swath, matched AOI). The file is the unit of resumability:
//! its presence means the day is done, its absence means the day is redone
//! from scratch. Writes are atomic so a killed run never leaves a partial
//! day on disk.

use std::path::Path;

use crate::app::adapters::filesystem;
use crate::app::models::ListingEntry;
use crate::{Error, Result};

/// Persist one day's joined listing, replacing any existing file
pub fn save(path: &Path, entries: &[ListingEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer
            .serialize(entry)
            .map_err(|e| Error::listing_store(path.display().to_string(), "serialize failed", Some(e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::listing_store(path.display().to_string(), e.to_string(), None))?;
    filesystem::atomic_write(path, &bytes)
}

/// Load one persisted day. An empty file is a valid day with no matches.
pub fn load(path: &Path) -> Result<Vec<ListingEntry>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::listing_store(path.display().to_string(), "open failed", Some(e)))?;
    let mut entries = Vec::new();
    for row in reader.deserialize() {
        let entry: ListingEntry = row.map_err(|e| {
            Error::listing_store(path.display().to_string(), "deserialize failed", Some(e))
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries() -> Vec<ListingEntry> {
        vec![
            ListingEntry {
                primary_url: "https://a.test/MOD03.A2023001.0815.061.x.hdf".to_string(),
                primary_file: "MOD03.A2023001.0815.061.x.hdf".to_string(),
                companion_url: Some("https://a.test/MOD021KM.A2023001.0815.061.y.hdf".to_string()),
                companion_file: Some("MOD021KM.A2023001.0815.061.y.hdf".to_string()),
                aoi: "berkner".to_string(),
                fraction: 87.5,
            },
            ListingEntry {
                primary_url: "https://a.test/MOD03.A2023001.0815.061.x.hdf".to_string(),
                primary_file: "MOD03.A2023001.0815.061.x.hdf".to_string(),
                companion_url: None,
                companion_file: None,
                aoi: "ronne".to_string(),
                fraction: 12.25,
            },
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terra_modis_listing_2023_001.csv");

        save(&path, &entries()).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, entries());
    }

    #[test]
    fn test_empty_day_round_trips_to_no_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terra_modis_listing_2023_002.csv");

        save(&path, &[]).unwrap();
        assert!(path.exists());
        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load(&dir.path().join("absent.csv")).is_err());
    }
}
