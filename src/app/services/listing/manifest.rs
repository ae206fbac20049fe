//! Fixed-column metadata manifest parsing
//!
//! The per-day manifest is comma-delimited text: a few header rows, then
//! one row per swath with the file name in the first field and the four
//! bounding ring corners as longitude fields 9..=12 followed by latitude
//! fields 13..=16. Field offsets are fixed by the archive format, not
//! discovered.

use tracing::warn;

use crate::app::models::{LonLat, SwathFootprint};
use crate::constants::{
    MANIFEST_FILE_FIELD, MANIFEST_HEADER_LINES, MANIFEST_LAT_FIELD, MANIFEST_LON_FIELD,
    MANIFEST_MIN_FIELDS,
};
use crate::{Error, Result};

/// One swath as described by a manifest row
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRecord {
    pub file_name: String,
    pub footprint: SwathFootprint,
}

/// Parse a whole manifest body. Individual malformed rows are skipped with
/// a warning; a body whose data rows all fail to parse is a format error,
/// since that means the layout assumption no longer holds.
pub fn parse(text: &str, source: &str) -> Result<Vec<ManifestRecord>> {
    let mut records = Vec::new();
    let mut data_rows = 0usize;

    for line in text.lines().skip(MANIFEST_HEADER_LINES) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        data_rows += 1;
        match parse_row(line) {
            Some(record) => records.push(record),
            None => warn!("skipping malformed manifest row in {source}: {line}"),
        }
    }

    if records.is_empty() && data_rows > 0 {
        return Err(Error::manifest_format(
            source,
            format!("none of {data_rows} data rows matched the expected column layout"),
        ));
    }
    Ok(records)
}

fn parse_row(line: &str) -> Option<ManifestRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < MANIFEST_MIN_FIELDS {
        return None;
    }

    let file_name = fields[MANIFEST_FILE_FIELD].trim();
    if file_name.is_empty() {
        return None;
    }

    let mut corners = [LonLat::new(0.0, 0.0); 4];
    for (i, corner) in corners.iter_mut().enumerate() {
        let lon: f64 = fields[MANIFEST_LON_FIELD + i].trim().parse().ok()?;
        let lat: f64 = fields[MANIFEST_LAT_FIELD + i].trim().parse().ok()?;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return None;
        }
        *corner = LonLat::new(lon, lat);
    }

    Some(ManifestRecord {
        file_name: file_name.to_string(),
        footprint: SwathFootprint::new(corners),
    })
}
