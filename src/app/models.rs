//! Core data models shared across the listing and retrieval pipelines

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Hemisphere an AOI (and its overlap projection) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    /// Lowercase name as used in file names and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }
}

impl std::fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic coordinate pair.
///
/// Coordinate order is fixed here, once, for the whole crate: longitude
/// first, latitude second. Every geometry API takes and returns `LonLat`;
/// no other part of the code is allowed to re-interpret ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    /// Longitude in degrees east, -180..=180
    pub lon: f64,
    /// Latitude in degrees north, -90..=90
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// The four bounding corners of one swath, parsed from a single metadata
/// manifest record.
///
/// Corners are stored in manifest field order. The metadata documents a
/// fixed traversal order for assembling a non-self-intersecting ring from
/// them (first, fourth, third, second), which [`SwathFootprint::ring`]
/// applies; callers must not connect corners in storage order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwathFootprint {
    corners: [LonLat; 4],
}

impl SwathFootprint {
    /// Build a footprint from the four manifest ring corners, in manifest
    /// field order
    pub fn new(corners: [LonLat; 4]) -> Self {
        Self { corners }
    }

    /// Corner coordinates in the documented ring traversal order
    pub fn ring(&self) -> [LonLat; 4] {
        [
            self.corners[0],
            self.corners[3],
            self.corners[2],
            self.corners[1],
        ]
    }

    /// Southernmost corner latitude
    pub fn min_lat(&self) -> f64 {
        self.corners
            .iter()
            .map(|c| c.lat)
            .fold(f64::INFINITY, f64::min)
    }

    /// Northernmost corner latitude
    pub fn max_lat(&self) -> f64 {
        self.corners
            .iter()
            .map(|c| c.lat)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// One row of the persisted listing: one physical swath matched against one
/// AOI. A swath matching several AOIs appears once per AOI until the
/// retrieval pipeline deduplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Download URL of the primary (geolocation) file
    pub primary_url: String,
    /// File name of the primary file
    pub primary_file: String,
    /// Download URL of the companion file, for multi-part sensors
    pub companion_url: Option<String>,
    /// File name of the companion file, for multi-part sensors
    pub companion_file: Option<String>,
    /// Matched AOI id
    pub aoi: String,
    /// Overlap fraction in percent, 0..=100
    pub fraction: f64,
}

/// One remote file belonging to a swath
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub url: String,
    pub file_name: String,
}

/// An AOI matched by a swath, with its coverage fraction
#[derive(Debug, Clone, PartialEq)]
pub struct AoiMatch {
    pub aoi: String,
    pub fraction: f64,
}

/// One physical swath scheduled for retrieval: its constituent remote
/// file(s) plus the union of AOIs it matched. Produced by deduplicating the
/// aggregate listing; owned exclusively by the retrieval step in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SwathTask {
    /// Identifier normalized from the primary file name
    /// (e.g. `A2023001.0815.061`)
    pub tag: String,
    /// Acquisition timestamp embedded in the tag; retrieval order and the
    /// existing-output skip-scan both depend on it
    pub timestamp: NaiveDateTime,
    /// All remote files that make up this swath, primary first
    pub files: Vec<RemoteFile>,
    /// Every AOI this swath matched, with fractions
    pub aois: Vec<AoiMatch>,
}
