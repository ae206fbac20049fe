//! Application constants for the swath retriever
//!
//! This module contains the configuration defaults, manifest layout
//! constants, and naming helpers used throughout the application.

// =============================================================================
// Overlap Testing Defaults
// =============================================================================

/// Minimum AOI coverage fraction (percent) for a swath to be kept
pub const DEFAULT_OVERLAP_THRESHOLD_PCT: f64 = 5.0;

/// Corner-latitude limit for the cheap hemisphere pre-check: a southern-run
/// candidate must have a corner below -30 deg, a northern one above +30 deg
pub const HEMISPHERE_LAT_LIMIT_DEG: f64 = 30.0;

/// Authalic Earth radius in meters, used by the equal-area projection
pub const EARTH_AUTHALIC_RADIUS_M: f64 = 6_371_007.181;

// =============================================================================
// Resampling Defaults
// =============================================================================

/// Maximum distance between a grid cell and its nearest swath pixel
pub const DEFAULT_RADIUS_OF_INFLUENCE_M: f64 = 5000.0;

// =============================================================================
// Error Budget Defaults
// =============================================================================

/// Consecutive failures after which the whole run aborts
pub const DEFAULT_CRITICAL_FAILURE_COUNT: usize = 5;

// =============================================================================
// Archive Layout
// =============================================================================

/// Root of the authenticated archive serving manifests and swath files
pub const ARCHIVE_BASE_URL: &str = "https://ladsweb.modaps.eosdis.nasa.gov";

// =============================================================================
// Metadata Manifest Layout
// =============================================================================
//
// The per-day geoMeta manifest is a fixed-column delimited text file. The
// first rows are header material; each data row carries the swath file name
// in the first field and the four bounding ring corners as longitude fields
// 9..=12 followed by latitude fields 13..=16.

/// Header rows to skip at the top of a manifest
pub const MANIFEST_HEADER_LINES: usize = 3;

/// Field index of the swath file name
pub const MANIFEST_FILE_FIELD: usize = 0;

/// First of the four consecutive ring-longitude fields
pub const MANIFEST_LON_FIELD: usize = 9;

/// First of the four consecutive ring-latitude fields
pub const MANIFEST_LAT_FIELD: usize = 13;

/// Minimum field count for a usable manifest row
pub const MANIFEST_MIN_FIELDS: usize = 17;

// =============================================================================
// File and Directory Constants
// =============================================================================

/// Subdirectory of the output path holding per-day listing CSVs
pub const LISTING_DIR_NAME: &str = "listing";

/// Subdirectory of the output path holding downloaded swath files
pub const SWATH_CACHE_DIR_NAME: &str = "tmp";

/// Subdirectory of the output path holding log files
pub const LOG_DIR_NAME: &str = "log";

/// Extension tag for raw (swath-space) output containers
pub const RAW_OUTPUT_EXT: &str = "raw";

/// Filename extension of output containers
pub const OUTPUT_CONTAINER_EXTENSION: &str = "nc";

/// Dataset name of the per-cell validity mask in resampled outputs
pub const VALID_MASK_NAME: &str = "valid_mask";

// =============================================================================
// Output Provenance Defaults
// =============================================================================

/// Default author recorded in output container global attributes
pub const PROVENANCE_AUTHOR: &str = "swath_retriever";

/// Default contact recorded in output container global attributes
pub const PROVENANCE_CONTACT: &str = "ops@icexai-tools.dev";

/// Timestamp format for the output container `created` attribute
pub const PROVENANCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Helper Functions
// =============================================================================

/// Compose an output container stem: `{carrier3}_{sensor}_{yyyyddd}_{hhmmss}_{version}_{ext}`
///
/// `ext` is either [`RAW_OUTPUT_EXT`] for swath-space output or the id of the
/// AOI the data was resampled onto.
pub fn output_stem(
    carrier3: &str,
    sensor: &str,
    yyyyddd: &str,
    hhmmss: &str,
    version: &str,
    ext: &str,
) -> String {
    format!("{carrier3}_{sensor}_{yyyyddd}_{hhmmss}_{version}_{ext}")
}

/// Compose the resume prefix shared by all outputs of one swath
pub fn output_swath_prefix(carrier3: &str, sensor: &str, yyyyddd: &str, hhmmss: &str) -> String {
    format!("{carrier3}_{sensor}_{yyyyddd}_{hhmmss}")
}

/// Compose a per-day listing file name: `{carrier}_{sensor}_listing_{yyyy}_{jjj}.csv`
pub fn listing_file_name(carrier: &str, sensor: &str, yyyy: &str, jjj: &str) -> String {
    format!("{carrier}_{sensor}_listing_{yyyy}_{jjj}.csv")
}

/// Compose a run log file name:
/// `{carrier}_{sensor}_{hemisphere}_{version}_{start}-{end}.log`
pub fn log_file_name(
    carrier: &str,
    sensor: &str,
    hemisphere: &str,
    version: &str,
    start_yyyyddd: &str,
    end_yyyyddd: &str,
) -> String {
    format!("{carrier}_{sensor}_{hemisphere}_{version}_{start_yyyyddd}-{end_yyyyddd}.log")
}
