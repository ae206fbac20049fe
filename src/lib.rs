//! Swath Retriever Library
//!
//! A Rust library for compiling listings of polar-orbiting satellite swaths
//! that overlap user-selected Areas of Interest (AOIs), retrieving the
//! matching swath files from an authenticated archive, and resampling their
//! pixel data onto each AOI's fixed output grid.
//!
//! This library provides tools for:
//! - Testing swath footprints against AOI polygons under hemisphere-specific
//!   equal-area reprojection
//! - Crawling per-day archive metadata manifests with restartable, per-day
//!   persisted listings
//! - Joining multi-part file families (e.g. MODIS geolocation + radiance)
//!   by a shared swath identifier
//! - Downloading swath files with resume-aware skipping of completed work
//! - Nearest-neighbor resampling of irregular swath coordinates onto regular
//!   AOI grids
//! - Comprehensive error handling with a shared consecutive-failure budget

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aoi;
        pub mod error_budget;
        pub mod listing;
        pub mod resample;
        pub mod retrieval;
        pub mod sensors;
    }
    pub mod adapters {
        pub mod archive;
        pub mod filesystem;
        pub mod swath_io;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Hemisphere, ListingEntry, LonLat, SwathFootprint};
pub use app::services::error_budget::ErrorBudget;
pub use config::Config;

/// Result type alias for the swath retriever
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for listing compilation, retrieval and resampling
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error for '{url}': {message}")]
    Http {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Configuration error (validated eagerly, before any network activity)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Metadata manifest format error
    #[error("Manifest format error in '{file}': {message}")]
    ManifestFormat { file: String, message: String },

    /// Per-day listing persistence error
    #[error("Listing store error for '{file}': {message}")]
    ListingStore {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Geometry construction or intersection error
    #[error("Geometry error: {message}")]
    Geometry { message: String },

    /// Resampling error
    #[error("Resample error: {message}")]
    Resample { message: String },

    /// Consecutive-failure budget exceeded; the run is aborted
    #[error("Error budget exceeded: {failures} consecutive failures (limit {limit})")]
    ErrorBudgetExceeded { failures: usize, limit: usize },

    /// The compiled listing contained no matching swaths at all
    #[error("Empty listing: no swaths matched any AOI over the requested date range")]
    EmptyListing,

    /// Swath reader/writer collaborator failure
    #[error("Swath I/O error: {message}")]
    SwathIo { message: String },

    /// Sensor/carrier combination that the archive does not serve
    #[error("Unsupported sensor/carrier combination: {sensor} on {carrier}")]
    UnsupportedCombination { sensor: String, carrier: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an HTTP error with context
    pub fn http(
        url: impl Into<String>,
        message: impl Into<String>,
        source: Option<reqwest::Error>,
    ) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a manifest format error
    pub fn manifest_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a listing store error
    pub fn listing_store(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::ListingStore {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a geometry error
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
        }
    }

    /// Create a resample error
    pub fn resample(message: impl Into<String>) -> Self {
        Self::Resample {
            message: message.into(),
        }
    }

    /// Create a swath I/O error
    pub fn swath_io(message: impl Into<String>) -> Self {
        Self::SwathIo {
            message: message.into(),
        }
    }

    /// Create an unsupported sensor/carrier combination error
    pub fn unsupported_combination(
        sensor: impl Into<String>,
        carrier: impl Into<String>,
    ) -> Self {
        Self::UnsupportedCombination {
            sensor: sensor.into(),
            carrier: carrier.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::ListingStore {
            file: "unknown".to_string(),
            message: "CSV operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
