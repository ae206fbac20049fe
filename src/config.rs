//! Configuration management for the swath retriever
//!
//! A run is described once, up front, by a [`Config`]. Validation is eager:
//! every check that can fail without touching the network (dates, AOI tags,
//! sensor/carrier combination, output location) is performed before the
//! first archive request, so a bad run dies in milliseconds rather than
//! hours in.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::app::models::Hemisphere;
use crate::app::services::aoi;
use crate::app::services::sensors::{Carrier, Sensor, SensorProfile};
use crate::constants::{
    DEFAULT_CRITICAL_FAILURE_COUNT, DEFAULT_OVERLAP_THRESHOLD_PCT,
    DEFAULT_RADIUS_OF_INFLUENCE_M, LISTING_DIR_NAME, LOG_DIR_NAME, SWATH_CACHE_DIR_NAME,
};
use crate::{Error, Result};

/// Configuration for one retrieval run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bearer token for the authenticated archive
    pub token: String,

    /// Sensor to retrieve data for
    pub sensor: Sensor,

    /// Carrier platform the sensor flies on
    pub carrier: Carrier,

    /// Hemisphere the AOIs live in
    pub hemisphere: Hemisphere,

    /// Archive collection version (e.g. "61")
    pub version: String,

    /// First acquisition day, inclusive
    pub start: NaiveDate,

    /// Last acquisition day, inclusive
    pub stop: NaiveDate,

    /// AOI ids to test swaths against
    pub aois: Vec<String>,

    /// Root directory for listings, logs, caches and output containers
    pub output_dir: PathBuf,

    /// Minimum AOI coverage fraction (percent) for a swath to be kept
    pub overlap_threshold_pct: f64,

    /// Nearest-neighbor search radius for resampling, in meters
    pub radius_of_influence_m: f64,

    /// Consecutive failures after which the run aborts
    pub critical_failure_count: usize,

    /// Download and process the matched swaths (false = listing only)
    pub apply_retrieval: bool,

    /// Resample onto AOI grids (false = raw swath-space output only)
    pub apply_resampling: bool,

    /// Worker threads for the resampling engine
    pub resample_workers: usize,
}

impl Config {
    /// Create a new configuration with defaults for the tuning knobs
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        token: String,
        sensor: Sensor,
        carrier: Carrier,
        hemisphere: Hemisphere,
        version: String,
        start: NaiveDate,
        stop: NaiveDate,
        aois: Vec<String>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            token,
            sensor,
            carrier,
            hemisphere,
            version,
            start,
            stop,
            aois,
            output_dir,
            overlap_threshold_pct: DEFAULT_OVERLAP_THRESHOLD_PCT,
            radius_of_influence_m: DEFAULT_RADIUS_OF_INFLUENCE_M,
            critical_failure_count: DEFAULT_CRITICAL_FAILURE_COUNT,
            apply_retrieval: true,
            apply_resampling: true,
            resample_workers: num_cpus::get(),
        }
    }

    /// Validate the configuration, without any network activity
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::configuration("archive token must not be empty"));
        }

        // Rejects unsupported sensor/carrier pairings
        SensorProfile::new(self.sensor, self.carrier, &self.version)?;

        if self.start > self.stop {
            return Err(Error::configuration(format!(
                "start date {} is after stop date {}",
                self.start, self.stop
            )));
        }

        if self.aois.is_empty() {
            return Err(Error::configuration("at least one AOI must be selected"));
        }
        for tag in &self.aois {
            let grid = aoi::builtin_grid(tag).ok_or_else(|| {
                Error::configuration(format!(
                    "unknown AOI '{tag}' (run the `aois` command for the full list)"
                ))
            })?;
            if grid.hemisphere != self.hemisphere {
                return Err(Error::configuration(format!(
                    "AOI '{tag}' is in the {} hemisphere, run is configured for {}",
                    grid.hemisphere, self.hemisphere
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.overlap_threshold_pct) {
            return Err(Error::configuration(format!(
                "overlap threshold must be within 0..=100 percent, got {}",
                self.overlap_threshold_pct
            )));
        }

        if self.radius_of_influence_m <= 0.0 {
            return Err(Error::configuration(
                "radius of influence must be positive",
            ));
        }

        if self.critical_failure_count == 0 {
            return Err(Error::configuration(
                "critical failure count must be at least 1",
            ));
        }

        if self.resample_workers == 0 {
            return Err(Error::configuration("worker count must be at least 1"));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(Error::configuration(format!(
                "output path exists but is not a directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }

    /// All days of the run, inclusive, in chronological order
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut day = self.start;
        while day <= self.stop {
            days.push(day);
            day += Duration::days(1);
        }
        days
    }

    /// All days of the run, inclusive, as (`yyyy`, `jjj`) string pairs in
    /// chronological order
    pub fn date_strings(&self) -> Vec<(String, String)> {
        self.days()
            .into_iter()
            .map(|day| (format!("{}", day.year()), format!("{:03}", day.ordinal())))
            .collect()
    }

    /// `yyyyddd` form of the start date, for log file naming
    pub fn start_tag(&self) -> String {
        format!("{}{:03}", self.start.year(), self.start.ordinal())
    }

    /// `yyyyddd` form of the stop date, for log file naming
    pub fn stop_tag(&self) -> String {
        format!("{}{:03}", self.stop.year(), self.stop.ordinal())
    }

    /// Directory holding the per-day listing CSVs
    pub fn listing_dir(&self) -> PathBuf {
        self.output_dir.join(LISTING_DIR_NAME)
    }

    /// Directory holding downloaded swath files awaiting processing
    pub fn swath_cache_dir(&self) -> PathBuf {
        self.output_dir.join(SWATH_CACHE_DIR_NAME)
    }

    /// Directory holding run log files
    pub fn log_dir(&self) -> PathBuf {
        self.output_dir.join(LOG_DIR_NAME)
    }

    /// Root directory for finished output containers
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::new(
            "token-123".to_string(),
            Sensor::Modis,
            Carrier::Terra,
            Hemisphere::South,
            "61".to_string(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            vec!["berkner".to_string()],
            PathBuf::from("/tmp/swaths"),
        )
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut config = test_config();
        config.token = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let mut config = test_config();
        config.start = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_aoi_rejected() {
        let mut config = test_config();
        config.aois = vec!["atlantis".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn test_unsupported_combination_rejected() {
        let mut config = test_config();
        config.carrier = Carrier::S3a;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_date_strings_cover_range_inclusive() {
        let config = test_config();
        let days = config.date_strings();
        assert_eq!(
            days,
            vec![
                ("2023".to_string(), "001".to_string()),
                ("2023".to_string(), "002".to_string()),
                ("2023".to_string(), "003".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_strings_cross_year_boundary() {
        let mut config = test_config();
        config.start = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
        config.stop = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(
            config.date_strings(),
            vec![
                ("2022".to_string(), "365".to_string()),
                ("2023".to_string(), "001".to_string()),
            ]
        );
    }

    #[test]
    fn test_run_tags() {
        let config = test_config();
        assert_eq!(config.start_tag(), "2023001");
        assert_eq!(config.stop_tag(), "2023003");
    }

    #[test]
    fn test_directory_layout() {
        let config = test_config();
        assert_eq!(config.listing_dir(), PathBuf::from("/tmp/swaths/listing"));
        assert_eq!(config.swath_cache_dir(), PathBuf::from("/tmp/swaths/tmp"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/swaths/log"));
    }
}
