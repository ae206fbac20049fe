//! Command-line argument definitions for the swath retriever
//!
//! The full interface is defined here with the clap derive API; everything
//! downstream works from a validated [`Config`](crate::config::Config).

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::app::models::Hemisphere;
use crate::app::services::aoi;
use crate::app::services::sensors::{Carrier, Sensor};
use crate::config::Config;
use crate::constants::{
    DEFAULT_CRITICAL_FAILURE_COUNT, DEFAULT_OVERLAP_THRESHOLD_PCT, DEFAULT_RADIUS_OF_INFLUENCE_M,
};
use crate::{Error, Result};

/// Environment variable consulted when `--token` is not given
pub const TOKEN_ENV_VAR: &str = "LAADS_TOKEN";

/// CLI arguments for the swath retriever
///
/// Compiles listings of polar-orbiting satellite swaths overlapping
/// selected Areas of Interest, downloads the matching files from the
/// archive, and resamples them onto fixed AOI grids.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "swath-retriever",
    version,
    about = "Compile, download and grid polar satellite swaths overlapping Areas of Interest",
    long_about = "Crawls per-day archive metadata manifests for a sensor/carrier pairing, keeps \
                  the swaths whose footprints cover a minimum fraction of any selected Area of \
                  Interest, downloads the matching file families, and resamples their pixel data \
                  onto each AOI's fixed output grid. Listings persist per day and outputs per \
                  swath, so an interrupted run resumes where it stopped."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compile the listing and retrieve the matching swaths (main command)
    Run(RunArgs),
    /// List the built-in AOI grids
    Aois(AoisArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
#[command(after_help = "Retrieval runs in download-only mode: matched swath families are \
fetched into the cache under the output root and kept there. The resampling \
flags (--no-resampling, --radius, --workers) configure the full \
extract-and-grid pipeline, which runs through the library API with \
caller-supplied format codecs.")]
pub struct RunArgs {
    /// Bearer token for the authenticated archive
    ///
    /// Falls back to the LAADS_TOKEN environment variable when omitted.
    #[arg(
        short = 't',
        long = "token",
        value_name = "TOKEN",
        help = "Archive bearer token (default: LAADS_TOKEN environment variable)"
    )]
    pub token: Option<String>,

    /// Sensor to retrieve data for
    #[arg(short = 's', long = "sensor", value_enum, help = "Sensor to retrieve")]
    pub sensor: Sensor,

    /// Carrier platform the sensor flies on
    #[arg(
        short = 'c',
        long = "carrier",
        value_enum,
        help = "Carrier platform (must pair with the sensor)"
    )]
    pub carrier: Carrier,

    /// Hemisphere the selected AOIs live in
    #[arg(
        long = "hemisphere",
        value_enum,
        default_value = "south",
        help = "Hemisphere of the selected AOIs"
    )]
    pub hemisphere: Hemisphere,

    /// Archive collection version
    #[arg(
        long = "version",
        value_name = "VERSION",
        default_value = "61",
        help = "Archive collection version (e.g. 61 for MODIS Collection 6.1)"
    )]
    pub collection: String,

    /// First acquisition day, inclusive (YYYY-MM-DD)
    #[arg(long = "start", value_name = "DATE", help = "First day to crawl (YYYY-MM-DD)")]
    pub start: NaiveDate,

    /// Last acquisition day, inclusive (YYYY-MM-DD)
    #[arg(long = "stop", value_name = "DATE", help = "Last day to crawl (YYYY-MM-DD)")]
    pub stop: NaiveDate,

    /// AOIs to test swaths against (comma-separated ids)
    ///
    /// Run the `aois` command for the full catalog.
    #[arg(
        short = 'a',
        long = "aois",
        value_name = "LIST",
        help = "Comma-separated AOI ids (see the `aois` command)"
    )]
    pub aois: AoiList,

    /// Root directory for listings, caches, logs and output containers
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = "./swaths",
        help = "Root directory for listings, caches, logs and outputs"
    )]
    pub output: PathBuf,

    /// Minimum AOI coverage for a swath to be kept, in percent
    #[arg(
        long = "threshold",
        value_name = "PCT",
        default_value_t = DEFAULT_OVERLAP_THRESHOLD_PCT,
        help = "Minimum AOI coverage fraction in percent"
    )]
    pub threshold_pct: f64,

    /// Nearest-neighbor search radius for resampling, in meters
    #[arg(
        long = "radius",
        value_name = "METERS",
        default_value_t = DEFAULT_RADIUS_OF_INFLUENCE_M,
        help = "Resampling radius of influence in meters"
    )]
    pub radius_m: f64,

    /// Consecutive failures after which the run aborts
    #[arg(
        long = "critical-count",
        value_name = "COUNT",
        default_value_t = DEFAULT_CRITICAL_FAILURE_COUNT,
        help = "Consecutive-failure budget before the run aborts"
    )]
    pub critical_count: usize,

    /// Compile and persist the listing, then stop without downloading
    #[arg(long = "listing-only", help = "Stop after compiling the listing")]
    pub listing_only: bool,

    /// Keep downloaded swath files in swath space instead of resampling
    #[arg(
        long = "no-resampling",
        help = "Skip resampling; downloaded swath files are the product"
    )]
    pub no_resampling: bool,

    /// Worker threads for the resampling engine
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Resampling worker threads (default: all cores)"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Also write the run log to a file under the output log directory
    #[arg(long = "log-file", help = "Write the run log to the output log directory")]
    pub log_file: bool,
}

/// Arguments for the aois command
#[derive(Debug, Clone, Parser)]
pub struct AoisArgs {
    /// Restrict the catalog to one hemisphere
    #[arg(long = "hemisphere", value_enum, help = "Only list AOIs in this hemisphere")]
    pub hemisphere: Option<Hemisphere>,
}

/// Wrapper for parsing comma-separated AOI id lists
#[derive(Debug, Clone)]
pub struct AoiList {
    pub ids: Vec<String>,
}

impl FromStr for AoiList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let ids: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if ids.is_empty() {
            return Err(Error::configuration("AOI list cannot be empty"));
        }

        for id in &ids {
            if aoi::builtin_grid(id).is_none() {
                return Err(Error::configuration(format!(
                    "unknown AOI '{id}' (run the `aois` command for the full list)"
                )));
            }
        }

        Ok(AoiList { ids })
    }
}

impl RunArgs {
    /// Resolve the archive token from the flag or the environment
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        std::env::var(TOKEN_ENV_VAR).map_err(|_| {
            Error::configuration(format!(
                "no archive token: pass --token or set {TOKEN_ENV_VAR}"
            ))
        })
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the validated run configuration
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::new(
            self.resolve_token()?,
            self.sensor,
            self.carrier,
            self.hemisphere,
            self.collection.clone(),
            self.start,
            self.stop,
            self.aois.ids.clone(),
            self.output.clone(),
        );
        config.overlap_threshold_pct = self.threshold_pct;
        config.radius_of_influence_m = self.radius_m;
        config.critical_failure_count = self.critical_count;
        config.apply_retrieval = !self.listing_only;
        config.apply_resampling = !self.no_resampling;
        if let Some(workers) = self.workers {
            config.resample_workers = workers;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(extra: &[&str]) -> std::result::Result<Args, clap::Error> {
        let mut argv = vec![
            "swath-retriever",
            "run",
            "--token",
            "t0k3n",
            "--sensor",
            "modis",
            "--carrier",
            "terra",
            "--start",
            "2023-01-01",
            "--stop",
            "2023-01-03",
            "--aois",
            "berkner",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv)
    }

    fn parsed(extra: &[&str]) -> RunArgs {
        match run_args(extra).unwrap().command.unwrap() {
            Commands::Run(args) => args,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn test_aoi_list_parsing() {
        let list = AoiList::from_str("berkner,ronne").unwrap();
        assert_eq!(list.ids, vec!["berkner", "ronne"]);

        let list = AoiList::from_str(" berkner , ronne ").unwrap();
        assert_eq!(list.ids, vec!["berkner", "ronne"]);

        assert!(AoiList::from_str("atlantis").is_err());
        assert!(AoiList::from_str("").is_err());
        assert!(AoiList::from_str(",,,").is_err());
    }

    #[test]
    fn test_run_defaults() {
        let args = parsed(&[]);
        assert_eq!(args.collection, "61");
        assert_eq!(args.hemisphere, Hemisphere::South);
        assert_eq!(args.threshold_pct, DEFAULT_OVERLAP_THRESHOLD_PCT);
        assert!(!args.listing_only);
        assert!(!args.no_resampling);
        assert_eq!(args.get_log_level(), "info");
        assert!(args.show_progress());
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parsed(&["-v"]).get_log_level(), "debug");
        assert_eq!(parsed(&["-vv"]).get_log_level(), "trace");
        let quiet = parsed(&["--quiet"]);
        assert_eq!(quiet.get_log_level(), "error");
        assert!(!quiet.show_progress());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(run_args(&["--quiet", "-v"]).is_err());
    }

    #[test]
    fn test_run_help_states_download_only_retrieval() {
        let err = Args::try_parse_from(["swath-retriever", "run", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("download-only mode"));
    }

    #[test]
    fn test_to_config_carries_flags() {
        let args = parsed(&["--listing-only", "--no-resampling", "--threshold", "10.5"]);
        let config = args.to_config().unwrap();
        assert!(!config.apply_retrieval);
        assert!(!config.apply_resampling);
        assert_eq!(config.overlap_threshold_pct, 10.5);
        assert_eq!(config.aois, vec!["berkner"]);
    }

    #[test]
    fn test_to_config_rejects_bad_pairing() {
        let mut argv = vec![
            "swath-retriever",
            "run",
            "--token",
            "t",
            "--sensor",
            "modis",
            "--carrier",
            "s3a",
            "--start",
            "2023-01-01",
            "--stop",
            "2023-01-02",
            "--aois",
            "berkner",
        ];
        argv.push("--output");
        argv.push("./out");
        let args = match Args::try_parse_from(argv).unwrap().command.unwrap() {
            Commands::Run(args) => args,
            other => panic!("expected run command, got {other:?}"),
        };
        assert!(args.to_config().is_err());
    }
}
