//! Sensor profiles
//!
//! Each supported sensor/carrier pairing is described by a [`SensorProfile`]
//! composed of small capability lookups (archive layout, file-family
//! membership, swath tagging, variable manifest). The profile is validated
//! once at construction; everything downstream can then ask it questions
//! without re-checking the pairing.

pub mod modis;
pub mod olci;
pub mod slstr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::ARCHIVE_BASE_URL;
use crate::{Error, Result};

/// Supported sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Modis,
    Slstr,
    Olci,
}

impl Sensor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sensor::Modis => "modis",
            Sensor::Slstr => "slstr",
            Sensor::Olci => "olci",
        }
    }
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported carrier platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Terra,
    Aqua,
    S3a,
    S3b,
}

impl Carrier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Terra => "terra",
            Carrier::Aqua => "aqua",
            Carrier::S3a => "s3a",
            Carrier::S3b => "s3b",
        }
    }

    /// Three-letter carrier tag used in output file names
    pub fn short_tag(&self) -> &'static str {
        match self {
            Carrier::Terra => "ter",
            Carrier::Aqua => "aqu",
            Carrier::S3a => "s3a",
            Carrier::S3b => "s3b",
        }
    }
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of one variable within the resampling pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    /// Per-pixel latitude, degrees north
    Latitude,
    /// Per-pixel longitude, degrees east
    Longitude,
    /// Measurement data sharing the coordinate grid
    Data,
}

/// One variable to read from a swath file family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSpec {
    /// Name used in output containers
    pub name: &'static str,
    /// Dataset name inside the source file
    pub dataset: &'static str,
    /// Which file of the family holds it (0 = primary)
    pub file_index: usize,
    /// Band slice within a stacked dataset, if the dataset is 3-D
    pub band: Option<usize>,
    pub role: VariableRole,
}

/// Validated description of one sensor/carrier/version run target
#[derive(Debug, Clone)]
pub struct SensorProfile {
    sensor: Sensor,
    carrier: Carrier,
    version: String,
}

impl SensorProfile {
    /// Build a profile, rejecting pairings the archive does not serve
    pub fn new(sensor: Sensor, carrier: Carrier, version: &str) -> Result<Self> {
        let supported = matches!(
            (sensor, carrier),
            (Sensor::Modis, Carrier::Terra)
                | (Sensor::Modis, Carrier::Aqua)
                | (Sensor::Slstr, Carrier::S3a)
                | (Sensor::Slstr, Carrier::S3b)
                | (Sensor::Olci, Carrier::S3a)
                | (Sensor::Olci, Carrier::S3b)
        );
        if !supported {
            return Err(Error::unsupported_combination(
                sensor.as_str(),
                carrier.as_str(),
            ));
        }
        Ok(Self {
            sensor,
            carrier,
            version: version.to_string(),
        })
    }

    pub fn sensor(&self) -> Sensor {
        self.sensor
    }

    pub fn carrier(&self) -> Carrier {
        self.carrier
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Archive product name of the primary (geolocated) file
    pub fn primary_product(&self) -> &'static str {
        match self.sensor {
            Sensor::Modis => modis::geo_product(self.carrier),
            Sensor::Slstr => slstr::product(self.carrier),
            Sensor::Olci => olci::product(self.carrier),
        }
    }

    /// Archive product name of the companion file, for multi-part families
    pub fn companion_product(&self) -> Option<&'static str> {
        match self.sensor {
            Sensor::Modis => Some(modis::channel_product(self.carrier)),
            Sensor::Slstr | Sensor::Olci => None,
        }
    }

    /// Whether a swath is split across a geolocation file plus a companion
    pub fn is_multipart(&self) -> bool {
        self.companion_product().is_some()
    }

    /// URL of the per-day metadata manifest
    pub fn meta_url(&self, date: NaiveDate) -> String {
        let branch = match self.sensor {
            Sensor::Modis => format!(
                "geoMeta/{}/{}",
                self.version,
                self.carrier.as_str().to_uppercase()
            ),
            Sensor::Slstr | Sensor::Olci => {
                format!("geoMetaSen3/{}/{}", self.version, self.primary_product())
            }
        };
        format!(
            "{ARCHIVE_BASE_URL}/archive/{branch}/{}/{}_{}.txt",
            date.year(),
            self.primary_product(),
            date.format("%Y-%m-%d")
        )
    }

    /// URL of the per-day archive directory for a product
    fn product_dir_url(&self, product: &str, date: NaiveDate) -> String {
        format!(
            "{ARCHIVE_BASE_URL}/archive/allData/{}/{product}/{}/{:03}",
            self.version,
            date.year(),
            date.ordinal()
        )
    }

    /// Download URL for a primary file named in the manifest
    pub fn primary_url(&self, file_name: &str, date: NaiveDate) -> String {
        format!(
            "{}/{file_name}",
            self.product_dir_url(self.primary_product(), date)
        )
    }

    /// URL of the companion product's per-day directory page, if any
    pub fn companion_dir_url(&self, date: NaiveDate) -> Option<String> {
        self.companion_product()
            .map(|product| self.product_dir_url(product, date))
    }

    /// Normalize a file name into the identifier shared by every file of
    /// the same swath
    pub fn swath_tag(&self, file_name: &str) -> Result<String> {
        match self.sensor {
            Sensor::Modis => modis::swath_tag(file_name),
            Sensor::Slstr | Sensor::Olci => sen3_swath_tag(file_name),
        }
    }

    /// Acquisition timestamp embedded in a swath tag
    pub fn tag_timestamp(&self, tag: &str) -> Result<NaiveDateTime> {
        match self.sensor {
            Sensor::Modis => modis::tag_timestamp(tag),
            Sensor::Slstr | Sensor::Olci => NaiveDateTime::parse_from_str(tag, "%Y%m%dT%H%M%S")
                .map_err(Error::from),
        }
    }

    /// `{carrier3}_{sensor}` prefix shared by every output of this profile
    pub fn output_prefix(&self) -> String {
        format!("{}_{}", self.carrier.short_tag(), self.sensor.as_str())
    }

    /// Variables to read from each swath of this profile
    pub fn variables(&self) -> &'static [VariableSpec] {
        match self.sensor {
            Sensor::Modis => modis::VARIABLES,
            Sensor::Slstr => slstr::VARIABLES,
            Sensor::Olci => olci::VARIABLES,
        }
    }
}

/// Sentinel-3 file names carry the sensing-start timestamp as the first
/// `yyyymmddThhmmss` token; that token identifies the swath.
fn sen3_swath_tag(file_name: &str) -> Result<String> {
    // Byte-level scan: file names come straight from manifest rows and may
    // carry arbitrary (non-ASCII) characters outside the token
    let bytes = file_name.as_bytes();
    if bytes.len() >= 15 {
        for start in 0..=bytes.len() - 15 {
            let window = &bytes[start..start + 15];
            if window[8] == b'T'
                && window[..8].iter().all(u8::is_ascii_digit)
                && window[9..].iter().all(u8::is_ascii_digit)
            {
                // All-ASCII window, lossless
                return Ok(String::from_utf8_lossy(window).into_owned());
            }
        }
    }
    Err(Error::manifest_format(
        file_name,
        "no sensing-start timestamp token in file name",
    ))
}
