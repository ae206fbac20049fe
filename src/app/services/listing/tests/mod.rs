//! Listing pipeline tests and shared fixtures


use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::app::adapters::archive::ArchiveClient;
use crate::app::services::aoi::AoiRegistry;
use crate::app::models::Hemisphere;
use crate::app::services::sensors::{Carrier, Sensor, SensorProfile};
use crate::config::Config;
use crate::{Error, Result};

/// Canned archive: maps URLs to bodies, records every call, and can be
/// told to fail specific URLs or everything
pub struct FakeArchive {
    pub bodies: HashMap<String, String>,
    pub failing: HashSet<String>,
    pub fail_all: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeArchive {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            failing: HashSet::new(),
            fail_all: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn failing_url(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn failing_everything(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, url: &str) -> Result<()> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.fail_all || self.failing.contains(url) {
            return Err(Error::http(url, "simulated outage", None));
        }
        Ok(())
    }
}

#[async_trait]
impl ArchiveClient for FakeArchive {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.record(url)?;
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::http(url, "not found", None))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.record(url)?;
        std::fs::write(dest, b"swath-bytes").map_err(|e| Error::io("write failed", e))
    }
}

pub fn terra_modis() -> SensorProfile {
    SensorProfile::new(Sensor::Modis, Carrier::Terra, "61").unwrap()
}

pub fn test_config(output_dir: PathBuf, aois: &[&str]) -> Config {
    Config::new(
        "token".to_string(),
        Sensor::Modis,
        Carrier::Terra,
        Hemisphere::South,
        "61".to_string(),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        aois.iter().map(|s| s.to_string()).collect(),
        output_dir,
    )
}

pub fn registry(aois: &[&str]) -> AoiRegistry {
    let ids: Vec<String> = aois.iter().map(|s| s.to_string()).collect();
    AoiRegistry::compile(&ids).unwrap()
}

/// One geoMeta data row with a rectangular footprint
pub fn manifest_row(
    file_name: &str,
    lon_min: f64,
    lat_min: f64,
    lon_max: f64,
    lat_max: f64,
) -> String {
    format!(
        "{file_name},2023-01-01 00:00,61,1,D,{lon_max},{lat_max},{lat_min},{lon_min},\
         {lon_min},{lon_max},{lon_max},{lon_min},{lat_min},{lat_min},{lat_max},{lat_max}\n"
    )
}

/// A manifest body: three header rows plus the given data rows
pub fn manifest_body(rows: &[String]) -> String {
    let mut body = String::from("# geoMeta\n#\n# GranuleID,...\n");
    for row in rows {
        body.push_str(row);
    }
    body
}

/// A companion directory page listing the given file names
pub fn companion_page(files: &[&str]) -> String {
    let mut html = String::from("<html><body>\n");
    for file in files {
        html.push_str(&format!(
            "<a class=\"btn btn-default\" href=\"/archive/allData/61/MOD021KM/2023/001/{file}\">{file}</a>\n"
        ));
    }
    html.push_str("</body></html>\n");
    html
}

// Footprints reused across tests: fully covering berkner, and near (0, 0)
pub fn berkner_swath_row(file_name: &str) -> String {
    manifest_row(file_name, -52.0, -79.0, -28.0, -74.5)
}

pub fn equatorial_swath_row(file_name: &str) -> String {
    manifest_row(file_name, -2.0, -2.0, 2.0, 2.0)
}
