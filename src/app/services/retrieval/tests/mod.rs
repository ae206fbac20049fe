//! Retrieval pipeline tests and shared fixtures
//!
//! The archive fake comes from the listing tests; reader and writer
//! collaborators are faked here.


use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array2;

use crate::app::adapters::swath_io::{
    Provenance, RawVariable, SwathReader, SwathWriter, VariableAttrs,
};
use crate::app::models::ListingEntry;
use crate::app::services::aoi::AreaOfInterest;
use crate::app::services::sensors::{VariableRole, VariableSpec};
use crate::{Error, Result};

pub use crate::app::services::listing::tests::{registry, terra_modis, test_config, FakeArchive};

/// Reader returning canned coordinate arrays and per-band constants
pub struct FakeReader {
    pub lon: Array2<f64>,
    pub lat: Array2<f64>,
}

impl FakeReader {
    /// Coordinates placed at the first `rows` x `cols` cell centers of an
    /// AOI, so resampling against that AOI lands hits
    pub fn over_aoi(aoi: &AreaOfInterest, rows: usize, cols: usize) -> Self {
        let mut lon = Array2::zeros((rows, cols));
        let mut lat = Array2::zeros((rows, cols));
        for r in 0..rows {
            for c in 0..cols {
                let geo = aoi.projection().inverse(aoi.cell_center(r, c));
                lon[[r, c]] = geo.lon;
                lat[[r, c]] = geo.lat;
            }
        }
        Self { lon, lat }
    }
}

impl SwathReader for FakeReader {
    fn read_variable(&self, _path: &Path, spec: &VariableSpec) -> Result<RawVariable> {
        let data = match spec.role {
            VariableRole::Longitude => self.lon.clone(),
            VariableRole::Latitude => self.lat.clone(),
            VariableRole::Data => {
                let value = 42.0 + spec.band.unwrap_or(0) as f64;
                Array2::from_elem(self.lon.dim(), value)
            }
        };
        Ok(RawVariable {
            name: spec.name.to_string(),
            data,
            attrs: VariableAttrs {
                long_name: format!("long name of {}", spec.name),
                ..Default::default()
            },
        })
    }
}

/// Reader that fails every read, for error-path tests
pub struct FailingReader;

impl SwathReader for FailingReader {
    fn read_variable(&self, path: &Path, spec: &VariableSpec) -> Result<RawVariable> {
        Err(Error::swath_io(format!(
            "cannot read '{}' from {}",
            spec.name,
            path.display()
        )))
    }
}

/// Writer that creates real (empty) container files and records every call
#[derive(Default)]
pub struct RecordingWriter {
    pub created: Mutex<Vec<PathBuf>>,
    pub datasets: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingWriter {
    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn dataset_names(&self) -> Vec<String> {
        self.datasets
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }
}

impl SwathWriter for RecordingWriter {
    fn create(&mut self, path: &Path, _provenance: &Provenance) -> Result<()> {
        std::fs::write(path, b"container").map_err(|e| Error::io("create failed", e))?;
        self.created.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn write_dataset(
        &mut self,
        path: &Path,
        name: &str,
        _long_name: &str,
        _data: ndarray::ArrayView2<'_, f64>,
    ) -> Result<()> {
        self.datasets
            .lock()
            .unwrap()
            .push((path.to_path_buf(), name.to_string()));
        Ok(())
    }
}

/// One (swath, AOI) listing row with a matching companion file
pub fn listing_entry(tag_time: &str, aoi: &str) -> ListingEntry {
    let primary = format!("MOD03.A2023001.{tag_time}.061.x.hdf");
    let companion = format!("MOD021KM.A2023001.{tag_time}.061.y.hdf");
    ListingEntry {
        primary_url: format!("https://a.test/{primary}"),
        primary_file: primary,
        companion_url: Some(format!("https://a.test/{companion}")),
        companion_file: Some(companion),
        aoi: aoi.to_string(),
        fraction: 75.0,
    }
}
