//! Swath reader and writer collaborator contracts
//!
//! The retrieval pipeline is generic over the scientific file formats it
//! touches. A [`SwathReader`] turns (path, variable spec) into a raw array
//! plus physical metadata; a [`SwathWriter`] persists named 2-D datasets
//! with provenance attributes. Concrete HDF4/NetCDF codecs plug in through
//! these traits; the crate's own tests exercise them with in-memory fakes.

use std::path::Path;

use chrono::Utc;
use ndarray::{Array2, ArrayView2};

use crate::app::services::sensors::VariableSpec;
use crate::constants::{PROVENANCE_AUTHOR, PROVENANCE_CONTACT, PROVENANCE_TIMESTAMP_FORMAT};
use crate::Result;

/// Physical metadata attached to one raw variable by its reader
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableAttrs {
    /// Human-readable name carried into the output container
    pub long_name: String,
    /// Sentinel marking missing pixels in the raw array
    pub fill_value: Option<f64>,
    /// Inclusive raw-value domain; values outside are invalid
    pub valid_range: Option<(f64, f64)>,
    /// Linear calibration scale
    pub scale: Option<f64>,
    /// Linear calibration offset, subtracted before scaling
    pub offset: Option<f64>,
    /// Channel center wavelength in micrometers, where applicable
    pub wavelength_um: Option<f64>,
}

/// One variable as read from a swath file, before or after calibration
#[derive(Debug, Clone)]
pub struct RawVariable {
    pub name: String,
    pub data: Array2<f64>,
    pub attrs: VariableAttrs,
}

impl RawVariable {
    /// Apply the value-domain contract in place: fill-value and
    /// valid-range masking to NaN, then `scale * (value - offset)`.
    ///
    /// Masking runs on raw values, before the linear calibration, matching
    /// how the attributes are defined at the source. Per-channel physics
    /// beyond the linear step (brightness-temperature conversion) is the
    /// reader's business, not handled here.
    pub fn calibrate(&mut self) {
        let fill = self.attrs.fill_value;
        let range = self.attrs.valid_range;
        let scale = self.attrs.scale.unwrap_or(1.0);
        let offset = self.attrs.offset.unwrap_or(0.0);

        for value in self.data.iter_mut() {
            if let Some(fill) = fill {
                if *value == fill {
                    *value = f64::NAN;
                    continue;
                }
            }
            if let Some((lo, hi)) = range {
                if *value < lo || *value > hi {
                    *value = f64::NAN;
                    continue;
                }
            }
            *value = scale * (*value - offset);
        }
    }
}

/// Global attributes stamped onto every output container at creation
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub author: String,
    pub contact: String,
    pub created: String,
}

impl Provenance {
    /// Crate defaults with the current UTC timestamp
    pub fn now() -> Self {
        Self {
            author: PROVENANCE_AUTHOR.to_string(),
            contact: PROVENANCE_CONTACT.to_string(),
            created: Utc::now().format(PROVENANCE_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Reads raw variables out of downloaded swath files.
///
/// A `dataset` in the spec may be group-qualified (`group/name`) for
/// formats with internal hierarchy; the reader owns that interpretation.
pub trait SwathReader: Send + Sync {
    fn read_variable(&self, path: &Path, spec: &VariableSpec) -> Result<RawVariable>;
}

/// Persists output containers, one per (swath, mode).
///
/// `create` is called exactly once per container and sets the global
/// provenance attributes; `write_dataset` appends one named, compressed
/// 2-D dataset carrying its long name plus min/max attributes derived from
/// the data.
pub trait SwathWriter: Send {
    fn create(&mut self, path: &Path, provenance: &Provenance) -> Result<()>;

    fn write_dataset(
        &mut self,
        path: &Path,
        name: &str,
        long_name: &str,
        data: ArrayView2<'_, f64>,
    ) -> Result<()>;
}
