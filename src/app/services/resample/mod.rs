//! Nearest-neighbor swath-to-grid resampling
//!
//! Swath pixels sit on an irregular curvilinear grid; every AOI has a
//! fixed regular output grid in the projected plane. Resampling assigns
//! each output cell the value of the nearest swath pixel within a radius
//! of influence, or marks it as no-data.
//!
//! Variables sharing one (lon, lat) coordinate pair are stacked into one
//! [`ResampleGroup`] so the spatial index is built once and every variable
//! is assigned in the same pass. No-data is expressed as NaN plus an
//! explicit per-cell validity mask; a resampled value of exactly 0.0 is a
//! legitimate measurement, never a marker.

pub mod engine;

#[cfg(test)]
mod tests;

pub use engine::Resampler;

use ndarray::{Array2, Array3, Axis};

use crate::{Error, Result};

/// Variables sharing one (lon, lat) coordinate pair, stacked for one
/// spatial-index query
#[derive(Debug, Clone)]
pub struct ResampleGroup {
    lon: Array2<f64>,
    lat: Array2<f64>,
    names: Vec<String>,
    /// (variable, row, col) in swath space
    stack: Array3<f64>,
}

impl ResampleGroup {
    /// Stack variables onto a shared coordinate pair. Every array must
    /// have the coordinate shape; empty input is rejected here so the
    /// engine can assume well-formed groups.
    pub fn new(
        lon: Array2<f64>,
        lat: Array2<f64>,
        variables: Vec<(String, Array2<f64>)>,
    ) -> Result<Self> {
        let shape = lon.dim();
        if shape.0 == 0 || shape.1 == 0 {
            return Err(Error::resample("coordinate arrays are empty"));
        }
        if lat.dim() != shape {
            return Err(Error::resample(format!(
                "latitude shape {:?} does not match longitude shape {:?}",
                lat.dim(),
                shape
            )));
        }
        if variables.is_empty() {
            return Err(Error::resample("group has no variables"));
        }

        let mut names = Vec::with_capacity(variables.len());
        let mut stack = Array3::zeros((variables.len(), shape.0, shape.1));
        for (i, (name, data)) in variables.into_iter().enumerate() {
            if data.dim() != shape {
                return Err(Error::resample(format!(
                    "variable '{name}' shape {:?} does not match coordinate shape {:?}",
                    data.dim(),
                    shape
                )));
            }
            stack.index_axis_mut(Axis(0), i).assign(&data);
            names.push(name);
        }

        Ok(Self {
            lon,
            lat,
            names,
            stack,
        })
    }

    pub fn lon(&self) -> &Array2<f64> {
        &self.lon
    }

    pub fn lat(&self) -> &Array2<f64> {
        &self.lat
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// (variable, row, col) swath-space stack
    pub fn stack(&self) -> &Array3<f64> {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One group resampled onto one AOI grid
#[derive(Debug, Clone)]
pub struct ResampledStack {
    pub names: Vec<String>,
    /// (variable, row, col) in grid space; NaN where no pixel was in range
    pub data: Array3<f64>,
    /// True where a source pixel was found within the radius of influence
    pub valid: Array2<bool>,
}

impl ResampledStack {
    /// Number of grid cells with a source pixel in range
    pub fn valid_cells(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
}
