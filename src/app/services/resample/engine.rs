//! Spatial index construction and nearest-neighbor assignment

use ndarray::{Array2, Array3};
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::debug;

use super::{ResampleGroup, ResampledStack};
use crate::app::models::LonLat;
use crate::app::services::aoi::AreaOfInterest;
use crate::{Error, Result};

/// One projected swath pixel carrying its flat index into the stack
type SwathPixel = GeomWithData<[f64; 2], usize>;

/// Nearest-neighbor resampler with a fixed radius of influence
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    radius_m: f64,
    workers: usize,
}

impl Resampler {
    pub fn new(radius_m: f64, workers: usize) -> Self {
        Self { radius_m, workers }
    }

    /// Resample one group onto one AOI grid.
    ///
    /// Pixels with non-finite coordinates are left out of the index; a
    /// swath with no finite coordinates at all is an error. The per-cell
    /// queries run on a bounded worker pool internal to this call.
    pub fn resample(&self, group: &ResampleGroup, aoi: &AreaOfInterest) -> Result<ResampledStack> {
        let projection = aoi.projection();
        let swath_cols = group.lon().dim().1;

        let mut pixels: Vec<SwathPixel> = Vec::with_capacity(group.lon().len());
        for (flat, (&lon, &lat)) in group.lon().iter().zip(group.lat().iter()).enumerate() {
            if lon.is_finite() && lat.is_finite() {
                pixels.push(SwathPixel::new(
                    projection.project(LonLat::new(lon, lat)),
                    flat,
                ));
            }
        }
        if pixels.is_empty() {
            return Err(Error::resample(
                "swath coordinates contain no finite values",
            ));
        }
        debug!(
            "indexing {} of {} swath pixels for {}",
            pixels.len(),
            group.lon().len(),
            aoi.id()
        );
        let tree = RTree::bulk_load(pixels);

        let grid = aoi.grid();
        let cells = grid.rows * grid.cols;
        let radius2 = self.radius_m * self.radius_m;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::resample(format!("failed to build worker pool: {e}")))?;
        let nearest: Vec<Option<usize>> = pool.install(|| {
            (0..cells)
                .into_par_iter()
                .map(|cell| {
                    let center = aoi.cell_center(cell / grid.cols, cell % grid.cols);
                    tree.nearest_neighbor_iter_with_distance_2(&center)
                        .next()
                        .filter(|(_, distance2)| *distance2 <= radius2)
                        .map(|(pixel, _)| pixel.data)
                })
                .collect()
        });

        // One pass assigns every variable of the group simultaneously
        let nvars = group.len();
        let mut data = Array3::from_elem((nvars, grid.rows, grid.cols), f64::NAN);
        let mut valid = Array2::from_elem((grid.rows, grid.cols), false);
        let stack = group.stack();
        for (cell, hit) in nearest.iter().enumerate() {
            if let Some(flat) = hit {
                let (row, col) = (cell / grid.cols, cell % grid.cols);
                let (src_row, src_col) = (flat / swath_cols, flat % swath_cols);
                valid[[row, col]] = true;
                for var in 0..nvars {
                    data[[var, row, col]] = stack[[var, src_row, src_col]];
                }
            }
        }

        Ok(ResampledStack {
            names: group.names().to_vec(),
            data,
            valid,
        })
    }
}
