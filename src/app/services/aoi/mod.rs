//! Areas of Interest
//!
//! An AOI couples a geographic extent with a fixed output grid. The
//! built-in catalog covers recurring Antarctic coastal polynya regions;
//! each is compiled once per run into projected form (densified boundary
//! ring plus true area) so that per-swath overlap tests are pure planar
//! geometry.

pub mod geometry;
pub mod overlap;
pub mod projection;

#[cfg(test)]
mod tests;

use crate::app::models::{Hemisphere, LonLat};
use crate::{Error, Result};

use geometry::{area, Ring};
use projection::PolarProjection;

/// Boundary samples per extent edge when densifying an AOI ring. The
/// projected boundary of a lon/lat rectangle is curved; straight segments
/// between samples must follow that curve closely enough for area work.
const DENSIFY_POINTS_PER_EDGE: usize = 32;

/// A built-in AOI: extent in degrees plus its output grid shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDefinition {
    /// Short id used on the command line and in output file names
    pub id: &'static str,
    pub hemisphere: Hemisphere,
    /// (lon min, lat min, lon max, lat max), degrees
    pub extent: [f64; 4],
    /// Output grid rows (y, north to south in the projected plane)
    pub rows: usize,
    /// Output grid columns (x, west to east in the projected plane)
    pub cols: usize,
}

/// The built-in AOI catalog. Grid shapes give roughly 1 km cells at the
/// region's latitude.
const BUILTIN_GRIDS: &[GridDefinition] = &[
    grid("atka", [-9.5, -71.5, -5.5, -70.0], 165, 145),
    grid("berkner", [-50.0, -78.5, -30.0, -75.0], 390, 510),
    grid("brunt", [-28.0, -76.5, -22.0, -74.5], 220, 165),
    grid("weddell", [-60.0, -78.0, -20.0, -70.0], 890, 1220),
    grid("tnb", [162.0, -75.5, 167.0, -74.0], 165, 145),
    grid("ross-west", [160.0, -78.0, 180.0, -73.0], 555, 555),
    grid("ross-east", [-180.0, -78.0, -155.0, -73.0], 555, 695),
    grid("prydz", [68.0, -70.0, 80.0, -66.0], 445, 500),
    grid("darnley", [67.0, -69.0, 71.0, -67.0], 220, 165),
    grid("barrier", [81.0, -67.5, 87.0, -65.5], 220, 265),
    grid("mertz", [142.0, -68.0, 148.0, -65.5], 280, 260),
    grid("vincennes", [104.0, -67.0, 109.0, -65.0], 220, 225),
    grid("amundsen", [-115.0, -75.0, -100.0, -71.0], 445, 485),
    grid("greater-amundsen", [-130.0, -76.0, -95.0, -70.0], 665, 1135),
    grid("getz-west", [-135.0, -75.0, -125.0, -73.0], 220, 305),
    grid("getz-east", [-125.0, -75.0, -114.0, -73.0], 220, 335),
    grid("dibble", [133.0, -67.0, 137.0, -65.0], 220, 180),
    grid("dalton", [119.0, -67.5, 123.0, -65.5], 220, 180),
    grid("shackleton", [94.0, -67.0, 102.0, -64.5], 280, 365),
    grid("ronne", [-65.0, -79.0, -50.0, -74.5], 500, 380),
    grid("thwaites", [-110.0, -75.5, -103.0, -74.0], 165, 205),
    grid("pineisland", [-104.0, -75.5, -99.0, -74.0], 165, 145),
    grid("larsen-b", [-63.0, -66.0, -58.0, -64.5], 165, 230),
    grid("larsen-c", [-64.0, -69.0, -58.0, -66.0], 335, 255),
];

const fn grid(id: &'static str, extent: [f64; 4], rows: usize, cols: usize) -> GridDefinition {
    GridDefinition {
        id,
        hemisphere: Hemisphere::South,
        extent,
        rows,
        cols,
    }
}

/// All built-in AOI grids
pub fn builtin_grids() -> &'static [GridDefinition] {
    BUILTIN_GRIDS
}

/// Look up one built-in grid by id
pub fn builtin_grid(id: &str) -> Option<&'static GridDefinition> {
    BUILTIN_GRIDS.iter().find(|g| g.id == id)
}

/// One AOI compiled into projected form
#[derive(Debug, Clone)]
pub struct AreaOfInterest {
    grid: &'static GridDefinition,
    projection: PolarProjection,
    polygon: Ring,
    area_m2: f64,
    /// Projected bounding box (x min, y min, x max, y max), meters
    bounds: [f64; 4],
}

impl AreaOfInterest {
    /// Compile a grid definition: densify the extent boundary, project it,
    /// and measure the true region area
    pub fn compile(grid: &'static GridDefinition) -> Result<Self> {
        let projection = PolarProjection::new(grid.hemisphere);
        let polygon = densified_ring(grid, &projection);
        let area_m2 = area(&polygon);
        if area_m2 <= 0.0 {
            return Err(Error::geometry(format!(
                "AOI '{}' has a degenerate extent {:?}",
                grid.id, grid.extent
            )));
        }
        let mut bounds = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        for p in &polygon {
            bounds[0] = bounds[0].min(p[0]);
            bounds[1] = bounds[1].min(p[1]);
            bounds[2] = bounds[2].max(p[0]);
            bounds[3] = bounds[3].max(p[1]);
        }
        Ok(Self {
            grid,
            projection,
            polygon,
            area_m2,
            bounds,
        })
    }

    pub fn id(&self) -> &'static str {
        self.grid.id
    }

    pub fn grid(&self) -> &'static GridDefinition {
        self.grid
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.grid.hemisphere
    }

    pub fn projection(&self) -> &PolarProjection {
        &self.projection
    }

    /// Densified boundary ring in projected meters
    pub fn polygon(&self) -> &[[f64; 2]] {
        &self.polygon
    }

    /// True region area in square meters
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    /// Projected bounding box (x min, y min, x max, y max), meters. The
    /// output grid spans this box uniformly.
    pub fn projected_bounds(&self) -> [f64; 4] {
        self.bounds
    }

    /// Projected center of one output grid cell. Row 0 is the top (largest
    /// y) of the box, column 0 the left (smallest x).
    pub fn cell_center(&self, row: usize, col: usize) -> [f64; 2] {
        let [xmin, ymin, xmax, ymax] = self.bounds;
        let dx = (xmax - xmin) / self.grid.cols as f64;
        let dy = (ymax - ymin) / self.grid.rows as f64;
        [
            xmin + (col as f64 + 0.5) * dx,
            ymax - (row as f64 + 0.5) * dy,
        ]
    }
}

fn densified_ring(grid: &GridDefinition, projection: &PolarProjection) -> Ring {
    let [lon_min, lat_min, lon_max, lat_max] = grid.extent;
    let n = DENSIFY_POINTS_PER_EDGE as f64;
    let mut boundary: Vec<LonLat> = Vec::with_capacity(4 * DENSIFY_POINTS_PER_EDGE);
    for i in 0..DENSIFY_POINTS_PER_EDGE {
        let t = i as f64 / n;
        boundary.push(LonLat::new(lon_min + t * (lon_max - lon_min), lat_min));
    }
    for i in 0..DENSIFY_POINTS_PER_EDGE {
        let t = i as f64 / n;
        boundary.push(LonLat::new(lon_max, lat_min + t * (lat_max - lat_min)));
    }
    for i in 0..DENSIFY_POINTS_PER_EDGE {
        let t = i as f64 / n;
        boundary.push(LonLat::new(lon_max - t * (lon_max - lon_min), lat_max));
    }
    for i in 0..DENSIFY_POINTS_PER_EDGE {
        let t = i as f64 / n;
        boundary.push(LonLat::new(lon_min, lat_max - t * (lat_max - lat_min)));
    }
    boundary.into_iter().map(|p| projection.project(p)).collect()
}

/// The set of AOIs selected for one run, compiled and ready for overlap
/// testing
#[derive(Debug, Clone)]
pub struct AoiRegistry {
    areas: Vec<AreaOfInterest>,
}

impl AoiRegistry {
    /// Compile the named built-in AOIs. Unknown ids are an error; config
    /// validation normally catches them earlier.
    pub fn compile(ids: &[String]) -> Result<Self> {
        let mut areas = Vec::with_capacity(ids.len());
        for id in ids {
            let grid = builtin_grid(id).ok_or_else(|| {
                Error::configuration(format!("unknown AOI '{id}'"))
            })?;
            areas.push(AreaOfInterest::compile(grid)?);
        }
        Ok(Self { areas })
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaOfInterest> {
        self.areas.iter()
    }

    /// Look up one compiled AOI by id
    pub fn get(&self, id: &str) -> Option<&AreaOfInterest> {
        self.areas.iter().find(|a| a.id() == id)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
