//! Swath-against-AOI overlap testing
//!
//! A swath matches an AOI when the fraction of the AOI covered by the swath
//! footprint reaches the run's threshold. The test runs entirely in the
//! AOI's projected plane: corner coordinates are projected, the footprint is
//! rebuilt as the convex hull of the projected corners, and the covered
//! fraction is the clipped intersection area over the AOI area.

use crate::app::models::{Hemisphere, SwathFootprint};
use crate::constants::HEMISPHERE_LAT_LIMIT_DEG;

use super::geometry::{area, clip_convex, convex_hull};
use super::AreaOfInterest;

/// Result of testing one swath footprint against one AOI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Whether the covered fraction reached the threshold
    pub matches: bool,
    /// AOI coverage in percent, rounded to two decimals
    pub fraction_pct: f64,
}

impl Overlap {
    const NONE: Overlap = Overlap {
        matches: false,
        fraction_pct: 0.0,
    };
}

/// Test one swath footprint against one AOI
pub fn check_overlap(
    aoi: &AreaOfInterest,
    footprint: &SwathFootprint,
    threshold_pct: f64,
) -> Overlap {
    // Cheap latitude gate: a swath with no corner on the AOI's side of the
    // 30-degree parallel cannot touch a polar AOI
    let in_band = match aoi.hemisphere() {
        Hemisphere::South => footprint.min_lat() < -HEMISPHERE_LAT_LIMIT_DEG,
        Hemisphere::North => footprint.max_lat() > HEMISPHERE_LAT_LIMIT_DEG,
    };
    if !in_band {
        return Overlap::NONE;
    }

    let projection = aoi.projection();
    let corners: Vec<[f64; 2]> = footprint
        .ring()
        .iter()
        .map(|&c| projection.project(c))
        .collect();
    let swath = convex_hull(&corners);
    if swath.len() < 3 {
        return Overlap::NONE;
    }

    let intersection = clip_convex(aoi.polygon(), &swath);
    let fraction_pct = round2(100.0 * area(&intersection) / aoi.area_m2());

    Overlap {
        matches: fraction_pct >= threshold_pct,
        fraction_pct,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
