//! AOI compilation and overlap scenario tests

use crate::app::models::{Hemisphere, LonLat, SwathFootprint};
use crate::app::services::aoi::overlap::check_overlap;
use crate::app::services::aoi::{builtin_grid, builtin_grids, AoiRegistry, AreaOfInterest};

fn compile(id: &str) -> AreaOfInterest {
    AreaOfInterest::compile(builtin_grid(id).unwrap()).unwrap()
}

/// Footprint from (lon, lat) extent corners, in manifest field order
fn box_footprint(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> SwathFootprint {
    SwathFootprint::new([
        LonLat::new(lon_min, lat_min),
        LonLat::new(lon_max, lat_min),
        LonLat::new(lon_max, lat_max),
        LonLat::new(lon_min, lat_max),
    ])
}

#[test]
fn test_builtin_catalog_is_complete_and_unique() {
    let grids = builtin_grids();
    assert_eq!(grids.len(), 24);
    let mut ids: Vec<&str> = grids.iter().map(|g| g.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 24);
    assert!(grids.iter().all(|g| g.hemisphere == Hemisphere::South));
}

#[test]
fn test_every_builtin_compiles() {
    let ids: Vec<String> = builtin_grids().iter().map(|g| g.id.to_string()).collect();
    let registry = AoiRegistry::compile(&ids).unwrap();
    assert_eq!(registry.len(), 24);
    assert!(registry.iter().all(|a| a.area_m2() > 0.0));
}

#[test]
fn test_registry_rejects_unknown_id() {
    assert!(AoiRegistry::compile(&["atlantis".to_string()]).is_err());
}

#[test]
fn test_compiled_boundary_is_densified_and_projected() {
    let aoi = compile("berkner");
    let ring = aoi.polygon();
    assert_eq!(ring.len(), 4 * super::DENSIFY_POINTS_PER_EDGE);
    // Every vertex landed in the projected plane as finite meters
    assert!(ring.iter().all(|p| p[0].is_finite() && p[1].is_finite()));
}

#[test]
fn test_berkner_area_matches_spherical_expectation() {
    // Spherical zone area: R^2 * dlon * (sin(lat_max) - sin(lat_min))
    let aoi = compile("berkner");
    let r = crate::constants::EARTH_AUTHALIC_RADIUS_M;
    let dlon = 20f64.to_radians();
    let expected = r * r * dlon * ((-75f64).to_radians().sin() - (-78.5f64).to_radians().sin());
    let ratio = aoi.area_m2() / expected;
    assert!((0.99..1.01).contains(&ratio), "area ratio {ratio}");
}

#[test]
fn test_swath_covering_whole_aoi_scores_full_fraction() {
    let aoi = compile("berkner");
    let swath = box_footprint(-52.0, -79.0, -28.0, -74.5);
    let overlap = check_overlap(&aoi, &swath, 5.0);
    assert!(overlap.matches);
    assert_eq!(overlap.fraction_pct, 100.0);
}

#[test]
fn test_half_covering_swath_scores_partial_fraction() {
    // Covers longitudes -52..-40 of the -50..-30 extent
    let aoi = compile("berkner");
    let swath = box_footprint(-52.0, -79.0, -40.0, -74.5);
    let overlap = check_overlap(&aoi, &swath, 5.0);
    assert!(overlap.matches);
    assert!(
        (35.0..65.0).contains(&overlap.fraction_pct),
        "fraction {}",
        overlap.fraction_pct
    );
}

#[test]
fn test_equatorial_swath_is_gated_out() {
    let aoi = compile("berkner");
    let swath = box_footprint(-2.0, -2.0, 2.0, 2.0);
    let overlap = check_overlap(&aoi, &swath, 5.0);
    assert!(!overlap.matches);
    assert_eq!(overlap.fraction_pct, 0.0);
}

#[test]
fn test_disjoint_southern_swath_scores_zero() {
    // South enough to pass the latitude gate, far from Berkner in longitude
    let aoi = compile("berkner");
    let swath = box_footprint(100.0, -79.0, 120.0, -74.0);
    let overlap = check_overlap(&aoi, &swath, 5.0);
    assert!(!overlap.matches);
    assert_eq!(overlap.fraction_pct, 0.0);
}

#[test]
fn test_dateline_straddling_aoi_accepts_crossing_swath() {
    // ross-west ends at the antimeridian; a swath crossing it still overlaps
    let aoi = compile("ross-west");
    let swath = SwathFootprint::new([
        LonLat::new(170.0, -78.0),
        LonLat::new(-175.0, -78.0),
        LonLat::new(-175.0, -73.0),
        LonLat::new(170.0, -73.0),
    ]);
    let overlap = check_overlap(&aoi, &swath, 5.0);
    assert!(overlap.matches, "fraction {}", overlap.fraction_pct);
    assert!(overlap.fraction_pct > 20.0);
}

#[test]
fn test_grid_cell_centers_span_projected_bounds() {
    let aoi = compile("berkner");
    let [xmin, ymin, xmax, ymax] = aoi.projected_bounds();
    let grid = aoi.grid();

    let first = aoi.cell_center(0, 0);
    let last = aoi.cell_center(grid.rows - 1, grid.cols - 1);
    for center in [first, last] {
        assert!((xmin..=xmax).contains(&center[0]));
        assert!((ymin..=ymax).contains(&center[1]));
    }

    // Column index increases eastward, row index increases southward
    assert!(aoi.cell_center(0, 1)[0] > first[0]);
    assert!(aoi.cell_center(1, 0)[1] < first[1]);
}
