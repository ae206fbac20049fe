//! Resampling correctness tests on a small synthetic AOI grid

use ndarray::Array2;

use super::{ResampleGroup, Resampler};
use crate::app::models::Hemisphere;
use crate::app::services::aoi::{AreaOfInterest, GridDefinition};

/// Small Antarctic box with a 4x4 output grid; cells are a few kilometers
/// across, comfortably larger than the 5 km radius test setups need
static TEST_GRID: GridDefinition = GridDefinition {
    id: "testbox",
    hemisphere: Hemisphere::South,
    extent: [-41.0, -77.2, -40.0, -77.0],
    rows: 4,
    cols: 4,
};

fn test_aoi() -> AreaOfInterest {
    AreaOfInterest::compile(&TEST_GRID).unwrap()
}

/// Swath coordinates placed exactly at the AOI's cell centers, with an
/// optional longitude offset to push the swath out of range
fn swath_at_cell_centers(aoi: &AreaOfInterest, lon_offset: f64) -> (Array2<f64>, Array2<f64>) {
    let mut lon = Array2::zeros((4, 4));
    let mut lat = Array2::zeros((4, 4));
    for row in 0..4 {
        for col in 0..4 {
            let geo = aoi.projection().inverse(aoi.cell_center(row, col));
            lon[[row, col]] = geo.lon + lon_offset;
            lat[[row, col]] = geo.lat;
        }
    }
    (lon, lat)
}

fn counting_variable(base: f64) -> Array2<f64> {
    Array2::from_shape_fn((4, 4), |(r, c)| base + (r * 4 + c) as f64)
}

#[test]
fn test_one_pixel_per_cell_reproduces_every_value() {
    let aoi = test_aoi();
    let (lon, lat) = swath_at_cell_centers(&aoi, 0.0);
    let a = counting_variable(0.0);
    let b = counting_variable(100.0);
    let group = ResampleGroup::new(lon, lat, vec![
        ("a".to_string(), a.clone()),
        ("b".to_string(), b.clone()),
    ])
    .unwrap();

    let out = Resampler::new(5000.0, 2).resample(&group, &aoi).unwrap();

    assert_eq!(out.names, vec!["a", "b"]);
    assert_eq!(out.data.dim(), (2, 4, 4));
    assert_eq!(out.valid_cells(), 16);
    for row in 0..4 {
        for col in 0..4 {
            assert_eq!(out.data[[0, row, col]], a[[row, col]]);
            assert_eq!(out.data[[1, row, col]], b[[row, col]]);
        }
    }
}

#[test]
fn test_zero_values_survive_resampling() {
    // Variable "a" holds 0.0 at cell (0, 0); zero is data, not a marker
    let aoi = test_aoi();
    let (lon, lat) = swath_at_cell_centers(&aoi, 0.0);
    let group =
        ResampleGroup::new(lon, lat, vec![("a".to_string(), counting_variable(0.0))]).unwrap();

    let out = Resampler::new(5000.0, 1).resample(&group, &aoi).unwrap();
    assert_eq!(out.data[[0, 0, 0]], 0.0);
    assert!(out.valid[[0, 0]]);
}

#[test]
fn test_out_of_radius_cells_are_no_data() {
    // Five degrees of longitude is tens of kilometers at -77; every cell
    // is beyond the radius of influence
    let aoi = test_aoi();
    let (lon, lat) = swath_at_cell_centers(&aoi, 5.0);
    let group =
        ResampleGroup::new(lon, lat, vec![("a".to_string(), counting_variable(0.0))]).unwrap();

    let out = Resampler::new(5000.0, 1).resample(&group, &aoi).unwrap();
    assert_eq!(out.valid_cells(), 0);
    assert!(out.data.iter().all(|v| v.is_nan()));
}

#[test]
fn test_non_finite_coordinate_pixels_are_skipped() {
    let aoi = test_aoi();
    let (mut lon, lat) = swath_at_cell_centers(&aoi, 0.0);
    lon[[0, 0]] = f64::NAN;
    let group =
        ResampleGroup::new(lon, lat, vec![("a".to_string(), counting_variable(0.0))]).unwrap();

    let out = Resampler::new(5000.0, 1).resample(&group, &aoi).unwrap();
    // The cell whose only nearby pixel was dropped comes back no-data
    assert!(!out.valid[[0, 0]]);
    assert_eq!(out.valid_cells(), 15);
}

#[test]
fn test_all_nan_coordinates_is_an_error() {
    let aoi = test_aoi();
    let lon = Array2::from_elem((4, 4), f64::NAN);
    let lat = Array2::from_elem((4, 4), f64::NAN);
    let group =
        ResampleGroup::new(lon, lat, vec![("a".to_string(), counting_variable(0.0))]).unwrap();

    assert!(Resampler::new(5000.0, 1).resample(&group, &aoi).is_err());
}

#[test]
fn test_group_rejects_empty_coordinates() {
    let lon = Array2::<f64>::zeros((0, 0));
    let lat = Array2::<f64>::zeros((0, 0));
    assert!(ResampleGroup::new(lon, lat, vec![("a".to_string(), Array2::zeros((0, 0)))]).is_err());
}

#[test]
fn test_group_rejects_shape_mismatch() {
    let lon = Array2::<f64>::zeros((4, 4));
    let lat = Array2::<f64>::zeros((4, 4));
    let wrong = Array2::<f64>::zeros((4, 3));
    assert!(ResampleGroup::new(lon, lat, vec![("a".to_string(), wrong)]).is_err());
}

#[test]
fn test_group_rejects_no_variables() {
    let lon = Array2::<f64>::zeros((4, 4));
    let lat = Array2::<f64>::zeros((4, 4));
    assert!(ResampleGroup::new(lon, lat, vec![]).is_err());
}
