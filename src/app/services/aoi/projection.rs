//! Polar equal-area projection
//!
//! Overlap fractions and nearest-neighbor distances are both computed in a
//! hemisphere-specific Lambert azimuthal equal-area plane centered on the
//! pole. Working in one projected plane per run sidesteps antimeridian
//! wrap-around entirely: polar AOIs that straddle the dateline project to
//! ordinary contiguous polygons.
//!
//! Spherical polar-aspect form, on the authalic sphere. Equal-area means
//! polygon areas measured with the shoelace formula in this plane are true
//! surface areas, which is what the coverage fraction needs.

use crate::app::models::{Hemisphere, LonLat};
use crate::constants::EARTH_AUTHALIC_RADIUS_M;

/// Lambert azimuthal equal-area projection centered on one pole
#[derive(Debug, Clone, Copy)]
pub struct PolarProjection {
    hemisphere: Hemisphere,
    radius_m: f64,
}

impl PolarProjection {
    pub fn new(hemisphere: Hemisphere) -> Self {
        Self {
            hemisphere,
            radius_m: EARTH_AUTHALIC_RADIUS_M,
        }
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Project a coordinate to plane meters, x east and y toward the
    /// Greenwich meridian from the pole
    pub fn project(&self, point: LonLat) -> [f64; 2] {
        let lon = point.lon.to_radians();
        let lat = point.lat.to_radians();
        let half = std::f64::consts::FRAC_PI_4 - lat / 2.0;
        match self.hemisphere {
            Hemisphere::North => {
                let rho = 2.0 * self.radius_m * half.sin();
                [rho * lon.sin(), -rho * lon.cos()]
            }
            Hemisphere::South => {
                let rho = 2.0 * self.radius_m * half.cos();
                [rho * lon.sin(), rho * lon.cos()]
            }
        }
    }

    /// Inverse projection, plane meters back to degrees. The pole itself
    /// maps to longitude 0.
    pub fn inverse(&self, point: [f64; 2]) -> LonLat {
        let [x, y] = point;
        let rho = (x * x + y * y).sqrt();
        let ratio = (rho / (2.0 * self.radius_m)).clamp(0.0, 1.0);
        // Forward uses half = pi/4 - lat/2, so lat = pi/2 - 2 * half
        let (half, lon) = match self.hemisphere {
            Hemisphere::North => (
                ratio.asin(),
                if rho == 0.0 { 0.0 } else { x.atan2(-y) },
            ),
            Hemisphere::South => (
                ratio.acos(),
                if rho == 0.0 { 0.0 } else { x.atan2(y) },
            ),
        };
        let lat = std::f64::consts::FRAC_PI_2 - 2.0 * half;
        LonLat::new(lon.to_degrees(), lat.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = EARTH_AUTHALIC_RADIUS_M;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} vs {b}");
    }

    #[test]
    fn test_pole_maps_to_origin() {
        let south = PolarProjection::new(Hemisphere::South);
        let [x, y] = south.project(LonLat::new(45.0, -90.0));
        assert_close(x, 0.0, 1e-6);
        assert_close(y, 0.0, 1e-6);

        let north = PolarProjection::new(Hemisphere::North);
        let [x, y] = north.project(LonLat::new(-120.0, 90.0));
        assert_close(x, 0.0, 1e-6);
        assert_close(y, 0.0, 1e-6);
    }

    #[test]
    fn test_equator_radius() {
        // At the equator rho = R * sqrt(2) for either aspect
        let south = PolarProjection::new(Hemisphere::South);
        let [x, y] = south.project(LonLat::new(0.0, 0.0));
        let rho = (x * x + y * y).sqrt();
        assert_close(rho, R * std::f64::consts::SQRT_2, 1.0);
        assert_close(x, 0.0, 1e-6);
        assert!(y > 0.0);
    }

    #[test]
    fn test_antimeridian_is_continuous() {
        // Points just either side of the dateline land next to each other
        let south = PolarProjection::new(Hemisphere::South);
        let a = south.project(LonLat::new(179.9, -75.0));
        let b = south.project(LonLat::new(-179.9, -75.0));
        let dist = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        assert!(dist < 10_000.0, "dateline neighbours {dist} m apart");
    }

    #[test]
    fn test_inverse_round_trips() {
        for hemisphere in [Hemisphere::South, Hemisphere::North] {
            let proj = PolarProjection::new(hemisphere);
            let sign = match hemisphere {
                Hemisphere::South => -1.0,
                Hemisphere::North => 1.0,
            };
            for &(lon, lat) in &[(0.0, 75.0), (-40.0, 77.5), (135.0, 66.0), (-179.5, 80.0)] {
                let original = LonLat::new(lon, sign * lat);
                let back = proj.inverse(proj.project(original));
                assert_close(back.lon, original.lon, 1e-9);
                assert_close(back.lat, original.lat, 1e-9);
            }
        }
    }

    #[test]
    fn test_inverse_of_origin_is_the_pole() {
        let south = PolarProjection::new(Hemisphere::South);
        let pole = south.inverse([0.0, 0.0]);
        assert_close(pole.lat, -90.0, 1e-9);
        assert_close(pole.lon, 0.0, 1e-9);
    }

    #[test]
    fn test_distance_scale_near_pole() {
        // The radial equal-area scale compresses the 1-degree meridian step
        // from -80 to -81 to 2R(sin 5 - sin 4.5), a few hundred meters short
        // of the ~111.2 km spherical arc (angles in degrees of half-colatitude)
        let south = PolarProjection::new(Hemisphere::South);
        let a = south.project(LonLat::new(0.0, -80.0));
        let b = south.project(LonLat::new(0.0, -81.0));
        let dist = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
        let expected = 2.0 * R * (5f64.to_radians().sin() - 4.5f64.to_radians().sin());
        assert_close(dist, expected, 1e-6);
        assert_close(dist, 111_195.0, 500.0);
    }
}
