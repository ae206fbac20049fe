//! OLCI archive layout
//!
//! Sentinel-3 OLCI full-resolution level-1 swaths are single-container
//! families, same shape as SLSTR but with top-of-atmosphere radiances.

use super::{Carrier, VariableRole, VariableSpec};

/// Level-1 full-resolution radiance product per carrier
pub fn product(carrier: Carrier) -> &'static str {
    match carrier {
        Carrier::S3b => "S3B_OL_1_EFR",
        _ => "S3A_OL_1_EFR",
    }
}

/// Variables read from each OLCI swath: per-pixel coordinates plus a
/// red/NIR radiance pair
pub const VARIABLES: &[VariableSpec] = &[
    VariableSpec {
        name: "latitude",
        dataset: "latitude",
        file_index: 0,
        band: None,
        role: VariableRole::Latitude,
    },
    VariableSpec {
        name: "longitude",
        dataset: "longitude",
        file_index: 0,
        band: None,
        role: VariableRole::Longitude,
    },
    VariableSpec {
        name: "radiance_oa08",
        dataset: "Oa08_radiance",
        file_index: 0,
        band: None,
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "radiance_oa17",
        dataset: "Oa17_radiance",
        file_index: 0,
        band: None,
        role: VariableRole::Data,
    },
];
