//! SLSTR archive layout
//!
//! Sentinel-3 SLSTR level-1 swaths arrive as a single container per
//! acquisition, so the family has no companion and per-pixel coordinates
//! live alongside the brightness-temperature channels.

use super::{Carrier, VariableRole, VariableSpec};

/// Level-1 radiances-and-BT product per carrier
pub fn product(carrier: Carrier) -> &'static str {
    match carrier {
        Carrier::S3b => "S3B_SL_1_RBT",
        _ => "S3A_SL_1_RBT",
    }
}

/// Variables read from each SLSTR swath: nadir-view coordinates plus the
/// thermal-infrared channels
pub const VARIABLES: &[VariableSpec] = &[
    VariableSpec {
        name: "latitude",
        dataset: "latitude_in",
        file_index: 0,
        band: None,
        role: VariableRole::Latitude,
    },
    VariableSpec {
        name: "longitude",
        dataset: "longitude_in",
        file_index: 0,
        band: None,
        role: VariableRole::Longitude,
    },
    VariableSpec {
        name: "bt_s7",
        dataset: "S7_BT_in",
        file_index: 0,
        band: None,
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "bt_s8",
        dataset: "S8_BT_in",
        file_index: 0,
        band: None,
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "bt_s9",
        dataset: "S9_BT_in",
        file_index: 0,
        band: None,
        role: VariableRole::Data,
    },
];
