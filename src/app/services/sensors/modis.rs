//! MODIS archive layout and file-family rules
//!
//! MODIS swaths are split across two products per carrier: a geolocation
//! file (MOD03/MYD03, also the product the metadata manifests index) and a
//! 1 km calibrated-radiance companion (MOD021KM/MYD021KM). Files of the
//! same swath share the `A{yyyyddd}.{hhmm}.{version}` portion of their
//! names.

use chrono::NaiveDateTime;

use super::{Carrier, VariableRole, VariableSpec};
use crate::{Error, Result};

/// Geolocation product per carrier, primary file of the family
pub fn geo_product(carrier: Carrier) -> &'static str {
    match carrier {
        Carrier::Aqua => "MYD03",
        _ => "MOD03",
    }
}

/// Calibrated-radiance companion product per carrier
pub fn channel_product(carrier: Carrier) -> &'static str {
    match carrier {
        Carrier::Aqua => "MYD021KM",
        _ => "MOD021KM",
    }
}

/// Swath identifier: the acquisition-and-version portion of the file name
/// (dot-separated fields 2 through 4, e.g. `A2023001.0815.061`)
pub fn swath_tag(file_name: &str) -> Result<String> {
    let parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() < 4 {
        return Err(Error::manifest_format(
            file_name,
            "file name has fewer than four dot-separated fields",
        ));
    }
    Ok(parts[1..4].join("."))
}

/// Acquisition timestamp of a swath tag (minute resolution)
pub fn tag_timestamp(tag: &str) -> Result<NaiveDateTime> {
    let stamp = tag
        .splitn(3, '.')
        .take(2)
        .collect::<Vec<_>>()
        .join(".");
    NaiveDateTime::parse_from_str(&stamp, "A%Y%j.%H%M").map_err(Error::from)
}

/// Variables read from each MODIS swath: per-pixel coordinates from the
/// geolocation file, selected reflective and emissive bands from the
/// companion
pub const VARIABLES: &[VariableSpec] = &[
    VariableSpec {
        name: "latitude",
        dataset: "Latitude",
        file_index: 0,
        band: None,
        role: VariableRole::Latitude,
    },
    VariableSpec {
        name: "longitude",
        dataset: "Longitude",
        file_index: 0,
        band: None,
        role: VariableRole::Longitude,
    },
    VariableSpec {
        name: "ref_band_01",
        dataset: "EV_250_Aggr1km_RefSB",
        file_index: 1,
        band: Some(0),
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "ref_band_02",
        dataset: "EV_250_Aggr1km_RefSB",
        file_index: 1,
        band: Some(1),
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "ref_band_03",
        dataset: "EV_500_Aggr1km_RefSB",
        file_index: 1,
        band: Some(0),
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "ref_band_04",
        dataset: "EV_500_Aggr1km_RefSB",
        file_index: 1,
        band: Some(1),
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "bt_band_31",
        dataset: "EV_1KM_Emissive",
        file_index: 1,
        band: Some(10),
        role: VariableRole::Data,
    },
    VariableSpec {
        name: "bt_band_32",
        dataset: "EV_1KM_Emissive",
        file_index: 1,
        band: Some(11),
        role: VariableRole::Data,
    },
];
