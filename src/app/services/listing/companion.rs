//! Companion file discovery and family join
//!
//! Multi-part sensors split one swath across a primary (geolocation) file
//! and a companion (channel data) file served from a separate product
//! directory. The directory is an HTML page whose anchors carry the file
//! names; matched primary rows are left-joined onto those names by the
//! shared swath identifier.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::app::models::ListingEntry;
use crate::app::services::sensors::SensorProfile;

/// Extract swath file names from the anchors of a directory page.
/// Matches the archive's `href="/archive/allData/..."` download links and
/// keeps the final path component.
pub fn extract_links(html: &str) -> Vec<String> {
    // Unwrap is safe: pattern is a compile-time constant
    let anchor = Regex::new(r#"<a[^>]+href="(?:[^"]*/)?([^"/]+\.(?:hdf|nc|zip))""#).unwrap();
    anchor
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// Left-join companion file names onto matched primary rows by swath
/// identifier. Primary rows with no companion are dropped: an incomplete
/// family cannot be processed, and retrying next run costs one manifest
/// fetch. Joined-row count therefore equals the count of primary rows with
/// a companion match.
pub fn join(
    entries: Vec<ListingEntry>,
    companion_files: &[String],
    profile: &SensorProfile,
    companion_dir_url: &str,
) -> Vec<ListingEntry> {
    let mut by_tag: HashMap<String, &String> = HashMap::new();
    for file in companion_files {
        match profile.swath_tag(file) {
            Ok(tag) => {
                by_tag.entry(tag).or_insert(file);
            }
            Err(_) => warn!("ignoring unrecognized companion file name: {file}"),
        }
    }

    let before = entries.len();
    let joined: Vec<ListingEntry> = entries
        .into_iter()
        .filter_map(|mut entry| {
            let tag = profile.swath_tag(&entry.primary_file).ok()?;
            match by_tag.get(&tag) {
                Some(file) => {
                    entry.companion_file = Some((*file).clone());
                    entry.companion_url = Some(format!("{companion_dir_url}/{file}"));
                    Some(entry)
                }
                None => {
                    debug!("dropping {}: no companion for {tag}", entry.primary_file);
                    None
                }
            }
        })
        .collect();

    if joined.len() < before {
        warn!(
            "companion join dropped {} of {before} matched rows",
            before - joined.len()
        );
    }
    joined
}
