//! Retrieval planning: deduplication, ordering, resume
//!
//! The aggregate listing carries one row per (swath, matched AOI); the
//! retrieval loop wants one task per physical swath with the union of its
//! AOI matches. Tasks are sorted by acquisition timestamp, which makes
//! chronological order an explicit precondition of the resume scan rather
//! than an accident of join ordering.

use std::collections::BTreeMap;
use std::path::Path;

use crate::app::adapters::filesystem;
use crate::app::models::{AoiMatch, ListingEntry, RemoteFile, SwathTask};
use crate::app::services::sensors::SensorProfile;
use crate::constants::output_swath_prefix;
use crate::Result;

/// Deduplicate the aggregate listing into chronologically ordered tasks
pub fn compile_tasks(entries: &[ListingEntry], profile: &SensorProfile) -> Result<Vec<SwathTask>> {
    let mut by_tag: BTreeMap<String, SwathTask> = BTreeMap::new();

    for entry in entries {
        let tag = profile.swath_tag(&entry.primary_file)?;
        if !by_tag.contains_key(&tag) {
            let timestamp = profile.tag_timestamp(&tag)?;
            let mut files = vec![RemoteFile {
                url: entry.primary_url.clone(),
                file_name: entry.primary_file.clone(),
            }];
            if let (Some(url), Some(file)) = (&entry.companion_url, &entry.companion_file) {
                files.push(RemoteFile {
                    url: url.clone(),
                    file_name: file.clone(),
                });
            }
            by_tag.insert(
                tag.clone(),
                SwathTask {
                    tag: tag.clone(),
                    timestamp,
                    files,
                    aois: Vec::new(),
                },
            );
        }
        if let Some(task) = by_tag.get_mut(&tag) {
            // Union of matched AOIs; duplicate rows keep the larger fraction
            match task.aois.iter_mut().find(|m| m.aoi == entry.aoi) {
                Some(m) => m.fraction = m.fraction.max(entry.fraction),
                None => task.aois.push(AoiMatch {
                    aoi: entry.aoi.clone(),
                    fraction: entry.fraction,
                }),
            }
        }
    }

    let mut tasks: Vec<SwathTask> = by_tag.into_values().collect();
    tasks.sort_by_key(|t| t.timestamp);
    Ok(tasks)
}

/// Output-name prefix shared by every container of one swath
pub fn swath_prefix(task: &SwathTask, profile: &SensorProfile) -> String {
    output_swath_prefix(
        profile.carrier().short_tag(),
        profile.sensor().as_str(),
        &task.timestamp.format("%Y%j").to_string(),
        &task.timestamp.format("%H%M%S").to_string(),
    )
}

/// Index of the first task whose outputs are not all present in
/// `output_dir`.
///
/// Tasks are in chronological order and a single output is never partially
/// present (containers are renamed into place), so every task before the
/// first incomplete one is already done. In resampled mode a swath is
/// complete only when every matched AOI's container exists; a run killed
/// between per-AOI writes resumes at that swath and rewrites it.
pub fn resume_index(
    tasks: &[SwathTask],
    output_dir: &Path,
    profile: &SensorProfile,
    resampled: bool,
) -> Result<usize> {
    let stems = filesystem::file_stems(output_dir)?;
    for (i, task) in tasks.iter().enumerate() {
        let prefix = swath_prefix(task, profile);
        let complete = if resampled {
            task.aois.iter().all(|m| {
                let suffix = format!("_{}", m.aoi);
                stems
                    .iter()
                    .any(|stem| stem.starts_with(&prefix) && stem.ends_with(&suffix))
            })
        } else {
            stems.iter().any(|stem| stem.starts_with(&prefix))
        };
        if !complete {
            return Ok(i);
        }
    }
    Ok(tasks.len())
}
