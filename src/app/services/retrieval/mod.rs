//! Swath retrieval pipeline
//!
//! Consumes the aggregate listing one physical swath at a time: download
//! the swath's file family (unless cached), extract and calibrate its
//! variables through the reader collaborator, resample onto every matched
//! AOI (or keep raw swath-space arrays), write one output container per
//! (swath, mode) through the writer collaborator, and clean up the
//! downloaded inputs. Each step persists its unit of work before the next
//! begins, so a killed run resumes at the first swath missing any of its
//! outputs.
//!
//! Without codecs the pipeline runs in download-only mode: the file cache
//! is the product and nothing is extracted or written.

pub mod plan;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array2, Axis};
use tracing::{debug, info, warn};

use crate::app::adapters::archive::ArchiveClient;
use crate::app::adapters::filesystem;
use crate::app::adapters::swath_io::{Provenance, RawVariable, SwathReader, SwathWriter};
use crate::app::models::{ListingEntry, SwathTask};
use crate::app::services::aoi::AoiRegistry;
use crate::app::services::error_budget::ErrorBudget;
use crate::app::services::resample::{ResampleGroup, Resampler};
use crate::app::services::sensors::{SensorProfile, VariableRole, VariableSpec};
use crate::config::Config;
use crate::constants::{output_stem, OUTPUT_CONTAINER_EXTENSION, RAW_OUTPUT_EXT, VALID_MASK_NAME};
use crate::{Error, Result};

/// Counters reported at the end of a retrieval run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalStats {
    /// Physical swaths after deduplication
    pub swaths_total: usize,
    /// Swaths skipped because their outputs (or cached files) already exist
    pub swaths_skipped: usize,
    /// Swaths fully processed this run
    pub swaths_processed: usize,
    /// Swaths abandoned after a recoverable failure
    pub swaths_failed: usize,
    /// Output containers written
    pub outputs_written: usize,
    /// Files fetched from the archive
    pub files_downloaded: usize,
}

/// One run's retrieval loop
pub struct RetrievalPipeline<'a> {
    profile: &'a SensorProfile,
    registry: &'a AoiRegistry,
    client: &'a dyn ArchiveClient,
    resampler: Resampler,
    apply_resampling: bool,
    version: String,
    cache_dir: PathBuf,
    output_dir: PathBuf,
    show_progress: bool,
}

impl<'a> RetrievalPipeline<'a> {
    pub fn new(
        profile: &'a SensorProfile,
        registry: &'a AoiRegistry,
        client: &'a dyn ArchiveClient,
        config: &Config,
    ) -> Self {
        Self {
            profile,
            registry,
            client,
            resampler: Resampler::new(config.radius_of_influence_m, config.resample_workers),
            apply_resampling: config.apply_resampling,
            version: config.version.clone(),
            cache_dir: config.swath_cache_dir(),
            output_dir: config.output_dir.clone(),
            show_progress: false,
        }
    }

    /// Show a progress bar over the swath loop
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Download-only mode: fetch every file of every swath into the cache
    /// and stop there. Cached files count as completed work.
    pub async fn download_only(
        &self,
        entries: &[ListingEntry],
        budget: &mut ErrorBudget,
    ) -> Result<RetrievalStats> {
        filesystem::ensure_dir(&self.cache_dir)?;
        let tasks = plan::compile_tasks(entries, self.profile)?;
        let mut stats = RetrievalStats {
            swaths_total: tasks.len(),
            ..Default::default()
        };
        let bar = self.progress_bar(tasks.len());

        for task in &tasks {
            if task.files.iter().all(|f| self.cache_dir.join(&f.file_name).exists()) {
                debug!("{}: already cached", task.tag);
                stats.swaths_skipped += 1;
                bar.inc(1);
                continue;
            }
            match self.fetch_family(task, &mut stats).await {
                Ok(()) => {
                    budget.record_success();
                    stats.swaths_processed += 1;
                }
                Err(e) => {
                    stats.swaths_failed += 1;
                    warn!("{}: download failed: {e}", task.tag);
                    budget.record_failure(&format!("download failed for {}", task.tag))?;
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();
        Ok(stats)
    }

    /// Full mode: download, extract, resample and write through the given
    /// reader/writer collaborators
    pub async fn run(
        &self,
        entries: &[ListingEntry],
        budget: &mut ErrorBudget,
        reader: &dyn SwathReader,
        writer: &mut dyn SwathWriter,
    ) -> Result<RetrievalStats> {
        filesystem::ensure_dir(&self.cache_dir)?;
        filesystem::ensure_dir(&self.output_dir)?;

        let tasks = plan::compile_tasks(entries, self.profile)?;
        let resume =
            plan::resume_index(&tasks, &self.output_dir, self.profile, self.apply_resampling)?;
        if resume > 0 {
            info!("resuming after {resume} completed swath(s)");
        }
        let mut stats = RetrievalStats {
            swaths_total: tasks.len(),
            swaths_skipped: resume,
            ..Default::default()
        };

        let bar = self.progress_bar(tasks.len());
        bar.inc(resume as u64);

        for task in &tasks[resume..] {
            match self.process_swath(task, reader, writer, &mut stats).await {
                Ok(outputs) => {
                    budget.record_success();
                    stats.swaths_processed += 1;
                    stats.outputs_written += outputs;
                    self.cleanup(task);
                }
                Err(e) => {
                    stats.swaths_failed += 1;
                    warn!("{}: swath abandoned: {e}", task.tag);
                    budget.record_failure(&format!("retrieval failed for {}", task.tag))?;
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();
        Ok(stats)
    }

    /// Download every file of one swath that is not already cached
    async fn fetch_family(&self, task: &SwathTask, stats: &mut RetrievalStats) -> Result<()> {
        for file in &task.files {
            let dest = self.cache_dir.join(&file.file_name);
            if dest.exists() {
                debug!("{}: cached", file.file_name);
                continue;
            }
            self.client.download(&file.url, &dest).await?;
            stats.files_downloaded += 1;
        }
        Ok(())
    }

    /// Steps 3-6 for one swath: fetch, extract, resample, write
    async fn process_swath(
        &self,
        task: &SwathTask,
        reader: &dyn SwathReader,
        writer: &mut dyn SwathWriter,
        stats: &mut RetrievalStats,
    ) -> Result<usize> {
        self.fetch_family(task, stats).await?;

        let variables = self.extract_variables(task, reader)?;
        let mut outputs = 0usize;

        if self.apply_resampling {
            let (group, long_names) = build_group(&variables, self.profile.variables())?;
            for matched in &task.aois {
                let Some(aoi) = self.registry.get(&matched.aoi) else {
                    warn!("{}: AOI '{}' not in this run's registry", task.tag, matched.aoi);
                    continue;
                };
                let resampled = self.resampler.resample(&group, aoi)?;
                let path = self.output_path(task, aoi.id());

                let temp = temp_path(&path);
                writer.create(&temp, &Provenance::now())?;
                for (i, name) in resampled.names.iter().enumerate() {
                    writer.write_dataset(
                        &temp,
                        name,
                        &long_names[i],
                        resampled.data.index_axis(Axis(0), i),
                    )?;
                }
                let mask: Array2<f64> =
                    resampled.valid.map(|&v| if v { 1.0 } else { 0.0 });
                writer.write_dataset(&temp, VALID_MASK_NAME, "valid data mask", mask.view())?;
                std::fs::rename(&temp, &path)
                    .map_err(|e| Error::io(format!("failed to finalize {}", path.display()), e))?;

                info!(
                    "{}: wrote {} ({} valid cells, {:.1}% coverage)",
                    task.tag,
                    path.display(),
                    resampled.valid_cells(),
                    matched.fraction
                );
                outputs += 1;
            }
        } else {
            let path = self.output_path(task, RAW_OUTPUT_EXT);
            let temp = temp_path(&path);
            writer.create(&temp, &Provenance::now())?;
            for var in &variables {
                writer.write_dataset(&temp, &var.name, &var.attrs.long_name, var.data.view())?;
            }
            std::fs::rename(&temp, &path)
                .map_err(|e| Error::io(format!("failed to finalize {}", path.display()), e))?;
            info!("{}: wrote {}", task.tag, path.display());
            outputs += 1;
        }

        Ok(outputs)
    }

    /// Read and calibrate every variable of the sensor's manifest
    fn extract_variables(
        &self,
        task: &SwathTask,
        reader: &dyn SwathReader,
    ) -> Result<Vec<RawVariable>> {
        let mut variables = Vec::new();
        for spec in self.profile.variables() {
            let file = task.files.get(spec.file_index).ok_or_else(|| {
                Error::swath_io(format!(
                    "{}: variable '{}' wants file {} but the family has {}",
                    task.tag,
                    spec.name,
                    spec.file_index,
                    task.files.len()
                ))
            })?;
            let path = self.cache_dir.join(&file.file_name);
            let mut variable = reader.read_variable(&path, spec)?;
            variable.calibrate();
            variables.push(variable);
        }
        Ok(variables)
    }

    fn output_path(&self, task: &SwathTask, ext: &str) -> PathBuf {
        let stem = output_stem(
            self.profile.carrier().short_tag(),
            self.profile.sensor().as_str(),
            &task.timestamp.format("%Y%j").to_string(),
            &task.timestamp.format("%H%M%S").to_string(),
            &self.version,
            ext,
        );
        self.output_dir
            .join(format!("{stem}.{OUTPUT_CONTAINER_EXTENSION}"))
    }

    /// Best-effort removal of one swath's cached input files
    fn cleanup(&self, task: &SwathTask) {
        for file in &task.files {
            filesystem::remove_file_best_effort(&self.cache_dir.join(&file.file_name));
        }
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} swaths {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar
    }
}

/// Temp path for an in-progress container. Dot-prefixed so the resume
/// scan never mistakes a leftover for a completed output.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("output");
    path.with_file_name(format!(".{name}.part"))
}

/// Partition extracted variables by manifest role into one resample group
/// plus the long names the output datasets carry
fn build_group(
    variables: &[RawVariable],
    specs: &[VariableSpec],
) -> Result<(ResampleGroup, Vec<String>)> {
    let mut lon = None;
    let mut lat = None;
    let mut data = Vec::new();
    let mut long_names = Vec::new();

    for (var, spec) in variables.iter().zip(specs.iter()) {
        match spec.role {
            VariableRole::Longitude => lon = Some(var.data.clone()),
            VariableRole::Latitude => lat = Some(var.data.clone()),
            VariableRole::Data => {
                data.push((var.name.clone(), var.data.clone()));
                long_names.push(var.attrs.long_name.clone());
            }
        }
    }

    let lon = lon.ok_or_else(|| Error::resample("swath has no longitude variable"))?;
    let lat = lat.ok_or_else(|| Error::resample("swath has no latitude variable"))?;
    let group = ResampleGroup::new(lon, lat, data)?;
    Ok((group, long_names))
}
