//! Listing compilation pipeline
//!
//! For every day of the run: fetch the archive's metadata manifest, test
//! each swath footprint against every registered AOI, join companion files
//! for multi-part sensors, and persist the result as one CSV. Days advance
//! through a fixed sequence of states; a day whose CSV already exists is
//! restored without touching the network, which makes a multi-day run
//! restartable from any point.

pub mod companion;
pub mod manifest;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::app::adapters::archive::ArchiveClient;
use crate::app::adapters::filesystem;
use crate::app::models::ListingEntry;
use crate::app::services::aoi::overlap::check_overlap;
use crate::app::services::aoi::AoiRegistry;
use crate::app::services::error_budget::ErrorBudget;
use crate::app::services::sensors::SensorProfile;
use crate::config::Config;
use crate::constants::listing_file_name;
use crate::{Error, Result};

/// Progress of one (sensor, day) unit through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Pending,
    MetaFetched,
    Filtered,
    CompanionFetched,
    Joined,
    Persisted,
    /// Short-circuit: the day's CSV existed and was restored
    AlreadyPersisted,
    /// The day failed and was charged to the error budget
    Abandoned,
}

/// Everything one day's crawl needs, computed up front. Threading this
/// value through the calls keeps per-day state out of the pipeline struct.
#[derive(Debug, Clone)]
pub struct DayContext {
    pub date: NaiveDate,
    pub meta_url: String,
    pub companion_url: Option<String>,
    pub listing_file: PathBuf,
}

impl DayContext {
    fn new(profile: &SensorProfile, listing_dir: &std::path::Path, date: NaiveDate) -> Self {
        let file = listing_file_name(
            profile.carrier().as_str(),
            profile.sensor().as_str(),
            &date.format("%Y").to_string(),
            &date.format("%j").to_string(),
        );
        Self {
            date,
            meta_url: profile.meta_url(date),
            companion_url: profile.companion_dir_url(date),
            listing_file: listing_dir.join(file),
        }
    }
}

/// Compiles the aggregate listing for one run
pub struct ListingPipeline<'a> {
    profile: &'a SensorProfile,
    registry: &'a AoiRegistry,
    client: &'a dyn ArchiveClient,
    threshold_pct: f64,
    listing_dir: PathBuf,
}

impl<'a> ListingPipeline<'a> {
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
            threshold_pct: config.overlap_threshold_pct,
            listing_dir: config.listing_dir(),
        }
    }

    /// Crawl all days in order and return the aggregate listing.
    ///
    /// Per-day failures are charged to the error budget and the run moves
    /// on; only a spent budget ends it. An aggregate with zero rows is
    /// fatal by policy.
    pub async fn compile(
        &self,
        days: &[NaiveDate],
        budget: &mut ErrorBudget,
    ) -> Result<Vec<ListingEntry>> {
        filesystem::ensure_dir(&self.listing_dir)?;

        let mut aggregate = Vec::new();
        for &date in days {
            let ctx = DayContext::new(self.profile, &self.listing_dir, date);
            let (state, mut entries) = self.compile_day(&ctx, budget).await?;
            info!(
                "{}: {:?}, {} matched row(s)",
                ctx.date,
                state,
                entries.len()
            );
            aggregate.append(&mut entries);
        }

        if aggregate.is_empty() {
            return Err(Error::EmptyListing);
        }
        Ok(aggregate)
    }

    /// Run one day through the state machine
    async fn compile_day(
        &self,
        ctx: &DayContext,
        budget: &mut ErrorBudget,
    ) -> Result<(DayState, Vec<ListingEntry>)> {
        let mut state = DayState::Pending;

        if ctx.listing_file.exists() {
            advance(&mut state, DayState::AlreadyPersisted, ctx);
            return Ok((state, store::load(&ctx.listing_file)?));
        }

        let body = match self.client.fetch_text(&ctx.meta_url).await {
            Ok(body) => body,
            Err(e) => return self.abandon_day(state, ctx, budget, e),
        };
        budget.record_success();
        advance(&mut state, DayState::MetaFetched, ctx);

        let records = match manifest::parse(&body, &ctx.meta_url) {
            Ok(records) => records,
            Err(e) => return self.abandon_day(state, ctx, budget, e),
        };

        let mut entries = Vec::new();
        for record in &records {
            for aoi in self.registry.iter() {
                let overlap = check_overlap(aoi, &record.footprint, self.threshold_pct);
                if overlap.matches {
                    entries.push(ListingEntry {
                        primary_url: self.profile.primary_url(&record.file_name, ctx.date),
                        primary_file: record.file_name.clone(),
                        companion_url: None,
                        companion_file: None,
                        aoi: aoi.id().to_string(),
                        fraction: overlap.fraction_pct,
                    });
                }
            }
        }
        advance(&mut state, DayState::Filtered, ctx);
        debug!(
            "{}: {} of {} swaths matched",
            ctx.date,
            entries.len(),
            records.len()
        );

        if let Some(companion_url) = &ctx.companion_url {
            if !entries.is_empty() {
                let page = match self.client.fetch_text(companion_url).await {
                    Ok(page) => page,
                    Err(e) => return self.abandon_day(state, ctx, budget, e),
                };
                budget.record_success();
                advance(&mut state, DayState::CompanionFetched, ctx);

                let files = companion::extract_links(&page);
                entries = companion::join(entries, &files, self.profile, companion_url);
                advance(&mut state, DayState::Joined, ctx);
            }
        }

        store::save(&ctx.listing_file, &entries)?;
        advance(&mut state, DayState::Persisted, ctx);
        Ok((state, entries))
    }

    /// Charge one failed day to the budget and move on without entries.
    /// Propagates only the budget-spent error.
    fn abandon_day(
        &self,
        mut state: DayState,
        ctx: &DayContext,
        budget: &mut ErrorBudget,
        error: Error,
    ) -> Result<(DayState, Vec<ListingEntry>)> {
        warn!("{}: abandoning day: {error}", ctx.date);
        budget.record_failure(&format!("listing failed for {}", ctx.date))?;
        advance(&mut state, DayState::Abandoned, ctx);
        Ok((state, Vec::new()))
    }
}

fn advance(state: &mut DayState, to: DayState, ctx: &DayContext) {
    debug!("{}: {:?} -> {:?}", ctx.date, state, to);
    *state = to;
}
