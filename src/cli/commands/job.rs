//! Run command: compile the listing, then retrieve the matching swaths

use std::time::Instant;

use tracing::{debug, info};

use super::shared::{self, RunStats};
use crate::app::adapters::archive::HttpArchiveClient;
use crate::app::adapters::filesystem;
use crate::app::services::aoi::AoiRegistry;
use crate::app::services::error_budget::ErrorBudget;
use crate::app::services::listing::ListingPipeline;
use crate::app::services::retrieval::RetrievalPipeline;
use crate::app::services::sensors::SensorProfile;
use crate::cli::args::RunArgs;
use crate::Result;

/// Run command entry point.
///
/// Stage order is fixed: validate, compile the aggregate listing, then
/// (unless `--listing-only`) retrieve the matched swath families. Both
/// stages share one error budget, so failure streaks carry across the
/// listing/retrieval boundary.
pub async fn run_job(args: RunArgs) -> Result<RunStats> {
    let started = Instant::now();

    let config = args.to_config()?;
    let _log_guard = shared::setup_logging(&args, &config)?;

    info!(
        "starting run: {} on {} v{}, {} AOI(s), {} .. {}",
        config.sensor, config.carrier, config.version,
        config.aois.len(),
        config.start, config.stop
    );
    debug!("configuration: {config:?}");

    filesystem::ensure_dir(&config.output_dir)?;

    let profile = SensorProfile::new(config.sensor, config.carrier, &config.version)?;
    let registry = AoiRegistry::compile(&config.aois)?;
    let client = HttpArchiveClient::new(&config.token)?;
    let mut budget = ErrorBudget::new(config.critical_failure_count);

    let days = config.days();
    let listing = ListingPipeline::new(&profile, &registry, &client, &config);
    let entries = listing.compile(&days, &mut budget).await?;
    info!("aggregate listing: {} row(s) over {} day(s)", entries.len(), days.len());

    let mut stats = RunStats {
        days: days.len(),
        listing_rows: entries.len(),
        ..Default::default()
    };

    if config.apply_retrieval {
        let retrieval = RetrievalPipeline::new(&profile, &registry, &client, &config)
            .with_progress(args.show_progress());
        let retrieval_stats = retrieval.download_only(&entries, &mut budget).await?;
        stats.absorb(&retrieval_stats);
    } else {
        info!("listing-only run, stopping before retrieval");
    }

    stats.elapsed = started.elapsed();
    if !args.quiet {
        shared::print_summary(&config, &stats);
    }
    Ok(stats)
}
