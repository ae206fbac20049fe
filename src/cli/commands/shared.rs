//! Shared components for CLI commands

use colored::Colorize;
use indicatif::HumanDuration;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;

use crate::app::adapters::filesystem;
use crate::app::services::retrieval::RetrievalStats;
use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::constants::log_file_name;
use crate::{Error, Result};

/// Counters reported at the end of a run, across both pipelines
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Days crawled for the listing
    pub days: usize,
    /// Rows in the aggregate listing (one per swath/AOI pair)
    pub listing_rows: usize,
    /// Physical swaths after deduplication
    pub swaths_total: usize,
    /// Swaths skipped as already completed
    pub swaths_skipped: usize,
    /// Swaths fully processed this run
    pub swaths_processed: usize,
    /// Swaths abandoned after recoverable failures
    pub swaths_failed: usize,
    /// Files fetched from the archive
    pub files_downloaded: usize,
    /// Output containers written
    pub outputs_written: usize,
    /// Wall-clock run time
    pub elapsed: std::time::Duration,
}

impl RunStats {
    /// Fold one retrieval run's counters into the run totals
    pub fn absorb(&mut self, retrieval: &RetrievalStats) {
        self.swaths_total += retrieval.swaths_total;
        self.swaths_skipped += retrieval.swaths_skipped;
        self.swaths_processed += retrieval.swaths_processed;
        self.swaths_failed += retrieval.swaths_failed;
        self.files_downloaded += retrieval.files_downloaded;
        self.outputs_written += retrieval.outputs_written;
    }
}

/// Set up structured logging: stderr always, plus an optional per-run log
/// file under the output log directory.
///
/// The returned guard must stay alive for the duration of the run; dropping
/// it flushes and closes the file writer.
pub fn setup_logging(args: &RunArgs, config: &Config) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swath_retriever={log_level}")));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_timer(fmt::time::uptime())
        .with_writer(std::io::stderr);

    if !args.log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        debug!("logging initialized at level: {log_level}");
        return Ok(None);
    }

    let log_dir = config.log_dir();
    filesystem::ensure_dir(&log_dir)?;
    let path = log_dir.join(log_file_name(
        config.carrier.as_str(),
        config.sensor.as_str(),
        config.hemisphere.as_str(),
        &config.version,
        &config.start_tag(),
        &config.stop_tag(),
    ));
    let file = std::fs::File::create(&path)
        .map_err(|e| Error::io(format!("failed to create log file {}", path.display()), e))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    debug!("logging initialized at level {log_level}, file {}", path.display());
    Ok(Some(guard))
}

/// Print the end-of-run summary
pub fn print_summary(config: &Config, stats: &RunStats) {
    println!();
    println!("{}", "Run complete".green().bold());
    println!(
        "   target: {} on {} v{}, {} AOI(s), {} .. {}",
        config.sensor, config.carrier, config.version,
        config.aois.len(),
        config.start, config.stop
    );
    println!("   days crawled:      {}", stats.days);
    println!("   listing rows:      {}", stats.listing_rows);
    if config.apply_retrieval {
        println!("   swaths:            {}", stats.swaths_total);
        println!("   already complete:  {}", stats.swaths_skipped);
        println!("   processed:         {}", stats.swaths_processed);
        if stats.swaths_failed > 0 {
            println!(
                "   {}         {}",
                "failed:".yellow(),
                stats.swaths_failed.to_string().yellow()
            );
        }
        println!("   files downloaded:  {}", stats.files_downloaded);
        if stats.outputs_written > 0 {
            println!("   outputs written:   {}", stats.outputs_written);
        }
    }
    println!("   elapsed:           {}", HumanDuration(stats.elapsed));
    println!();
}
