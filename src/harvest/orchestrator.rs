use super::ReportSink;
use crate::Result;
use crate::commands::ProgressReporter;
use crate::metrics;
use crate::registry::{PackageName, RegistryClient};
use crate::repo;
use core::time::Duration;
use futures_util::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::spawn_blocking;

const LOG_TARGET: &str = "   harvest";

/// Tuning knobs for a survey run.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Directory receiving one clone per in-flight package
    pub clone_dir: PathBuf,

    /// Report file rewritten after every recorded package
    pub output_path: PathBuf,

    /// Prefix of the registry listing to process
    pub package_limit: usize,

    /// Worker-pool size
    pub workers: usize,

    /// External analysis command
    pub metrics_command: String,

    /// Timeout for one clone
    pub clone_timeout: Duration,

    /// Timeout for one analyzer invocation
    pub analyze_timeout: Duration,

    /// Skip post-analysis cleanup of clones
    pub keep_repos: bool,
}

/// Outcome of one package's trip through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackageOutcome {
    /// Metrics recorded and persisted
    Recorded,

    /// The registry declares no repository for the package
    NoRepository,

    /// The clone failed or timed out
    CloneFailed,

    /// The analyzer failed, timed out, or produced no usable report
    AnalysisFailed,
}

/// Drives the survey pipeline across packages.
///
/// The orchestrator is the only caller of the registry client, the fetcher,
/// the metrics runner, and cleanup; those components never call each other.
#[derive(Debug)]
pub struct Harvester {
    client: RegistryClient,
    sink: Arc<ReportSink>,
    options: Arc<HarvestOptions>,
    progress: ProgressReporter,
}

impl Harvester {
    #[must_use]
    pub fn new(client: RegistryClient, options: HarvestOptions, progress: ProgressReporter) -> Self {
        Self {
            client,
            sink: Arc::new(ReportSink::new(options.output_path.clone())),
            options: Arc::new(options),
            progress,
        }
    }

    /// Run the pipeline to completion, returning the number of packages recorded.
    ///
    /// Only the listing fetch can fail the run; every per-package failure is
    /// absorbed and the package is simply missing from the result set.
    pub async fn run(&self) -> Result<usize> {
        let mut packages = self.client.list_packages().await?;
        packages.truncate(self.options.package_limit);

        log::info!(target: LOG_TARGET, "Surveying {} packages with {} workers", packages.len(), self.options.workers);

        self.progress.begin("Surveying", packages.len() as u64);

        let semaphore = Arc::new(Semaphore::new(self.options.workers));
        let tasks: Vec<_> = packages
            .into_iter()
            .map(|package| {
                let semaphore = Arc::clone(&semaphore);
                let client = self.client.clone();
                let sink = Arc::clone(&self.sink);
                let options = Arc::clone(&self.options);
                let progress = self.progress.clone();

                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.expect("semaphore closed");

                    match process_package(&client, &sink, &options, &package).await {
                        Ok(outcome) => log::debug!(target: LOG_TARGET, "{package} finished: {outcome:?}"),
                        Err(e) => log::warn!(target: LOG_TARGET, "Could not process {package}: {e:#}"),
                    }

                    progress.set_message(package.to_string());
                    progress.inc();
                })
            })
            .collect();

        for task in join_all(tasks).await {
            task.expect("task must not panic");
        }

        self.progress.finish_and_clear();

        log::info!(target: LOG_TARGET, "Recorded metrics for {} packages", self.sink.len());

        Ok(self.sink.len())
    }
}

/// Run one package through resolve → clone → analyze → record → cleanup.
async fn process_package(
    client: &RegistryClient,
    sink: &ReportSink,
    options: &HarvestOptions,
    package: &PackageName,
) -> Result<PackageOutcome> {
    let Some(repo_url) = client.resolve_repository(package).await? else {
        log::debug!(target: LOG_TARGET, "Skipping {package}: no repository declared");
        return Ok(PackageOutcome::NoRepository);
    };

    let local_path = options.clone_dir.join(package.dir_name());

    // A failed clone leaves nothing behind, so there is nothing to clean up
    if !repo::clone_repo(&repo_url, &local_path, options.clone_timeout).await? {
        log::debug!(target: LOG_TARGET, "Skipping {package}: clone failed");
        return Ok(PackageOutcome::CloneFailed);
    }

    let record = metrics::analyze(&options.metrics_command, &local_path, options.analyze_timeout).await;

    let outcome = match record {
        Some(record) => {
            sink.record(package.to_string(), record)?;
            PackageOutcome::Recorded
        }
        None => {
            log::debug!(target: LOG_TARGET, "Skipping {package}: analyzer produced no usable report");
            PackageOutcome::AnalysisFailed
        }
    };

    // Cleanup runs whether or not the analyzer produced a record
    if !options.keep_repos {
        spawn_blocking(move || repo::remove_tree(&local_path)).await.expect("task must not panic");
    }

    Ok(outcome)
}
