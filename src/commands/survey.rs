//! The `run` subcommand: wire configuration, registry client, and harvester together.

use super::config::Config;
use super::{ColorMode, LogLevel, ProgressReporter, common};
use crate::harvest::{HarvestOptions, Harvester};
use crate::registry::RegistryClient;
use crate::{Host, Result};
use camino::Utf8PathBuf;
use clap::Args;
use core::time::Duration;
use directories::BaseDirs;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the `run` subcommand. Flags override their configuration-file
/// counterparts; unset flags fall back to `survey.toml` or built-in defaults.
#[derive(Args, Debug)]
pub struct SurveyArgs {
    /// Registry base URL
    #[arg(long, value_name = "URL", env = "PACKAGIST_URL")]
    pub registry_url: Option<String>,

    /// Directory holding local clones and reports
    #[arg(long, value_name = "PATH")]
    pub workdir: Option<Utf8PathBuf>,

    /// Report output file (default is `reports/phpmetrics-summary.json` under the working directory)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Maximum number of packages to process
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Number of concurrent package workers
    #[arg(long, value_name = "COUNT")]
    pub workers: Option<usize>,

    /// Command used to analyze a checkout
    #[arg(long, value_name = "CMD")]
    pub metrics_command: Option<String>,

    /// Path to configuration file (default is `survey.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Keep local clones instead of deleting them after analysis
    #[arg(long)]
    pub keep_repos: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Execute the survey pipeline end to end.
pub async fn process_survey<H: Host>(host: &mut H, args: &SurveyArgs) -> Result<()> {
    common::init_logging(args.log_level);

    let mut config = Config::load(args.config.as_ref())?;

    if let Some(url) = &args.registry_url {
        config.registry_url = url.clone();
    }
    if let Some(limit) = args.limit {
        config.package_limit = limit;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(command) = &args.metrics_command {
        config.metrics_command = command.clone();
    }
    config.validate()?;

    let workdir = resolve_workdir(args.workdir.as_ref())?;
    let clone_dir = workdir.join("repos");
    let report_dir = workdir.join("reports");
    fs::create_dir_all(&clone_dir).into_app_err_with(|| format!("could not create clone directory '{}'", clone_dir.display()))?;
    fs::create_dir_all(&report_dir).into_app_err_with(|| format!("could not create report directory '{}'", report_dir.display()))?;

    let output_path = args
        .output
        .as_ref()
        .map_or_else(|| report_dir.join("phpmetrics-summary.json"), |path| path.as_std_path().to_path_buf());

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).into_app_err_with(|| format!("could not create report directory '{}'", parent.display()))?;
    }

    // With logging active, keep the bar out of the way of log lines
    let delay = if args.log_level == LogLevel::None {
        Duration::from_millis(300)
    } else {
        Duration::from_hours(365 * 24)
    };
    let progress = ProgressReporter::new(delay, args.color.use_colors());

    let client = RegistryClient::new(&config.registry_url, config.request_timeout)?;

    let harvester = Harvester::new(
        client,
        HarvestOptions {
            clone_dir,
            output_path: output_path.clone(),
            package_limit: config.package_limit,
            workers: config.workers,
            metrics_command: config.metrics_command,
            clone_timeout: config.clone_timeout,
            analyze_timeout: config.analyze_timeout,
            keep_repos: args.keep_repos,
        },
        progress,
    );

    let _ = harvester.run().await?;

    let _ = writeln!(host.output(), "Survey complete, report written to '{}'", output_path.display());
    Ok(())
}

/// Pick the working directory: the explicit flag, or the platform cache directory.
fn resolve_workdir(workdir: Option<&Utf8PathBuf>) -> Result<PathBuf> {
    workdir.map_or_else(
        || {
            Ok(BaseDirs::new()
                .into_app_err("could not determine cache directory")?
                .cache_dir()
                .join("packagist-survey"))
        },
        |path| Ok(path.as_std_path().to_path_buf()),
    )
}
