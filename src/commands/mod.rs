//! Command-line interface and orchestration for packagist-survey
//!
//! This module implements the CLI commands and wires the other modules together
//! into the end-to-end survey pipeline. It handles argument parsing,
//! configuration management, logging setup, and progress reporting.
//!
//! # Implementation Model
//!
//! The module is organized around two commands:
//!
//! - **run**: Fetch the registry listing, process packages through the
//!   resolve → clone → analyze → record → cleanup pipeline, and write the
//!   metrics report
//! - **init**: Generate a default configuration file
//!
//! The `run` function parses command-line arguments using clap and routes to
//! the appropriate command handler. Configuration is managed through a TOML
//! file (`survey.toml`) whose values individual command-line flags override.

mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod run;
mod survey;

pub use common::{ColorMode, LogLevel};
pub use config::Config;
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use survey::{SurveyArgs, process_survey};
