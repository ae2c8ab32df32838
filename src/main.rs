//! A tool to harvest code-quality metrics across Packagist packages.
//!
//! # Overview
//!
//! `packagist-survey` enumerates packages from the Packagist registry, shallow-clones each
//! package's source repository, runs an external static-analysis tool (PhpMetrics by default)
//! over the checkout, and accumulates the scraped metrics into a single JSON report keyed by
//! package name. Clones are removed as soon as their package has been analyzed, and the report
//! is rewritten after every completed package.
//!
//! # Quick Start
//!
//! Survey the first 100 packages with the default settings:
//!
//! ```bash
//! packagist-survey run
//! ```
//!
//! Tune the sweep:
//!
//! ```bash
//! packagist-survey run --limit 500 --workers 8 --output metrics.json
//! ```
//!
//! Generate a configuration file with all defaults spelled out:
//!
//! ```bash
//! packagist-survey init
//! ```

use packagist_survey::{Host, run};
use std::io::Write;
use std::io::stdout;

/// Default host that runs real OS commands.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }
}

#[tokio::main]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args()).await
}
