//! The survey pipeline
//!
//! Fans out over registry packages with a bounded worker pool, runs each one
//! through resolve → clone → analyze → record → cleanup, and mirrors the
//! accumulated result set to the report file after every completed package.
//! A package drops out of the pipeline silently at the first step that fails;
//! only the initial listing fetch can fail the whole run.

mod orchestrator;
mod report_sink;

pub use orchestrator::{HarvestOptions, Harvester};
pub use report_sink::ReportSink;
