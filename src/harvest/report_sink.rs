use crate::Result;
use crate::metrics::MetricRecord;
use ohno::IntoAppError;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Accumulates metric records and mirrors them to the report file.
///
/// The in-memory map and the file rewrite sit behind one mutex, so a
/// record-and-persist step is atomic with respect to other completions.
/// The file is rewritten in full on every insertion; after any write it is
/// a complete, valid JSON report of everything recorded so far.
#[derive(Debug)]
pub struct ReportSink {
    output_path: PathBuf,
    results: Mutex<BTreeMap<String, MetricRecord>>,
}

impl ReportSink {
    #[must_use]
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            results: Mutex::new(BTreeMap::new()),
        }
    }

    /// Insert a record and rewrite the whole report file compactly.
    pub fn record(&self, package: String, record: MetricRecord) -> Result<()> {
        let mut results = self.results.lock().expect("lock poisoned");
        let _ = results.insert(package, record);

        let json = serde_json::to_string(&*results)?;
        fs::write(&self.output_path, json).into_app_err_with(|| format!("writing report to '{}'", self.output_path.display()))
    }

    /// Number of packages recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.lock().expect("lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
