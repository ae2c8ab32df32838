use super::MetricRecord;
use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use std::path::Path;
use tokio::process::Command;

const LOG_TARGET: &str = "   metrics";

/// Run the external analysis command against `project_path` and scrape the
/// metric record out of its report.
///
/// Returns `None` when the tool exits non-zero, times out, or cannot be
/// spawned. Label-level misses do not fail the run; they surface as absent
/// values inside the returned record.
pub async fn analyze(command: &str, project_path: &Path, timeout: Duration) -> Option<MetricRecord> {
    let output = match run_with_timeout(command, project_path, timeout).await {
        Ok(output) => output,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Could not run '{command}' on '{}': {e:#}", project_path.display());
            return None;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::debug!(target: LOG_TARGET, "'{command}' failed on '{}': {}", project_path.display(), stderr.trim());
        return None;
    }

    let report = String::from_utf8_lossy(&output.stdout);
    Some(MetricRecord::from_report(&report))
}

async fn run_with_timeout(command: &str, project_path: &Path, timeout: Duration) -> Result<std::process::Output> {
    let child = Command::new(command)
        .arg(project_path)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err_with(|| format!("could not spawn '{command}'"))?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'{command}' failed to run")),
        Err(_) => Err(app_err!("'{command}' timed out after {} seconds", timeout.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unspawnable_command_yields_none() {
        let tmp = tempfile::tempdir().unwrap();
        let record = analyze("packagist-survey-no-such-tool", tmp.path(), Duration::from_secs(5)).await;
        assert!(record.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_produces_record() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("fake-metrics.sh");
        std::fs::write(&script, "#!/bin/sh\necho 'Lines of code   532'\necho 'Classes   3'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let record = analyze(script.to_str().unwrap(), tmp.path(), Duration::from_secs(5)).await.unwrap();

        assert_eq!(record.get("loc"), Some(Some(532.0)));
        assert_eq!(record.get("classes"), Some(Some(3.0)));
        assert_eq!(record.get("methods"), Some(None));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_yields_none() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("failing-metrics.sh");
        std::fs::write(&script, "#!/bin/sh\necho 'Lines of code   532'\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let record = analyze(script.to_str().unwrap(), tmp.path(), Duration::from_secs(5)).await;

        assert!(record.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_yields_none() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("slow-metrics.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let record = analyze(script.to_str().unwrap(), tmp.path(), Duration::from_millis(100)).await;

        assert!(record.is_none());
    }
}
