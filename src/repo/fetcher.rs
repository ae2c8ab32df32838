use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::path::Path;
use tokio::process::Command;

const LOG_TARGET: &str = "   fetcher";

/// Shallow-clone a repository into `local_path`.
///
/// A pre-existing path is treated as an already-usable checkout and reported
/// as success without touching the network. Returns whether a checkout is
/// available at `local_path`; a failed or timed-out clone yields `Ok(false)`
/// with the git output captured at debug level only.
pub async fn clone_repo(repo_url: &str, local_path: &Path, timeout: Duration) -> Result<bool> {
    if local_path.exists() {
        log::debug!(target: LOG_TARGET, "Reusing existing checkout at '{}'", local_path.display());
        return Ok(true);
    }

    let path_str = local_path.to_str().into_app_err("invalid UTF-8 in clone path")?;

    log::info!(target: LOG_TARGET, "Cloning '{repo_url}'");

    let output = match run_git_with_timeout(&["clone", "--depth=1", repo_url, path_str], timeout).await {
        Ok(output) => output,
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Could not clone '{repo_url}': {e:#}");
            return Ok(false);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::debug!(target: LOG_TARGET, "git clone of '{repo_url}' failed: {}", stderr.trim());
        return Ok(false);
    }

    Ok(true)
}

async fn run_git_with_timeout(args: &[&str], timeout: Duration) -> Result<std::process::Output> {
    let child = Command::new("git")
        .args(args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err("could not spawn git command")?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'git {}' failed to run", args.join(" "))),
        Err(_) => {
            bail!("'git {}' timed out after {} seconds", args.join(" "), timeout.as_secs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_path_short_circuits() {
        let tmp = tempfile::tempdir().unwrap();

        // The URL is bogus on purpose: an existing path must succeed without
        // any network or subprocess activity.
        let cloned = clone_repo("https://invalid.example/nowhere.git", tmp.path(), Duration::from_secs(1))
            .await
            .unwrap();

        assert!(cloned);
        assert!(tmp.path().exists());
    }

    #[tokio::test]
    async fn test_existing_file_counts_as_checkout() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stale");
        std::fs::write(&path, b"leftover").unwrap();

        let cloned = clone_repo("https://invalid.example/nowhere.git", &path, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(cloned);
    }
}
