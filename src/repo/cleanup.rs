use std::fs;
use std::path::Path;
use walkdir::WalkDir;

const LOG_TARGET: &str = "   cleanup";

/// Recursively delete `local_path`: files first, then the emptied directories
/// bottom-up, then the root itself.
///
/// A missing path is a no-op. Individual deletion failures are logged at warn
/// level and skipped; a half-deleted tree is picked up again by the next
/// run's pre-existing-path check.
pub fn remove_tree(local_path: &Path) {
    if !local_path.exists() {
        return;
    }

    log::debug!(target: LOG_TARGET, "Removing '{}'", local_path.display());

    for entry in WalkDir::new(local_path).contents_first(true).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not walk '{}': {e}", local_path.display());
                continue;
            }
        };

        let removed = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path())
        };

        if let Err(e) = removed {
            log::warn!(target: LOG_TARGET, "Could not remove '{}': {e}", entry.path().display());
        }
    }
}
