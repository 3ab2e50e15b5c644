//! Selection of the newest container in an upload directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{PackageError, PackageResult};
use crate::package::PACKAGE_EXTENSION;

/// Outcome of scanning an upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSelection {
    /// Most recently modified container
    pub latest: PathBuf,
    /// Every other container, newest first
    pub older: Vec<PathBuf>,
}

/// Find the most recently modified `.vsdx` file directly inside `dir`.
///
/// The directory is created if it does not exist yet. Returns `None` when no
/// container has been uploaded.
pub fn latest_package(dir: impl AsRef<Path>) -> PackageResult<Option<PackageSelection>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| PackageError::path(dir, e))?;

    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().map_or(true, |ext| ext != PACKAGE_EXTENSION)
        {
            continue;
        }

        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((modified, path.to_path_buf()));
    }

    if candidates.is_empty() {
        debug!("No packages in {:?}", dir);
        return Ok(None);
    }

    // Newest first; equal timestamps fall back to name order.
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let mut paths = candidates.into_iter().map(|(_, path)| path);
    let latest = paths.next().ok_or_else(|| PackageError::NoPackage(dir.to_path_buf()))?;
    let older: Vec<PathBuf> = paths.collect();

    info!("Selected package {:?} ({} older)", latest, older.len());
    Ok(Some(PackageSelection { latest, older }))
}

/// Delete superseded containers. Failures are logged and skipped.
pub fn prune(older: &[PathBuf]) -> usize {
    let mut removed = 0;
    for path in older {
        match fs::remove_file(path) {
            Ok(()) => {
                info!("Deleted old package {:?}", path);
                removed += 1;
            }
            Err(e) => warn!("Failed to delete {:?}: {}", path, e),
        }
    }
    removed
}

/// Record which container was selected, overwriting the record file.
pub fn record_selection(record: impl AsRef<Path>, selected: &Path) -> PackageResult<()> {
    let record = record.as_ref();
    if let Some(parent) = record.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PackageError::path(parent, e))?;
    }
    fs::write(record, selected.to_string_lossy().as_bytes())
        .map_err(|e| PackageError::path(record, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::tempdir;

    fn touch(path: &Path, age_secs: u64) {
        let file = File::create(path).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn test_creates_missing_dir() {
        let temp = tempdir().unwrap();
        let uploads = temp.path().join("uploads");

        assert!(latest_package(&uploads).unwrap().is_none());
        assert!(uploads.is_dir());
    }

    #[test]
    fn test_picks_newest_and_ignores_other_files() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("old.vsdx"), 300);
        touch(&temp.path().join("new.vsdx"), 10);
        touch(&temp.path().join("older.vsdx"), 600);
        touch(&temp.path().join("notes.txt"), 0);

        let selection = latest_package(temp.path()).unwrap().unwrap();
        assert_eq!(selection.latest, temp.path().join("new.vsdx"));
        assert_eq!(
            selection.older,
            vec![temp.path().join("old.vsdx"), temp.path().join("older.vsdx")]
        );
    }

    #[test]
    fn test_prune_and_record() {
        let temp = tempdir().unwrap();
        let stale = temp.path().join("stale.vsdx");
        touch(&stale, 60);

        let missing = temp.path().join("missing.vsdx");
        assert_eq!(prune(&[stale.clone(), missing]), 1);
        assert!(!stale.exists());

        let record = temp.path().join("vsdx_path.txt");
        record_selection(&record, Path::new("/uploads/net.vsdx")).unwrap();
        assert_eq!(fs::read_to_string(&record).unwrap(), "/uploads/net.vsdx");
    }
}
