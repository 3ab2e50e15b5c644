//! Zip-backed `.vsdx` container.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{PackageError, PackageResult};

/// File extension of Visio diagram containers.
pub const PACKAGE_EXTENSION: &str = "vsdx";

/// Relative path of the first page descriptor inside a container.
pub const PAGE_DESCRIPTOR: &str = "visio/pages/page1.xml";

/// Relative path of the stencil-master descriptor inside a container.
pub const MASTER_DESCRIPTOR: &str = "visio/masters/masters.xml";

/// An opened diagram container.
pub struct VsdxPackage {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl VsdxPackage {
    /// Open a container, failing if the file is not a valid zip archive.
    pub fn open(path: impl AsRef<Path>) -> PackageResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Opening package {:?}", path);

        let file = File::open(&path).map_err(|e| PackageError::unreadable(&path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| PackageError::unreadable(&path, e))?;

        Ok(Self { path, archive })
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Relative paths of every entry, in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Read an entry's raw bytes.
    pub fn read_entry(&mut self, name: &str) -> PackageResult<Vec<u8>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(PackageError::EntryNotFound {
                    path: self.path.clone(),
                    entry: name.to_string(),
                })
            }
            Err(e) => return Err(PackageError::unreadable(&self.path, e)),
        };

        // The declared size comes from the archive and is not trusted.
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| PackageError::unreadable(&self.path, e))?;
        Ok(bytes)
    }

    /// Read an entry as UTF-8 text.
    pub fn read_text(&mut self, name: &str) -> PackageResult<String> {
        let bytes = self.read_entry(name)?;
        String::from_utf8(bytes).map_err(|e| {
            PackageError::unreadable(&self.path, format!("entry {} is not UTF-8: {}", name, e))
        })
    }

    /// Extract every entry under `root`, creating it if absent.
    ///
    /// Existing files at colliding paths are overwritten. Extraction is not
    /// transactional: a failure part way leaves the entries written so far.
    pub fn extract_to(&mut self, root: impl AsRef<Path>) -> PackageResult<usize> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| PackageError::path(root, e))?;

        let mut written = 0;
        for index in 0..self.archive.len() {
            let mut entry = self
                .archive
                .by_index(index)
                .map_err(|e| PackageError::unreadable(&self.path, e))?;

            let relative = entry.enclosed_name().ok_or_else(|| {
                PackageError::unreadable(
                    &self.path,
                    format!("entry {} escapes the extraction root", entry.name()),
                )
            })?;
            let target = root.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| PackageError::path(&target, e))?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| PackageError::path(parent, e))?;
            }

            let mut file = File::create(&target).map_err(|e| PackageError::path(&target, e))?;
            io::copy(&mut entry, &mut file).map_err(|e| PackageError::unreadable(&self.path, e))?;

            debug!("Extracted {:?}", target);
            written += 1;
        }

        info!("Extracted {} entries from {:?} to {:?}", written, self.path, root);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_package(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_read_entries() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("diagram.vsdx");
        write_package(&path, &[(PAGE_DESCRIPTOR, "<PageContents/>"), ("docProps/app.xml", "<x/>")]);

        let mut package = VsdxPackage::open(&path).unwrap();
        assert_eq!(package.entry_names().len(), 2);
        assert_eq!(package.read_text(PAGE_DESCRIPTOR).unwrap(), "<PageContents/>");
    }

    #[test]
    fn test_missing_entry() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("diagram.vsdx");
        write_package(&path, &[(PAGE_DESCRIPTOR, "<PageContents/>")]);

        let mut package = VsdxPackage::open(&path).unwrap();
        let err = package.read_entry(MASTER_DESCRIPTOR).unwrap_err();
        assert!(matches!(err, PackageError::EntryNotFound { .. }));
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("not-a-package.vsdx");
        fs::write(&path, "plain text").unwrap();

        let err = VsdxPackage::open(&path).err().unwrap();
        assert!(matches!(err, PackageError::Unreadable { .. }));
    }

    #[test]
    fn test_open_missing_file_is_unreadable() {
        let temp = tempdir().unwrap();
        let err = VsdxPackage::open(temp.path().join("absent.vsdx")).err().unwrap();
        assert!(matches!(err, PackageError::Unreadable { .. }));
    }
}
