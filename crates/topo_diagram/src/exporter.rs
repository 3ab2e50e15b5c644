//! Device name export.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{DiagramError, DiagramResult};
use crate::resolver::DeviceSet;

/// Render names one per line, sorted, each terminated by `\n`.
pub fn render(devices: &DeviceSet) -> String {
    let mut out = String::new();
    for name in devices.sorted() {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Write the rendered names to `path`, replacing any previous file.
pub fn write_names(devices: &DeviceSet, path: impl AsRef<Path>) -> DiagramResult<()> {
    let path = path.as_ref();
    debug!("Writing device names to {:?}", path);

    let write_failure = |source| DiagramError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failure)?;
    }
    fs::write(path, render(devices)).map_err(write_failure)?;

    info!("Device names have been saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render() {
        let devices: DeviceSet = ["Switch3", "PC7", "Router1"].into_iter().collect();
        assert_eq!(render(&devices), "PC7\nRouter1\nSwitch3\n");
        assert_eq!(render(&DeviceSet::new()), "");
    }

    #[test]
    fn test_write_overwrites() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("machine_names.txt");
        fs::write(&path, "Stale1\nStale2\nStale3\n").unwrap();

        let devices: DeviceSet = ["Router1"].into_iter().collect();
        write_names(&devices, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Router1\n");
    }

    #[test]
    fn test_write_failure_names_path() {
        let temp = tempdir().unwrap();
        let err = write_names(&DeviceSet::new(), temp.path()).unwrap_err();
        assert!(matches!(err, DiagramError::WriteFailure { .. }));
        assert!(err.to_string().contains(&temp.path().display().to_string()));
    }
}
