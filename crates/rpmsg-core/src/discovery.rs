//! RPMsg endpoint discovery.
//!
//! When the remote firmware announces an endpoint, the kernel creates a
//! character device named `rpmsgN` under `/dev`.  The kernel also exposes
//! `rpmsg_ctrlN` control devices, which accept ioctls for endpoint creation
//! but are useless for plain read/write — discovery must skip them.
//!
//! The scan is factored over an arbitrary directory so tests can point it at
//! a scratch directory; [`discover`] fixes the directory to [`DEVICE_DIR`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::DeviceError;

/// Directory scanned for RPMsg device nodes.
pub const DEVICE_DIR: &str = "/dev";

/// Name prefix shared by all RPMsg character devices.
pub const DEVICE_PREFIX: &str = "rpmsg";

/// Substring marking a control device (`rpmsg_ctrl0` etc.).
const CONTROL_MARKER: &str = "ctrl";

/// Finds the first usable RPMsg endpoint under [`DEVICE_DIR`].
///
/// # Errors
///
/// - [`DeviceError::NoDevice`] when nothing matches the `rpmsg` prefix.
/// - [`DeviceError::NoEndpoint`] when only control devices are present.
/// - [`DeviceError::Io`] when the directory cannot be read.
pub fn discover() -> Result<PathBuf, DeviceError> {
    find_endpoint(Path::new(DEVICE_DIR))
}

/// Scans `dir` for RPMsg devices and returns the first endpoint in sorted
/// order.  Directory listing order is arbitrary, so candidates are sorted by
/// name to make the choice deterministic across runs.
pub fn find_endpoint(dir: &Path) -> Result<PathBuf, DeviceError> {
    let mut candidates: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(DEVICE_PREFIX))
        .collect();
    candidates.sort();

    debug!(dir = %dir.display(), ?candidates, "scanned for RPMsg devices");

    if candidates.is_empty() {
        return Err(DeviceError::NoDevice {
            dir: dir.to_path_buf(),
        });
    }

    let (controls, endpoints): (Vec<String>, Vec<String>) = candidates
        .into_iter()
        .partition(|name| name.contains(CONTROL_MARKER));

    match endpoints.first() {
        Some(name) => {
            let path = dir.join(name);
            info!(device = %path.display(), "using RPMsg endpoint");
            Ok(path)
        }
        None => Err(DeviceError::NoEndpoint {
            dir: dir.to_path_buf(),
            controls,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("create scratch entry");
    }

    #[test]
    fn test_empty_directory_reports_no_device() {
        let dir = tempdir().expect("tempdir");

        let err = find_endpoint(dir.path()).unwrap_err();

        assert!(matches!(err, DeviceError::NoDevice { .. }));
    }

    #[test]
    fn test_unrelated_entries_report_no_device() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "ttyS0");
        touch(dir.path(), "null");

        let err = find_endpoint(dir.path()).unwrap_err();

        assert!(matches!(err, DeviceError::NoDevice { .. }));
    }

    #[test]
    fn test_control_only_directory_reports_no_endpoint() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "rpmsg_ctrl0");
        touch(dir.path(), "rpmsg_ctrl1");

        let err = find_endpoint(dir.path()).unwrap_err();

        match err {
            DeviceError::NoEndpoint { controls, .. } => {
                assert_eq!(controls, vec!["rpmsg_ctrl0", "rpmsg_ctrl1"]);
            }
            other => panic!("expected NoEndpoint, got {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_among_controls_is_selected() {
        let dir = tempdir().expect("tempdir");
        touch(dir.path(), "rpmsg_ctrl0");
        touch(dir.path(), "rpmsg0");

        let path = find_endpoint(dir.path()).expect("endpoint");

        assert_eq!(path, dir.path().join("rpmsg0"));
    }

    #[test]
    fn test_multiple_endpoints_select_first_in_sorted_order() {
        let dir = tempdir().expect("tempdir");
        // Created out of order on purpose; the scan must sort.
        touch(dir.path(), "rpmsg1");
        touch(dir.path(), "rpmsg0");

        let path = find_endpoint(dir.path()).expect("endpoint");

        assert_eq!(path, dir.path().join("rpmsg0"));
    }
}
