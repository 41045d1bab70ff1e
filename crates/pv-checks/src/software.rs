//! Packages staged into the target root filesystem.

use pv_core::CheckResult;
use tracing::debug;

use crate::paths::BuildPaths;
use crate::probe::{self, Presence};

/// OpenCV libraries searched for under `usr/lib`.
pub const OPENCV_LIBRARIES: [&str; 2] = ["libopencv_core.so", "libopencv_imgproc.so"];

/// Python interpreter and stdlib: at least one of two.
pub fn python3(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "Python3";
    let target = paths.target();
    let tally = probe::tally(&[
        target.join("usr/bin/python3"),
        target.join("usr/lib/python3.11"),
    ]);

    if tally.found_count() >= 1 {
        CheckResult::pass(
            NAME,
            format!("Found {}/{} components", tally.found_count(), tally.probed),
        )
    } else if tally.has_errors() {
        CheckResult::warn(NAME, "Cannot verify Python3").with_detail(tally.error_detail())
    } else {
        CheckResult::fail(NAME, "Python3 not found in rootfs")
    }
}

/// OpenCV core libraries, searched recursively.
///
/// Never fails: stripped or split builds may legitimately lack them.
pub fn opencv(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "OpenCV4";
    let lib_dir = paths.target().join("usr/lib");

    match probe::matching_prefixes(&lib_dir, &OPENCV_LIBRARIES) {
        Ok(found) if !found.is_empty() => {
            CheckResult::pass(NAME, format!("Found {} core libraries", found.len()))
                .with_detail(found.join(", "))
        }
        Ok(_) => CheckResult::warn(NAME, "OpenCV libraries not confirmed"),
        Err(e) => {
            debug!(dir = %lib_dir.display(), error = %e, "library directory not accessible");
            CheckResult::warn(NAME, "Cannot verify (lib dir not accessible)")
                .with_detail(format!("{}: {}", lib_dir.display(), e))
        }
    }
}

/// Dropbear binary or its init script.
pub fn ssh_server(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "SSH Server";
    let target = paths.target();
    let tally = probe::tally(&[
        target.join("usr/sbin/dropbear"),
        target.join("etc/init.d/S50dropbear"),
    ]);

    if tally.found_count() >= 1 {
        CheckResult::pass(
            NAME,
            format!("Dropbear found ({}/{} files)", tally.found_count(), tally.probed),
        )
    } else if tally.has_errors() {
        CheckResult::warn(NAME, "Cannot verify Dropbear").with_detail(tally.error_detail())
    } else {
        CheckResult::fail(NAME, "Dropbear not found")
    }
}

/// `i2cdetect` from i2c-tools. Advisory.
pub fn i2c_tools(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "I2C Tools";
    let path = paths.target().join("usr/sbin/i2cdetect");

    match probe::stat(&path) {
        Presence::Present(_) => CheckResult::pass(NAME, "i2cdetect found"),
        Presence::Absent => CheckResult::warn(NAME, "i2c-tools not confirmed"),
        Presence::Inaccessible(e) => CheckResult::warn(NAME, "i2c-tools not confirmed")
            .with_detail(format!("{}: {}", path.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use pv_core::Status;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_python_needs_one_component() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        assert_eq!(python3(&paths).status, Status::Fail);

        fs::create_dir_all(paths.target().join("usr/lib/python3.11")).unwrap();
        let result = python3(&paths);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.message, "Found 1/2 components");
    }

    #[test]
    fn test_opencv_inaccessible_dir_warns() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        let result = opencv(&paths);
        assert_eq!(result.status, Status::Warn);
        assert_eq!(result.message, "Cannot verify (lib dir not accessible)");
    }

    #[test]
    fn test_opencv_versioned_library_matches() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        touch(&paths.target().join("usr/lib/libopencv_core.so.4.8.0"));
        touch(&paths.target().join("usr/lib/libopencv_imgproc.so.408"));

        let result = opencv(&paths);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.message, "Found 2 core libraries");
    }

    #[test]
    fn test_opencv_unrelated_libraries_warn() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        touch(&paths.target().join("usr/lib/libc.so.6"));

        let result = opencv(&paths);
        assert_eq!(result.status, Status::Warn);
        assert_eq!(result.message, "OpenCV libraries not confirmed");
    }

    #[test]
    fn test_ssh_init_script_alone_passes() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        assert_eq!(ssh_server(&paths).status, Status::Fail);

        touch(&paths.target().join("etc/init.d/S50dropbear"));
        let result = ssh_server(&paths);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.message, "Dropbear found (1/2 files)");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_candidates_downgrade_to_warning() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        let target = paths.target();
        fs::create_dir_all(target.join("usr/bin")).unwrap();
        fs::create_dir_all(target.join("usr/sbin")).unwrap();
        symlink(target.join("usr/bin/python3.11"), target.join("usr/bin/python3")).unwrap();
        symlink(target.join("usr/sbin/dropbearmulti"), target.join("usr/sbin/dropbear")).unwrap();

        let python = python3(&paths);
        assert_eq!(python.status, Status::Warn);
        assert_eq!(python.message, "Cannot verify Python3");
        assert!(python.detail.unwrap().contains("dangling symlink"));

        let ssh = ssh_server(&paths);
        assert_eq!(ssh.status, Status::Warn);
        assert_eq!(ssh.message, "Cannot verify Dropbear");
        assert!(ssh.detail.unwrap().contains("dangling symlink"));
    }

    #[test]
    fn test_missing_i2c_tools_is_advisory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        assert_eq!(i2c_tools(&paths).status, Status::Warn);

        touch(&paths.target().join("usr/sbin/i2cdetect"));
        assert_eq!(i2c_tools(&paths).status, Status::Pass);
    }
}
