//! System completeness: modules, utilities, firmware, image size, toolchain.

use pv_core::CheckResult;
use tracing::warn;

use crate::artifacts::SDCARD_IMAGE;
use crate::command::CommandProbe;
use crate::paths::BuildPaths;
use crate::probe::{self, Presence};

/// Smallest acceptable image, in GiB (inclusive).
pub const IMAGE_SIZE_GIB_MIN: f64 = 1.5;
/// Largest acceptable image, in GiB (inclusive).
pub const IMAGE_SIZE_GIB_MAX: f64 = 4.0;

/// Utilities expected in `usr/bin`.
pub const UTILITIES: [&str; 3] = ["htop", "nano", "file"];
/// How many of [`UTILITIES`] must be present.
pub const UTILITIES_FOUND_MIN: usize = 2;

/// Raspberry Pi 4 firmware files expected in `images/rpi-firmware`.
pub const FIRMWARE_FILES: [&str; 2] = ["start4.elf", "fixup4.dat"];

/// Cross compiler, relative to the host directory.
pub const CROSS_COMPILER: &str = "bin/aarch64-buildroot-linux-gnu-gcc";

const IMAGE_SIZE: &str = "Image Size";

/// `lib/modules` has at least one entry. Never fails: modules may be built in.
pub fn kernel_modules(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "Kernel Modules";
    let dir = paths.target().join("lib/modules");

    match probe::stat(&dir) {
        Presence::Absent => return CheckResult::warn(NAME, "Cannot verify modules"),
        Presence::Inaccessible(e) => {
            return CheckResult::warn(NAME, "Cannot verify modules")
                .with_detail(format!("{}: {}", dir.display(), e));
        }
        Presence::Present(_) => {}
    }

    match probe::has_entries(&dir) {
        Ok(true) => CheckResult::pass(NAME, "Found modules directory"),
        Ok(false) => CheckResult::warn(NAME, "Modules directory empty"),
        Err(e) => CheckResult::warn(NAME, "Cannot verify modules")
            .with_detail(format!("{}: {}", dir.display(), e)),
    }
}

/// At least two of htop, nano and file.
pub fn utilities(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "System Utilities";
    let bin = paths.target().join("usr/bin");
    let candidates: Vec<_> = UTILITIES.iter().map(|u| bin.join(u)).collect();
    let tally = probe::tally(&candidates);

    let counted = format!("{}/{}", tally.found_count(), UTILITIES.len());
    if tally.found_count() >= UTILITIES_FOUND_MIN {
        CheckResult::pass(NAME, format!("Found {} tools", counted))
    } else {
        CheckResult::warn(NAME, format!("Only {} tools found", counted))
            .with_detail(tally.error_detail())
    }
}

/// Firmware blobs for the BCM2711 boot loader.
///
/// FAILs when the firmware directory is missing, WARNs when only some blobs are.
pub fn firmware(paths: &BuildPaths) -> CheckResult {
    const NAME: &str = "RPi Firmware";
    let dir = paths.images().join("rpi-firmware");

    match probe::stat(&dir) {
        Presence::Absent => {
            return CheckResult::fail(NAME, "Firmware directory not found")
                .with_detail(format!("Expected at {}", dir.display()));
        }
        Presence::Inaccessible(e) => {
            return CheckResult::warn(NAME, "Cannot access firmware directory")
                .with_detail(format!("{}: {}", dir.display(), e));
        }
        Presence::Present(_) => {}
    }

    let candidates: Vec<_> = FIRMWARE_FILES.iter().map(|f| dir.join(f)).collect();
    let tally = probe::tally(&candidates);

    if tally.found_count() == FIRMWARE_FILES.len() {
        CheckResult::pass(NAME, "All firmware files present")
    } else {
        CheckResult::warn(
            NAME,
            format!("Found {}/{} files", tally.found_count(), FIRMWARE_FILES.len()),
        )
        .with_detail(tally.error_detail())
    }
}

/// Classify an image size against the accepted range.
pub fn classify_image_size(bytes: u64) -> CheckResult {
    let size_gib = probe::size_gib(bytes);

    if size_gib < IMAGE_SIZE_GIB_MIN {
        CheckResult::warn(IMAGE_SIZE, format!("Smaller than expected ({:.2} GB)", size_gib))
    } else if size_gib > IMAGE_SIZE_GIB_MAX {
        CheckResult::warn(IMAGE_SIZE, format!("Larger than expected ({:.2} GB)", size_gib))
    } else {
        CheckResult::pass(IMAGE_SIZE, format!("Size OK ({:.2} GB)", size_gib))
    }
}

/// `sdcard.img` falls within the expected size range.
///
/// A missing image still yields a result (a warning) so every run records
/// every check; the absence itself is reported as a failure by "Image File".
pub fn image_size(paths: &BuildPaths) -> CheckResult {
    let path = paths.images().join(SDCARD_IMAGE);

    match probe::stat(&path) {
        Presence::Present(meta) => classify_image_size(meta.len()),
        Presence::Absent => CheckResult::warn(IMAGE_SIZE, "Cannot validate size")
            .with_detail(format!("{} not found at {}", SDCARD_IMAGE, path.display())),
        Presence::Inaccessible(e) => CheckResult::warn(IMAGE_SIZE, "Cannot validate size")
            .with_detail(format!("{}: {}", path.display(), e)),
    }
}

/// Cross compiler exists and, when command probes are enabled, runs.
pub fn toolchain(paths: &BuildPaths, commands: Option<&CommandProbe>) -> CheckResult {
    const NAME: &str = "Toolchain";
    let gcc = paths.host().join(CROSS_COMPILER);

    match probe::stat(&gcc) {
        Presence::Absent => return CheckResult::warn(NAME, "Cross-compiler not found"),
        Presence::Inaccessible(e) => {
            return CheckResult::warn(NAME, "Cross-compiler not found")
                .with_detail(format!("{}: {}", gcc.display(), e));
        }
        Presence::Present(_) => {}
    }

    let Some(commands) = commands else {
        return CheckResult::pass(NAME, "Cross-compiler present");
    };

    let outcome = commands.run(&gcc, &["--version"]);
    if outcome.succeeded() {
        CheckResult::pass(NAME, "Cross-compiler present").with_detail(outcome.describe())
    } else {
        warn!(
            compiler = %gcc.display(),
            outcome = %outcome.describe(),
            "cross-compiler not runnable"
        );
        CheckResult::warn(NAME, "Cross-compiler present but not runnable")
            .with_detail(outcome.describe())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};
    use std::path::Path;
    use std::time::Duration;

    use pv_core::Status;

    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_image_size_bounds_inclusive() {
        assert_eq!(classify_image_size(3 * GIB / 2).status, Status::Pass);
        assert_eq!(classify_image_size(4 * GIB).status, Status::Pass);
        assert_eq!(classify_image_size(5 * GIB / 2).message, "Size OK (2.50 GB)");
    }

    #[test]
    fn test_image_size_just_outside_bounds() {
        let below = classify_image_size((1.49999 * GIB as f64) as u64);
        assert_eq!(below.status, Status::Warn);
        assert!(below.message.starts_with("Smaller than expected"));

        let above = classify_image_size((4.00001 * GIB as f64) as u64);
        assert_eq!(above.status, Status::Warn);
        assert!(above.message.starts_with("Larger than expected"));
    }

    #[test]
    fn test_image_size_missing_still_reports() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        let result = image_size(&paths);
        assert_eq!(result.name, "Image Size");
        assert_eq!(result.status, Status::Warn);
        assert_eq!(result.message, "Cannot validate size");
    }

    #[test]
    fn test_image_size_reads_sparse_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        fs::create_dir_all(paths.images()).unwrap();
        let image = File::create(paths.images().join(SDCARD_IMAGE)).unwrap();
        image.set_len(GIB).unwrap();

        assert_eq!(image_size(&paths).message, "Smaller than expected (1.00 GB)");
    }

    #[test]
    fn test_kernel_modules_never_fail() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        let modules = paths.target().join("lib/modules");

        assert_eq!(kernel_modules(&paths).message, "Cannot verify modules");

        fs::create_dir_all(&modules).unwrap();
        assert_eq!(kernel_modules(&paths).message, "Modules directory empty");
        assert_eq!(kernel_modules(&paths).status, Status::Warn);

        fs::create_dir(modules.join("6.1.61-v8")).unwrap();
        assert_eq!(kernel_modules(&paths).status, Status::Pass);
    }

    #[test]
    fn test_utilities_need_two_of_three() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        touch(&paths.target().join("usr/bin/htop"));

        let result = utilities(&paths);
        assert_eq!(result.status, Status::Warn);
        assert_eq!(result.message, "Only 1/3 tools found");

        touch(&paths.target().join("usr/bin/file"));
        let result = utilities(&paths);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.message, "Found 2/3 tools");
    }

    #[test]
    fn test_firmware_policy() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        assert_eq!(firmware(&paths).status, Status::Fail);

        touch(&paths.images().join("rpi-firmware/start4.elf"));
        let partial = firmware(&paths);
        assert_eq!(partial.status, Status::Warn);
        assert_eq!(partial.message, "Found 1/2 files");

        touch(&paths.images().join("rpi-firmware/fixup4.dat"));
        assert_eq!(firmware(&paths).status, Status::Pass);
    }

    #[test]
    fn test_toolchain_without_probe() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        assert_eq!(toolchain(&paths, None).status, Status::Warn);

        touch(&paths.host().join(CROSS_COMPILER));
        assert_eq!(toolchain(&paths, None).status, Status::Pass);
    }

    #[cfg(unix)]
    fn install_script(path: &Path, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_toolchain_probe_runs_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        install_script(
            &paths.host().join(CROSS_COMPILER),
            "echo 'aarch64-buildroot-linux-gnu-gcc (Buildroot) 12.3.0'",
        );

        let probe = CommandProbe::new(Duration::from_secs(5)).unwrap();
        let result = toolchain(&paths, Some(&probe));
        assert_eq!(result.status, Status::Pass);
        assert_eq!(
            result.detail.as_deref(),
            Some("aarch64-buildroot-linux-gnu-gcc (Buildroot) 12.3.0")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_toolchain_probe_timeout_downgrades() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        install_script(&paths.host().join(CROSS_COMPILER), "exec sleep 10");

        let probe = CommandProbe::new(Duration::from_millis(200)).unwrap();
        let result = toolchain(&paths, Some(&probe));
        assert_eq!(result.status, Status::Warn);
        assert!(result.detail.unwrap().contains("timeout"));
    }
}
