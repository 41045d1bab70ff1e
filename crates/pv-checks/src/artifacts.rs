//! Critical boot and image artifacts under `output/images`.
//!
//! All of these FAIL when the artifact is missing.

use std::path::Path;

use pv_core::CheckResult;
use tracing::warn;

use crate::paths::BuildPaths;
use crate::probe::{self, Presence};

/// Final SD card image.
pub const SDCARD_IMAGE: &str = "sdcard.img";
/// Kernel image.
pub const KERNEL_IMAGE: &str = "Image";
/// Device tree blob for the Raspberry Pi 4 B.
pub const DEVICE_TREE_BLOB: &str = "bcm2711-rpi-4-b.dtb";
/// Root filesystem image.
pub const ROOTFS_IMAGE: &str = "rootfs.ext4";
/// Boot partition image.
pub const BOOT_PARTITION: &str = "boot.vfat";

/// What to print for one existence check.
struct Artifact<'a> {
    name: &'static str,
    path: &'a Path,
    found: &'a str,
    missing: &'a str,
    report_size: bool,
}

fn check_artifact(artifact: Artifact<'_>) -> CheckResult {
    match probe::stat(artifact.path) {
        Presence::Present(meta) => {
            let result = CheckResult::pass(artifact.name, artifact.found);
            if artifact.report_size {
                result.with_detail(format!("Size: {:.1} MB", probe::size_mb(meta.len())))
            } else {
                result
            }
        }
        Presence::Absent => CheckResult::fail(artifact.name, artifact.missing)
            .with_detail(format!("Expected at {}", artifact.path.display())),
        Presence::Inaccessible(e) => {
            warn!(check = artifact.name, error = %e, "artifact not accessible");
            CheckResult::warn(artifact.name, "Cannot access artifact")
                .with_detail(format!("{}: {}", artifact.path.display(), e))
        }
    }
}

/// `sdcard.img` exists.
pub fn image_file(paths: &BuildPaths) -> CheckResult {
    let path = paths.images().join(SDCARD_IMAGE);
    let found = format!("Found at {}", path.display());
    check_artifact(Artifact {
        name: "Image File",
        path: &path,
        found: &found,
        missing: "sdcard.img not found",
        report_size: true,
    })
}

/// Kernel `Image` exists.
pub fn kernel_image(paths: &BuildPaths) -> CheckResult {
    check_artifact(Artifact {
        name: "Kernel Image",
        path: &paths.images().join(KERNEL_IMAGE),
        found: "Linux kernel found",
        missing: "Kernel not found",
        report_size: true,
    })
}

/// BCM2711 device tree blob exists.
pub fn device_tree(paths: &BuildPaths) -> CheckResult {
    check_artifact(Artifact {
        name: "Device Tree",
        path: &paths.images().join(DEVICE_TREE_BLOB),
        found: "BCM2711 DTB found",
        missing: "DTB for RPi4 not found",
        report_size: false,
    })
}

/// ext4 root filesystem image exists.
pub fn root_filesystem(paths: &BuildPaths) -> CheckResult {
    check_artifact(Artifact {
        name: "Root Filesystem",
        path: &paths.images().join(ROOTFS_IMAGE),
        found: "ext4 rootfs found",
        missing: "rootfs.ext4 not found",
        report_size: true,
    })
}

/// vfat boot partition image exists.
pub fn boot_partition(paths: &BuildPaths) -> CheckResult {
    check_artifact(Artifact {
        name: "Boot Partition",
        path: &paths.images().join(BOOT_PARTITION),
        found: "boot.vfat created",
        missing: "boot.vfat not found",
        report_size: false,
    })
}
