//! Paths derived from the build root.

use std::path::{Path, PathBuf};

/// Board overlay directory, relative to the build root.
pub const BOARD_OVERLAY_DIR: &str = "board/raspberrypi/overlay";

/// Fixed layout of a Buildroot output tree.
///
/// Construction only joins paths; whether anything exists is left to the
/// individual checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    root: PathBuf,
    images: PathBuf,
    target: PathBuf,
    host: PathBuf,
    overlay: PathBuf,
}

impl BuildPaths {
    /// Derive all subpaths from the build root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output = root.join("output");

        Self {
            images: output.join("images"),
            target: output.join("target"),
            host: output.join("host"),
            overlay: root.join(BOARD_OVERLAY_DIR),
            root,
        }
    }

    /// The build root itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/output/images`
    pub fn images(&self) -> &Path {
        &self.images
    }

    /// `<root>/output/target`
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// `<root>/output/host`
    pub fn host(&self) -> &Path {
        &self.host
    }

    /// `<root>/board/raspberrypi/overlay`
    pub fn overlay(&self) -> &Path {
        &self.overlay
    }
}
