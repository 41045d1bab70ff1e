//! Read-only filesystem probes shared by the checks.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Bytes per mebibyte.
pub const MIB: f64 = 1024.0 * 1024.0;

/// Bytes per gibibyte.
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// What a single `stat` found at a path.
#[derive(Debug)]
pub enum Presence {
    /// The path resolves to something
    Present(Metadata),
    /// Nothing at the path
    Absent,
    /// The path could not be inspected (permissions, dangling symlink, ...)
    Inaccessible(io::Error),
}

/// Stat a path, following symlinks.
///
/// A dangling symlink is reported as inaccessible, not absent.
pub fn stat(path: &Path) -> Presence {
    match fs::metadata(path) {
        Ok(meta) => Presence::Present(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if fs::symlink_metadata(path).is_ok() {
                Presence::Inaccessible(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("dangling symlink at {}", path.display()),
                ))
            } else {
                Presence::Absent
            }
        }
        Err(e) => Presence::Inaccessible(e),
    }
}

/// Size in mebibytes.
pub fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / MIB
}

/// Size in gibibytes.
pub fn size_gib(bytes: u64) -> f64 {
    bytes as f64 / GIB
}

/// Outcome of probing a set of candidate paths.
#[derive(Debug, Default)]
pub struct Tally {
    /// Candidates that exist
    pub found: Vec<PathBuf>,
    /// Candidates that could not be inspected, with the reason
    pub errors: Vec<String>,
    /// Number of candidates probed
    pub probed: usize,
}

impl Tally {
    /// Number of candidates found.
    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    /// Whether any candidate could not be inspected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Access errors joined into one detail line.
    pub fn error_detail(&self) -> String {
        self.errors.join("; ")
    }
}

/// Probe each candidate path once.
pub fn tally<P: AsRef<Path>>(candidates: &[P]) -> Tally {
    let mut tally = Tally {
        probed: candidates.len(),
        ..Tally::default()
    };

    for candidate in candidates {
        let path = candidate.as_ref();
        match stat(path) {
            Presence::Present(_) => tally.found.push(path.to_path_buf()),
            Presence::Absent => {}
            Presence::Inaccessible(e) => {
                debug!(path = %path.display(), error = %e, "candidate not accessible");
                tally.errors.push(format!("{}: {}", path.display(), e));
            }
        }
    }

    tally
}

/// Search `dir` recursively for entries whose file name starts with any of
/// `prefixes`, returning the prefixes that matched at least once.
///
/// Fails only when `dir` itself cannot be listed. Unreadable subdirectories
/// are skipped. Symlinked directories are not followed.
pub fn matching_prefixes<'a>(dir: &Path, prefixes: &[&'a str]) -> io::Result<Vec<&'a str>> {
    let mut matched: Vec<&'a str> = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    let mut is_top = true;

    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) if is_top => return Err(e),
            Err(e) => {
                debug!(dir = %current.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        is_top = false;

        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            for &prefix in prefixes {
                if file_name.starts_with(prefix) && !matched.contains(&prefix) {
                    matched.push(prefix);
                }
            }

            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                pending.push(entry.path());
            }
        }

        if matched.len() == prefixes.len() {
            break;
        }
    }

    // Report in the caller's order, not discovery order.
    matched.sort_by_key(|m| prefixes.iter().position(|p| p == m));
    Ok(matched)
}

/// Whether a directory has at least one entry.
pub fn has_entries(dir: &Path) -> io::Result<bool> {
    let mut entries = fs::read_dir(dir)?;
    Ok(entries.next().is_some())
}

/// Read a file as text, replacing invalid UTF-8.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
