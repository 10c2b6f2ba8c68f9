//! Sweeping a client working directory.
//!
//! A Transmission-style client keeps two directories of per-transfer state
//! under its working directory: `Resume/` with one bencoded `.resume` file
//! per transfer and `Torrents/` with the matching `.torrent` files, both
//! named after the transfer's info hash. [`WorkingDir`] pairs the two up:
//! [`WorkingDir::find_orphans`] lists resume entries whose torrent file has
//! gone missing, and [`WorkingDir::export`] copies or moves the torrent
//! files of selected transfers out under their human-readable names.
//!
//! # Examples
//!
//! ```no_run
//! use trundle::sweep::{ExportOptions, TransferMode, WorkingDir};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = WorkingDir::open("/var/lib/transmission")?;
//!
//! for orphan in dir.find_orphans()? {
//!     println!("{}", orphan.name);
//! }
//!
//! let options = ExportOptions {
//!     group: Some(3),
//!     mode: TransferMode::Copy,
//! };
//! let report = dir.export("/srv/exported", &options)?;
//! println!("Files transferred: {}", report.transferred);
//! # Ok(())
//! # }
//! ```

use crate::resume::Resume;
use crate::torrent::Torrent;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Subdirectory holding per-transfer `.resume` files.
pub const RESUME_DIR: &str = "Resume";

/// Subdirectory holding per-transfer `.torrent` files.
pub const TORRENTS_DIR: &str = "Torrents";

/// Errors that can occur while sweeping a working directory.
#[derive(Debug, Error)]
pub enum SweepError {
    /// A path that must be a directory is missing or not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while scanning or transferring files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// How exported torrent files reach the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Copy the torrent file, leaving the original in place.
    Copy,
    /// Move the torrent file out of the working directory.
    Move,
    /// Report what would be transferred without touching any file.
    #[default]
    Simulate,
}

/// Selection and transfer settings for [`WorkingDir::export`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Only export transfers filed under this group; `None` exports all.
    pub group: Option<i64>,
    /// Transfer mode, [`TransferMode::Simulate`] by default.
    pub mode: TransferMode,
}

/// Outcome counters from one [`WorkingDir::export`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Transfers whose torrent file was (or in simulate mode, would be)
    /// delivered to the destination.
    pub transferred: usize,
    /// Transfers passed over because their files were missing or malformed.
    pub skipped: usize,
}

/// A resume entry whose `.torrent` file is missing from `Torrents/`.
#[derive(Debug, Clone)]
pub struct Orphan {
    /// Transfer name recorded in the resume file.
    pub name: String,
    /// Path of the orphaned resume file.
    pub resume_path: PathBuf,
}

/// An opened client working directory.
#[derive(Debug, Clone)]
pub struct WorkingDir {
    root: PathBuf,
}

impl WorkingDir {
    /// Opens a working directory, verifying the path is a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SweepError> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SweepError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    /// Returns the working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `Resume/` subdirectory path.
    pub fn resume_dir(&self) -> PathBuf {
        self.root.join(RESUME_DIR)
    }

    /// Returns the `Torrents/` subdirectory path.
    pub fn torrents_dir(&self) -> PathBuf {
        self.root.join(TORRENTS_DIR)
    }

    /// Lists resume entries whose matching torrent file is missing.
    ///
    /// Unreadable resume files are logged and left out of the result.
    /// Orphans are returned sorted by name.
    pub fn find_orphans(&self) -> Result<Vec<Orphan>, SweepError> {
        let mut orphans = Vec::new();

        for resume_path in self.resume_entries()? {
            let torrent_path = self.torrent_path_for(&resume_path);
            if torrent_path.is_file() {
                continue;
            }

            debug!("Resume entry without torrent: {}", resume_path.display());

            let resume = match Resume::load(&resume_path) {
                Ok(resume) => resume,
                Err(e) => {
                    warn!(
                        "Skipping unreadable resume file {}: {}",
                        resume_path.display(),
                        e
                    );
                    continue;
                }
            };

            orphans.push(Orphan {
                name: resume.name,
                resume_path,
            });
        }

        orphans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orphans)
    }

    /// Exports the torrent files of selected transfers to `dest`.
    ///
    /// Transfers are selected by the group filter in `options`. Each torrent
    /// file is delivered as `<name>.torrent` using the torrent's own name;
    /// when two transfers share a name, later ones get the info hash appended
    /// to stay unique.
    ///
    /// Malformed entries are logged, counted as skipped, and do not stop the
    /// run. I/O failures while copying or moving abort it.
    pub fn export(
        &self,
        dest: impl AsRef<Path>,
        options: &ExportOptions,
    ) -> Result<ExportReport, SweepError> {
        let dest = dest.as_ref();
        if !dest.is_dir() {
            return Err(SweepError::NotADirectory(dest.to_path_buf()));
        }

        info!(
            "Exporting transfers from {} to {}",
            self.root.display(),
            dest.display()
        );

        let mut report = ExportReport::default();
        let mut used_names: HashSet<String> = HashSet::new();

        for resume_path in self.resume_entries()? {
            let resume = match Resume::load(&resume_path) {
                Ok(resume) => resume,
                Err(e) => {
                    warn!(
                        "Skipping unreadable resume file {}: {}",
                        resume_path.display(),
                        e
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            if let Some(group) = options.group {
                if resume.group != Some(group) {
                    continue;
                }
            }

            let torrent_path = self.torrent_path_for(&resume_path);
            if !torrent_path.is_file() {
                warn!(
                    "Transfer '{}' has no torrent file at {}",
                    resume.name,
                    torrent_path.display()
                );
                report.skipped += 1;
                continue;
            }

            let torrent = match Torrent::load(&torrent_path) {
                Ok(torrent) => torrent,
                Err(e) => {
                    warn!(
                        "Skipping unreadable torrent file {}: {}",
                        torrent_path.display(),
                        e
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            if torrent.name.is_empty() {
                warn!("Torrent file {} has an empty name", torrent_path.display());
                report.skipped += 1;
                continue;
            }

            if !is_safe_name(&torrent.name) {
                warn!(
                    "Torrent file {} has an unsafe name '{}'",
                    torrent_path.display(),
                    torrent.name
                );
                report.skipped += 1;
                continue;
            }

            let mut name = torrent.name.clone();
            if used_names.contains(&name) {
                name = format!("{}-{}", name, torrent.info_hash_hex());
            }
            used_names.insert(name.clone());

            let target = dest.join(format!("{}.torrent", name));
            debug!(
                "Transferring {} to {}",
                torrent_path.display(),
                target.display()
            );

            match options.mode {
                TransferMode::Copy => {
                    fs::copy(&torrent_path, &target)?;
                }
                TransferMode::Move => {
                    move_file(&torrent_path, &target)?;
                }
                TransferMode::Simulate => {}
            }

            report.transferred += 1;
        }

        info!(
            "Export complete: {} transferred, {} skipped",
            report.transferred, report.skipped
        );

        Ok(report)
    }

    /// Lists `.resume` files under `Resume/`, sorted for stable iteration.
    fn resume_entries(&self) -> Result<Vec<PathBuf>, SweepError> {
        let resume_dir = self.resume_dir();
        if !resume_dir.is_dir() {
            return Err(SweepError::NotADirectory(resume_dir));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(resume_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "resume") {
                entries.push(path);
            }
        }

        entries.sort();
        Ok(entries)
    }

    /// Returns where the torrent file matching a resume entry should live.
    fn torrent_path_for(&self, resume_path: &Path) -> PathBuf {
        let mut filename = resume_path.file_stem().unwrap_or_default().to_os_string();
        filename.push(".torrent");
        self.torrents_dir().join(filename)
    }
}

/// Returns `true` if a torrent name is usable as a single file name.
///
/// Names come from untrusted torrent files, so anything that would resolve
/// outside the destination directory is rejected.
fn is_safe_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Moves a file, falling back to copy and delete when a plain rename is not
/// possible (for example across filesystems).
fn move_file(src: &Path, dest: &Path) -> Result<(), SweepError> {
    if fs::rename(src, dest).is_err() {
        fs::copy(src, dest)?;
        fs::remove_file(src)?;
    }
    Ok(())
}
