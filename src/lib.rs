//! trundle - Transmission working-directory tooling
//!
//! This library parses the bencoded files a Transmission-style BitTorrent
//! client leaves in its working directory and sweeps them: finding resume
//! entries whose torrent file has gone missing and exporting torrent files
//! under their human-readable names.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 bencode encoding/decoding
//! - [`torrent`] - Torrent metainfo parsing and info hashing
//! - [`resume`] - Per-transfer `.resume` file parsing
//! - [`sweep`] - Working-directory scans and torrent export

pub mod bencode;
pub mod resume;
pub mod sweep;
pub mod torrent;

pub use bencode::{decode, encode, BencodeError, Dict, Value};
pub use resume::{Resume, ResumeError};
pub use sweep::{ExportOptions, ExportReport, Orphan, SweepError, TransferMode, WorkingDir};
pub use torrent::{Torrent, TorrentError};
