//! Resume file handling.
//!
//! A client keeps one bencoded `.resume` file per transfer, recording the
//! state that is not in the torrent itself: where the content was downloaded
//! to, when the transfer was added and finished, traffic counters, and the
//! group the user filed it under. [`Resume`] parses the fields the sweep
//! logic needs; unknown keys are ignored.

use crate::bencode::{decode, BencodeError, Dict};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when parsing a resume file.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// The resume file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required field is missing from the resume file.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field has an invalid value or type.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// An I/O error occurred while reading the resume file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-transfer state parsed from a `.resume` file.
#[derive(Debug, Clone)]
pub struct Resume {
    /// Name of the transfer, normally matching the torrent's name.
    pub name: String,
    /// Directory the content was downloaded to.
    pub destination: Option<String>,
    /// Unix timestamp when the transfer was added.
    pub added_date: Option<i64>,
    /// Unix timestamp when the transfer finished, if it has.
    pub done_date: Option<i64>,
    /// Bytes downloaded over the transfer's lifetime.
    pub downloaded: Option<u64>,
    /// Bytes uploaded over the transfer's lifetime.
    pub uploaded: Option<u64>,
    /// Whether the transfer was paused when the client last ran.
    pub paused: bool,
    /// Numeric group the user filed the transfer under.
    pub group: Option<i64>,
    /// Free-form labels attached to the transfer.
    pub labels: Vec<String>,
}

impl Resume {
    /// Parses a resume file from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid bencode, the root is not a
    /// dictionary, the `name` field is missing, or a traffic counter is
    /// negative.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ResumeError> {
        let value = decode(data)?;
        let dict = value.as_dict().ok_or(ResumeError::InvalidField("root"))?;

        let name = dict
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or(ResumeError::MissingField("name"))?
            .to_string();

        let destination = dict
            .get("destination")
            .and_then(|v| v.as_str())
            .map(String::from);

        let added_date = dict.get("added-date").and_then(|v| v.as_integer());
        let done_date = dict.get("done-date").and_then(|v| v.as_integer());

        let downloaded = parse_counter(dict, "downloaded")?;
        let uploaded = parse_counter(dict, "uploaded")?;

        let paused = dict
            .get("paused")
            .and_then(|v| v.as_integer())
            .map(|v| v == 1)
            .unwrap_or(false);

        let group = dict.get("group").and_then(|v| v.as_integer());

        let labels = dict
            .get("labels")
            .and_then(|v| v.as_list())
            .map(|list| {
                list.iter()
                    .filter_map(|l| l.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name,
            destination,
            added_date,
            done_date,
            downloaded,
            uploaded,
            paused,
            group,
            labels,
        })
    }

    /// Reads and parses a resume file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResumeError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Returns `true` if the transfer has recorded a completion time.
    pub fn is_done(&self) -> bool {
        self.done_date.is_some_and(|ts| ts > 0)
    }
}

fn parse_counter(dict: &Dict, key: &'static str) -> Result<Option<u64>, ResumeError> {
    let Some(raw) = dict.get(key).and_then(|v| v.as_integer()) else {
        return Ok(None);
    };
    u64::try_from(raw)
        .map(Some)
        .map_err(|_| ResumeError::InvalidField(key))
}
