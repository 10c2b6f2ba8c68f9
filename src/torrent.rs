//! Torrent metainfo handling ([BEP-3]).
//!
//! A `.torrent` file is a bencoded dictionary describing the content a
//! transfer downloads: the suggested name, the tracker, and either a single
//! length or a list of files. [`Torrent`] parses the fields this crate cares
//! about and computes the SHA-1 info hash over the `info` dictionary.
//!
//! # Examples
//!
//! ```no_run
//! use trundle::torrent::Torrent;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Torrent::load("example.torrent")?;
//!
//! println!("Name: {}", torrent.name);
//! println!("Info hash: {}", torrent.info_hash_hex());
//! if let Some(length) = torrent.total_length {
//!     println!("Total size: {} bytes", length);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

use crate::bencode::{decode, encode, BencodeError, Dict};
use sha1::{Digest, Sha1};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when parsing a torrent file.
#[derive(Debug, Error)]
pub enum TorrentError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// A required field is missing from the torrent file.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field has an invalid value or type.
    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    /// An I/O error occurred while reading the torrent file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed torrent file.
///
/// Carries the metadata needed to pair a torrent with its resume entry and
/// to name exported files, not the piece-level detail a downloader would use.
#[derive(Debug, Clone)]
pub struct Torrent {
    /// Suggested name for the file or directory, preferring the
    /// `name.utf-8` key over `name` when both are present.
    pub name: String,
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Name/version of the program that created the torrent.
    pub created_by: Option<String>,
    /// Total size of the content, from `length` or the sum of `files`.
    /// `None` when the info dictionary carries neither.
    pub total_length: Option<u64>,
    /// SHA-1 hash of the bencoded `info` dictionary.
    pub info_hash: [u8; 20],
}

impl Torrent {
    /// Parses a torrent file from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid bencode, the root is not a
    /// dictionary, the `info` dictionary or its `name` is missing, or a
    /// length field is negative or the file lengths sum past `u64::MAX`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TorrentError> {
        let value = decode(data)?;
        let dict = value.as_dict().ok_or(TorrentError::InvalidField("root"))?;

        let info_value = dict.get("info").ok_or(TorrentError::MissingField("info"))?;
        let info = info_value
            .as_dict()
            .ok_or(TorrentError::InvalidField("info"))?;

        // Decoding keeps dictionary key order, so re-encoding the info value
        // reproduces its exact wire bytes and the hash matches other clients.
        let raw_info = encode(info_value)?;
        let info_hash = compute_info_hash(&raw_info);

        let name = info
            .get("name.utf-8")
            .or_else(|| info.get("name"))
            .and_then(|v| v.as_str())
            .ok_or(TorrentError::MissingField("name"))?
            .to_string();

        let total_length = parse_total_length(info)?;

        let announce = dict
            .get("announce")
            .and_then(|v| v.as_str())
            .map(String::from);

        let creation_date = dict.get("creation date").and_then(|v| v.as_integer());

        let comment = dict
            .get("comment")
            .and_then(|v| v.as_str())
            .map(String::from);

        let created_by = dict
            .get("created by")
            .and_then(|v| v.as_str())
            .map(String::from);

        Ok(Self {
            name,
            announce,
            creation_date,
            comment,
            created_by,
            total_length,
            info_hash,
        })
    }

    /// Reads and parses a torrent file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TorrentError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Returns the info hash as a lowercase hex string.
    pub fn info_hash_hex(&self) -> String {
        hex::encode(self.info_hash)
    }
}

fn parse_total_length(info: &Dict) -> Result<Option<u64>, TorrentError> {
    if let Some(length) = info.get("length").and_then(|v| v.as_integer()) {
        let length = u64::try_from(length)
            .map_err(|_| TorrentError::InvalidField("length"))?;
        return Ok(Some(length));
    }

    let Some(files) = info.get("files").and_then(|v| v.as_list()) else {
        return Ok(None);
    };

    let mut total = 0u64;
    for file in files {
        let file_dict = file.as_dict().ok_or(TorrentError::InvalidField("files"))?;
        let length = file_dict
            .get("length")
            .and_then(|v| v.as_integer())
            .ok_or(TorrentError::MissingField("file length"))?;
        let length = u64::try_from(length)
            .map_err(|_| TorrentError::InvalidField("file length"))?;
        total = total
            .checked_add(length)
            .ok_or(TorrentError::InvalidField("file length"))?;
    }

    Ok(Some(total))
}

fn compute_info_hash(raw_info: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(raw_info);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::Value;

    fn single_file_torrent() -> Vec<u8> {
        let mut info = Dict::new();
        info.insert("name", Value::string("example.txt"));
        info.insert("length", Value::Integer(1024));
        info.insert("piece length", Value::Integer(16384));

        let mut root = Dict::new();
        root.insert("announce", Value::string("http://tracker.example.com/announce"));
        root.insert("creation date", Value::Integer(1_700_000_000));
        root.insert("comment", Value::string("test torrent"));
        root.insert("info", Value::Dict(info));

        encode(&Value::Dict(root)).unwrap()
    }

    #[test]
    fn test_parse_single_file() {
        let torrent = Torrent::from_bytes(&single_file_torrent()).unwrap();
        assert_eq!(torrent.name, "example.txt");
        assert_eq!(
            torrent.announce.as_deref(),
            Some("http://tracker.example.com/announce")
        );
        assert_eq!(torrent.creation_date, Some(1_700_000_000));
        assert_eq!(torrent.comment.as_deref(), Some("test torrent"));
        assert_eq!(torrent.total_length, Some(1024));
    }

    #[test]
    fn test_parse_multi_file_total_length() {
        let mut file_a = Dict::new();
        file_a.insert("length", Value::Integer(100));
        file_a.insert("path", Value::List(vec![Value::string("a.txt")]));
        let mut file_b = Dict::new();
        file_b.insert("length", Value::Integer(250));
        file_b.insert("path", Value::List(vec![Value::string("b.txt")]));

        let mut info = Dict::new();
        info.insert("name", Value::string("bundle"));
        info.insert(
            "files",
            Value::List(vec![Value::Dict(file_a), Value::Dict(file_b)]),
        );

        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));

        let data = encode(&Value::Dict(root)).unwrap();
        let torrent = Torrent::from_bytes(&data).unwrap();
        assert_eq!(torrent.name, "bundle");
        assert_eq!(torrent.total_length, Some(350));
    }

    #[test]
    fn test_name_utf8_preferred() {
        let mut info = Dict::new();
        info.insert("name", Value::string("mojibake"));
        info.insert("name.utf-8", Value::string("正しい名前"));
        info.insert("length", Value::Integer(1));

        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));

        let data = encode(&Value::Dict(root)).unwrap();
        let torrent = Torrent::from_bytes(&data).unwrap();
        assert_eq!(torrent.name, "正しい名前");
    }

    #[test]
    fn test_info_hash_over_raw_info() {
        let data = single_file_torrent();
        let torrent = Torrent::from_bytes(&data).unwrap();

        // Hash computed over the re-encoded info dictionary.
        let root = decode(&data).unwrap();
        let info_bytes = encode(root.get("info").unwrap()).unwrap();
        let mut hasher = Sha1::new();
        hasher.update(&info_bytes);
        let expected: [u8; 20] = hasher.finalize().into();

        assert_eq!(torrent.info_hash, expected);
        assert_eq!(torrent.info_hash_hex(), hex::encode(expected));
        assert_eq!(torrent.info_hash_hex().len(), 40);
    }

    #[test]
    fn test_missing_info() {
        let mut root = Dict::new();
        root.insert("announce", Value::string("http://tracker.example.com"));
        let data = encode(&Value::Dict(root)).unwrap();

        assert!(matches!(
            Torrent::from_bytes(&data),
            Err(TorrentError::MissingField("info"))
        ));
    }

    #[test]
    fn test_missing_name() {
        let mut info = Dict::new();
        info.insert("length", Value::Integer(1));
        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));
        let data = encode(&Value::Dict(root)).unwrap();

        assert!(matches!(
            Torrent::from_bytes(&data),
            Err(TorrentError::MissingField("name"))
        ));
    }

    #[test]
    fn test_length_absent() {
        let mut info = Dict::new();
        info.insert("name", Value::string("metadata-only"));
        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));
        let data = encode(&Value::Dict(root)).unwrap();

        let torrent = Torrent::from_bytes(&data).unwrap();
        assert_eq!(torrent.total_length, None);
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut info = Dict::new();
        info.insert("name", Value::string("bad"));
        info.insert("length", Value::Integer(-1024));
        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));
        let data = encode(&Value::Dict(root)).unwrap();

        assert!(matches!(
            Torrent::from_bytes(&data),
            Err(TorrentError::InvalidField("length"))
        ));
    }

    #[test]
    fn test_negative_file_length_rejected() {
        let mut file_a = Dict::new();
        file_a.insert("length", Value::Integer(-1));
        file_a.insert("path", Value::List(vec![Value::string("a.txt")]));
        let mut file_b = Dict::new();
        file_b.insert("length", Value::Integer(-1));
        file_b.insert("path", Value::List(vec![Value::string("b.txt")]));

        let mut info = Dict::new();
        info.insert("name", Value::string("bad-bundle"));
        info.insert(
            "files",
            Value::List(vec![Value::Dict(file_a), Value::Dict(file_b)]),
        );

        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));
        let data = encode(&Value::Dict(root)).unwrap();

        assert!(matches!(
            Torrent::from_bytes(&data),
            Err(TorrentError::InvalidField("file length"))
        ));
    }

    #[test]
    fn test_total_length_overflow_rejected() {
        // Two i64::MAX lengths still fit in u64; the third pushes the sum over.
        let files = (0..3)
            .map(|_| {
                let mut file = Dict::new();
                file.insert("length", Value::Integer(i64::MAX));
                Value::Dict(file)
            })
            .collect();

        let mut info = Dict::new();
        info.insert("name", Value::string("huge"));
        info.insert("files", Value::List(files));

        let mut root = Dict::new();
        root.insert("info", Value::Dict(info));
        let data = encode(&Value::Dict(root)).unwrap();

        assert!(matches!(
            Torrent::from_bytes(&data),
            Err(TorrentError::InvalidField("file length"))
        ));
    }

    #[test]
    fn test_invalid_bencode() {
        assert!(matches!(
            Torrent::from_bytes(b"not bencode"),
            Err(TorrentError::Bencode(_))
        ));
    }
}
