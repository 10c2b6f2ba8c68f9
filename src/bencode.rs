//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format BitTorrent uses for structured data.
//! Everything this crate reads out of a client working directory is bencoded:
//! the `.torrent` files under `Torrents/` and the per-transfer `.resume`
//! files under `Resume/`.
//!
//! # Data Types
//!
//! The format has four productions, dispatched on the first byte:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Byte strings are raw bytes, not text; [`Value::as_str`] converts when the
//! payload happens to be UTF-8. Dictionary keys must be UTF-8 and keep the
//! order found on the wire, so a decoded document re-encodes to its exact
//! original bytes. That round-trip fidelity is what lets [`crate::torrent`]
//! hash a decoded `info` dictionary and agree with other clients.
//!
//! # Examples
//!
//! Decoding a resume-style dictionary and reading fields out of it:
//!
//! ```
//! use trundle::bencode::decode;
//!
//! let value = decode(b"d4:name5:album5:groupi3ee").unwrap();
//! assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("album"));
//! assert_eq!(value.get("group").and_then(|v| v.as_integer()), Some(3));
//! ```
//!
//! Building a document and encoding it back out:
//!
//! ```
//! use trundle::bencode::{encode, Dict, Value};
//!
//! let mut resume = Dict::new();
//! resume.insert("name", Value::string("album"));
//! resume.insert("paused", Value::Integer(0));
//! resume.insert("labels", Value::List(vec![Value::string("keep")]));
//!
//! let bytes = encode(&Value::Dict(resume)).unwrap();
//! assert_eq!(bytes, b"d4:name5:album6:pausedi0e6:labelsl4:keepee");
//! ```
//!
//! Malformed input never panics; decoding fails with a [`BencodeError`]
//! carrying the byte offset where the problem was found:
//!
//! ```
//! use trundle::bencode::{decode, BencodeError};
//!
//! let err = decode(b"d3:fooe").unwrap_err();
//! assert!(matches!(err, BencodeError::DictValueMissing { offset: 6 }));
//! ```
//!
//! # Limits
//!
//! Nesting depth is capped at [`DEFAULT_MAX_DEPTH`] levels so hostile input
//! exhausts an error path instead of the call stack; [`decode_with_limit`]
//! takes a caller-chosen cap.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod cursor;
mod decode;
mod encode;
mod error;
mod value;

pub use decode::{decode, decode_with_limit, DEFAULT_MAX_DEPTH};
pub use encode::{encode, encode_into};
pub use error::BencodeError;
pub use value::{Dict, Value};
