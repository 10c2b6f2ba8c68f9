use super::error::BencodeError;
use super::value::Value;
use std::io::Write;

/// Encodes a bencode value to a byte vector.
///
/// Dictionary keys are written in the order the [`Dict`](super::Dict) holds
/// them. Because decoding preserves wire order, a decode/encode cycle over a
/// document reproduces its exact bytes, which is what makes hashing a
/// re-encoded `info` dictionary meaningful.
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails.
///
/// # Examples
///
/// ```
/// use trundle::bencode::{encode, Dict, Value};
///
/// let mut dict = Dict::new();
/// dict.insert("name", Value::string("album"));
/// dict.insert("group", Value::Integer(3));
///
/// let encoded = encode(&Value::Dict(dict)).unwrap();
/// assert_eq!(encoded, b"d4:name5:album5:groupi3ee");
/// ```
pub fn encode(value: &Value) -> Result<Vec<u8>, BencodeError> {
    let mut buf = Vec::new();
    encode_into(value, &mut buf)?;
    Ok(buf)
}

/// Encodes a bencode value into any [`Write`] sink.
///
/// Useful for streaming a document straight to a file without an
/// intermediate buffer; [`encode`] is this over a fresh `Vec<u8>`.
pub fn encode_into<W: Write>(value: &Value, writer: &mut W) -> Result<(), BencodeError> {
    match value {
        Value::Integer(i) => write!(writer, "i{}e", i)?,
        Value::Bytes(b) => {
            write!(writer, "{}:", b.len())?;
            writer.write_all(b)?;
        }
        Value::List(items) => {
            writer.write_all(b"l")?;
            for item in items {
                encode_into(item, writer)?;
            }
            writer.write_all(b"e")?;
        }
        Value::Dict(dict) => {
            writer.write_all(b"d")?;
            for (key, val) in dict.iter() {
                write!(writer, "{}:", key.len())?;
                writer.write_all(key.as_bytes())?;
                encode_into(val, writer)?;
            }
            writer.write_all(b"e")?;
        }
    }
    Ok(())
}
