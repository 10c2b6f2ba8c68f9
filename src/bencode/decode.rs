use super::cursor::Cursor;
use super::error::BencodeError;
use super::value::{Dict, Value};
use bytes::Bytes;

/// Nesting limit applied by [`decode`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Decodes one bencode value spanning the whole input.
///
/// Fails with [`BencodeError::TrailingData`] if bytes remain after the value.
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    decode_with_limit(data, DEFAULT_MAX_DEPTH)
}

/// Decodes one bencode value with a caller-chosen nesting limit.
///
/// `max_depth` counts levels of composite nesting below the top-level value;
/// exceeding it fails with [`BencodeError::NestingTooDeep`] instead of
/// exhausting the call stack.
pub fn decode_with_limit(data: &[u8], max_depth: usize) -> Result<Value, BencodeError> {
    let mut cursor = Cursor::new(data);

    let value = match decode_value(&mut cursor, 0, max_depth)? {
        Step::Value(value) => value,
        Step::Terminator => {
            return Err(BencodeError::UnexpectedTerminator { offset: 0 });
        }
    };

    if !cursor.is_empty() {
        return Err(BencodeError::TrailingData {
            offset: cursor.position(),
        });
    }

    Ok(value)
}

/// Outcome of one recursive decode step.
///
/// List and dict bodies call [`decode_value`] in a loop; `Terminator` means
/// the byte closing the enclosing composite was consumed instead of a value.
enum Step {
    Value(Value),
    Terminator,
}

fn decode_value(
    cursor: &mut Cursor<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<Step, BencodeError> {
    if depth > max_depth {
        return Err(BencodeError::NestingTooDeep {
            offset: cursor.position(),
            limit: max_depth,
        });
    }

    match cursor.peek() {
        Some(b'i') => decode_integer(cursor).map(Step::Value),
        Some(b'0'..=b'9') => decode_bytes(cursor).map(Step::Value),
        Some(b'l') => decode_list(cursor, depth, max_depth).map(Step::Value),
        Some(b'd') => decode_dict(cursor, depth, max_depth).map(Step::Value),
        Some(_) => {
            // `e` closes the enclosing composite; the grammar treats every
            // byte outside the four value productions the same way.
            cursor.advance(1)?;
            Ok(Step::Terminator)
        }
        None => Err(BencodeError::UnexpectedEnd {
            offset: cursor.position(),
        }),
    }
}

fn decode_integer(cursor: &mut Cursor<'_>) -> Result<Value, BencodeError> {
    cursor.advance(1)?;

    let offset = cursor.position();
    let digits = cursor.take_while_digit();

    match cursor.peek() {
        Some(b'e') => {
            cursor.advance(1)?;
        }
        Some(_) => {
            return Err(BencodeError::MalformedInteger {
                offset: cursor.position(),
            });
        }
        None => {
            return Err(BencodeError::UnexpectedEnd {
                offset: cursor.position(),
            });
        }
    }

    let value = parse_integer(digits).ok_or(BencodeError::MalformedInteger { offset })?;
    Ok(Value::Integer(value))
}

fn decode_bytes(cursor: &mut Cursor<'_>) -> Result<Value, BencodeError> {
    let offset = cursor.position();
    let digits = cursor.take_while_digit();

    match cursor.peek() {
        Some(b':') => {
            cursor.advance(1)?;
        }
        Some(_) => {
            return Err(BencodeError::MalformedLength {
                offset: cursor.position(),
            });
        }
        None => {
            return Err(BencodeError::UnexpectedEnd {
                offset: cursor.position(),
            });
        }
    }

    let len = parse_length(digits).ok_or(BencodeError::MalformedLength { offset })?;
    let payload = cursor.advance(len)?;
    Ok(Value::Bytes(Bytes::copy_from_slice(payload)))
}

fn decode_list(
    cursor: &mut Cursor<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<Value, BencodeError> {
    cursor.advance(1)?;
    let mut items = Vec::new();

    loop {
        match decode_value(cursor, depth + 1, max_depth)? {
            Step::Value(value) => items.push(value),
            Step::Terminator => return Ok(Value::List(items)),
        }
    }
}

fn decode_dict(
    cursor: &mut Cursor<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<Value, BencodeError> {
    cursor.advance(1)?;
    let mut dict = Dict::new();

    loop {
        let key_offset = cursor.position();
        let key = match decode_value(cursor, depth + 1, max_depth)? {
            Step::Value(Value::Bytes(raw)) => String::from_utf8(raw.to_vec())
                .map_err(|_| BencodeError::InvalidKeyEncoding { offset: key_offset })?,
            Step::Value(_) => {
                return Err(BencodeError::InvalidKeyEncoding { offset: key_offset });
            }
            Step::Terminator => return Ok(Value::Dict(dict)),
        };

        let value_offset = cursor.position();
        match decode_value(cursor, depth + 1, max_depth)? {
            Step::Value(value) => {
                dict.insert(key, value);
            }
            Step::Terminator => {
                return Err(BencodeError::DictValueMissing {
                    offset: value_offset,
                });
            }
        }
    }
}

/// Parses a signed decimal, rejecting empty digits, a bare sign, and the
/// leading-zero forms `0N` and `-0...`.
fn parse_integer(digits: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(digits).ok()?;
    if text.starts_with("-0") || (text.starts_with('0') && text.len() > 1) {
        return None;
    }
    text.parse().ok()
}

fn parse_length(digits: &[u8]) -> Option<usize> {
    let text = std::str::from_utf8(digits).ok()?;
    text.parse().ok()
}
