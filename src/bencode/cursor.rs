use super::error::BencodeError;

/// Read position over an immutable byte slice.
///
/// Consumption is linear and one-directional; the underlying bytes are never
/// copied or modified. A cursor lives for a single top-level decode call and
/// is discarded afterwards.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the next unconsumed byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes the next `n` bytes and returns them.
    ///
    /// Fails with [`BencodeError::UnexpectedEnd`] when fewer than `n` bytes
    /// remain; the cursor does not move in that case.
    pub fn advance(&mut self, n: usize) -> Result<&'a [u8], BencodeError> {
        if n > self.remaining() {
            return Err(BencodeError::UnexpectedEnd { offset: self.pos });
        }
        let taken = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(taken)
    }

    /// Consumes a run of ASCII digits, allowing one leading `-`, and returns
    /// what was consumed. The run may be empty.
    pub fn take_while_digit(&mut self) -> &'a [u8] {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        &self.data[start..self.pos]
    }

    /// Byte offset of the next unconsumed byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_advance() {
        let cursor = Cursor::new(b"ab");
        assert_eq!(cursor.peek(), Some(b'a'));
        assert_eq!(cursor.peek(), Some(b'a'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_advance_returns_consumed_prefix() {
        let mut cursor = Cursor::new(b"spam");
        assert_eq!(cursor.advance(2).unwrap(), b"sp");
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.advance(2).unwrap(), b"am");
        assert!(cursor.is_empty());
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_advance_past_end_leaves_cursor_unmoved() {
        let mut cursor = Cursor::new(b"abc");
        cursor.advance(1).unwrap();
        let err = cursor.advance(5).unwrap_err();
        assert!(matches!(err, BencodeError::UnexpectedEnd { offset: 1 }));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn test_take_while_digit_stops_at_delimiter() {
        let mut cursor = Cursor::new(b"123:abc");
        assert_eq!(cursor.take_while_digit(), b"123");
        assert_eq!(cursor.peek(), Some(b':'));
    }

    #[test]
    fn test_take_while_digit_accepts_leading_sign() {
        let mut cursor = Cursor::new(b"-42e");
        assert_eq!(cursor.take_while_digit(), b"-42");
        assert_eq!(cursor.peek(), Some(b'e'));
    }

    #[test]
    fn test_take_while_digit_consumes_bare_sign() {
        let mut cursor = Cursor::new(b"-e");
        assert_eq!(cursor.take_while_digit(), b"-");
        assert_eq!(cursor.peek(), Some(b'e'));
    }

    #[test]
    fn test_take_while_digit_empty_when_not_numeric() {
        let mut cursor = Cursor::new(b"spam");
        assert_eq!(cursor.take_while_digit(), b"");
        assert_eq!(cursor.position(), 0);
    }
}
