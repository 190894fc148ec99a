use super::error::DecodeError;

/// Big-endian reader over an untrusted frame.
///
/// Every read is bounds-checked; running off the end is a `ShortFrame` error.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Fail early when the frame cannot hold `needed` bytes.
    pub fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if self.data.len() < needed {
            return Err(DecodeError::ShortFrame {
                needed,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.pos + N;
        let bytes: [u8; N] = self
            .data
            .get(self.pos..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(DecodeError::ShortFrame {
                needed: end,
                got: self.data.len(),
            })?;
        self.pos = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::ShortFrame {
                needed: self.pos + n,
                got: self.data.len(),
            });
        }
        self.pos += n;
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn u16_be(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn i16_be(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    pub fn f32_be(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.take()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian() {
        let data = [0x12, 0x34, 0xff, 0xfe, 0x7f, 0x3f, 0x80, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.u16_be(), Ok(0x1234));
        assert_eq!(cursor.i16_be(), Ok(-2));
        assert_eq!(cursor.u8(), Ok(0x7f));
        assert_eq!(cursor.f32_be(), Ok(1.0));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn short_reads_fail_without_advancing() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(2).unwrap();
        assert_eq!(
            cursor.u16_be(),
            Err(DecodeError::ShortFrame { needed: 4, got: 3 })
        );
        assert_eq!(cursor.position(), 2);
        assert!(cursor.skip(2).is_err());
        assert_eq!(cursor.u8(), Ok(0x03));
    }

    #[test]
    fn require_checks_total_length() {
        let cursor = ByteCursor::new(&[0; 4]);
        assert!(cursor.require(4).is_ok());
        assert_eq!(
            cursor.require(18),
            Err(DecodeError::ShortFrame { needed: 18, got: 4 })
        );
    }
}
