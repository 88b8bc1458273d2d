use crate::error::{Result, WireError};

/// A bounds-checked cursor over an encoded message.
///
/// Every accessor either yields a fully read value or fails without
/// consuming input, so a decode error never leaves a half-built record.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(WireError::Truncated {
                needed: n,
                remaining: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    pub fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn f32(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Raw bytes of a known length.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// A length-prefixed byte string.
    ///
    /// The declared length is validated against the remaining input before
    /// any allocation, so a corrupt length cannot trigger an oversized
    /// buffer or a partially filled one.
    pub fn string(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        if len > self.remaining() {
            return Err(WireError::Format(format!(
                "declared string length {len} exceeds {} remaining byte(s)",
                self.remaining()
            )));
        }
        // Raw bytes, no encoding validation (mirrors the producer, which
        // writes bytes without one).
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }

    /// A sequence element count.
    ///
    /// `min_element_size` is the smallest possible encoding of one element;
    /// a count whose minimum footprint exceeds the remaining input is
    /// rejected up front as [`WireError::Format`], before the caller
    /// allocates `count` elements.
    pub fn count(&mut self, min_element_size: usize) -> Result<usize> {
        let count = self.u32()? as usize;
        let min_bytes = count.checked_mul(min_element_size.max(1));
        match min_bytes {
            Some(needed) if needed <= self.remaining() => Ok(count),
            _ => Err(WireError::Format(format!(
                "declared count {count} needs at least {} byte(s), {} remain",
                min_bytes.unwrap_or(usize::MAX),
                self.remaining()
            ))),
        }
    }

    /// Fail unless every byte has been consumed.
    ///
    /// The format self-delimits, so trailing bytes can only mean the peers
    /// disagree on the layout.
    pub fn finish(self) -> Result<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(WireError::Format(format!(
                "{} trailing byte(s) after a complete message",
                self.buf.len()
            )))
        }
    }
}
