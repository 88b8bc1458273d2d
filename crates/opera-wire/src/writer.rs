use bytes::{BufMut, Bytes, BytesMut};

/// Appends wire-format fields to a growable buffer.
///
/// Encoding is infallible: every value has exactly one encoding, and the
/// device-scale payloads here are far below the `u32` length ceiling
/// (debug builds assert it anyway).
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn put_bool(&mut self, v: bool) {
        self.buf.put_u8(v as u8);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.put_u16_le(v);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32_le(v);
    }

    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32_le(v);
    }

    pub fn put_f32(&mut self, v: f32) {
        self.buf.put_f32_le(v);
    }

    pub fn put_bytes(&mut self, v: &[u8]) {
        self.buf.put_slice(v);
    }

    /// A length-prefixed byte string: `u32` length, then raw bytes.
    pub fn put_string(&mut self, v: &str) {
        debug_assert!(v.len() <= u32::MAX as usize);
        self.buf.put_u32_le(v.len() as u32);
        self.buf.put_slice(v.as_bytes());
    }

    /// A sequence element count. Elements follow, packed by the caller.
    pub fn put_count(&mut self, count: usize) {
        debug_assert!(count <= u32::MAX as usize);
        self.buf.put_u32_le(count as u32);
    }

    /// Freeze the accumulated bytes into an immutable payload.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
