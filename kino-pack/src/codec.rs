//! Little-endian primitives shared by every container layout.
//!
//! Strings and blobs carry a 4-byte signed length prefix.

use crate::error::{PackError, PackResult};

#[derive(Debug, Default)]
pub(crate) struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn put_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn put_len(&mut self, field: &'static str, len: usize) -> PackResult<()> {
        let len = i32::try_from(len).map_err(|_| PackError::TooLong { field, len })?;
        self.put_i32(len);
        Ok(())
    }

    pub(crate) fn put_str(&mut self, field: &'static str, value: &str) -> PackResult<()> {
        self.put_len(field, value.len())?;
        self.put_raw(value.as_bytes());
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Debug)]
pub(crate) struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn take(&mut self, field: &'static str, needed: usize) -> PackResult<&'a [u8]> {
        let available = self.buf.len() - self.pos;
        if needed > available {
            return Err(PackError::Truncated {
                field,
                offset: self.pos,
                needed,
                available,
            });
        }
        let slice = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(slice)
    }

    pub(crate) fn take_array<const N: usize>(&mut self, field: &'static str) -> PackResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(field, N)?);
        Ok(out)
    }

    pub(crate) fn i32(&mut self, field: &'static str) -> PackResult<i32> {
        Ok(i32::from_le_bytes(self.take_array(field)?))
    }

    pub(crate) fn u64(&mut self, field: &'static str) -> PackResult<u64> {
        Ok(u64::from_le_bytes(self.take_array(field)?))
    }

    pub(crate) fn len(&mut self, field: &'static str) -> PackResult<usize> {
        let length = self.i32(field)?;
        usize::try_from(length).map_err(|_| PackError::InvalidLength { field, length })
    }

    pub(crate) fn blob(&mut self, field: &'static str) -> PackResult<Vec<u8>> {
        let len = self.len(field)?;
        Ok(self.take(field, len)?.to_vec())
    }

    pub(crate) fn string(&mut self, field: &'static str) -> PackResult<String> {
        let len = self.len(field)?;
        let bytes = self.take(field, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PackError::InvalidUtf8 { field })
    }

    pub(crate) fn rest(&mut self) -> Vec<u8> {
        let rest = self.buf[self.pos..].to_vec();
        self.pos = self.buf.len();
        rest
    }
}
