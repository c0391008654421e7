//! Bounds-checked reads over a borrowed byte buffer.
//!
//! Every read in the container scanner and the Exif decoder goes through
//! [`ByteCursor`]. A read either returns the requested bytes or a
//! [`CursorError`] describing the range that did not fit; the cursor never
//! slices speculatively and never panics.

use crate::error::CursorError;
use crate::format::exif::ByteOrder;

/// A fixed buffer plus a position, with a byte order applied to all
/// multi-byte reads.
///
/// Random-access reads (`*_at`) leave the position untouched; sequential
/// reads (`read_*`) advance it only on success.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at position 0.
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            order,
        }
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Move to an absolute position. Positions equal to the length are allowed.
    pub fn seek(&mut self, pos: usize) -> Result<(), CursorError> {
        if pos > self.data.len() {
            return Err(self.error(pos, 0));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance the position by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
        let end = self.pos.checked_add(n).ok_or_else(|| self.error(self.pos, n))?;
        self.seek(end).map_err(|_| self.error(self.pos, n))
    }

    /// Borrow `len` bytes at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], CursorError> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| self.error(offset, len))?;
        self.data.get(offset..end).ok_or_else(|| self.error(offset, len))
    }

    /// Copy a fixed-size array at `offset`.
    pub fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], CursorError> {
        let bytes = self.bytes_at(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    #[inline]
    pub fn u8_at(&self, offset: usize) -> Result<u8, CursorError> {
        self.data.get(offset).copied().ok_or_else(|| self.error(offset, 1))
    }

    #[inline]
    pub fn u16_at(&self, offset: usize) -> Result<u16, CursorError> {
        Ok(self.order.u16_from(self.array_at(offset)?))
    }

    #[inline]
    pub fn u32_at(&self, offset: usize) -> Result<u32, CursorError> {
        Ok(self.order.u32_from(self.array_at(offset)?))
    }

    /// Read `len` bytes at the position and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        let bytes = self.bytes_at(self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        let value = self.u8_at(self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        let value = self.u16_at(self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        let value = self.u32_at(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    fn error(&self, offset: usize, len: usize) -> CursorError {
        CursorError {
            offset,
            len,
            size: self.data.len(),
        }
    }
}
