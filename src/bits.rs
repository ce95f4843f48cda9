//! MSB-first bit packing with a carried partial byte.

use crate::error::Error;

/// Capacity added each time a channel runs low on space.
pub const GROWTH_STEP: usize = 0x10_0000;

/// Free space below which the next write grows the buffer.
const LOW_WATER: usize = 16;

/// Largest field a single [`BitChannel::put`] accepts.
pub const MAX_FIELD_BITS: u32 = 24;

/// A growable bit-packed byte buffer.
///
/// The last byte of `buf` may be partial: `bits` (0..=7) says how many of its
/// top bits are valid. A zero means every byte in `buf` is complete.
#[derive(Debug, Default, Clone)]
pub struct BitChannel {
    buf: Vec<u8>,
    bits: u32,
}

impl BitChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `nbits` bits of `value`, most significant bit first.
    ///
    /// A zero width is a no-op.
    pub fn put(&mut self, value: u32, nbits: u32) -> Result<(), Error> {
        debug_assert!(nbits <= MAX_FIELD_BITS);
        if nbits == 0 {
            return Ok(());
        }
        self.reserve()?;

        let mut value = value & ((1 << nbits) - 1);
        let mut nbits = nbits;
        if self.bits > 0 {
            if let Some(last) = self.buf.pop() {
                value |= u32::from(last >> (8 - self.bits)) << nbits;
                nbits += self.bits;
            }
        }
        self.bits = nbits & 7;
        while nbits > 8 {
            nbits -= 8;
            self.buf.push((value >> nbits) as u8);
        }
        self.buf.push((value << (8 - nbits)) as u8);
        Ok(())
    }

    /// Pad the partial byte with one bits and hand out the bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, Error> {
        self.put(0xFF, 8)?;
        // The last byte is either the fresh 0xFF or the spill of the padding.
        self.buf.pop();
        self.bits = 0;
        Ok(self.buf)
    }

    /// Bytes produced so far, the partial byte included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Valid bits in the last byte, zero when it is complete.
    pub fn pending_bits(&self) -> u32 {
        self.bits
    }

    /// Total number of bits written.
    pub fn bit_len(&self) -> usize {
        if self.bits == 0 {
            self.buf.len() * 8
        } else {
            (self.buf.len() - 1) * 8 + self.bits as usize
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn reserve(&mut self) -> Result<(), Error> {
        if self.buf.capacity() - self.buf.len() < LOW_WATER {
            self.buf
                .try_reserve_exact(GROWTH_STEP)
                .map_err(|_| Error::OutOfMemory {
                    requested: GROWTH_STEP,
                })?;
        }
        Ok(())
    }
}
