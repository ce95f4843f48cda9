//! Per-pixel content mask compared alongside samples during run matching.

use crate::raster::GuardedRaster;

/// Columns this close to either edge of the logical page are never marked.
pub const CONTENT_INSET: usize = 96;

/// One bit per pixel of the padded page, MSB first.
///
/// For every row with non-zero samples the bits of columns
/// `CONTENT_INSET..width - CONTENT_INSET` are set. A run only extends while
/// the mask agrees at both ends, so runs copied from an empty row never bleed
/// into a row with content and the other way round.
#[derive(Debug)]
pub struct BlankBitmap {
    guard_bytes: usize,
    bits: Vec<u8>,
}

impl BlankBitmap {
    /// `logical_width` is the page width before padding.
    pub fn build(raster: &GuardedRaster, logical_width: usize) -> Self {
        let width = raster.width();
        let row_bytes = width / 8;
        let guard_bytes = row_bytes + 1;

        let mut bits = vec![0u8; guard_bytes + row_bytes * raster.height()];
        bits[..guard_bytes].fill(raster.mode().background());

        let band = CONTENT_INSET..logical_width.saturating_sub(CONTENT_INSET);
        if band.is_empty() {
            return BlankBitmap { guard_bytes, bits };
        }

        for y in 0..raster.height() {
            if !Self::has_content(raster, y) {
                continue;
            }
            let row = &mut bits[guard_bytes + y * row_bytes..guard_bytes + (y + 1) * row_bytes];
            for x in band.clone() {
                row[x >> 3] |= 0x80 >> (x & 7);
            }
        }
        BlankBitmap { guard_bytes, bits }
    }

    /// The scan window starts `8 - depth` bytes into the row, past the
    /// row-start marker, and stops `depth` bytes short of the row end.
    fn has_content(raster: &GuardedRaster, y: usize) -> bool {
        let depth = raster.mode().depth();
        let stride = raster.width() * depth;
        if stride <= 8 {
            return false;
        }
        raster.row(y)[8 - depth..stride - depth]
            .iter()
            .any(|&b| b != 0)
    }

    /// Bit at flat offset `off`; negative offsets read the guard.
    pub fn is_set(&self, off: isize) -> bool {
        let pos = (self.guard_bytes * 8) as isize + off;
        let byte = self.bits[(pos >> 3) as usize];
        (byte << (pos & 7)) & 0x80 != 0
    }
}
