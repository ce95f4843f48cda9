//! Variable length codes for run lengths and sample differences.
//!
//! Run lengths use a single combined field per range: the range's codeword
//! plus the offset into the range, written with the range's total width.
//!
//! ```text
//!     1   00
//!     2   01 0
//!     4   100 0
//!     6   101 00
//!    10   110 0000
//!    26   111 000 000
//!    50   111 011 0000
//!    66   111 100 00000
//!    98   111 101 000000
//!   162   111 110 000000000
//!   674   111 111 00000000000000
//! 17057   111 111 11111111111111
//! ```
//!
//! Differences 0, +1 and -1 have 3-bit codes of their own; larger magnitudes
//! write a range prefix, a sign bit (1 = negative) and the offset into the range.

use crate::{bits::BitChannel, error::Error};

/// Longest run a single token can describe.
pub const MAX_RUN: u32 = 17057;

struct RunRange {
    base: u32,
    prefix: u32,
    bits: u32,
}

const RUN_RANGES: [RunRange; 11] = [
    RunRange { base: 1, prefix: 0x0, bits: 2 },
    RunRange { base: 2, prefix: 0x2, bits: 3 },
    RunRange { base: 4, prefix: 0x8, bits: 4 },
    RunRange { base: 6, prefix: 0x14, bits: 5 },
    RunRange { base: 10, prefix: 0x60, bits: 7 },
    RunRange { base: 26, prefix: 0x1C0, bits: 9 },
    RunRange { base: 50, prefix: 0x3B0, bits: 10 },
    RunRange { base: 66, prefix: 0x780, bits: 11 },
    RunRange { base: 98, prefix: 0xF40, bits: 12 },
    RunRange { base: 162, prefix: 0x7C00, bits: 15 },
    RunRange { base: 674, prefix: 0xFC000, bits: 20 },
];

struct DiffRange {
    base: u32,
    prefix: u32,
    prefix_bits: u32,
    suffix_bits: u32,
}

const DIFF_RANGES: [DiffRange; 6] = [
    DiffRange { base: 2, prefix: 3, prefix_bits: 3, suffix_bits: 1 },
    DiffRange { base: 4, prefix: 4, prefix_bits: 3, suffix_bits: 2 },
    DiffRange { base: 8, prefix: 5, prefix_bits: 3, suffix_bits: 3 },
    DiffRange { base: 16, prefix: 6, prefix_bits: 3, suffix_bits: 5 },
    DiffRange { base: 48, prefix: 14, prefix_bits: 4, suffix_bits: 5 },
    DiffRange { base: 80, prefix: 15, prefix_bits: 4, suffix_bits: 6 },
];

/// Write a run length in `1..=MAX_RUN`.
///
/// Anything outside that range is a caller bug; it writes nothing.
pub fn put_run(ch: &mut BitChannel, len: u32) -> Result<(), Error> {
    debug_assert!((1..=MAX_RUN).contains(&len), "run length {} out of range", len);
    if !(1..=MAX_RUN).contains(&len) {
        return Ok(());
    }
    let range = RUN_RANGES
        .iter()
        .rev()
        .find(|r| r.base <= len)
        .unwrap_or(&RUN_RANGES[0]);
    ch.put(len - range.base + range.prefix, range.bits)
}

/// Write the signed difference between two samples.
pub fn put_diff(ch: &mut BitChannel, diff: i8) -> Result<(), Error> {
    match diff {
        0 => return ch.put(0, 3),
        1 => return ch.put(1, 3),
        -1 => return ch.put(2, 3),
        _ => {}
    }
    let magnitude = u32::from(diff.unsigned_abs());
    let range = DIFF_RANGES
        .iter()
        .rev()
        .find(|r| r.base <= magnitude)
        .unwrap_or(&DIFF_RANGES[0]);
    ch.put(range.prefix, range.prefix_bits)?;
    ch.put(u32::from(diff < 0), 1)?;
    ch.put(magnitude - range.base, range.suffix_bits)
}
