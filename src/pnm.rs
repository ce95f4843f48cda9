//! Netpbm page reader: raw PBM, PGM and PPM, and CMYK PAM.
//!
//! Several pages may follow each other in one stream, as Ghostscript writes
//! them with `pbmraw`, `pgmraw`, `ppmraw` or `pamcmyk32`.

use std::io::{BufRead, ErrorKind, Read};

use log::debug;

use crate::{
    error::Error,
    raster::{ColorMode, RasterBuffer},
    utils::{cmyk_to_kcmy, invert_gray, rgb_to_kcmy, unpack_bilevel},
};

/// Longest PAM header line considered.
const MAX_LINE: usize = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Bilevel,
    Gray,
    Rgb,
    Cmyk,
}

impl Format {
    fn mode(self) -> ColorMode {
        match self {
            Self::Bilevel | Self::Gray => ColorMode::Monochrome,
            Self::Rgb | Self::Cmyk => ColorMode::Color,
        }
    }

    /// Input bytes per row, `None` when that does not fit a `usize`.
    fn row_bytes(self, width: usize) -> Option<usize> {
        match self {
            Self::Bilevel => Some(width / 8 + usize::from(width % 8 != 0)),
            Self::Gray => Some(width),
            Self::Rgb => width.checked_mul(3),
            Self::Cmyk => width.checked_mul(4),
        }
    }
}

fn unsupported(what: impl Into<String>) -> Error {
    Error::UnsupportedInput(what.into())
}

/// Reads pages until the stream ends.
pub struct PnmReader<R: BufRead> {
    input: R,
}

impl<R: BufRead> PnmReader<R> {
    pub fn new(input: R) -> Self {
        PnmReader { input }
    }

    /// The next page, or `None` at a clean end of stream.
    pub fn next_page(&mut self) -> Result<Option<RasterBuffer>, Error> {
        let magic = match self.byte()? {
            None => return Ok(None),
            Some(b) => b,
        };
        let kind = self.byte()?;
        if magic != b'P' {
            return Err(unsupported(format!("bad magic byte {:#04x}", magic)));
        }

        let (format, width, height, maxval) = match kind {
            Some(b'4') => {
                let (w, h) = (self.int()?, self.int()?);
                (Format::Bilevel, w, h, Some(255))
            }
            Some(b'5') => (Format::Gray, self.int()?, self.int()?, self.int()?),
            Some(b'6') => (Format::Rgb, self.int()?, self.int()?, self.int()?),
            Some(b'7') => self.pam_header()?,
            Some(other) => return Err(unsupported(format!("format P{}", other as char))),
            None => return Err(unsupported("truncated magic")),
        };

        let (width, height) = match (width, height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(unsupported("missing or zero dimensions")),
        };
        if maxval != Some(255) {
            return Err(unsupported(format!("maxval {:?}, need 255", maxval)));
        }
        debug!("reading {:?} page {}x{}", format, width, height);

        let mut raster = RasterBuffer::new(width, height, format.mode())?;
        let row_bytes = format
            .row_bytes(width)
            .ok_or_else(|| unsupported(format!("row of {} pixels too long", width)))?;
        let mut line = vec![0u8; row_bytes];
        for y in 0..height {
            self.input.read_exact(&mut line).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => unsupported(format!("truncated at row {}", y)),
                _ => Error::Io(e),
            })?;
            let row = raster.row_mut(y);
            match format {
                Format::Bilevel => unpack_bilevel(&line, row),
                Format::Gray => invert_gray(&line, row),
                Format::Rgb => {
                    for (out, px) in row.chunks_exact_mut(4).zip(line.chunks_exact(3)) {
                        out.copy_from_slice(&rgb_to_kcmy([px[0], px[1], px[2]]));
                    }
                }
                Format::Cmyk => {
                    for (out, px) in row.chunks_exact_mut(4).zip(line.chunks_exact(4)) {
                        out.copy_from_slice(&cmyk_to_kcmy([px[0], px[1], px[2], px[3]]));
                    }
                }
            }
        }
        Ok(Some(raster))
    }

    /// `WIDTH`, `HEIGHT`, `DEPTH`, `MAXVAL` and `TUPLTYPE` lines up to `ENDHDR`.
    fn pam_header(&mut self) -> Result<(Format, Option<usize>, Option<usize>, Option<usize>), Error> {
        let (mut width, mut height, mut depth, mut maxval) = (None, None, None, None);
        let mut tuple_type = String::new();
        loop {
            let mut line = String::new();
            let n = (&mut self.input)
                .take(MAX_LINE as u64)
                .read_line(&mut line)?;
            if n == 0 {
                return Err(unsupported("PAM header ends early"));
            }
            let line = line.trim_end_matches('\n');
            if line == "ENDHDR" {
                break;
            }
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "WIDTH" => width = value.trim().parse().ok(),
                "HEIGHT" => height = value.trim().parse().ok(),
                "DEPTH" => depth = value.trim().parse::<usize>().ok(),
                "MAXVAL" => maxval = value.trim().parse().ok(),
                "TUPLTYPE" => tuple_type = value.to_string(),
                _ => {}
            }
        }
        if depth != Some(4) || tuple_type != "CMYK" {
            return Err(unsupported(format!(
                "PAM depth {:?} tuple type '{}', need 4 CMYK",
                depth, tuple_type
            )));
        }
        Ok((Format::Cmyk, width, height, maxval))
    }

    fn byte(&mut self) -> Result<Option<u8>, Error> {
        let b = match self.input.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.input.consume(1);
        Ok(Some(b))
    }

    /// Header integer: skips whitespace and `#` comments, consumes the one
    /// byte that ends the number.
    fn int(&mut self) -> Result<Option<usize>, Error> {
        let mut c = loop {
            match self.byte()? {
                Some(b'#') => {
                    while !matches!(self.byte()?, Some(b'\n') | None) {}
                }
                Some(b) if b.is_ascii_whitespace() => {}
                other => break other,
            }
        };
        let mut value = match c {
            Some(d) if d.is_ascii_digit() => usize::from(d - b'0'),
            _ => return Ok(None),
        };
        loop {
            c = self.byte()?;
            match c {
                Some(d) if d.is_ascii_digit() => {
                    value = value.saturating_mul(10).saturating_add(usize::from(d - b'0'));
                }
                _ => return Ok(Some(value)),
            }
        }
    }
}
