//! Page rasters: the normalized input and the guarded copy the encoder walks.

use crate::error::Error;

/// Colour layout of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// One byte per pixel, 0 = white.
    Monochrome,
    /// Four bytes per pixel in device order K, C, M, Y; 0 = no ink.
    Color,
}

impl ColorMode {
    /// Bytes per pixel.
    pub fn depth(self) -> usize {
        match self {
            Self::Monochrome => 1,
            Self::Color => 4,
        }
    }

    pub fn is_color(self) -> bool {
        self == Self::Color
    }

    /// Value of the guard cells around the page.
    pub fn background(self) -> u8 {
        match self {
            Self::Monochrome => 0x00,
            Self::Color => 0xFF,
        }
    }
}

/// Widths in pixels of the borders erased before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Margins {
    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Margins {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Keep the whole page.
    pub fn none() -> Self {
        Margins::new(0, 0, 0, 0)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::new(8, 8, 8, 8)
    }
}

impl std::str::FromStr for Margins {
    type Err = Error;

    /// Parse `left,top,right,bottom`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidConfig(format!("bad margin list '{}'", s)))?;
        match values[..] {
            [left, top, right, bottom] => Ok(Margins::new(left, top, right, bottom)),
            _ => Err(Error::InvalidConfig(
                "Must specify four clipping margins".to_string(),
            )),
        }
    }
}

/// A decoded page, row-major, `width * depth` bytes per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    mode: ColorMode,
    samples: Vec<u8>,
}

impl RasterBuffer {
    /// A blank page.
    pub fn new(width: usize, height: usize, mode: ColorMode) -> Result<Self, Error> {
        let len = Self::sample_count(width, height, mode)?;
        Ok(RasterBuffer {
            width,
            height,
            mode,
            samples: vec![0; len],
        })
    }

    pub fn from_samples(
        width: usize,
        height: usize,
        mode: ColorMode,
        samples: Vec<u8>,
    ) -> Result<Self, Error> {
        let expected = Self::sample_count(width, height, mode)?;
        if samples.len() != expected {
            return Err(Error::InvalidRaster(format!(
                "expected {} samples for {}x{} {:?}, got {}",
                expected,
                width,
                height,
                mode,
                samples.len()
            )));
        }
        Ok(RasterBuffer {
            width,
            height,
            mode,
            samples,
        })
    }

    /// Samples in a `width` x `height` page. Fails when the page or its
    /// padded, guarded copy has more samples than a `usize` holds.
    fn sample_count(width: usize, height: usize, mode: ColorMode) -> Result<usize, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidRaster(format!(
                "page must not be empty ({}x{})",
                width, height
            )));
        }
        let too_large = || Error::InvalidRaster(format!("page too large ({}x{})", width, height));
        let depth = mode.depth();
        let padded = width.checked_add(7).ok_or_else(too_large)? & !7;
        padded
            .checked_add(1)
            .and_then(|guard| padded.checked_mul(height)?.checked_add(guard))
            .and_then(|pixels| pixels.checked_mul(depth))
            .ok_or_else(too_large)?;
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(depth))
            .ok_or_else(too_large)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Width rounded up to a whole number of bytes of pixels.
    pub fn padded_width(&self) -> usize {
        (self.width + 7) & !7
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * self.mode.depth();
        &self.samples[y * stride..(y + 1) * stride]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.width * self.mode.depth();
        &mut self.samples[y * stride..(y + 1) * stride]
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let depth = self.mode.depth();
        &self.row(y)[x * depth..(x + 1) * depth]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: &[u8]) {
        let depth = self.mode.depth();
        self.row_mut(y)[x * depth..(x + 1) * depth].copy_from_slice(value);
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}

/// The page as the encoder sees it.
///
/// Pixels are addressed by a flat offset over the padded page. `width + 1`
/// guard pixels of background precede offset 0, so every predictor offset of
/// a pixel on the page is a valid read. The pixel left of column 0 is the last
/// pixel of the row above.
#[derive(Debug)]
pub struct GuardedRaster {
    width: usize,
    height: usize,
    mode: ColorMode,
    samples: Vec<u8>,
}

impl GuardedRaster {
    /// Copy `raster` onto a padded page, erase `margins` and mark the first
    /// pixel of every row solid.
    pub fn build(raster: &RasterBuffer, margins: &Margins) -> Self {
        let mode = raster.mode();
        let depth = mode.depth();
        let width = raster.padded_width();
        let height = raster.height();
        let logical = raster.width();
        let guard = (width + 1) * depth;
        let stride = width * depth;

        let mut samples = vec![0u8; guard + stride * height];
        samples[..guard].fill(mode.background());

        let keep_rows = margins.top..height.saturating_sub(margins.bottom);
        let keep_cols = margins.left.min(logical)..logical.saturating_sub(margins.right);
        for y in keep_rows {
            if keep_cols.is_empty() {
                break;
            }
            let src = &raster.row(y)[keep_cols.start * depth..keep_cols.end * depth];
            let start = guard + y * stride + keep_cols.start * depth;
            samples[start..start + src.len()].copy_from_slice(src);
        }
        for y in 0..height {
            let start = guard + y * stride;
            samples[start..start + depth].fill(0xFF);
        }

        GuardedRaster {
            width,
            height,
            mode,
            samples,
        }
    }

    /// Padded width.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Pixels on the page, guard excluded.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Samples of the pixel at flat offset `off`, which may reach into the guard.
    pub fn pixel(&self, off: isize) -> &[u8] {
        let depth = self.mode.depth();
        let start = ((self.width as isize + 1 + off) as usize) * depth;
        &self.samples[start..start + depth]
    }

    /// Sample bytes of one row.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * self.mode.depth();
        let start = (self.width + 1) * self.mode.depth() + y * stride;
        &self.samples[start..start + stride]
    }
}
