/// Pixel conversions from common image layouts to device samples.
///
use crate::{
    error::Error,
    raster::{ColorMode, RasterBuffer},
};

/// Expand a packed 1-bit row (MSB first, 1 = black) to one byte per pixel.
pub fn unpack_bilevel(packed: &[u8], out: &mut [u8]) {
    for (x, sample) in out.iter_mut().enumerate() {
        let bit = (packed[x >> 3] >> (!x & 7)) & 1;
        *sample = bit * 255;
    }
}

/// Grey levels (255 = white) to ink coverage (255 = black).
pub fn invert_gray(gray: &[u8], out: &mut [u8]) {
    for (sample, &g) in out.iter_mut().zip(gray) {
        *sample = !g;
    }
}

/// One RGB pixel to device K, C, M, Y.
///
/// Black takes the darkest component; the colour channels carry what is left
/// relative to the brightest one.
pub fn rgb_to_kcmy(rgb: [u8; 3]) -> [u8; 4] {
    let k = rgb.iter().copied().max().unwrap_or(0);
    let ink = |s: u8| {
        if k == 0 {
            255
        } else {
            ((u32::from(k) - u32::from(s)) * 255 / u32::from(k)) as u8
        }
    };
    [!k, ink(rgb[0]), ink(rgb[1]), ink(rgb[2])]
}

/// One CMYK pixel to device order K, C, M, Y.
pub fn cmyk_to_kcmy(cmyk: [u8; 4]) -> [u8; 4] {
    [cmyk[3], cmyk[0], cmyk[1], cmyk[2]]
}

/// Build a colour raster from packed RGB rows.
pub fn convert_rgb(width: usize, height: usize, rgb_data: &[u8]) -> Result<RasterBuffer, Error> {
    if rgb_data.len() != width * height * 3 {
        return Err(Error::InvalidRaster(
            "RGB data size doesn't match width * height * 3".to_string(),
        ));
    }
    let mut raster = RasterBuffer::new(width, height, ColorMode::Color)?;
    for y in 0..height {
        let src = &rgb_data[y * width * 3..(y + 1) * width * 3];
        let dst = raster.row_mut(y);
        for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(3)) {
            out.copy_from_slice(&rgb_to_kcmy([px[0], px[1], px[2]]));
        }
    }
    Ok(raster)
}
