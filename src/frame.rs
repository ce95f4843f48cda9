//! Fixed binary page header and body preceding the channel bytes.

use std::io::Write;

use crate::{
    error::Error,
    media::Paper,
    raster::ColorMode,
    RESOLUTION,
};

const HEADER_TEMPLATE: [u8; 90] = [
    0x43, 0x91, 0xa1, 0x00, 0x92, 0xa1, 0x01, 0x93, 0xa1, 0x01, 0x94, 0xa1,
    0x00, 0x95, 0xc2, 0x00, 0x00, 0x00, 0x00, 0x96, 0xa1, 0x00, 0x97, 0xc3,
    0x00, 0x00, 0x00, 0x00, 0x98, 0xa1, 0x00, 0x99, 0xa4, 0x01, 0x00, 0x00,
    0x00, 0x9a, 0xc4, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x9b,
    0xa1, 0x00, 0x9c, 0xa1, 0x01, 0x9d, 0xa1, 0x00, 0x9e, 0xa1, 0x02, 0x9f,
    0xa1, 0x05, 0xa0, 0xa1, 0x08, 0xa1, 0xa1, 0x00, 0xa2, 0xc4, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x51, 0x52, 0xa3, 0xa1, 0x00, 0xa4,
    0xb1, 0xa4, 0x00, 0x00, 0x00, 0x00,
];

const BODY_TEMPLATE: [u8; 48] = [
    0x20, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x10, 0x32, 0x04, 0x00,
    0xa1, 0x42, 0x00, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

pub const BODY_LEN: usize = BODY_TEMPLATE.len();

/// Closes every page.
pub const PAGE_END: &[u8; 2] = b"SD";

/// Header offsets.
const PAPER: usize = 12;
const PHYSICAL_WIDTH: usize = 15;
const PHYSICAL_HEIGHT: usize = 17;
const PHYSICAL_FLAG: usize = 21;
const PAGE_NUMBER: usize = 33;
const WIDTH: usize = 39;
const HEIGHT: usize = 43;
const COLOR_MODE: usize = 55;
const DEVICE_WIDTH: usize = 70;
const DEVICE_HEIGHT: usize = 74;
const TOTAL_TAG: usize = 85;
const TOTAL: usize = 86;

/// Body offsets.
const MONO_FLAG: usize = 4;
const COLOR_FLAG: usize = 6;
const CHANNEL_LENGTHS: usize = 32;

/// Geometry of the page being framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub paper: Paper,
    pub mode: ColorMode,
    /// Logical size in pixels at 600 dpi.
    pub width: usize,
    pub height: usize,
}

impl PageSetup {
    pub fn padded_width(&self) -> usize {
        (self.width + 7) & !7
    }
}

/// Pixels to tenths of a millimetre, rounded.
fn tenth_mm(px: usize) -> u16 {
    ((px * 254 + RESOLUTION / 2) / RESOLUTION) as u16
}

fn put_le(buf: &mut [u8], at: usize, bytes: &[u8]) {
    buf[at..at + bytes.len()].copy_from_slice(bytes);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFrame {
    header: [u8; 90],
    body: [u8; BODY_LEN],
    total: u32,
}

impl PageFrame {
    /// `channel_lengths` lists the token channel first, then one entry per
    /// colour plane.
    pub fn new(setup: &PageSetup, page_number: u32, channel_lengths: &[usize]) -> Self {
        let mut header = HEADER_TEMPLATE;
        let mut body = BODY_TEMPLATE;

        header[PAPER] = (setup.paper.code() >> 1) as u8;
        if setup.paper == Paper::Custom {
            put_le(&mut header, PHYSICAL_WIDTH, &tenth_mm(setup.width).to_le_bytes());
            put_le(&mut header, PHYSICAL_HEIGHT, &tenth_mm(setup.height).to_le_bytes());
            header[PHYSICAL_FLAG] = 2;
        }

        let width = (setup.padded_width() as u32).to_le_bytes();
        let height = (setup.height as u32).to_le_bytes();
        put_le(&mut header, PAGE_NUMBER, &page_number.to_le_bytes());
        put_le(&mut header, WIDTH, &width);
        put_le(&mut header, HEIGHT, &height);
        put_le(&mut header, DEVICE_WIDTH, &width);
        put_le(&mut header, DEVICE_HEIGHT, &height);

        match setup.mode {
            ColorMode::Color => {
                header[COLOR_MODE] = 139;
                body[COLOR_FLAG] = 1;
            }
            ColorMode::Monochrome => {
                header[COLOR_MODE] = 9;
                body[MONO_FLAG] = 8;
            }
        }

        let mut total = BODY_LEN as u32;
        for (i, &len) in channel_lengths.iter().enumerate() {
            put_le(&mut body, CHANNEL_LENGTHS + i * 4, &(len as u32).to_le_bytes());
            total += len as u32;
        }
        header[TOTAL_TAG] = if total > 0xFFFF { 0xa4 } else { 0xa2 };
        put_le(&mut header, TOTAL, &total.to_le_bytes());

        PageFrame {
            header,
            body,
            total,
        }
    }

    /// Header bytes as sent: the total field is two bytes wide unless it
    /// does not fit.
    pub fn header(&self) -> &[u8] {
        if self.total > 0xFFFF {
            &self.header
        } else {
            &self.header[..88]
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body length plus all channel bytes.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        w.write_all(self.header())?;
        w.write_all(self.body())?;
        Ok(())
    }
}
