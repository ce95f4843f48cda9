//! Page encoding: the match loop over a guarded raster.

use log::debug;

use crate::{
    bits::BitChannel,
    blank::BlankBitmap,
    codes::{put_diff, put_run, MAX_RUN},
    error::Error,
    frame::{PageFrame, PageSetup},
    media::Paper,
    predictor::Predictors,
    raster::{GuardedRaster, Margins, RasterBuffer},
    token::{Token, TokenModel},
};

/// Token channel plus up to four colour planes.
const CHANNELS: usize = 5;

/// Compressed page, ready to be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPage {
    setup: PageSetup,
    channels: Vec<Vec<u8>>,
}

impl EncodedPage {
    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Token channel first, then K (or the single grey plane), C, M, Y.
    pub fn channels(&self) -> &[Vec<u8>] {
        &self.channels
    }

    pub fn channel_lengths(&self) -> Vec<usize> {
        self.channels.iter().map(Vec::len).collect()
    }

    pub fn frame(&self, page_number: u32) -> PageFrame {
        PageFrame::new(&self.setup, page_number, &self.channel_lengths())
    }
}

/// Whether a run of `len` pixels ending after `off` leaves the row that
/// holds pixel `off - 1`.
fn crosses_row(off: usize, len: usize, width: usize) -> bool {
    let (off, len, width) = (off as i64, len as i64, width as i64);
    // Truncating division: the pixel before offset 0 counts as row 0.
    (off - 1 + len) / width != (off - 1) / width
}

/// Encode one page.
///
/// Margins are erased before encoding. Each step either copies a run from
/// the best predictor or sends one literal pixel as per-channel differences
/// to its left neighbour.
pub fn encode_page(raster: &RasterBuffer, margins: &Margins) -> Result<EncodedPage, Error> {
    let mode = raster.mode();
    let depth = mode.depth();
    let page = GuardedRaster::build(raster, margins);
    let blank = BlankBitmap::build(&page, raster.width());
    let mut predictors = Predictors::new(page.width(), mode);
    let mut tokens = TokenModel::new();
    let mut channels: [BitChannel; CHANNELS] = Default::default();

    let total = page.pixel_count();
    let mut off = 0;
    // Set after a run shorter than MAX_RUN: rank 0 cannot match next.
    let mut continuation = false;
    let mut literals = 0usize;
    let mut runs = 0usize;

    while off < total {
        let found = predictors.longest_match(&page, &blank, off);
        if found.len == 0 {
            tokens.put(&mut channels[0], Token::Literal)?;
            let here = page.pixel(off as isize);
            let left = page.pixel(off as isize - 1);
            for (plane, (cur, prev)) in channels[1..=depth].iter_mut().zip(here.iter().zip(left)) {
                put_diff(plane, cur.wrapping_sub(*prev) as i8)?;
            }
            continuation = false;
            tokens.record_literal();
            off += 1;
            literals += 1;
            continue;
        }

        let len = found.len.min(total - off);
        predictors.promote(found.rank);
        if crosses_row(off, len, page.width()) {
            tokens.end_of_row(&mut channels[0])?;
        }
        let shift = usize::from(continuation);
        debug_assert!(found.rank >= shift, "rank 0 matched right after a short run");
        tokens.record_run(found.rank == shift);
        tokens.put(&mut channels[0], Token::Transition((found.rank - shift) as u8))?;
        put_run(&mut channels[0], len as u32)?;
        continuation = len < MAX_RUN as usize;
        off += len;
        runs += 1;
    }

    channels[0].put(0xFF, 8)?;
    let channels = channels
        .into_iter()
        .take(depth + 1)
        .map(BitChannel::finish)
        .collect::<Result<Vec<_>, _>>()?;

    let setup = PageSetup {
        paper: Paper::detect(raster.width(), raster.height()),
        mode,
        width: raster.width(),
        height: raster.height(),
    };
    debug!(
        "encoded {}x{} {:?} page ({:?}): {} runs, {} literals, channels {:?}",
        setup.width,
        setup.height,
        mode,
        setup.paper,
        runs,
        literals,
        channels.iter().map(Vec::len).collect::<Vec<_>>()
    );

    Ok(EncodedPage { setup, channels })
}
