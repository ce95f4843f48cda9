//! Run search against five spatial predictors kept in move-to-front order.

use crate::{
    blank::BlankBitmap,
    codes::MAX_RUN,
    raster::{ColorMode, GuardedRaster},
};

pub const PREDICTORS: usize = 5;

/// Move-to-front ordering of the predictors. `rotor[rank]` is a predictor index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotor([usize; PREDICTORS]);

impl Default for Rotor {
    fn default() -> Self {
        Rotor([0, 1, 2, 3, 4])
    }
}

impl Rotor {
    pub fn get(&self, rank: usize) -> usize {
        self.0[rank]
    }

    /// Move the predictor at `rank` to the front, shifting the ones before it back.
    pub fn promote(&mut self, rank: usize) {
        self.0[..=rank].rotate_right(1);
    }
}

/// Best run found at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Rank of the winning predictor in the rotor at search time.
    pub rank: usize,
    /// Matching pixels, zero when nothing matched.
    pub len: usize,
}

#[derive(Debug)]
pub struct Predictors {
    offsets: [isize; PREDICTORS],
    rotor: Rotor,
}

impl Predictors {
    /// Offsets for a page `width` pixels wide (padded): left, up, up-left,
    /// up-right, and either two-up-right (color) or eight pixels left.
    pub fn new(width: usize, mode: ColorMode) -> Self {
        let w = width as isize;
        let far = match mode {
            ColorMode::Color => 2 - w,
            ColorMode::Monochrome => -8,
        };
        Predictors {
            offsets: [-1, -w, -1 - w, 1 - w, far],
            rotor: Rotor::default(),
        }
    }

    /// Offset of the predictor currently at `rank`.
    pub fn offset(&self, rank: usize) -> isize {
        self.offsets[self.rotor.get(rank)]
    }

    pub fn promote(&mut self, rank: usize) {
        self.rotor.promote(rank);
    }

    /// Longest run starting at `off`, trying predictors in rank order.
    ///
    /// Later predictors must be strictly longer to win. Runs stop at a
    /// sample or mask mismatch, at [`MAX_RUN`], or at the end of the page.
    pub fn longest_match(&self, raster: &GuardedRaster, blank: &BlankBitmap, off: usize) -> Match {
        let limit = (MAX_RUN as usize).min(raster.pixel_count() - off);
        let mut best = Match { rank: 0, len: 0 };
        for rank in 0..PREDICTORS {
            let from = off as isize + self.offset(rank);
            let here = off as isize;
            let len = (0..limit as isize)
                .position(|k| {
                    raster.pixel(here + k) != raster.pixel(from + k)
                        || blank.is_set(here + k) != blank.is_set(from + k)
                })
                .unwrap_or(limit);
            if len > best.len {
                best = Match { rank, len };
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{Margins, RasterBuffer};

    fn page(raster: &RasterBuffer) -> (GuardedRaster, BlankBitmap) {
        let guarded = GuardedRaster::build(raster, &Margins::none());
        let blank = BlankBitmap::build(&guarded, raster.width());
        (guarded, blank)
    }

    #[test]
    fn promote_moves_to_front() {
        let order = |rotor: &Rotor| (0..PREDICTORS).map(|r| rotor.get(r)).collect::<Vec<_>>();
        let mut rotor = Rotor::default();
        rotor.promote(3);
        assert_eq!(order(&rotor), [3, 0, 1, 2, 4]);
        rotor.promote(0);
        assert_eq!(order(&rotor), [3, 0, 1, 2, 4]);
        rotor.promote(4);
        assert_eq!(order(&rotor), [4, 3, 0, 1, 2]);
    }

    #[test]
    fn offsets_depend_on_mode() {
        let color = Predictors::new(16, ColorMode::Color);
        assert_eq!((0..5).map(|r| color.offset(r)).collect::<Vec<_>>(), vec![-1, -16, -17, -15, -14]);
        let mono = Predictors::new(16, ColorMode::Monochrome);
        assert_eq!(mono.offset(4), -8);
    }

    #[test]
    fn first_pixel_of_blank_page_is_literal() {
        let raster = RasterBuffer::new(8, 8, ColorMode::Monochrome).unwrap();
        let (guarded, blank) = page(&raster);
        let predictors = Predictors::new(8, ColorMode::Monochrome);
        // Marker pixel against an all-background guard.
        assert_eq!(predictors.longest_match(&guarded, &blank, 0).len, 0);
        // The rest of the page repeats the row above.
        assert_eq!(
            predictors.longest_match(&guarded, &blank, 1),
            Match { rank: 1, len: 63 }
        );
    }

    #[test]
    fn ties_go_to_the_earlier_rank() {
        let samples = vec![0xFF; 64];
        let raster = RasterBuffer::from_samples(8, 8, ColorMode::Monochrome, samples).unwrap();
        let (guarded, blank) = page(&raster);
        let mut predictors = Predictors::new(8, ColorMode::Monochrome);

        // Inside the second row every predictor sees solid pixels to the end.
        assert_eq!(
            predictors.longest_match(&guarded, &blank, 9),
            Match { rank: 0, len: 55 }
        );

        predictors.promote(3);
        let found = predictors.longest_match(&guarded, &blank, 9);
        assert_eq!(found, Match { rank: 0, len: 55 });
        assert_eq!(predictors.offset(found.rank), -7);
    }

    #[test]
    fn runs_stop_at_max_run() {
        let raster = RasterBuffer::new(200, 100, ColorMode::Color).unwrap();
        let (guarded, blank) = page(&raster);
        let predictors = Predictors::new(200, ColorMode::Color);
        // From the second row on every row repeats the one above.
        let found = predictors.longest_match(&guarded, &blank, 201);
        assert_eq!(found, Match { rank: 1, len: MAX_RUN as usize });
    }
}
