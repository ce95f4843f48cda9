//! Whole-page and whole-job tests through the public API.

use hbpl::{
    encode_page, ColorMode, Config, Job, Margins, MediaType, RasterBuffer, MAX_RUN, PAGE_END,
};

const EOJ: &[u8] = b"B\x1b%-12345X@PJL EOJ\n";
const ENTER: &[u8] = b"@PJL ENTER LANGUAGE=HBPL\n";
const JOB_RECORD_LEN: usize = 12;

/// Deterministic pseudo-random samples.
fn noise(width: usize, height: usize, mode: ColorMode, seed: u32) -> RasterBuffer {
    let mut state = seed;
    let samples = (0..width * height * mode.depth())
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect();
    RasterBuffer::from_samples(width, height, mode, samples).unwrap()
}

fn checkerboard(width: usize, height: usize, cell: usize) -> RasterBuffer {
    let mut raster = RasterBuffer::new(width, height, ColorMode::Monochrome).unwrap();
    for y in 0..height {
        for x in 0..width {
            if (x / cell + y / cell) % 2 == 1 {
                raster.set_pixel(x, y, &[0xFF]);
            }
        }
    }
    raster
}

fn le32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn find(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, w)| *w == needle)
        .map(|(i, _)| i)
        .collect()
}

fn run_job(config: Config, pages: &[RasterBuffer]) -> Vec<u8> {
    let mut job = Job::new(config, Vec::new());
    for page in pages {
        job.print_page(page).unwrap();
    }
    job.finish().unwrap()
}

#[test]
fn blank_page_costs_one_token_per_max_run() {
    for side in [8usize, 64, 600] {
        let raster = RasterBuffer::new(side, side, ColorMode::Monochrome).unwrap();
        let page = encode_page(&raster, &Margins::default()).unwrap();
        let lengths = page.channel_lengths();
        assert_eq!(lengths.len(), 2);
        // Only the first row marker is a literal.
        assert_eq!(lengths[1], 1, "{}x{}", side, side);

        // One literal, then runs of at most MAX_RUN pixels: a transition code
        // and a run code of at most 23 bits each, plus the closing byte.
        let runs = (side * side + MAX_RUN as usize - 1) / MAX_RUN as usize;
        assert!(lengths[0] >= runs * 5 / 2, "{}x{}: {:?}", side, side, lengths);
        assert!(lengths[0] <= 2 + 3 * runs, "{}x{}: {:?}", side, side, lengths);
    }
}

#[test]
fn checkerboard_beats_raw_size() {
    let raster = checkerboard(64, 64, 8);
    let page = encode_page(&raster, &Margins::none()).unwrap();
    let compressed: usize = page.channel_lengths().iter().sum();
    assert!(compressed < 64 * 64 / 4, "{} bytes", compressed);
}

#[test]
fn noise_grows_with_area() {
    let small = encode_page(&noise(16, 16, ColorMode::Monochrome, 1), &Margins::none()).unwrap();
    let large = encode_page(&noise(32, 32, ColorMode::Monochrome, 1), &Margins::none()).unwrap();
    let small: usize = small.channel_lengths().iter().sum();
    let large: usize = large.channel_lengths().iter().sum();
    assert!(large > 3 * small, "{} vs {}", large, small);
}

#[test]
fn fine_color_checkerboard_keeps_growing() {
    let cells = |n: usize| {
        let mut raster = RasterBuffer::new(n, n, ColorMode::Color).unwrap();
        for y in 0..n {
            for x in (y % 2..n).step_by(2) {
                raster.set_pixel(x, y, &[0xFF; 4]);
            }
        }
        encode_page(&raster, &Margins::none()).unwrap()
    };
    let small = cells(16);
    let large = cells(32);
    let small_total: usize = small.channel_lengths().iter().sum();
    let large_total: usize = large.channel_lengths().iter().sum();
    assert!(small.channels()[1].len() > 1);
    assert!(large_total > 2 * small_total, "{} vs {}", large_total, small_total);
}

#[test]
fn color_noise_fills_all_planes() {
    let page = encode_page(&noise(24, 24, ColorMode::Color, 7), &Margins::none()).unwrap();
    let lengths = page.channel_lengths();
    assert_eq!(lengths.len(), 5);
    assert!(lengths[1..].iter().all(|&n| n > 24 * 24 / 2), "{:?}", lengths);

    let frame = page.frame(1);
    assert_eq!(frame.total() as usize, 48 + lengths.iter().sum::<usize>());
}

#[test]
fn odd_width_is_padded() {
    let raster = RasterBuffer::new(13, 10, ColorMode::Monochrome).unwrap();
    let page = encode_page(&raster, &Margins::none()).unwrap();
    let frame = page.frame(1);
    let header = frame.header();
    assert_eq!(header[12], 255);
    assert_eq!(&header[15..17], &[6, 0]);
    assert_eq!(&header[17..19], &[4, 0]);
    assert_eq!(le32(header, 39), 16);
    assert_eq!(le32(header, 43), 10);
}

#[test]
fn encoding_leaves_the_input_alone() {
    let raster = noise(40, 20, ColorMode::Color, 3);
    let copy = raster.clone();
    let first = encode_page(&raster, &Margins::default()).unwrap();
    let second = encode_page(&raster, &Margins::default()).unwrap();
    assert_eq!(raster, copy);
    assert_eq!(first, second);
}

#[test]
fn margins_hide_border_content() {
    let mut dirty = RasterBuffer::new(64, 64, ColorMode::Monochrome).unwrap();
    for i in 0..64 {
        dirty.set_pixel(i, 0, &[0x80]);
        dirty.set_pixel(63, i, &[0x80]);
    }
    let clean = RasterBuffer::new(64, 64, ColorMode::Monochrome).unwrap();
    let margins = Margins::default();
    assert_eq!(
        encode_page(&dirty, &margins).unwrap().channels(),
        encode_page(&clean, &margins).unwrap().channels()
    );
}

#[test]
fn job_frames_every_page() {
    let pages = [
        RasterBuffer::new(64, 32, ColorMode::Monochrome).unwrap(),
        noise(64, 32, ColorMode::Monochrome, 9),
    ];
    let out = run_job(Config::new().username("tester"), &pages);

    let enter = find(&out, ENTER);
    assert_eq!(enter.len(), 1);
    assert!(out.ends_with(EOJ));

    let mut at = enter[0] + ENTER.len() + JOB_RECORD_LEN;
    for (number, raster) in pages.iter().enumerate() {
        let page = encode_page(raster, &Margins::default()).unwrap();
        let frame = page.frame(number as u32 + 1);
        let header_len = frame.header().len();
        assert_eq!(&out[at..at + header_len], frame.header());
        assert_eq!(le32(&out, at + 33), number as u32 + 1);
        at += header_len + frame.body().len();
        for channel in page.channels() {
            assert_eq!(&out[at..at + channel.len()], &channel[..]);
            at += channel.len();
        }
        assert_eq!(&out[at..at + 2], PAGE_END);
        at += 2;
    }
    assert_eq!(&out[at..], EOJ);
}

#[test]
fn first_page_sets_media_and_render_mode() {
    let envelope = RasterBuffer::new(2325, 4500, ColorMode::Color).unwrap();
    let out = run_job(Config::new(), &[envelope]);
    assert_eq!(find(&out, b"@MSIP=ENVELOPE").len(), 1);
    assert_eq!(find(&out, b"RENDERMODE=COLOR\n").len(), 1);

    let strip = RasterBuffer::new(100, 100, ColorMode::Monochrome).unwrap();
    let out = run_job(Config::new().media(MediaType::Labels), &[strip]);
    assert_eq!(find(&out, b"@MSIP=LABEL\"").len(), 1);
    assert_eq!(find(&out, b"RENDERMODE=GRAYSCALE\n").len(), 1);
}

#[test]
fn empty_job_is_just_the_trailer() {
    let out = run_job(Config::new(), &[]);
    assert_eq!(out, EOJ);
}
