//! HBPL Printer Driver
//!
//! This crate converts page rasters into HBPL version 1, the page description
//! language of several Dell, Epson and Fuji-Xerox color laser printers
//! (Dell 1250c, C1660, C1760, Epson AcuLaser C1700, Fuji-Xerox DocuPrint CP105).
//!
//! # Example
//!
//! ```rust,no_run
//! use hbpl::{ColorMode, Config, Job, RasterBuffer};
//!
//! let page = RasterBuffer::new(4961, 7016, ColorMode::Color).unwrap();
//! let mut job = Job::new(Config::new(), std::io::stdout());
//! job.print_page(&page).unwrap();
//! job.finish().unwrap();
//! ```

mod bits;
mod blank;
mod codes;
mod encoder;
mod error;
mod frame;
mod job;
mod media;
mod pjl;
mod pnm;
mod predictor;
mod raster;
mod token;
mod utils;

pub use crate::{
    bits::BitChannel,
    codes::{put_diff, put_run, MAX_RUN},
    encoder::{encode_page, EncodedPage},
    error::Error,
    frame::{PageFrame, PageSetup, PAGE_END},
    job::{Config, Job},
    media::{MediaType, Paper},
    pjl::{write_end_of_job, write_preamble, JobHeader},
    pnm::PnmReader,
    raster::{ColorMode, Margins, RasterBuffer},
    token::{Token, TokenModel},
    utils::{cmyk_to_kcmy, convert_rgb, rgb_to_kcmy},
};

/// Printer resolution in dots per inch, both directions.
pub const RESOLUTION: usize = 600;
