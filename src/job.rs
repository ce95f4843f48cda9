use std::io::Write;

use chrono::Local;
use log::{debug, info};

use crate::{
    encoder::encode_page,
    error::Error,
    frame::PAGE_END,
    media::{MediaType, Paper},
    pjl::{self, JobHeader},
    raster::{Margins, RasterBuffer},
};

/// Config
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    media: Option<MediaType>,
    margins: Margins,
    filename: Option<String>,
    username: Option<String>,
    computer_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Initialize configuration data with default values.
    ///
    /// Media is detected from the first page, margins are 8 pixels on every
    /// side.
    ///
    /// # Example
    ///
    /// ```
    /// use hbpl::{Config, Margins, MediaType};
    ///
    /// let config = Config::new()
    ///     .media(MediaType::Labels)
    ///     .margins(Margins::new(0, 0, 0, 0))
    ///     .username("alice");
    /// ```
    ///
    pub fn new() -> Config {
        Config {
            media: None,
            margins: Margins::default(),
            filename: None,
            username: None,
            computer_name: "My Computer".to_string(),
        }
    }

    pub fn media(self, media: MediaType) -> Self {
        Config {
            media: Some(media),
            ..self
        }
    }

    /// Leave the media to be derived from the first page's paper size.
    pub fn detect_media(self) -> Self {
        Config {
            media: None,
            ..self
        }
    }

    pub fn margins(self, margins: Margins) -> Self {
        Config { margins, ..self }
    }

    /// Document name shown on the printer panel.
    pub fn filename(self, filename: impl Into<String>) -> Self {
        Config {
            filename: Some(filename.into()),
            ..self
        }
    }

    pub fn username(self, username: impl Into<String>) -> Self {
        Config {
            username: Some(username.into()),
            ..self
        }
    }

    pub fn computer_name(self, name: impl Into<String>) -> Self {
        Config {
            computer_name: name.into(),
            ..self
        }
    }

    pub fn get_margins(&self) -> &Margins {
        &self.margins
    }
}

/// A print job writing HBPL pages to `W`.
///
/// The PJL preamble goes out with the first page, so that the media and
/// render mode can follow that page. Pages are numbered from 1.
pub struct Job<W: Write> {
    writer: W,
    config: Config,
    media: Option<MediaType>,
    page_number: u32,
}

impl<W: Write> Job<W> {
    pub fn new(config: Config, writer: W) -> Self {
        let media = config.media;
        Job {
            writer,
            config,
            media,
            page_number: 0,
        }
    }

    /// Pages written so far.
    pub fn pages(&self) -> u32 {
        self.page_number
    }

    /// Media in effect, once known.
    pub fn media(&self) -> Option<MediaType> {
        self.media
    }

    /// Encode and write one page.
    ///
    /// The page is fully encoded before anything is written, so an error
    /// leaves no partial page behind.
    pub fn print_page(&mut self, raster: &RasterBuffer) -> Result<(), Error> {
        let page = encode_page(raster, &self.config.margins)?;

        if self.page_number == 0 {
            let paper = Paper::detect(raster.width(), raster.height());
            let media = *self
                .media
                .get_or_insert_with(|| MediaType::default_for(paper));
            info!(
                "starting job: {:?} media, {}",
                media,
                if raster.mode().is_color() { "color" } else { "grayscale" }
            );
            let header = JobHeader {
                timestamp: Local::now().naive_local(),
                filename: self.config.filename.as_deref(),
                username: self.config.username.as_deref(),
                computer_name: &self.config.computer_name,
                media,
                color: raster.mode().is_color(),
            };
            pjl::write_preamble(&mut self.writer, &header)?;
        }

        self.page_number += 1;
        let frame = page.frame(self.page_number);
        frame.write_to(&mut self.writer)?;
        for channel in page.channels() {
            self.writer.write_all(channel)?;
        }
        self.writer.write_all(PAGE_END)?;
        debug!("page {} written, {} bytes", self.page_number, frame.total());
        Ok(())
    }

    /// Write the end-of-job marker and hand back the writer.
    pub fn finish(mut self) -> Result<W, Error> {
        pjl::write_end_of_job(&mut self.writer)?;
        self.writer.flush()?;
        info!("job finished after {} pages", self.page_number);
        Ok(self.writer)
    }
}
