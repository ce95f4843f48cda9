use crate::error::Error;

/// Paper sizes the firmware knows by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paper {
    Letter,
    Legal,
    A4,
    Executive,
    Envelope10,
    EnvelopeMonarch,
    EnvelopeC5,
    EnvelopeDL,
    B5Jis,
    A5,
    Folio,
    /// Anything else; the header then carries the physical size.
    Custom,
}

/// Size in 1/600 inch.
struct PaperSpec {
    code: u16,
    width: usize,
    height: usize,
}

/// Detection tolerance in 1/600 inch, about 1.5 mm.
const TOLERANCE: usize = 36;

const KNOWN: [Paper; 11] = [
    Paper::Letter,
    Paper::Legal,
    Paper::A4,
    Paper::Executive,
    Paper::Envelope10,
    Paper::EnvelopeMonarch,
    Paper::EnvelopeC5,
    Paper::EnvelopeDL,
    Paper::B5Jis,
    Paper::A5,
    Paper::Folio,
];

impl Paper {
    fn spec(&self) -> PaperSpec {
        match self {
            Self::Letter => PaperSpec { code: 0, width: 5100, height: 6600 },
            Self::Legal => PaperSpec { code: 2, width: 5100, height: 8400 },
            Self::A4 => PaperSpec { code: 4, width: 4961, height: 7016 },
            Self::Executive => PaperSpec { code: 6, width: 4350, height: 6300 },
            Self::Envelope10 => PaperSpec { code: 13, width: 2475, height: 5700 },
            Self::EnvelopeMonarch => PaperSpec { code: 15, width: 2325, height: 4500 },
            Self::EnvelopeC5 => PaperSpec { code: 17, width: 3827, height: 5409 },
            Self::EnvelopeDL => PaperSpec { code: 19, width: 2599, height: 5197 },
            Self::B5Jis => PaperSpec { code: 22, width: 4299, height: 6071 },
            Self::A5 => PaperSpec { code: 30, width: 3496, height: 4961 },
            Self::Folio => PaperSpec { code: 410, width: 5100, height: 7800 },
            Self::Custom => PaperSpec { code: 510, width: 0, height: 0 },
        }
    }

    /// Match a 600 dpi page against the known sizes; the first hit wins.
    pub fn detect(width: usize, height: usize) -> Self {
        KNOWN
            .iter()
            .copied()
            .find(|paper| {
                let spec = paper.spec();
                width.abs_diff(spec.width) < TOLERANCE && height.abs_diff(spec.height) < TOLERANCE
            })
            .unwrap_or(Paper::Custom)
    }

    pub fn code(&self) -> u16 {
        self.spec().code
    }

    /// Odd codes are envelopes.
    pub fn is_envelope(&self) -> bool {
        self.code() & 1 == 1
    }

    /// Nominal size in 1/600 inch, `None` for [`Paper::Custom`].
    pub fn size(&self) -> Option<(usize, usize)> {
        match self {
            Self::Custom => None,
            _ => {
                let spec = self.spec();
                Some((spec.width, spec.height))
            }
        }
    }
}

/// Media type announced in the job header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Plain,
    Bond,
    LightweightCard,
    LightweightGlossyCard,
    Labels,
    Envelope,
    Recycled,
    PlainSide2,
    BondSide2,
    LightweightCardSide2,
    LightweightGlossyCardSide2,
    RecycledSide2,
}

impl MediaType {
    /// Media for a code given on the command line; 0 means detect.
    pub fn from_code(code: u8) -> Result<Option<Self>, Error> {
        let media = match code {
            0 => return Ok(None),
            1 => Self::Plain,
            2 => Self::Bond,
            3 => Self::LightweightCard,
            4 => Self::LightweightGlossyCard,
            5 => Self::Labels,
            6 => Self::Envelope,
            7 => Self::Recycled,
            8 => Self::PlainSide2,
            9 => Self::BondSide2,
            10 => Self::LightweightCardSide2,
            11 => Self::LightweightGlossyCardSide2,
            12 => Self::RecycledSide2,
            _ => return Err(Error::InvalidConfig(format!("unknown media code {}", code))),
        };
        Ok(Some(media))
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Plain => 1,
            Self::Bond => 2,
            Self::LightweightCard => 3,
            Self::LightweightGlossyCard => 4,
            Self::Labels => 5,
            Self::Envelope => 6,
            Self::Recycled => 7,
            Self::PlainSide2 => 8,
            Self::BondSide2 => 9,
            Self::LightweightCardSide2 => 10,
            Self::LightweightGlossyCardSide2 => 11,
            Self::RecycledSide2 => 12,
        }
    }

    /// Name used by the `@MSIP` job attribute.
    pub fn pjl_name(&self) -> &'static str {
        match self {
            Self::Plain => "NORMAL",
            Self::Bond => "THICK",
            Self::LightweightCard => "HIGHQUALITY",
            Self::LightweightGlossyCard => "COAT2",
            Self::Labels => "LABEL",
            Self::Envelope => "ENVELOPE",
            Self::Recycled => "RECYCLED",
            Self::PlainSide2 => "NORMALREV",
            Self::BondSide2 => "THICKSIDE2",
            Self::LightweightCardSide2 => "HIGHQUALITYREV",
            Self::LightweightGlossyCardSide2 => "COATEDPAPER2REV",
            Self::RecycledSide2 => "RECYCLEREV",
        }
    }

    /// Envelope media for envelope sizes, plain paper otherwise.
    pub fn default_for(paper: Paper) -> Self {
        if paper.is_envelope() {
            Self::Envelope
        } else {
            Self::Plain
        }
    }
}
