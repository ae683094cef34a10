//! # Fonts
//!
//! The report renders entirely in the Helvetica family — three of the 14
//! standard PDF fonts, which viewers ship built in. No font embedding, no
//! subsetting: a Type1 reference with WinAnsiEncoding is all the writer
//! needs, and the AFM metrics in [`metrics`] are all layout needs.

pub mod metrics;

/// The standard fonts this engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl StandardFont {
    /// The /BaseFont name for the PDF font dictionary.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Advance width of one character in points at `font_size`.
    /// Oblique shares the regular widths (true per the AFM files).
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let millis = match self {
            Self::Helvetica | Self::HelveticaOblique => metrics::helvetica_width(ch),
            Self::HelveticaBold => metrics::helvetica_bold_width(ch),
        };
        millis as f64 / 1000.0 * font_size
    }

    /// Width of a whole string in points at `font_size`.
    pub fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}
