//! The toolkit's type ramp.
//!
//! Fonts are exposed as data; actually setting a font on a widget is the
//! widget layer's business.

/// Family used throughout the toolkit.
pub const DEFAULT_FAMILY: &str = "Segoe UI";
/// Family substituted on systems without the default.
pub const FALLBACK_FAMILY: &str = "Microsoft YaHei UI";

/// Named steps of the type ramp.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TypographyStyle {
    Caption,
    Body,
    BodyStrong,
    BodyLarge,
    BodyLargeStrong,
    Subtitle,
    Title,
    TitleLarge,
    Display,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontWeight {
    Normal,
    DemiBold,
}

/// A concrete font request: family, pixel size, weight.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FontSpec {
    pub family: &'static str,
    pub pixel_size: u32,
    pub weight: FontWeight,
}

impl TypographyStyle {
    /// The font for this ramp step.
    pub fn font(self) -> FontSpec {
        let (pixel_size, weight) = match self {
            TypographyStyle::Caption => (12, FontWeight::Normal),
            TypographyStyle::Body => (14, FontWeight::Normal),
            TypographyStyle::BodyStrong => (14, FontWeight::DemiBold),
            TypographyStyle::BodyLarge => (18, FontWeight::Normal),
            TypographyStyle::BodyLargeStrong => (18, FontWeight::DemiBold),
            TypographyStyle::Subtitle => (20, FontWeight::DemiBold),
            TypographyStyle::Title => (28, FontWeight::DemiBold),
            TypographyStyle::TitleLarge => (40, FontWeight::DemiBold),
            TypographyStyle::Display => (68, FontWeight::DemiBold),
        };
        FontSpec {
            family: DEFAULT_FAMILY,
            pixel_size,
            weight,
        }
    }

    /// Look up a ramp step by its document name. Unknown names fall back to
    /// `Body`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Caption" => TypographyStyle::Caption,
            "Body" => TypographyStyle::Body,
            "BodyStrong" => TypographyStyle::BodyStrong,
            "BodyLarge" => TypographyStyle::BodyLarge,
            "BodyLargeStrong" => TypographyStyle::BodyLargeStrong,
            "Subtitle" => TypographyStyle::Subtitle,
            "Title" => TypographyStyle::Title,
            "TitleLarge" => TypographyStyle::TitleLarge,
            "Display" => TypographyStyle::Display,
            _ => TypographyStyle::Body,
        }
    }
}
