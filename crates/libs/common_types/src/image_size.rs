use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// One of the stored renditions of a photo.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Thumbnail,
    Tablet,
    #[default]
    Desktop,
    Original,
}

impl ImageSize {
    /// The resized renditions, smallest first. The original is always kept as uploaded.
    pub const DERIVATIVES: [Self; 3] = [Self::Thumbnail, Self::Tablet, Self::Desktop];

    /// Bounding box `(max_width, max_height)` a derivative must fit in.
    #[must_use]
    pub const fn envelope(self) -> Option<(u32, u32)> {
        match self {
            Self::Thumbnail => Some((300, 300)),
            Self::Tablet => Some((768, 768)),
            Self::Desktop => Some((1920, 1920)),
            Self::Original => None,
        }
    }

    /// Suffix used in derivative file names, `{stem}_{suffix}.{ext}`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumb",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Original => "original",
        }
    }

    /// Parses a size selector from a URL. Unknown selectors serve the original.
    #[must_use]
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "thumbnail" | "thumb" | "mobile" => Self::Thumbnail,
            "tablet" => Self::Tablet,
            "desktop" => Self::Desktop,
            _ => Self::Original,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Thumbnail => "thumbnail",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Original => "original",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(ImageSize::from_selector("thumbnail"), ImageSize::Thumbnail);
        assert_eq!(ImageSize::from_selector("tablet"), ImageSize::Tablet);
        assert_eq!(ImageSize::from_selector("desktop"), ImageSize::Desktop);
        assert_eq!(ImageSize::from_selector("original"), ImageSize::Original);
        assert_eq!(ImageSize::from_selector("huge"), ImageSize::Original);
        assert_eq!(ImageSize::default(), ImageSize::Desktop);
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(ImageSize::Thumbnail.envelope(), Some((300, 300)));
        assert_eq!(ImageSize::Tablet.envelope(), Some((768, 768)));
        assert_eq!(ImageSize::Desktop.envelope(), Some((1920, 1920)));
        assert_eq!(ImageSize::Original.envelope(), None);
    }
}
