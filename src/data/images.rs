//! Poster and backdrop URL construction

use std::fmt;

/// Base URL of the TMDB image CDN
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Image sizes published by the TMDB image CDN
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    W92,
    W154,
    W185,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl ImageSize {
    /// URL segment for this size
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a full image URL from a TMDB image path
///
/// Returns `None` when `path` is absent or empty. `size` defaults to `w500` and is
/// passed through as given, so unknown sizes produce a URL the CDN will reject.
pub fn image_url(base_url: &str, path: Option<&str>, size: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let size = size.unwrap_or(ImageSize::default().as_str());

    Some(format!("{}/{}{}", base_url.trim_end_matches('/'), size, path))
}
