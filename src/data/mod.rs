//! Core data models for the movie catalog
//!
//! This module contains the payload types returned by the TMDB endpoints the
//! client talks to, along with the client itself and image URL helpers.

pub mod catalog;
pub mod images;

pub use catalog::{CatalogError, ErrorKind, MovieClient};
pub use images::{image_url, ImageSize, DEFAULT_IMAGE_BASE_URL};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A movie record as it appears in list endpoints (trending, popular, search)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Plot summary
    #[serde(default)]
    pub overview: String,
    /// Poster image path, e.g. `/abc.jpg`
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Average user rating (0-10)
    pub vote_average: f64,
    /// Number of ratings
    #[serde(default)]
    pub vote_count: u32,
    /// Release date as `YYYY-MM-DD`; may be empty
    #[serde(default)]
    pub release_date: Option<String>,
    /// Genre identifiers
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Year parsed from `release_date`, if present and well formed
    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    /// Whether the movie has a non-empty poster path
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// One page of movie results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    /// 1-based page number
    #[serde(default = "first_page")]
    pub page: u32,
    /// Movies on this page
    pub results: Vec<Movie>,
    /// Total number of pages available upstream
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results available upstream
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

/// A genre attached to a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A cast credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    /// Character played
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order, lower is more prominent
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// A crew credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
}

/// Cast and crew appended to a details response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A video (trailer, teaser, clip) appended to a details response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Provider-specific key, e.g. a YouTube video id
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// Hosting site, e.g. "YouTube"
    #[serde(default)]
    pub site: String,
    /// Video type, e.g. "Trailer" or "Teaser"
    #[serde(default, rename = "type")]
    pub video_type: String,
}

/// Wrapper TMDB uses for appended videos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Full details for a single movie, including credits and videos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub videos: VideoList,
}

impl MovieDetails {
    /// Year parsed from `release_date`, if present and well formed
    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    /// Name of the first crew member credited as director
    pub fn director(&self) -> Option<&str> {
        self.credits
            .crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.as_str())
    }

    /// The `n` most prominently billed cast members
    pub fn top_cast(&self, n: usize) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.credits.cast.iter().collect();
        cast.sort_by_key(|member| member.order);
        cast.truncate(n);
        cast
    }

    /// First YouTube trailer, if any
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .results
            .iter()
            .find(|video| video.site == "YouTube" && video.video_type == "Trailer")
    }
}

/// Time window for the trending endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    /// Path segment used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }

    /// Parses a window name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(TimeWindow::Day),
            "week" => Some(TimeWindow::Week),
            _ => None,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the year out of a `YYYY-MM-DD` date, treating empty strings as absent
fn release_year(date: Option<&str>) -> Option<i32> {
    let date = date?.trim();
    if date.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRENDING_PAGE: &str = r#"{
        "page": 1,
        "results": [
            {
                "adult": false,
                "backdrop_path": "/back.jpg",
                "id": 693134,
                "title": "Dune: Part Two",
                "original_language": "en",
                "overview": "Paul Atreides unites with Chani.",
                "poster_path": "/dune2.jpg",
                "media_type": "movie",
                "genre_ids": [878, 12],
                "popularity": 512.3,
                "release_date": "2024-02-27",
                "vote_average": 8.2,
                "vote_count": 5120
            },
            {
                "id": 42,
                "title": "Untitled Project",
                "poster_path": null,
                "vote_average": 0,
                "release_date": ""
            }
        ],
        "total_pages": 500,
        "total_results": 10000
    }"#;

    const DETAILS: &str = r#"{
        "id": 603,
        "title": "The Matrix",
        "tagline": "Welcome to the Real World.",
        "overview": "Set in the 22nd century...",
        "poster_path": "/matrix.jpg",
        "release_date": "1999-03-30",
        "runtime": 136,
        "vote_average": 8.2,
        "vote_count": 25000,
        "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
        "credits": {
            "cast": [
                {"id": 2, "name": "Laurence Fishburne", "character": "Morpheus", "order": 1},
                {"id": 1, "name": "Keanu Reeves", "character": "Neo", "order": 0},
                {"id": 3, "name": "Carrie-Anne Moss", "character": "Trinity", "order": 2}
            ],
            "crew": [
                {"id": 10, "name": "Bill Pope", "job": "Director of Photography", "department": "Camera"},
                {"id": 11, "name": "Lana Wachowski", "job": "Director", "department": "Directing"}
            ]
        },
        "videos": {
            "results": [
                {"key": "teaser1", "name": "Teaser", "site": "YouTube", "type": "Teaser"},
                {"key": "vimeo1", "name": "Trailer", "site": "Vimeo", "type": "Trailer"},
                {"key": "m8e-FF8MsqU", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_trending_page() {
        let page: MoviePage = serde_json::from_str(TRENDING_PAGE).expect("Failed to parse page");

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 500);
        assert_eq!(page.results.len(), 2);

        let dune = &page.results[0];
        assert_eq!(dune.id, 693134);
        assert_eq!(dune.title, "Dune: Part Two");
        assert_eq!(dune.poster_path.as_deref(), Some("/dune2.jpg"));
        assert!((dune.vote_average - 8.2).abs() < 0.001);
        assert_eq!(dune.release_year(), Some(2024));
        assert!(dune.has_poster());
    }

    #[test]
    fn test_movie_with_null_poster_and_empty_date() {
        let page: MoviePage = serde_json::from_str(TRENDING_PAGE).unwrap();
        let untitled = &page.results[1];

        assert!(untitled.poster_path.is_none());
        assert!(!untitled.has_poster());
        assert_eq!(untitled.release_year(), None);
        assert!(untitled.overview.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let missing_title = r#"{"results": [{"id": 1, "vote_average": 5.0}]}"#;
        assert!(serde_json::from_str::<MoviePage>(missing_title).is_err());

        let missing_results = r#"{"page": 1}"#;
        assert!(serde_json::from_str::<MoviePage>(missing_results).is_err());
    }

    #[test]
    fn test_page_defaults_to_one() {
        let page: MoviePage = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.page, 1);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_parse_details_with_credits_and_videos() {
        let details: MovieDetails = serde_json::from_str(DETAILS).expect("Failed to parse details");

        assert_eq!(details.id, 603);
        assert_eq!(details.runtime, Some(136));
        assert_eq!(details.release_year(), Some(1999));
        assert_eq!(details.genres.len(), 2);
        assert_eq!(details.director(), Some("Lana Wachowski"));

        let top: Vec<&str> = details.top_cast(2).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["Keanu Reeves", "Laurence Fishburne"]);

        let trailer = details.trailer().expect("Should find a YouTube trailer");
        assert_eq!(trailer.key, "m8e-FF8MsqU");
    }

    #[test]
    fn test_details_without_appended_sections() {
        let details: MovieDetails =
            serde_json::from_str(r#"{"id": 1, "title": "Bare", "vote_average": 6.5}"#).unwrap();

        assert!(details.credits.cast.is_empty());
        assert!(details.director().is_none());
        assert!(details.trailer().is_none());
        assert!(details.top_cast(5).is_empty());
    }

    #[test]
    fn test_release_year_rejects_malformed_dates() {
        assert_eq!(release_year(Some("2024-02-27")), Some(2024));
        assert_eq!(release_year(Some("   ")), None);
        assert_eq!(release_year(Some("2024")), None);
        assert_eq!(release_year(None), None);
    }

    #[test]
    fn test_time_window() {
        assert_eq!(TimeWindow::default(), TimeWindow::Day);
        assert_eq!(TimeWindow::Week.as_str(), "week");
        assert_eq!(TimeWindow::parse("WEEK"), Some(TimeWindow::Week));
        assert_eq!(TimeWindow::parse(" day "), Some(TimeWindow::Day));
        assert_eq!(TimeWindow::parse("month"), None);
        assert_eq!(TimeWindow::Day.to_string(), "day");
    }
}
