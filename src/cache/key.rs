//! Query identities for cached catalog requests

use std::fmt;

use crate::data::TimeWindow;

/// Logical identity of a catalog request.
///
/// Two requests with the same variant and normalized parameters share a cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Trending movies for a time window
    Trending { window: TimeWindow },
    /// One page of popular movies
    Popular { page: u32 },
    /// One page of search results
    Search { query: String, page: u32 },
    /// Full details for a single movie
    Details { id: u64 },
}

impl QueryKey {
    /// Builds a search key, trimming surrounding whitespace from the query.
    pub fn search(query: &str, page: u32) -> Self {
        Self::Search {
            query: normalize_query(query),
            page,
        }
    }

    /// String key used by the cache store
    pub fn cache_key(&self) -> String {
        match self {
            Self::Trending { window } => format!("trending:{}", window.as_str()),
            Self::Popular { page } => format!("popular:{}", page),
            Self::Search { query, page } => format!("search:{}:{}", query, page),
            Self::Details { id } => format!("details:{}", id),
        }
    }

    /// Name of the client operation this key belongs to
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Trending { .. } => "get_trending",
            Self::Popular { .. } => "get_popular_movies",
            Self::Search { .. } => "search_movies",
            Self::Details { .. } => "get_movie_details",
        }
    }

    /// Human-readable description of the parameters, used in error messages
    pub fn description(&self) -> String {
        match self {
            Self::Trending { window } => format!("window {}", window.as_str()),
            Self::Popular { page } => format!("page {}", page),
            Self::Search { query, page } => format!("query \"{}\", page {}", query, page),
            Self::Details { id } => format!("movie {}", id),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

/// Normalize search text for consistent keys.
fn normalize_query(query: &str) -> String {
    query.trim().to_string()
}
