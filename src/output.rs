//! Plain-text rendering of catalog responses for the terminal

use std::fmt::Write;

use crate::data::{Movie, MovieClient, MovieDetails, MoviePage};

/// Number of cast members shown in details output
const CAST_SHOWN: usize = 5;

/// One summary line for a movie: id, title, year and rating
pub fn movie_line(movie: &Movie) -> String {
    let year = movie
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    format!(
        "{:>8}  {}{}  {:.1}/10",
        movie.id, movie.title, year, movie.vote_average
    )
}

/// A titled listing of a page of movies
pub fn page_listing(title: &str, page: &MoviePage) -> String {
    let mut out = format!("== {} ==\n", title);

    if page.results.is_empty() {
        out.push_str("  (no results)\n");
        return out;
    }

    for movie in &page.results {
        let _ = writeln!(out, "{}", movie_line(movie));
    }
    if page.total_pages > 1 {
        let _ = writeln!(out, "  page {} of {}", page.page, page.total_pages);
    }
    out
}

/// Multi-line details view
pub fn details_view(details: &MovieDetails, client: &MovieClient) -> String {
    let mut out = String::new();

    let year = details
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    let _ = writeln!(out, "{}{}", details.title, year);

    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "{}", tagline);
    }

    let runtime = details
        .runtime
        .filter(|&m| m > 0)
        .map(|m| format!("   Runtime: {} min", m))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Rating: {:.1}/10 ({} votes){}",
        details.vote_average, details.vote_count, runtime
    );

    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        let _ = writeln!(out, "Genres: {}", genres.join(", "));
    }
    if let Some(director) = details.director() {
        let _ = writeln!(out, "Director: {}", director);
    }

    let cast: Vec<String> = details
        .top_cast(CAST_SHOWN)
        .into_iter()
        .map(|member| match member.character.as_deref() {
            Some(character) if !character.is_empty() => {
                format!("{} as {}", member.name, character)
            }
            _ => member.name.clone(),
        })
        .collect();
    if !cast.is_empty() {
        let _ = writeln!(out, "Cast: {}", cast.join(", "));
    }

    if let Some(trailer) = details.trailer() {
        let _ = writeln!(out, "Trailer: https://www.youtube.com/watch?v={}", trailer.key);
    }
    if let Some(poster) = client.image_url(details.poster_path.as_deref(), None) {
        let _ = writeln!(out, "Poster: {}", poster);
    }

    if !details.overview.is_empty() {
        let _ = write!(out, "\n{}\n", details.overview);
    }
    out
}
