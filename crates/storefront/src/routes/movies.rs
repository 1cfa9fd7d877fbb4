//! Movie search route handlers.
//!
//! A thin page over the remote TMDB catalog: popular titles when the query
//! is empty, paged search otherwise. Debouncing happens client-side via
//! the HTMX `delay:` trigger modifier; the handlers are stateless and the
//! movie catalog never interacts with the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::services::tmdb::{Movie, TmdbClient};
use crate::state::AppState;

/// Movie display data for templates.
#[derive(Clone)]
pub struct MovieView {
    pub title: String,
    pub poster_url: Option<String>,
    pub rating: String,
    pub release_date: String,
}

impl From<&Movie> for MovieView {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            poster_url: movie.poster_url(),
            rating: movie
                .vote_average
                .map_or_else(|| "—".to_string(), |avg| format!("★ {avg:.1}")),
            release_date: movie
                .release_date
                .clone()
                .unwrap_or_else(|| "TBD".to_string()),
        }
    }
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

/// Movie search page template.
#[derive(Template, WebTemplate)]
#[template(path = "movies.html")]
pub struct MoviesTemplate {
    pub enabled: bool,
    pub query: String,
    pub movies: Vec<MovieView>,
    pub error: Option<String>,
}

/// Search results fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/movie_results.html")]
pub struct MovieResultsTemplate {
    pub movies: Vec<MovieView>,
    pub error: Option<String>,
}

/// Fetch results for a query: popular titles when empty, search otherwise.
///
/// API failures surface as an inline error message, never a failed page.
async fn fetch(client: &TmdbClient, query: &str, page: u32) -> (Vec<MovieView>, Option<String>) {
    let trimmed = query.trim();
    let outcome = if trimmed.is_empty() {
        client.popular(page).await
    } else {
        client.search(trimmed, page).await
    };

    match outcome {
        Ok(movies) => (movies.results.iter().map(MovieView::from).collect(), None),
        Err(e) => {
            tracing::warn!(error = %e, "movie lookup failed");
            (Vec::new(), Some("Movie search failed. Try again.".to_string()))
        }
    }
}

/// Display the movie search page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let Some(client) = state.tmdb() else {
        return Ok(MoviesTemplate {
            enabled: false,
            query: String::new(),
            movies: Vec::new(),
            error: None,
        }
        .into_response());
    };

    let (movies, error) = fetch(client, &query.q, query.page.unwrap_or(1)).await;
    Ok(MoviesTemplate {
        enabled: true,
        query: query.q,
        movies,
        error,
    }
    .into_response())
}

/// Search results fragment (HTMX, debounced input).
#[instrument(skip(state))]
pub async fn results(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    let Some(client) = state.tmdb() else {
        return Ok(MovieResultsTemplate {
            movies: Vec::new(),
            error: None,
        }
        .into_response());
    };

    let (movies, error) = fetch(client, &query.q, query.page.unwrap_or(1)).await;
    Ok(MovieResultsTemplate { movies, error }.into_response())
}
