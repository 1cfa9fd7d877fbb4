//! TMDB API client for the remote movie catalog.
//!
//! A thin HTTP client: popular titles on an empty query, paged search
//! otherwise. The movie catalog is independent of the cart; nothing here
//! touches cart state.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::config::TmdbConfig;

/// TMDB image CDN prefix for poster assets (w342 is the grid size).
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w342";

/// Errors that can occur when interacting with the TMDB API.
#[derive(Debug, Error)]
pub enum TmdbError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// TMDB API client.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

/// One page of movie results.
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// A movie as returned by TMDB.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

impl Movie {
    /// Full poster URL on the TMDB image CDN, if the movie has one.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{POSTER_BASE_URL}{path}"))
    }
}

impl TmdbClient {
    /// Create a new TMDB API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch a page of currently popular movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn popular(&self, page: u32) -> Result<MoviePage, TmdbError> {
        self.get("/movie/popular", &[("page", page.to_string())])
            .await
    }

    /// Search movies by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, TmdbError> {
        self.get(
            "/search/movie",
            &[
                ("query", query.to_string()),
                ("include_adult", "false".to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<MoviePage, TmdbError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.expose_secret())])
            .query(&[("language", "en-US")])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TmdbError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
