//! Watchlist home page route handlers.
//!
//! The watchlist is the landing page: a persisted list of titles to watch,
//! edited through HTMX fragment swaps.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::WatchlistEntry;
use crate::models::session::context_id;
use crate::state::AppState;

/// Watchlist entry display data for templates.
#[derive(Clone)]
pub struct WatchlistEntryView {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl From<&WatchlistEntry> for WatchlistEntryView {
    fn from(entry: &WatchlistEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            text: entry.text.clone(),
            completed: entry.completed,
        }
    }
}

/// Watchlist filter, from the `?filter=` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    fn keeps(self, entry: &WatchlistEntry) -> bool {
        match self {
            Self::All => true,
            Self::Active => !entry.completed,
            Self::Completed => entry.completed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Filter,
}

/// Add watchlist entry form data.
#[derive(Debug, Deserialize)]
pub struct AddEntryForm {
    pub text: String,
}

/// Rename watchlist entry form data.
#[derive(Debug, Deserialize)]
pub struct RenameEntryForm {
    pub id: Uuid,
    pub text: String,
}

/// Toggle/remove watchlist entry form data.
#[derive(Debug, Deserialize)]
pub struct EntryIdForm {
    pub id: Uuid,
}

/// Watchlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub entries: Vec<WatchlistEntryView>,
}

/// Watchlist items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/watchlist_items.html")]
pub struct WatchlistItemsTemplate {
    pub entries: Vec<WatchlistEntryView>,
}

fn entry_views(entries: &[WatchlistEntry], filter: Filter) -> Vec<WatchlistEntryView> {
    entries
        .iter()
        .filter(|entry| filter.keeps(entry))
        .map(WatchlistEntryView::from)
        .collect()
}

async fn items_fragment(state: &AppState, session: &Session) -> Result<Response> {
    let context = context_id(session).await?;
    let entries = state.watchlist(context).load();
    Ok(WatchlistItemsTemplate {
        entries: entry_views(&entries, Filter::All),
    }
    .into_response())
}

/// Display the watchlist page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    let entries = state.watchlist(context).load();

    Ok(IndexTemplate {
        entries: entry_views(&entries, query.filter),
    }
    .into_response())
}

/// Add a watchlist entry (HTMX).
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddEntryForm>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    state.watchlist(context).add(&form.text)?;
    items_fragment(&state, &session).await
}

/// Toggle an entry's watched state (HTMX).
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<EntryIdForm>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    state.watchlist(context).toggle(form.id)?;
    items_fragment(&state, &session).await
}

/// Rename an entry (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RenameEntryForm>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    state.watchlist(context).rename(form.id, &form.text)?;
    items_fragment(&state, &session).await
}

/// Delete an entry (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<EntryIdForm>,
) -> Result<Response> {
    let context = context_id(&session).await?;
    state.watchlist(context).remove(form.id)?;
    items_fragment(&state, &session).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(text: &str, completed: bool) -> WatchlistEntry {
        let mut entry = WatchlistEntry::new(text);
        entry.completed = completed;
        entry
    }

    #[test]
    fn test_filter_active() {
        let entries = [entry("a", false), entry("b", true)];
        let views = entry_views(&entries, Filter::Active);
        assert_eq!(views.len(), 1);
        assert_eq!(views.first().unwrap().text, "a");
    }

    #[test]
    fn test_filter_completed() {
        let entries = [entry("a", false), entry("b", true)];
        let views = entry_views(&entries, Filter::Completed);
        assert_eq!(views.len(), 1);
        assert_eq!(views.first().unwrap().text, "b");
    }

    #[test]
    fn test_filter_all_is_default() {
        assert_eq!(Filter::default(), Filter::All);
        let entries = [entry("a", false), entry("b", true)];
        assert_eq!(entry_views(&entries, Filter::All).len(), 2);
    }
}
