//! Song library endpoints
//!
//! Listing always fetches the full library in its defined order and
//! filters in memory; the store stays authoritative and the response is
//! re-derivable from it. Inserts return no row state; clients re-fetch
//! to pick up the assigned guid and timestamps.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::db::songs::{self, NewSong, Song, SourceType};
use crate::error::ApiResult;
use crate::filter::{language_options, SongFilter};
use crate::AppState;
use joia_common::youtube;

/// One song plus its derived thumbnail. An empty thumbnail_url means
/// "no thumbnail available" and the consumer renders its fallback.
#[derive(Debug, Serialize)]
pub struct SongView {
    #[serde(flatten)]
    pub song: Song,
    pub thumbnail_url: String,
}

impl From<Song> for SongView {
    fn from(song: Song) -> Self {
        let thumbnail_url = match song.source_type {
            SourceType::Youtube => youtube::thumbnail_url(&song.source_url),
            SourceType::Local => String::new(),
        };
        Self { song, thumbnail_url }
    }
}

/// Filtered library listing
#[derive(Debug, Serialize)]
pub struct SongListResponse {
    /// Songs matching the active filters, in library order
    pub songs: Vec<SongView>,
    /// Size of the whole library
    pub total: usize,
    /// Number of songs matching the filters ("Showing X of Y")
    pub matched: usize,
    /// Language choices for the current library
    pub languages: Vec<String>,
}

/// GET /api/songs?search=&language=&duet=
pub async fn list_songs(
    State(state): State<AppState>,
    Query(filter): Query<SongFilter>,
) -> ApiResult<Json<SongListResponse>> {
    let all = songs::fetch_all(&state.db).await?;

    let total = all.len();
    let languages = language_options(&all);
    let matched_songs = filter.apply(all);

    Ok(Json(SongListResponse {
        total,
        matched: matched_songs.len(),
        languages,
        songs: matched_songs.into_iter().map(SongView::from).collect(),
    }))
}

/// POST /api/songs
///
/// Validates locally, inserts, and returns 201 without the row: the
/// authoritative state (guid, timestamps) is observed via a re-fetch.
pub async fn add_song(
    State(state): State<AppState>,
    Json(new_song): Json<NewSong>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let new_song = new_song.normalized();
    songs::insert_song(&state.db, &new_song).await?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

/// Build song library routes
pub fn song_routes() -> Router<AppState> {
    Router::new().route("/api/songs", get(list_songs).post(add_song))
}
