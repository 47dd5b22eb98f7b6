//! Library reconciliation
//!
//! Turns a completed karaoke job's result into a persisted library entry.
//! The caller guarantees at-most-once invocation per job (see
//! [`super::JobRegistry::begin_reconcile`]); this module only builds the
//! song and performs the single insert.

use crate::db::songs::{self, NewSong, SourceType};
use joia_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Title used when the submission carried none.
pub const FALLBACK_TITLE: &str = "Karaoke Song";

/// Artist used when the submission carried none.
pub const FALLBACK_ARTIST: &str = "Unknown";

/// Language assigned to generated karaoke videos.
pub const GENERATED_LANGUAGE: &str = "en";

/// Insert a completed job's result as a new youtube song.
///
/// Runs the full insert validation, so a result URL that is not a valid
/// YouTube link fails here rather than producing an unplayable entry.
pub async fn add_completed_song(
    pool: &SqlitePool,
    result_url: &str,
    title: Option<&str>,
    artist: Option<&str>,
) -> Result<Uuid> {
    let song = NewSong {
        title: non_empty_or(title, FALLBACK_TITLE),
        artist: non_empty_or(artist, FALLBACK_ARTIST),
        language: Some(GENERATED_LANGUAGE.to_string()),
        source_type: SourceType::Youtube,
        source_url: result_url.to_string(),
        duration_seconds: None,
        song_key: None,
        tempo_bpm: None,
        duet: false,
        notes: None,
    };

    songs::insert_song(pool, &song).await
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::songs::fetch_all;
    use joia_common::Error;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        crate::db::init_tables(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_adds_completed_song_with_fallbacks() {
        let pool = test_pool().await;

        add_completed_song(&pool, "https://youtu.be/abc12345678", None, None)
            .await
            .expect("insert");

        let songs = fetch_all(&pool).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, FALLBACK_TITLE);
        assert_eq!(songs[0].artist, FALLBACK_ARTIST);
        assert_eq!(songs[0].language.as_deref(), Some(GENERATED_LANGUAGE));
        assert_eq!(songs[0].source_type, SourceType::Youtube);
        assert_eq!(songs[0].source_url, "https://youtu.be/abc12345678");
        assert!(!songs[0].duet);
    }

    #[tokio::test]
    async fn test_uses_submitted_metadata_when_present() {
        let pool = test_pool().await;

        add_completed_song(
            &pool,
            "https://youtu.be/abc12345678",
            Some("Waterloo"),
            Some("ABBA"),
        )
        .await
        .unwrap();

        let songs = fetch_all(&pool).await.unwrap();
        assert_eq!(songs[0].title, "Waterloo");
        assert_eq!(songs[0].artist, "ABBA");
    }

    #[tokio::test]
    async fn test_blank_metadata_falls_back() {
        let pool = test_pool().await;

        add_completed_song(&pool, "https://youtu.be/abc12345678", Some("  "), Some(""))
            .await
            .unwrap();

        let songs = fetch_all(&pool).await.unwrap();
        assert_eq!(songs[0].title, FALLBACK_TITLE);
        assert_eq!(songs[0].artist, FALLBACK_ARTIST);
    }

    #[tokio::test]
    async fn test_invalid_result_url_surfaces_as_error() {
        let pool = test_pool().await;

        let err = add_completed_song(&pool, "/tmp/output/karaoke.mp4", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(fetch_all(&pool).await.unwrap().is_empty());
    }
}
