//! Song library persistence
//!
//! The persistent store is the sole authority for the song collection; the
//! service holds no cache and re-fetches after every mutation. Songs are
//! inserted by the add-song flow or by reconciliation after a karaoke
//! creation job completes, and are never mutated or deleted here.

use joia_common::{youtube, Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Where a song's media lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Playable YouTube video; source_url must carry a valid video id
    Youtube,
    /// Local media server URL (Jellyfin or similar); not validated
    Local,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Youtube => "youtube",
            SourceType::Local => "local",
        }
    }

    fn from_db(value: &str) -> Result<Self> {
        match value {
            "youtube" => Ok(SourceType::Youtube),
            "local" => Ok(SourceType::Local),
            other => Err(Error::Internal(format!(
                "unknown source_type in database: {}",
                other
            ))),
        }
    }
}

/// Song record as stored
#[derive(Debug, Clone, Serialize)]
pub struct Song {
    pub guid: Uuid,
    pub title: String,
    pub artist: String,
    pub language: Option<String>,
    pub source_type: SourceType,
    pub source_url: String,
    pub duration_seconds: Option<i64>,
    pub song_key: Option<String>,
    pub tempo_bpm: Option<i64>,
    pub duet: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for inserting a new song.
///
/// The store assigns guid and timestamps; callers re-fetch the library to
/// observe them.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub language: Option<String>,
    pub source_type: SourceType,
    pub source_url: String,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub song_key: Option<String>,
    #[serde(default)]
    pub tempo_bpm: Option<i64>,
    #[serde(default)]
    pub duet: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSong {
    /// Collapse empty optional text fields to absent.
    pub fn normalized(mut self) -> Self {
        let clear = |field: &mut Option<String>| {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        };
        clear(&mut self.language);
        clear(&mut self.song_key);
        clear(&mut self.notes);
        self
    }

    /// Local validation, run before any database call.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty()
            || self.artist.trim().is_empty()
            || self.source_url.trim().is_empty()
        {
            return Err(Error::Validation(
                "title, artist, and source_url are required".to_string(),
            ));
        }

        if self.source_type == SourceType::Youtube
            && youtube::extract_video_id(&self.source_url).is_none()
        {
            return Err(Error::Validation(
                "source_url is not a valid YouTube link".to_string(),
            ));
        }

        if self.duration_seconds.is_some_and(|d| d < 0) {
            return Err(Error::Validation(
                "duration_seconds must not be negative".to_string(),
            ));
        }

        if self.tempo_bpm.is_some_and(|t| t < 1) {
            return Err(Error::Validation("tempo_bpm must be positive".to_string()));
        }

        Ok(())
    }
}

/// Fetch the whole library, ordered by artist then title.
pub async fn fetch_all(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, title, artist, language, source_type, source_url,
               duration_seconds, song_key, tempo_bpm, duet, notes,
               created_at, updated_at
        FROM songs
        ORDER BY artist ASC, title ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let guid_str: String = row.get("guid");
            let source_type_str: String = row.get("source_type");

            Ok(Song {
                guid: Uuid::parse_str(&guid_str)
                    .map_err(|e| Error::Internal(format!("bad guid in songs table: {}", e)))?,
                title: row.get("title"),
                artist: row.get("artist"),
                language: row.get("language"),
                source_type: SourceType::from_db(&source_type_str)?,
                source_url: row.get("source_url"),
                duration_seconds: row.get("duration_seconds"),
                song_key: row.get("song_key"),
                tempo_bpm: row.get("tempo_bpm"),
                duet: row.get::<i64, _>("duet") != 0,
                notes: row.get("notes"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            })
        })
        .collect()
}

/// Insert a song, returning its newly assigned guid.
///
/// Validates locally first; a rejected song never reaches the database.
pub async fn insert_song(pool: &SqlitePool, song: &NewSong) -> Result<Uuid> {
    song.validate()?;

    let guid = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO songs (
            guid, title, artist, language, source_type, source_url,
            duration_seconds, song_key, tempo_bpm, duet, notes,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        "#,
    )
    .bind(guid.to_string())
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.language)
    .bind(song.source_type.as_str())
    .bind(&song.source_url)
    .bind(song.duration_seconds)
    .bind(&song.song_key)
    .bind(song.tempo_bpm)
    .bind(song.duet as i64)
    .bind(&song.notes)
    .execute(pool)
    .await?;

    Ok(guid)
}
