//! Song filter engine
//!
//! Pure, synchronous view over the fetched song set. The full set is
//! recomputed on every request; at library scale a full pass is cheaper
//! than being clever, and keeps the result trivially re-derivable.
//!
//! Predicates are conjunctive and order-preserving: text search over title
//! or artist (case-insensitive substring), exact language match, and duet
//! flag. Each predicate is inactive at its sentinel value, so an empty
//! filter is the identity.

use crate::db::songs::Song;
use serde::{Deserialize, Serialize};

/// Sentinel language value meaning "no language filtering".
pub const LANGUAGE_ALL: &str = "all";

/// Duet selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuetFilter {
    #[default]
    All,
    Yes,
    No,
}

/// Filter criteria, deserializable straight from query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SongFilter {
    /// Case-insensitive substring matched against title or artist
    #[serde(default)]
    pub search: String,

    /// Exact language code, or "all"
    #[serde(default = "default_language")]
    pub language: String,

    /// Duet flag selector
    #[serde(default)]
    pub duet: DuetFilter,
}

fn default_language() -> String {
    LANGUAGE_ALL.to_string()
}

impl Default for SongFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            language: default_language(),
            duet: DuetFilter::All,
        }
    }
}

impl SongFilter {
    /// Whether a single song satisfies every active predicate.
    pub fn matches(&self, song: &Song) -> bool {
        if !self.search.is_empty() {
            let query = self.search.to_lowercase();
            let hit = song.title.to_lowercase().contains(&query)
                || song.artist.to_lowercase().contains(&query);
            if !hit {
                return false;
            }
        }

        if self.language != LANGUAGE_ALL
            && song.language.as_deref() != Some(self.language.as_str())
        {
            return false;
        }

        match self.duet {
            DuetFilter::All => true,
            DuetFilter::Yes => song.duet,
            DuetFilter::No => !song.duet,
        }
    }

    /// Filter a song set, preserving its order.
    pub fn apply(&self, mut songs: Vec<Song>) -> Vec<Song> {
        songs.retain(|song| self.matches(song));
        songs
    }
}

/// Language choices offered for the current song set: the sorted distinct
/// non-empty language values. Recomputed whenever the set changes.
pub fn language_options(songs: &[Song]) -> Vec<String> {
    let mut languages: Vec<String> = songs
        .iter()
        .filter_map(|s| s.language.clone())
        .filter(|l| !l.is_empty())
        .collect();
    languages.sort();
    languages.dedup();
    languages
}
