//! YouTube URL helpers
//!
//! Extracts the canonical 11-character video identifier from the URL forms
//! YouTube hands out (`youtu.be/<id>`, `/v/<id>`, `/u/<n>/<id>`,
//! `/embed/<id>`, `watch?v=<id>`, `&v=<id>`) and derives the thumbnail URL
//! for a video. Absence of an identifier is a normal outcome for local or
//! malformed URLs, not an error.

/// Length of every YouTube video identifier.
const VIDEO_ID_LEN: usize = 11;

/// Extract the video identifier from a YouTube URL.
///
/// The rightmost recognized marker in the URL wins, so
/// `watch?list=x&v=<id>` resolves the `&v=` parameter rather than an
/// earlier lookalike. The identifier runs from the marker to the first
/// `#`, `&`, or `?`, and is returned only if it is exactly 11 characters.
pub fn extract_video_id(url: &str) -> Option<String> {
    let bytes = url.as_bytes();

    for start in (0..bytes.len()).rev() {
        let Some(end) = match_marker(bytes, start) else {
            continue;
        };

        let tail = &bytes[end..];
        let stop = tail
            .iter()
            .position(|&c| c == b'#' || c == b'&' || c == b'?')
            .unwrap_or(tail.len());
        let id = &tail[..stop];

        if id.len() != VIDEO_ID_LEN {
            return None;
        }
        return std::str::from_utf8(id).ok().map(str::to_owned);
    }

    None
}

/// Thumbnail URL for a YouTube video, or "" when no identifier can be
/// extracted. Callers treat "" as "no thumbnail available"; the maxres
/// variant may also be missing on YouTube's side, so consumers need a
/// fallback rendering either way.
pub fn thumbnail_url(url: &str) -> String {
    match extract_video_id(url) {
        Some(id) => format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", id),
        None => String::new(),
    }
}

/// Try each identifier marker at `start`, returning the byte offset just
/// past the marker on a match.
fn match_marker(bytes: &[u8], start: usize) -> Option<usize> {
    let rest = &bytes[start..];

    // youtu.be/ (short-link host; the separator byte is not checked, which
    // keeps parity with the original pattern this rule is lifted from)
    if rest.len() >= 9 && &rest[..5] == b"youtu" && &rest[6..9] == b"be/" {
        return Some(start + 9);
    }
    if rest.starts_with(b"v/") {
        return Some(start + 2);
    }
    // u/<word-char>/ (channel-scoped video paths)
    if rest.len() >= 4
        && rest[0] == b'u'
        && rest[1] == b'/'
        && (rest[2].is_ascii_alphanumeric() || rest[2] == b'_')
        && rest[3] == b'/'
    {
        return Some(start + 4);
    }
    if rest.starts_with(b"embed/") {
        return Some(start + 6);
    }
    if rest.starts_with(b"watch?v=") {
        return Some(start + 8);
    }
    if rest.starts_with(b"&v=") {
        return Some(start + 3);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_extracts_from_all_url_forms() {
        let urls = [
            format!("https://youtu.be/{}", ID),
            format!("https://www.youtube.com/v/{}", ID),
            format!("https://www.youtube.com/u/2/{}", ID),
            format!("https://www.youtube.com/embed/{}", ID),
            format!("https://www.youtube.com/watch?v={}", ID),
            format!("https://www.youtube.com/watch?list=PL123&v={}", ID),
        ];

        for url in &urls {
            assert_eq!(extract_video_id(url).as_deref(), Some(ID), "url: {}", url);
        }
    }

    #[test]
    fn test_identifier_stops_at_query_and_fragment() {
        assert_eq!(
            extract_video_id(&format!("https://www.youtube.com/watch?v={}&list=PL1", ID)).as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id(&format!("https://youtu.be/{}?t=42", ID)).as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id(&format!("https://youtu.be/{}#start", ID)).as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn test_rightmost_marker_wins() {
        // Both a path marker and a later &v= parameter are present; the
        // later one is authoritative.
        let url = format!("https://www.youtube.com/watch?v=shortid&v={}", ID);
        assert_eq!(extract_video_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_wrong_length_identifier_rejected() {
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=waytoolongidentifier"),
            None
        );
        // Trailing path segment makes the captured run 12 characters.
        assert_eq!(extract_video_id(&format!("https://youtu.be/{}/", ID)), None);
    }

    #[test]
    fn test_non_youtube_urls_yield_nothing() {
        assert_eq!(extract_video_id("https://example.com/not-a-video"), None);
        assert_eq!(extract_video_id("http://jellyfin.local/Items/abc/play"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_thumbnail_url_mirrors_extraction() {
        let url = format!("https://youtu.be/{}", ID);
        let thumb = thumbnail_url(&url);
        assert!(thumb.contains(ID));
        assert_eq!(
            thumb,
            format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", ID)
        );

        assert_eq!(thumbnail_url("https://example.com/song.mp4"), "");
    }
}
