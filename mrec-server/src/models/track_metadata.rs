//! Normalized track metadata returned by `POST /recognize`

use serde::{Deserialize, Serialize};

/// Sentinel for text fields the recognition service did not supply
pub const UNKNOWN: &str = "Unknown";

/// Artwork URLs; each is `""` when absent upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackImages {
    pub background: String,
    pub coverart: String,
    pub coverarthq: String,
}

/// Streaming provider links; each is `""` when absent upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingLinks {
    pub spotify: String,
    pub apple_music: String,
}

/// Flat, always fully populated description of a recognized track
///
/// Serializes to the wire shape
/// `{title, artist, album, genre, release_date, images, url, spotify, apple_music, lyrics}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub release_date: String,
    pub images: TrackImages,
    #[serde(rename = "url")]
    pub canonical_url: String,
    #[serde(flatten)]
    pub streaming_links: StreamingLinks,
    #[serde(rename = "lyrics")]
    pub lyrics_excerpt: Vec<String>,
}

impl Default for TrackMetadata {
    /// Every field set to its sentinel
    fn default() -> Self {
        Self {
            title: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
            release_date: UNKNOWN.to_string(),
            images: TrackImages::default(),
            canonical_url: String::new(),
            streaming_links: StreamingLinks::default(),
            lyrics_excerpt: Vec::new(),
        }
    }
}
