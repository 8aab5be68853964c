//! Response normalization
//!
//! Maps the recognition service's nested document onto `TrackMetadata`.
//! Every field is read through a JSON pointer; a missing key, a null, a value
//! of the wrong type or an out-of-range index all degrade to that field's
//! sentinel and leave the other fields untouched. Normalization cannot fail.

use serde_json::Value;

use crate::models::{RawRecognitionResult, StreamingLinks, TrackImages, TrackMetadata, UNKNOWN};

const TITLE: &str = "/track/title";
const ARTIST: &str = "/track/subtitle";
const ALBUM: &str = "/track/sections/0/metadata/0/text";
const GENRE: &str = "/track/genres/primary";
const RELEASE_DATE: &str = "/track/releasedate";
const IMAGE_BACKGROUND: &str = "/track/images/background";
const IMAGE_COVERART: &str = "/track/images/coverart";
const IMAGE_COVERART_HQ: &str = "/track/images/coverarthq";
const CANONICAL_URL: &str = "/track/url";
const SPOTIFY: &str = "/track/hub/providers/0/actions/0/uri";
const APPLE_MUSIC: &str = "/track/hub/options/0/actions/0/uri";
const LYRICS: &str = "/track/sections/1/text";

/// Build `TrackMetadata` from a raw recognition document
pub fn normalize(raw: &RawRecognitionResult) -> TrackMetadata {
    let doc = raw.as_value();

    TrackMetadata {
        title: text_or(doc, TITLE, UNKNOWN),
        artist: text_or(doc, ARTIST, UNKNOWN),
        album: text_or(doc, ALBUM, UNKNOWN),
        genre: text_or(doc, GENRE, UNKNOWN),
        release_date: text_or(doc, RELEASE_DATE, UNKNOWN),
        images: TrackImages {
            background: text_or(doc, IMAGE_BACKGROUND, ""),
            coverart: text_or(doc, IMAGE_COVERART, ""),
            coverarthq: text_or(doc, IMAGE_COVERART_HQ, ""),
        },
        canonical_url: text_or(doc, CANONICAL_URL, ""),
        streaming_links: StreamingLinks {
            spotify: text_or(doc, SPOTIFY, ""),
            apple_music: text_or(doc, APPLE_MUSIC, ""),
        },
        lyrics_excerpt: lines_at(doc, LYRICS),
    }
}

/// String at `pointer`, or `fallback` when absent or not a string
fn text_or(doc: &Value, pointer: &str, fallback: &str) -> String {
    doc.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

/// String elements of the array at `pointer`, in order; empty otherwise
fn lines_at(doc: &Value, pointer: &str) -> Vec<String> {
    doc.pointer(pointer)
        .and_then(Value::as_array)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
