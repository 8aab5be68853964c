//! Timestamp utilities for recording names

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Prefix of every stored recording file
pub const RECORDING_PREFIX: &str = "audio_";

/// Extension of every stored recording file
pub const RECORDING_EXTENSION: &str = "wav";

/// Format a timestamp at second resolution (`YYYYMMDD_HHMMSS`)
pub fn recording_stamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%Y%m%d_%H%M%S").to_string()
}

/// Build a recording file name: `audio_<YYYYMMDD_HHMMSS>_<suffix>.wav`
///
/// The stamp alone only has second resolution, so two uploads in the same
/// second would share it. The 8 hex character suffix comes from a fresh v4 UUID.
pub fn recording_file_name(timestamp: &DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}_{}.{}",
        RECORDING_PREFIX,
        recording_stamp(timestamp),
        &suffix[..8],
        RECORDING_EXTENSION
    )
}
