//! Data models for mrec-server

pub mod recognition;
pub mod track_metadata;

pub use recognition::{RawRecognitionResult, RecognitionOutcome};
pub use track_metadata::{StreamingLinks, TrackImages, TrackMetadata, UNKNOWN};
