//! Recognition pipeline services
//!
//! - `audio_store`: durable copies of uploaded clips
//! - `recognition_client`: the external recognition service call
//! - `response_normalizer`: raw document → `TrackMetadata`
//! - `connection_registry`: long-lived connections closed at shutdown

pub mod audio_store;
pub mod connection_registry;
pub mod recognition_client;
pub mod response_normalizer;

pub use audio_store::{AudioStore, StorageError};
pub use connection_registry::{ConnectionRegistry, ManagedConnection};
pub use recognition_client::{RecognitionClient, RecognitionEndpoint, RecognitionError, Recognizer};
pub use response_normalizer::normalize;
