//! # mrec Common Library
//!
//! Shared code for the mrec music recognition service:
//! - Error types
//! - TOML configuration loading and config file resolution
//! - Recording timestamp and file naming helpers

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
