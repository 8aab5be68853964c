//! Recognition service results before normalization

use serde_json::Value;

/// Untyped response document from the recognition service
///
/// Only the normalizer looks inside; handlers never return it to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecognitionResult(Value);

impl RawRecognitionResult {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// Document used when a 200 response carried no parsable JSON
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Non-exceptional result of one recognition call
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// Service answered 200 with a (possibly sparse) document
    Matched(RawRecognitionResult),
    /// Service was reachable but answered with a non-200 status
    NotFound { status: u16 },
}
