//! Error types for the core crate

use thiserror::Error;

/// Failure while decoding a claim payload into a typed value.
///
/// Carries the claim datatype and a snapshot of the offending payload so
/// the server can surface enough context for an operator to find the
/// broken claim upstream.
#[derive(Error, Debug)]
#[error("cannot render '{datatype}' value: {reason} (payload: {payload})")]
pub struct RenderError {
    /// Datatype tag of the claim that failed to render
    pub datatype: String,
    /// What was missing or malformed
    pub reason: String,
    /// Raw payload snapshot
    pub payload: serde_json::Value,
}

impl RenderError {
    pub fn new(
        datatype: impl Into<String>,
        reason: impl Into<String>,
        payload: &serde_json::Value,
    ) -> Self {
        Self {
            datatype: datatype.into(),
            reason: reason.into(),
            payload: payload.clone(),
        }
    }
}
