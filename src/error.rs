//! Error types for the trainboard crate.
//!
//! Core track, history and animation logic never fails on its own; the only
//! errors that propagate come from drawing backends and from parsing
//! host-supplied configuration.

/// A drawing surface rejected an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The browser canvas call failed; carries the stringified JS error.
    #[error("canvas backend error: {0}")]
    Backend(String),
    /// A pixel buffer does not match the surface dimensions.
    #[error("pixel buffer {got_w}x{got_h} does not fit surface {want_w}x{want_h}")]
    SizeMismatch { got_w: u32, got_h: u32, want_w: u32, want_h: u32 },
}

/// Host-supplied configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON text did not parse into a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field parsed but holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
