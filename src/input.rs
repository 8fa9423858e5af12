//! Input model: tools and the gesture state machine.
//!
//! `Tool` is the user's intent at pointer-down. `InputState` is the gesture
//! being tracked between pointer-down and pointer-up, carrying whatever the
//! engine needs to paint incrementally and to commit on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::track::RawStroke;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Freehand pen (default).
    #[default]
    Pen,
    /// Freehand eraser; paints the background color.
    Eraser,
    /// Flood fill with the pen color.
    Fill,
    /// Lay a track for trains to run on.
    Track,
}

impl Tool {
    pub const ALL: [Self; 4] = [Self::Pen, Self::Eraser, Self::Fill, Self::Track];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
            Self::Fill => "fill",
            Self::Track => "track",
        }
    }

    /// Whether a drag with this tool paints freehand strokes.
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or_else(|| UnknownTool(s.to_owned()))
    }
}

/// Persistent UI state that outlives a single gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A pen or eraser stroke is being painted.
    Drawing {
        /// Position of the previous pointer event; the next segment starts here.
        last: Point,
        /// Paint the background color instead of the pen color.
        eraser: bool,
    },
    /// A track stroke is being captured.
    LayingTrack {
        /// Every pointer position since pointer-down, unsimplified.
        stroke: RawStroke,
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
