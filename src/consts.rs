//! Shared numeric constants for the trainboard crate.

// ── Geometry ────────────────────────────────────────────────────

/// Polyline segments shorter than this (in pixels) are skipped by distance queries.
pub const MIN_SEGMENT_PX: f64 = 0.5;

/// Tracks shorter than this are too short for a train to run on.
pub const MIN_TRACK_LENGTH_PX: f64 = 10.0;

// ── Tracks ──────────────────────────────────────────────────────

/// Keep every Nth interior point when simplifying a track stroke.
pub const SIMPLIFY_STRIDE: usize = 3;

/// Perpendicular distance from the track centerline to each rail.
pub const RAIL_OFFSET_PX: f64 = 5.0;

/// Line width of a rail.
pub const RAIL_WIDTH_PX: f64 = 3.0;

/// Rail segments shorter than this are not painted.
pub const MIN_RAIL_SEGMENT_PX: f64 = 1.0;

/// Arc length between consecutive sleepers.
pub const SLEEPER_INTERVAL_PX: f64 = 14.0;

/// Half the length of a sleeper, measured across the track.
pub const SLEEPER_HALF_LENGTH_PX: f64 = 8.0;

/// Line width of a sleeper.
pub const SLEEPER_WIDTH_PX: f64 = 3.0;

// ── Trains ──────────────────────────────────────────────────────

/// Gap between adjacent cars, shared by every train type.
pub const CAR_GAP_PX: f64 = 4.0;

/// Per-frame distance multiplier applied to the user speed setting.
pub const SPEED_SCALE: f64 = 2.0;

/// Default user speed setting.
pub const DEFAULT_TRAIN_SPEED: u32 = 2;

// ── Drawing ─────────────────────────────────────────────────────

/// Default pen width in pixels.
pub const DEFAULT_STROKE_WIDTH: u32 = 5;

/// Per-channel tolerance when matching the seed color during flood fill.
pub const FILL_TOLERANCE: u8 = 10;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of entries kept in the undo log, baseline included.
pub const HISTORY_CAPACITY: usize = 50;

// ── Palettes ────────────────────────────────────────────────────

/// Pen colors offered by the host palette.
pub const PEN_PALETTE: [&str; 20] = [
    "#000000", "#444444", "#9e9e9e", "#ffffff", "#ff0000", "#f44336", "#e91e63", "#ff69b4", "#ff9800", "#ffeb3b",
    "#fff176", "#4caf50", "#8bc34a", "#00e676", "#00bcd4", "#2196f3", "#3f51b5", "#9c27b0", "#ce93d8", "#795548",
];

/// Train body colors offered by the host color picker.
pub const TRAIN_PALETTE: [&str; 25] = [
    "#f44336", "#e91e63", "#ff9800", "#ffeb3b", "#4caf50", "#43a047", "#00bcd4", "#2196f3", "#3f51b5", "#9c27b0",
    "#795548", "#e53935", "#1e88e5", "#8bc34a", "#ff5722", "#333333", "#666666", "#e0e0e0", "#fff176", "#ce93d8",
    "#ef5350", "#42a5f5", "#66bb6a", "#ffa726", "#ab47bc",
];
