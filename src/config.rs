//! User-tunable knobs, loaded from host-supplied JSON.
//!
//! Every field has a default, so the host may send only what it overrides:
//!
//! ```json
//! { "stroke_width": 8, "train_speed": 4, "train_color": "#1e88e5" }
//! ```

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CAR_GAP_PX, DEFAULT_STROKE_WIDTH, DEFAULT_TRAIN_SPEED, HISTORY_CAPACITY, MIN_TRACK_LENGTH_PX, SIMPLIFY_STRIDE,
    SPEED_SCALE,
};
use crate::error::ConfigError;
use crate::raster::Rgba;

/// Default train body color.
pub const DEFAULT_TRAIN_COLOR: Rgba = Rgba::opaque(0x43, 0xa0, 0x47);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pen and eraser width in pixels.
    pub stroke_width: u32,
    /// User speed setting; multiplied by `speed_scale` each frame.
    pub train_speed: u32,
    /// Pixels per frame per unit of `train_speed`.
    pub speed_scale: f64,
    /// Undo log cap, baseline included.
    pub history_capacity: usize,
    /// Keep every Nth interior point of a track stroke.
    pub simplify_stride: usize,
    /// Gap between adjacent cars.
    pub car_gap: f64,
    /// Tracks shorter than this carry no train.
    pub min_track_length: f64,
    pub pen_color: Rgba,
    pub train_color: Rgba,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            train_speed: DEFAULT_TRAIN_SPEED,
            speed_scale: SPEED_SCALE,
            history_capacity: HISTORY_CAPACITY,
            simplify_stride: SIMPLIFY_STRIDE,
            car_gap: CAR_GAP_PX,
            min_track_length: MIN_TRACK_LENGTH_PX,
            pen_color: Rgba::BLACK,
            train_color: DEFAULT_TRAIN_COLOR,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or wrongly typed fields,
    /// [`ConfigError::Invalid`] for values outside their usable range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stroke_width == 0 {
            return Err(invalid("stroke_width", "must be at least 1"));
        }
        if self.simplify_stride == 0 {
            return Err(invalid("simplify_stride", "must be at least 1"));
        }
        if self.history_capacity < 2 {
            return Err(invalid("history_capacity", "must hold the baseline plus one entry"));
        }
        if !(self.speed_scale.is_finite() && self.speed_scale > 0.0) {
            return Err(invalid("speed_scale", "must be a positive number"));
        }
        if !(self.car_gap.is_finite() && self.car_gap >= 0.0) {
            return Err(invalid("car_gap", "must be a non-negative number"));
        }
        if !(self.min_track_length.is_finite() && self.min_track_length >= 0.0) {
            return Err(invalid("min_track_length", "must be a non-negative number"));
        }
        Ok(())
    }

    /// Distance a train advances per frame.
    #[must_use]
    pub fn step_per_frame(&self) -> f64 {
        f64::from(self.train_speed) * self.speed_scale
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_owned() }
}
