//! Train catalog: the fixed set of train types and their cars.
//!
//! Definitions are `'static` data shared read-only by the scheduler. Each car
//! names a [`CarShape`]; the renderer matches on it exhaustively, so adding a
//! shape without a renderer is a compile error.

#[cfg(test)]
#[path = "trains_test.rs"]
mod trains_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The train types a user can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainKind {
    /// Steam locomotive hauling a coal tender and a passenger coach.
    Steam,
    /// Four-car electric commuter set.
    Commuter,
    /// High-speed set with streamlined noses at both ends.
    HighSpeed,
    /// Three-car straddle monorail.
    Monorail,
}

impl TrainKind {
    /// Every train type, in toolbar order.
    pub const ALL: [TrainKind; 4] = [Self::Steam, Self::Commuter, Self::HighSpeed, Self::Monorail];

    /// Stable lowercase identifier, as used by the host toolbar.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steam => "steam",
            Self::Commuter => "commuter",
            Self::HighSpeed => "high-speed",
            Self::Monorail => "monorail",
        }
    }

    /// The static definition for this train type.
    #[must_use]
    pub fn definition(self) -> &'static TrainDefinition {
        match self {
            Self::Steam => &STEAM,
            Self::Commuter => &COMMUTER,
            Self::HighSpeed => &HIGH_SPEED,
            Self::Monorail => &MONORAIL,
        }
    }
}

impl fmt::Display for TrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a host string names no train type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown train type: {0}")]
pub struct UnknownTrainKind(pub String);

impl FromStr for TrainKind {
    type Err = UnknownTrainKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownTrainKind(s.to_owned()))
    }
}

/// Position of a car within its train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarRole {
    /// Leading car.
    Engine,
    /// Any car between the first and the last.
    Middle,
    /// Trailing car.
    Tail,
}

/// Drawing routine for a car body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarShape {
    SteamLoco,
    CoalCar,
    PassengerCar,
    CommuterCar,
    HighSpeedHead,
    HighSpeedCar,
    HighSpeedTail,
    MonorailCar,
}

/// One rigid car: its footprint along and across the track, and how to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarSpec {
    /// Length along the direction of travel, in pixels.
    pub width: f64,
    /// Extent across the track, in pixels.
    pub height: f64,
    pub shape: CarShape,
    pub role: CarRole,
}

impl CarSpec {
    const fn new(width: f64, height: f64, shape: CarShape, role: CarRole) -> Self {
        Self { width, height, shape, role }
    }

    #[must_use]
    pub fn is_head(&self) -> bool {
        self.role == CarRole::Engine
    }

    #[must_use]
    pub fn is_tail(&self) -> bool {
        self.role == CarRole::Tail
    }
}

/// A named train: cars listed head to tail.
#[derive(Debug, PartialEq)]
pub struct TrainDefinition {
    pub kind: TrainKind,
    pub cars: &'static [CarSpec],
}

impl TrainDefinition {
    /// Length of the whole train including one `gap` after every car.
    #[must_use]
    pub fn total_length(&self, gap: f64) -> f64 {
        self.cars.iter().map(|c| c.width + gap).sum()
    }
}

use CarRole::{Engine, Middle, Tail};
use CarShape::*;

static STEAM: TrainDefinition = TrainDefinition {
    kind: TrainKind::Steam,
    cars: &[
        CarSpec::new(40.0, 22.0, SteamLoco, Engine),
        CarSpec::new(30.0, 18.0, CoalCar, Middle),
        CarSpec::new(30.0, 18.0, PassengerCar, Tail),
    ],
};

static COMMUTER: TrainDefinition = TrainDefinition {
    kind: TrainKind::Commuter,
    cars: &[
        CarSpec::new(38.0, 18.0, CommuterCar, Engine),
        CarSpec::new(38.0, 18.0, CommuterCar, Middle),
        CarSpec::new(38.0, 18.0, CommuterCar, Middle),
        CarSpec::new(38.0, 18.0, CommuterCar, Tail),
    ],
};

static HIGH_SPEED: TrainDefinition = TrainDefinition {
    kind: TrainKind::HighSpeed,
    cars: &[
        CarSpec::new(44.0, 16.0, HighSpeedHead, Engine),
        CarSpec::new(36.0, 16.0, HighSpeedCar, Middle),
        CarSpec::new(36.0, 16.0, HighSpeedCar, Middle),
        CarSpec::new(44.0, 16.0, HighSpeedTail, Tail),
    ],
};

static MONORAIL: TrainDefinition = TrainDefinition {
    kind: TrainKind::Monorail,
    cars: &[
        CarSpec::new(36.0, 20.0, MonorailCar, Engine),
        CarSpec::new(36.0, 20.0, MonorailCar, Middle),
        CarSpec::new(36.0, 20.0, MonorailCar, Tail),
    ],
};
