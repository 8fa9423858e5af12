//! Train animation: per-track traversal advanced one frame at a time.
//!
//! At most one train type runs at a time; while it runs, every track long
//! enough to carry it has its own copy of that train, each with an
//! independent traversal distance. The host calls [`Scheduler::tick`] once
//! per display refresh. Each tick clears the overlay and redraws every car
//! from scratch, so nothing drawn here ever reaches the raster or the history.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use crate::config::Config;
use crate::error::SurfaceError;
use crate::geom::position_at_distance;
use crate::render::{Surface2d, draw_car};
use crate::track::{Track, TrackStore};
use crate::trains::{TrainDefinition, TrainKind};

/// Animation state for the train on one track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningTrain {
    pub kind: TrainKind,
    /// Arc length travelled by the front of the train since the last wrap.
    pub distance: f64,
}

/// What [`Scheduler::start`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Nothing to run on; the previous state is untouched.
    NoTrack,
    /// The train is running on every track.
    Departed,
}

/// Counts from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Tracks long enough to carry a train this frame.
    pub tracks: usize,
    /// Cars that were on their track and got drawn.
    pub cars: usize,
}

/// Owns the active train type and the per-track traversal state.
#[derive(Debug, Default)]
pub struct Scheduler {
    active: Option<TrainKind>,
    running: Vec<RunningTrain>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `kind` on every track, replacing whatever was running.
    ///
    /// With no tracks this changes nothing and reports [`StartOutcome::NoTrack`].
    pub fn start(&mut self, kind: TrainKind, tracks: &TrackStore) -> StartOutcome {
        if tracks.is_empty() {
            tracing::info!(train = %kind, "no track to run on");
            return StartOutcome::NoTrack;
        }
        if let Some(previous) = self.active {
            tracing::debug!(train = %previous, "replacing running train");
        }
        self.active = Some(kind);
        self.running = vec![RunningTrain { kind, distance: 0.0 }; tracks.snapshot_count()];
        tracing::info!(train = %kind, tracks = tracks.snapshot_count(), "train departed");
        StartOutcome::Departed
    }

    /// Stop the running train and clear the overlay. Safe to call when idle.
    ///
    /// # Errors
    ///
    /// Propagates a failure to clear the overlay; the scheduler is idle regardless.
    pub fn stop<S: Surface2d + ?Sized>(&mut self, overlay: &mut S) -> Result<(), SurfaceError> {
        if let Some(kind) = self.active.take() {
            tracing::info!(train = %kind, "train stopped");
        }
        self.running.clear();
        overlay.clear()
    }

    /// Drop all state without touching any surface.
    pub fn reset(&mut self) {
        self.active = None;
        self.running.clear();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active(&self) -> Option<TrainKind> {
        self.active
    }

    /// Per-track state, indexed like the track store.
    #[must_use]
    pub fn running_trains(&self) -> &[RunningTrain] {
        &self.running
    }

    /// Advance every train by one frame and redraw the overlay.
    ///
    /// Idle schedulers return an empty report without touching the overlay.
    /// Tracks added since the last frame join at distance zero; removed tracks
    /// drop their state.
    ///
    /// # Errors
    ///
    /// Propagates the first failing overlay call. Distances already advanced
    /// this frame stay advanced.
    pub fn tick<S: Surface2d + ?Sized>(
        &mut self,
        tracks: &TrackStore,
        overlay: &mut S,
        config: &Config,
        now_ms: f64,
    ) -> Result<FrameReport, SurfaceError> {
        let Some(kind) = self.active else {
            return Ok(FrameReport::default());
        };
        overlay.clear()?;

        self.running.resize(tracks.snapshot_count(), RunningTrain { kind, distance: 0.0 });
        let def = kind.definition();
        let train_len = def.total_length(config.car_gap);
        let step = config.step_per_frame();

        let mut report = FrameReport::default();
        for (track, state) in tracks.tracks().iter().zip(self.running.iter_mut()) {
            if track.length() < config.min_track_length {
                continue;
            }
            state.distance = advance(state.distance, track.length(), train_len, step);
            report.tracks += 1;
            report.cars += draw_train(overlay, track, def, state.distance, config, now_ms)?;
        }
        Ok(report)
    }
}

/// Move a train forward by `step`, wrapping to zero once it has completely
/// left a track of length `track_len`.
#[must_use]
pub fn advance(distance: f64, track_len: f64, train_len: f64, step: f64) -> f64 {
    let next = distance + step;
    if next > track_len + train_len { 0.0 } else { next }
}

/// Arc-length position of each car's center, head first, for a train whose
/// front is `front` along the track.
#[must_use]
pub fn car_centers(def: &TrainDefinition, front: f64, gap: f64) -> Vec<f64> {
    let mut lead = front;
    def.cars
        .iter()
        .map(|car| {
            let center = lead - car.width / 2.0;
            lead -= car.width + gap;
            center
        })
        .collect()
}

fn draw_train<S: Surface2d + ?Sized>(
    overlay: &mut S,
    track: &Track,
    def: &TrainDefinition,
    front: f64,
    config: &Config,
    now_ms: f64,
) -> Result<usize, SurfaceError> {
    let mut drawn = 0;
    for (car, center) in def.cars.iter().zip(car_centers(def, front, config.car_gap)) {
        // Cars still waiting behind the start or already past the end are skipped.
        let Some(at) = position_at_distance(track.points(), center) else {
            continue;
        };
        draw_car(overlay, car, at, config.train_color, now_ms)?;
        drawn += 1;
    }
    Ok(drawn)
}
