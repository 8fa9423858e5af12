#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Point;
use crate::render::render_test::{Op, RecordingSurface};
use crate::trains::{CarRole, CarShape, CarSpec};

// =============================================================
// Helpers
// =============================================================

fn straight(len: f64, y: f64) -> Track {
    Track::new(vec![Point::new(0.0, y), Point::new(len, y)]).unwrap()
}

fn store(tracks: Vec<Track>) -> TrackStore {
    let mut s = TrackStore::new();
    for t in tracks {
        s.add_track(t);
    }
    s
}

static TWO_CARS: TrainDefinition = TrainDefinition {
    kind: TrainKind::Commuter,
    cars: &[
        CarSpec { width: 20.0, height: 10.0, shape: CarShape::CommuterCar, role: CarRole::Engine },
        CarSpec { width: 20.0, height: 10.0, shape: CarShape::CommuterCar, role: CarRole::Tail },
    ],
};

// =============================================================
// advance / car_centers
// =============================================================

#[test]
fn advance_moves_by_step() {
    assert_eq!(advance(10.0, 100.0, 48.0, 4.0), 14.0);
}

#[test]
fn advance_wraps_after_train_fully_exits() {
    let train_len = TWO_CARS.total_length(4.0);
    assert_eq!(train_len, 48.0);
    assert_eq!(advance(126.0, 100.0, train_len, 4.0), 130.0);
    assert_eq!(advance(146.0, 100.0, train_len, 4.0), 0.0);
}

#[test]
fn advance_exactly_at_limit_does_not_wrap() {
    assert_eq!(advance(144.0, 100.0, 48.0, 4.0), 148.0);
}

#[test]
fn car_centers_trail_by_width_and_gap() {
    assert_eq!(car_centers(&TWO_CARS, 100.0, 4.0), vec![90.0, 66.0]);
}

// =============================================================
// start / stop
// =============================================================

#[test]
fn new_scheduler_is_idle() {
    let s = Scheduler::new();
    assert!(!s.is_running());
    assert!(s.active().is_none());
    assert!(s.running_trains().is_empty());
}

#[test]
fn start_without_tracks_is_noop() {
    let mut s = Scheduler::new();
    assert_eq!(s.start(TrainKind::Steam, &TrackStore::new()), StartOutcome::NoTrack);
    assert!(!s.is_running());
}

#[test]
fn start_without_tracks_keeps_previous_run() {
    let mut s = Scheduler::new();
    s.start(TrainKind::Monorail, &store(vec![straight(100.0, 0.0)]));
    assert_eq!(s.start(TrainKind::Steam, &TrackStore::new()), StartOutcome::NoTrack);
    assert_eq!(s.active(), Some(TrainKind::Monorail));
}

#[test]
fn start_creates_one_train_per_track_at_zero() {
    let mut s = Scheduler::new();
    let tracks = store(vec![straight(100.0, 0.0), straight(200.0, 50.0)]);
    assert_eq!(s.start(TrainKind::Commuter, &tracks), StartOutcome::Departed);
    assert_eq!(s.running_trains(), &[RunningTrain { kind: TrainKind::Commuter, distance: 0.0 }; 2]);
}

#[test]
fn switching_train_type_resets_distances() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(300.0, 0.0), straight(300.0, 50.0)]);
    let config = Config::default();

    s.start(TrainKind::Commuter, &tracks);
    for _ in 0..5 {
        s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    }
    assert!(s.running_trains().iter().all(|t| t.distance > 0.0));

    s.start(TrainKind::Steam, &tracks);
    assert_eq!(s.active(), Some(TrainKind::Steam));
    assert!(s.running_trains().iter().all(|t| t.kind == TrainKind::Steam && t.distance == 0.0));
}

#[test]
fn stop_clears_overlay_and_is_idempotent() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    s.start(TrainKind::Steam, &store(vec![straight(100.0, 0.0)]));
    s.stop(&mut overlay).unwrap();
    assert!(!s.is_running());
    assert!(s.running_trains().is_empty());
    s.stop(&mut overlay).unwrap();
    assert_eq!(overlay.ops, vec![Op::Clear, Op::Clear]);
}

#[test]
fn restart_after_stop_begins_at_zero() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(300.0, 0.0)]);
    s.start(TrainKind::Monorail, &tracks);
    s.tick(&tracks, &mut overlay, &Config::default(), 0.0).unwrap();
    s.stop(&mut overlay).unwrap();
    s.start(TrainKind::Monorail, &tracks);
    assert_eq!(s.running_trains()[0].distance, 0.0);
}

// =============================================================
// tick
// =============================================================

#[test]
fn tick_when_idle_draws_nothing() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(100.0, 0.0)]);
    let report = s.tick(&tracks, &mut overlay, &Config::default(), 0.0).unwrap();
    assert_eq!(report, FrameReport::default());
    assert!(overlay.ops.is_empty());
}

#[test]
fn tick_clears_then_advances_by_speed_times_scale() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(500.0, 0.0)]);
    let config = Config { train_speed: 3, ..Config::default() };
    s.start(TrainKind::Commuter, &tracks);
    s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    assert_eq!(overlay.ops.first(), Some(&Op::Clear));
    assert_eq!(s.running_trains()[0].distance, 6.0);
}

#[test]
fn tick_skips_degenerate_tracks() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(8.0, 0.0), straight(300.0, 50.0)]);
    s.start(TrainKind::Steam, &tracks);
    let report = s.tick(&tracks, &mut overlay, &Config::default(), 0.0).unwrap();
    assert_eq!(report.tracks, 1);
    assert_eq!(s.running_trains()[0].distance, 0.0);
    assert_eq!(s.running_trains()[1].distance, 4.0);
}

#[test]
fn tick_draws_only_cars_on_the_track() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(1_000.0, 0.0)]);
    let config = Config { train_speed: 30, speed_scale: 1.0, ..Config::default() };
    s.start(TrainKind::Commuter, &tracks);

    // Front at 30: only the first car's center (30 - 19 = 11) is on the track.
    let report = s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    assert_eq!(report.cars, 1);
    assert_eq!(overlay.translations(), vec![(11.0, 0.0)]);

    // Front at 210: all four cars are on.
    for _ in 0..5 {
        s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    }
    overlay.ops.clear();
    let report = s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    assert_eq!(s.running_trains()[0].distance, 210.0);
    assert_eq!(report.cars, 4);
    let xs: Vec<f64> = overlay.translations().into_iter().map(|(x, _)| x).collect();
    assert_eq!(xs, vec![191.0, 149.0, 107.0, 65.0]);
}

#[test]
fn tick_loops_forever_on_short_track() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(20.0, 0.0)]);
    let config = Config::default();
    s.start(TrainKind::Monorail, &tracks);
    let limit = 20.0 + TrainKind::Monorail.definition().total_length(config.car_gap);
    let mut wrapped = false;
    for _ in 0..100 {
        s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
        let d = s.running_trains()[0].distance;
        assert!(d <= limit);
        wrapped |= d == 0.0;
    }
    assert!(wrapped);
}

#[test]
fn tick_follows_track_store_size() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let mut tracks = store(vec![straight(300.0, 0.0)]);
    let config = Config::default();
    s.start(TrainKind::Steam, &tracks);
    s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();

    tracks.add_track(straight(300.0, 40.0));
    s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    assert_eq!(s.running_trains().len(), 2);
    assert_eq!(s.running_trains()[0].distance, 8.0);
    assert_eq!(s.running_trains()[1].distance, 4.0);

    tracks.remove_last();
    s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    assert_eq!(s.running_trains().len(), 1);
}

#[test]
fn tick_uses_train_color() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface::default();
    let tracks = store(vec![straight(300.0, 0.0)]);
    let config = Config::default();
    s.start(TrainKind::Monorail, &tracks);
    for _ in 0..20 {
        s.tick(&tracks, &mut overlay, &config, 0.0).unwrap();
    }
    assert!(overlay.count(|op| *op == Op::Fill(config.train_color)) > 0);
}

#[test]
fn tick_propagates_overlay_errors() {
    let mut s = Scheduler::new();
    let mut overlay = RecordingSurface { fail_rotate: true, ..Default::default() };
    let tracks = store(vec![straight(300.0, 0.0)]);
    let config = Config { train_speed: 40, ..Config::default() };
    s.start(TrainKind::Commuter, &tracks);
    assert!(s.tick(&tracks, &mut overlay, &config, 0.0).is_err());
}
