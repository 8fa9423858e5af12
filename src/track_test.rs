#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn line(n: usize) -> Vec<Point> {
    (0..n).map(|i| pt(i as f64 * 2.0, 0.0)).collect()
}

fn track(points: &[(f64, f64)]) -> Track {
    Track::new(points.iter().map(|&(x, y)| pt(x, y)).collect()).unwrap()
}

// =============================================================
// RawStroke
// =============================================================

#[test]
fn raw_stroke_begin_has_one_point() {
    let s = RawStroke::begin(pt(1.0, 2.0));
    assert_eq!(s.len(), 1);
    assert_eq!(s.last(), Some(pt(1.0, 2.0)));
}

#[test]
fn raw_stroke_push_appends_in_order() {
    let mut s = RawStroke::begin(pt(0.0, 0.0));
    s.push(pt(1.0, 0.0));
    s.push(pt(2.0, 0.0));
    assert_eq!(s.points(), &[pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)]);
}

// =============================================================
// Track
// =============================================================

#[test]
fn track_requires_two_points() {
    assert!(Track::new(vec![]).is_none());
    assert!(Track::new(vec![pt(0.0, 0.0)]).is_none());
    assert!(Track::new(vec![pt(0.0, 0.0), pt(1.0, 0.0)]).is_some());
}

#[test]
fn track_length_is_cached_path_length() {
    let t = track(&[(0.0, 0.0), (3.0, 4.0), (3.0, 14.0)]);
    assert_eq!(t.length(), 15.0);
    assert_eq!(t.points().first(), Some(&pt(0.0, 0.0)));
    assert_eq!(t.points().last(), Some(&pt(3.0, 14.0)));
}

// =============================================================
// simplify
// =============================================================

#[test]
fn simplify_five_points_stride_three() {
    let raw = line(5);
    let t = simplify(&raw, 3).unwrap();
    assert_eq!(t.points(), &[raw[0], raw[3], raw[4]]);
}

#[test]
fn simplify_respects_point_bound_and_keeps_endpoints() {
    for n in 2..40 {
        for stride in 1..6 {
            let raw = line(n);
            let t = simplify(&raw, stride).unwrap();
            let bound = (n - 2).div_ceil(stride) + 2;
            assert!(t.points().len() <= bound, "n={n} stride={stride}");
            assert_eq!(t.points().first(), Some(&raw[0]));
            assert_eq!(t.points().last(), Some(&raw[n - 1]));
        }
    }
}

#[test]
fn simplify_two_points_is_copy() {
    let raw = [pt(0.0, 0.0), pt(10.0, 10.0)];
    assert_eq!(simplify(&raw, 3).unwrap().points(), &raw);
}

#[test]
fn simplify_too_short_is_none() {
    assert!(simplify(&[], 3).is_none());
    assert!(simplify(&[pt(1.0, 1.0)], 3).is_none());
}

#[test]
fn simplify_stride_zero_keeps_everything() {
    let raw = line(6);
    assert_eq!(simplify(&raw, 0).unwrap().points(), raw.as_slice());
}

#[test]
fn simplify_drops_coincident_neighbours() {
    let raw = [pt(0.0, 0.0), pt(0.0, 0.0), pt(5.0, 0.0), pt(5.1, 0.0), pt(10.0, 0.0)];
    let t = simplify(&raw, 1).unwrap();
    assert_eq!(t.points(), &[pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)]);
}

#[test]
fn simplify_last_point_replaces_near_duplicate() {
    let raw = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.2, 0.0)];
    let t = simplify(&raw, 1).unwrap();
    assert_eq!(t.points(), &[pt(0.0, 0.0), pt(10.2, 0.0)]);
}

#[test]
fn simplify_endpoint_doubling_back_onto_first_is_none() {
    // (0.6, 0) is kept, then the last sample lands 0.2 px from the start.
    let raw = [pt(0.0, 0.0), pt(0.3, 0.0), pt(0.6, 0.0), pt(0.2, 0.0)];
    assert!(simplify(&raw, 1).is_none());
}

#[test]
fn simplify_endpoint_replaces_every_near_predecessor() {
    let raw = [pt(0.0, 0.0), pt(5.0, 0.0), pt(5.6, 0.0), pt(5.2, 0.0)];
    let t = simplify(&raw, 1).unwrap();
    assert_eq!(t.points(), &[pt(0.0, 0.0), pt(5.2, 0.0)]);
}

#[test]
fn simplify_never_leaves_short_segments() {
    let raw: Vec<Point> = [0.0, 0.3, 0.6, 0.2, 1.0, 1.4, 1.1, 3.0, 3.3, 2.9]
        .iter()
        .map(|&x| pt(x, 0.0))
        .collect();
    for end in 2..=raw.len() {
        for stride in 1..4 {
            if let Some(t) = simplify(&raw[..end], stride) {
                for w in t.points().windows(2) {
                    assert!(w[0].distance_to(w[1]) >= MIN_SEGMENT_PX, "end={end} stride={stride}");
                }
            }
        }
    }
}

#[test]
fn simplify_all_coincident_is_none() {
    let raw = [pt(3.0, 3.0), pt(3.0, 3.0), pt(3.1, 3.0)];
    assert!(simplify(&raw, 1).is_none());
}

#[test]
fn simplify_preserves_smooth_arc_length() {
    let raw: Vec<Point> = (0..=180)
        .map(|i| {
            let a = f64::from(i).to_radians();
            pt(100.0 * a.cos(), 100.0 * a.sin())
        })
        .collect();
    let t = simplify(&raw, 3).unwrap();
    let raw_len = path_length(&raw);
    assert!((raw_len - t.length()).abs() / raw_len < 0.01);
}

// =============================================================
// TrackStore
// =============================================================

#[test]
fn store_new_is_empty() {
    let store = TrackStore::new();
    assert!(store.is_empty());
    assert_eq!(store.snapshot_count(), 0);
}

#[test]
fn store_remove_last_is_lifo() {
    let mut store = TrackStore::new();
    let a = track(&[(0.0, 0.0), (1.0, 0.0)]);
    let b = track(&[(0.0, 5.0), (1.0, 5.0)]);
    store.add_track(a.clone());
    store.add_track(b.clone());
    assert_eq!(store.remove_last(), Some(b));
    assert_eq!(store.remove_last(), Some(a));
    assert_eq!(store.remove_last(), None);
}

#[test]
fn store_restore_appends_at_end() {
    let mut store = TrackStore::new();
    let a = track(&[(0.0, 0.0), (1.0, 0.0)]);
    let b = track(&[(0.0, 5.0), (1.0, 5.0)]);
    store.add_track(a.clone());
    store.add_track(b.clone());
    let popped = store.remove_last().unwrap();
    store.restore_track(popped);
    assert_eq!(store.tracks(), &[a, b]);
}

#[test]
fn store_clear_empties() {
    let mut store = TrackStore::new();
    store.add_track(track(&[(0.0, 0.0), (1.0, 0.0)]));
    store.clear();
    assert!(store.is_empty());
    assert!(store.tracks().is_empty());
}
