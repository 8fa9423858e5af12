//! Track model: raw strokes, simplified tracks, and the in-memory store.
//!
//! A track gesture collects every pointer sample into a [`RawStroke`]. When
//! the gesture ends the stroke is thinned by [`simplify`] into a [`Track`]
//! and appended to the [`TrackStore`]. The animation scheduler reads the
//! store every frame; only gesture completion, undo/redo and a full clear
//! mutate it.

#[cfg(test)]
#[path = "track_test.rs"]
mod track_test;

use crate::consts::MIN_SEGMENT_PX;
use crate::geom::{Point, path_length};

/// Pointer samples captured while a track gesture is in progress.
#[derive(Debug, Clone, Default)]
pub struct RawStroke {
    points: Vec<Point>,
}

impl RawStroke {
    /// Start a stroke at `start`.
    #[must_use]
    pub fn begin(start: Point) -> Self {
        Self { points: vec![start] }
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One rail line: an open polyline of at least two points with no
/// coincident neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    points: Vec<Point>,
    length: f64,
}

impl Track {
    /// Build a track from `points`. Returns `None` for fewer than two points.
    ///
    /// Callers are expected to have removed coincident neighbours; [`simplify`] does.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let length = path_length(&points);
        Some(Self { points, length })
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Arc length of the polyline, computed once at construction.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// Thin a raw stroke into a track.
///
/// Keeps the first and last samples and every `stride`-th interior sample
/// (a stride of zero behaves like one). Points closer than
/// [`MIN_SEGMENT_PX`] to the previously kept point are dropped; the last
/// sample replaces any near-duplicate predecessors so the endpoint survives,
/// but never the first sample.
/// Returns `None` when fewer than two distinct points remain.
#[must_use]
pub fn simplify(raw: &[Point], stride: usize) -> Option<Track> {
    let (&first, rest) = raw.split_first()?;
    let (&last, interior) = rest.split_last()?;
    let stride = stride.max(1);

    let mut kept = vec![first];
    for &p in interior.iter().skip(stride - 1).step_by(stride) {
        if kept[kept.len() - 1].distance_to(p) >= MIN_SEGMENT_PX {
            kept.push(p);
        }
    }
    while kept.len() > 1 && kept[kept.len() - 1].distance_to(last) < MIN_SEGMENT_PX {
        kept.pop();
    }
    if kept[kept.len() - 1].distance_to(last) >= MIN_SEGMENT_PX {
        kept.push(last);
    }
    Track::new(kept)
}

/// Ordered list of committed tracks. Undo and redo treat it as a stack.
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Append a newly drawn track.
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Pop the most recently added track.
    pub fn remove_last(&mut self) -> Option<Track> {
        self.tracks.pop()
    }

    /// Push back a track previously returned by [`Self::remove_last`].
    pub fn restore_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove every track.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Number of tracks currently in the store.
    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
