//! Plane geometry over track polylines.
//!
//! Everything here works in surface pixel coordinates. Distances along a
//! polyline are arc lengths measured from its first point. Queries that fall
//! off the path return `None`; callers treat that as "nothing to draw here".

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::consts::{MIN_RAIL_SEGMENT_PX, MIN_SEGMENT_PX, RAIL_OFFSET_PX, SLEEPER_INTERVAL_PX};

/// A point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point { x: self.x + (other.x - self.x) * t, y: self.y + (other.y - self.y) * t }
    }

    /// Offset by `along` scaled by `amount`.
    #[must_use]
    pub fn offset(self, along: Point, amount: f64) -> Point {
        Point { x: self.x + along.x * amount, y: self.y + along.y * amount }
    }
}

/// A position on a path together with the tangent heading there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Direction of travel in radians, `atan2(dy, dx)` of the containing segment.
    pub heading: f64,
}

/// Total arc length of a polyline. Zero for fewer than two points.
#[must_use]
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(w[1])).sum()
}

/// Interpolated position and heading `distance` pixels along the polyline.
///
/// Segments shorter than [`MIN_SEGMENT_PX`] are skipped. Returns `None` for
/// negative distances, for distances at or beyond the end of the path, and for
/// paths with fewer than two points.
#[must_use]
pub fn position_at_distance(points: &[Point], distance: f64) -> Option<Placement> {
    if points.len() < 2 || distance < 0.0 {
        return None;
    }
    let mut remaining = distance;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg_len = a.distance_to(b);
        if seg_len < MIN_SEGMENT_PX {
            continue;
        }
        if remaining < seg_len {
            let p = a.lerp(b, remaining / seg_len);
            return Some(Placement { x: p.x, y: p.y, heading: (b.y - a.y).atan2(b.x - a.x) });
        }
        remaining -= seg_len;
    }
    None
}

/// Unit normal (left-hand perpendicular) of the segment `a -> b`, or `None`
/// when the segment is shorter than `min_len`.
#[must_use]
pub fn segment_normal(a: Point, b: Point, min_len: f64) -> Option<Point> {
    let len = a.distance_to(b);
    if len < min_len {
        return None;
    }
    Some(Point::new(-(b.y - a.y) / len, (b.x - a.x) / len))
}

/// The two rails laid alongside a track segment, each offset by
/// [`RAIL_OFFSET_PX`] from the centerline. `None` for segments under one pixel.
#[must_use]
pub fn rail_pair(a: Point, b: Point) -> Option<[(Point, Point); 2]> {
    let n = segment_normal(a, b, MIN_RAIL_SEGMENT_PX)?;
    Some([
        (a.offset(n, RAIL_OFFSET_PX), b.offset(n, RAIL_OFFSET_PX)),
        (a.offset(n, -RAIL_OFFSET_PX), b.offset(n, -RAIL_OFFSET_PX)),
    ])
}

/// A sleeper (cross tie) placed across a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sleeper {
    pub center: Point,
    /// Unit vector across the track.
    pub across: Point,
}

/// Sleepers spaced every [`SLEEPER_INTERVAL_PX`] of arc length along a stroke.
///
/// Segments under one pixel contribute no length. The first sleeper sits one
/// full interval from the start.
#[must_use]
pub fn sleepers(points: &[Point]) -> Vec<Sleeper> {
    let mut out = Vec::new();
    let mut accum = 0.0;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let Some(across) = segment_normal(a, b, MIN_RAIL_SEGMENT_PX) else {
            continue;
        };
        let seg_len = a.distance_to(b);
        accum += seg_len;
        while accum >= SLEEPER_INTERVAL_PX {
            accum -= SLEEPER_INTERVAL_PX;
            let center = a.lerp(b, 1.0 - accum / seg_len);
            out.push(Sleeper { center, across });
        }
    }
    out
}
