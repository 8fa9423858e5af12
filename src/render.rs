//! Rendering: car shapes on the overlay layer and rail decoration on the raster.
//!
//! Car renderers draw through [`Surface2d`], a minimal 2D path API that the
//! browser context implements in [`crate::web`] and tests implement with a
//! recorder. Each renderer works in car-local coordinates: the origin is the
//! car center, +x points in the direction of travel, and the body spans
//! `width` x `height` around the origin.
//!
//! Rails and sleepers are painted straight onto the raster surface so they
//! become part of the drawing and of its undo snapshots.

#[cfg(test)]
#[path = "render_test.rs"]
pub(crate) mod render_test;

use std::f64::consts::PI;

use crate::consts::{RAIL_WIDTH_PX, SLEEPER_HALF_LENGTH_PX, SLEEPER_WIDTH_PX};
use crate::error::SurfaceError;
use crate::geom::{Placement, Point, rail_pair, sleepers};
use crate::raster::{RasterSurface, Rgba};
use crate::trains::{CarShape, CarSpec};

/// Rail color.
const RAIL_COLOR: Rgba = Rgba::opaque(0x79, 0x55, 0x48);

/// Sleeper color.
const SLEEPER_COLOR: Rgba = Rgba::opaque(0x8d, 0x6e, 0x63);

const SMOKE: Rgba = Rgba::new(200, 200, 200, 153);
const CHIMNEY: Rgba = Rgba::opaque(0x22, 0x22, 0x22);
const WHEEL_LIGHT: Rgba = Rgba::opaque(0x77, 0x77, 0x77);
const WHEEL: Rgba = Rgba::opaque(0x55, 0x55, 0x55);
const WHEEL_DARK: Rgba = Rgba::opaque(0x44, 0x44, 0x44);
const WINDOW_BLUE: Rgba = Rgba::opaque(0xbb, 0xde, 0xfb);
const WINDOW_PALE: Rgba = Rgba::opaque(0xe3, 0xf2, 0xfd);
const STRIPE_BLUE: Rgba = Rgba::opaque(0x15, 0x65, 0xc0);
const NOSE_GLASS: Rgba = Rgba::opaque(0x26, 0x32, 0x38);

/// Milliseconds per radian of smoke-puff drift.
const SMOKE_PERIOD_MS: f64 = 300.0;

/// How far the high-speed nose extends past the car body.
const NOSE_EXTENSION: f64 = 8.0;

/// Minimal 2D drawing API used by car renderers.
pub trait Surface2d {
    /// Erase everything on the surface.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Resize the surface. Its contents are discarded.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    /// Push the current transform and fill state.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`Surface2d::save`].
    fn restore(&mut self);

    /// # Errors
    ///
    /// Propagates backend failures.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Rotate clockwise by `angle` radians.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn rotate(&mut self, angle: f64) -> Result<(), SurfaceError>;

    fn set_fill(&mut self, color: Rgba);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Fill the closed polygon through `points`.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Propagates backend failures.
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Propagates backend failures.
    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<(), SurfaceError>;
}

// =============================================================
// Car dispatch
// =============================================================

/// Draw one car centered on `at`, rotated to its heading.
///
/// `body` is the train color; `now_ms` drives the steam locomotive's smoke.
///
/// # Errors
///
/// Propagates the first failing surface call.
pub fn draw_car<S: Surface2d + ?Sized>(
    s: &mut S,
    car: &CarSpec,
    at: Placement,
    body: Rgba,
    now_ms: f64,
) -> Result<(), SurfaceError> {
    s.save();
    let drawn = place_and_draw(s, car, at, body, now_ms);
    s.restore();
    drawn
}

fn place_and_draw<S: Surface2d + ?Sized>(
    s: &mut S,
    car: &CarSpec,
    at: Placement,
    body: Rgba,
    now_ms: f64,
) -> Result<(), SurfaceError> {
    s.translate(at.x, at.y)?;
    let (w, h) = (car.width, car.height);
    match car.shape {
        CarShape::SteamLoco => {
            s.rotate(at.heading)?;
            draw_steam_loco(s, w, h, body, now_ms)
        }
        CarShape::CoalCar => {
            s.rotate(at.heading)?;
            draw_coal_car(s, w, h, body)
        }
        CarShape::PassengerCar => {
            s.rotate(at.heading)?;
            draw_passenger_car(s, w, h, body)
        }
        CarShape::CommuterCar => {
            s.rotate(at.heading)?;
            draw_commuter_car(s, w, h, body)
        }
        CarShape::HighSpeedHead => {
            s.rotate(at.heading)?;
            draw_high_speed_nose(s, w, h, body)
        }
        CarShape::HighSpeedCar => {
            s.rotate(at.heading)?;
            draw_high_speed_car(s, w, h, body)
        }
        CarShape::HighSpeedTail => {
            // Same nose, facing backwards.
            s.rotate(at.heading + PI)?;
            draw_high_speed_nose(s, w, h, body)
        }
        CarShape::MonorailCar => {
            s.rotate(at.heading)?;
            draw_monorail_car(s, w, h, body)
        }
    }
}

fn wheels<S: Surface2d + ?Sized>(s: &mut S, xs: &[f64], y: f64, r: f64, color: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(color);
    for &x in xs {
        s.fill_circle(x, y, r)?;
    }
    Ok(())
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_steam_loco<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba, now_ms: f64) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_rect(-w / 2.0, -h / 2.0, w, h);
    s.fill_circle(w / 4.0, 0.0, h / 2.0 - 2.0)?;

    s.set_fill(CHIMNEY);
    s.fill_rect(w / 4.0 - 3.0, -h / 2.0 - 8.0, 6.0, 10.0);

    s.set_fill(SMOKE);
    let t = now_ms / SMOKE_PERIOD_MS;
    for i in 0..3 {
        let i = f64::from(i);
        let sy = -h / 2.0 - 12.0 - i * 8.0 - (t % 5.0) * 2.0;
        let sx = w / 4.0 + (t + i).sin() * 4.0;
        s.fill_circle(sx, sy, 4.0 + i * 2.0)?;
    }

    wheels(s, &[-w / 4.0, 0.0, w / 4.0], h / 2.0 - 2.0, 4.0, WHEEL_LIGHT)
}

fn draw_coal_car<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_rect(-w / 2.0, -h / 2.0, w, h);

    // Coal heap peeking over the top edge.
    s.set_fill(CHIMNEY);
    s.fill_polygon(&[
        Point::new(-w / 2.0 + 3.0, -h / 2.0 + 2.0),
        Point::new(w / 2.0 - 3.0, -h / 2.0 + 2.0),
        Point::new(w / 2.0 - 5.0, -h / 2.0 - 4.0),
        Point::new(-w / 2.0 + 5.0, -h / 2.0 - 4.0),
    ])?;

    wheels(s, &[-w / 4.0, w / 4.0], h / 2.0 - 2.0, 3.0, WHEEL_LIGHT)
}

fn draw_passenger_car<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_round_rect(-w / 2.0, -h / 2.0, w, h, 3.0)?;

    s.set_fill(WINDOW_BLUE);
    for i in -1..=1 {
        s.fill_rect(f64::from(i) * 9.0 - 3.0, -h / 2.0 + 3.0, 6.0, 6.0);
    }

    wheels(s, &[-w / 4.0, w / 4.0], h / 2.0 - 2.0, 3.0, WHEEL)
}

fn draw_commuter_car<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_round_rect(-w / 2.0, -h / 2.0, w, h, 4.0)?;

    s.set_fill(Rgba::WHITE);
    s.fill_rect(-w / 2.0, -2.0, w, 4.0);

    s.set_fill(WINDOW_PALE);
    for i in -2..=2 {
        s.fill_rect(f64::from(i) * 8.0 - 3.0, -h / 2.0 + 3.0, 5.0, 5.0);
    }

    wheels(s, &[-w / 3.0, w / 3.0], h / 2.0 - 1.0, 3.0, WHEEL_DARK)
}

fn draw_high_speed_nose<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_polygon(&[
        Point::new(-w / 2.0, -h / 2.0),
        Point::new(w / 2.0 + NOSE_EXTENSION, -h / 4.0),
        Point::new(w / 2.0 + NOSE_EXTENSION, h / 4.0),
        Point::new(-w / 2.0, h / 2.0),
    ])?;

    s.set_fill(STRIPE_BLUE);
    s.fill_rect(-w / 2.0, -2.0, w + 4.0, 4.0);

    s.set_fill(NOSE_GLASS);
    s.fill_polygon(&[
        Point::new(w / 4.0, -h / 3.0),
        Point::new(w / 2.0 + 4.0, -h / 6.0),
        Point::new(w / 2.0 + 4.0, h / 6.0),
        Point::new(w / 4.0, h / 3.0),
    ])?;

    wheels(s, &[-w / 4.0, w / 6.0], h / 2.0 - 1.0, 2.0, WHEEL_DARK)
}

fn draw_high_speed_car<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_round_rect(-w / 2.0, -h / 2.0, w, h, 2.0)?;

    s.set_fill(STRIPE_BLUE);
    s.fill_rect(-w / 2.0, -2.0, w, 4.0);

    s.set_fill(WINDOW_PALE);
    for i in -2..=2 {
        s.fill_rect(f64::from(i) * 8.0 - 2.0, -h / 2.0 + 3.0, 4.0, 5.0);
    }

    wheels(s, &[-w / 4.0, w / 4.0], h / 2.0 - 1.0, 2.0, WHEEL_DARK)
}

fn draw_monorail_car<S: Surface2d + ?Sized>(s: &mut S, w: f64, h: f64, body: Rgba) -> Result<(), SurfaceError> {
    s.set_fill(body);
    s.fill_round_rect(-w / 2.0, -h / 2.0, w, h, 6.0)?;

    s.set_fill(WINDOW_PALE);
    for i in -1..=1 {
        s.fill_round_rect(f64::from(i) * 10.0 - 4.0, -h / 2.0 + 4.0, 8.0, 7.0, 2.0)?;
    }

    // Bogie gripping the beam.
    s.set_fill(WHEEL);
    s.fill_rect(-4.0, h / 2.0 - 2.0, 8.0, 4.0);
    Ok(())
}

// =============================================================
// Rail decoration (raster)
// =============================================================

/// Paint the two rails alongside one track segment. Sub-pixel segments are skipped.
///
/// # Errors
///
/// Propagates raster backend failures.
pub fn draw_rail_segment<R: RasterSurface + ?Sized>(raster: &mut R, from: Point, to: Point) -> Result<(), SurfaceError> {
    let Some(rails) = rail_pair(from, to) else {
        return Ok(());
    };
    for (a, b) in rails {
        raster.stroke_segment(a, b, RAIL_WIDTH_PX, RAIL_COLOR)?;
    }
    Ok(())
}

/// Paint sleepers across a finished track stroke.
///
/// # Errors
///
/// Propagates raster backend failures.
pub fn draw_sleepers<R: RasterSurface + ?Sized>(raster: &mut R, stroke: &[Point]) -> Result<(), SurfaceError> {
    for tie in sleepers(stroke) {
        raster.stroke_segment(
            tie.center.offset(tie.across, SLEEPER_HALF_LENGTH_PX),
            tie.center.offset(tie.across, -SLEEPER_HALF_LENGTH_PX),
            SLEEPER_WIDTH_PX,
            SLEEPER_COLOR,
        )?;
    }
    Ok(())
}
