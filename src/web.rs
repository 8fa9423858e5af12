//! Browser bindings.
//!
//! [`CanvasRaster`] and the [`Surface2d`] impl for `CanvasRenderingContext2d`
//! put the engine's abstract surfaces on real canvases. [`Engine`] is the
//! object the host page holds: it owns the engine core behind an
//! `Rc<RefCell<..>>` shared with the animation [`FrameLoop`], forwards DOM
//! events, and hands back actions as JSON for the page to act on.

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::config::Config;
use crate::consts::{PEN_PALETTE, TRAIN_PALETTE};
use crate::engine::{Action, EngineCore};
use crate::error::SurfaceError;
use crate::geom::Point;
use crate::input::Tool;
use crate::raster::{Bitmap, RasterSurface, Rgba};
use crate::render::Surface2d;
use crate::trains::TrainKind;

type WebCore = EngineCore<CanvasRaster, CanvasRenderingContext2d>;

fn js_err(e: JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{e:?}"))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
    canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| SurfaceError::Backend("canvas has no 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| SurfaceError::Backend("context is not CanvasRenderingContext2d".into()))
}

// =============================================================
// Raster
// =============================================================

/// The drawing canvas as a raster surface. Snapshots are `ImageData` copies.
pub struct CanvasRaster {
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasRaster {
    /// Bind to `canvas`, sized as it is now.
    ///
    /// # Errors
    ///
    /// Fails when the canvas has no 2D context.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        Ok(Self { ctx: context_2d(canvas)?, width: canvas.width(), height: canvas.height() })
    }

    fn image_data(&self) -> Result<ImageData, SurfaceError> {
        self.ctx
            .get_image_data(0.0, 0.0, f64::from(self.width), f64::from(self.height))
            .map_err(js_err)
    }
}

impl RasterSurface for CanvasRaster {
    type Snapshot = ImageData;

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn snapshot(&self) -> Result<ImageData, SurfaceError> {
        self.image_data()
    }

    fn restore(&mut self, snapshot: &ImageData) -> Result<(), SurfaceError> {
        if (snapshot.width(), snapshot.height()) != (self.width, self.height) {
            self.fill_all(Rgba::WHITE)?;
        }
        self.ctx.put_image_data(snapshot, 0.0, 0.0).map_err(js_err)
    }

    fn fill_all(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        Ok(())
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU).map_err(js_err)?;
        self.ctx.fill();
        Ok(())
    }

    fn stroke_segment(&mut self, from: Point, to: Point, width: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.ctx.set_stroke_style_str(&color.to_hex());
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let previous = if self.width == 0 || self.height == 0 { None } else { Some(self.image_data()?) };
        let canvas = self.ctx.canvas().ok_or_else(|| SurfaceError::Backend("raster context is detached".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        self.width = width;
        self.height = height;
        self.fill_all(Rgba::WHITE)?;
        match previous {
            Some(data) => self.ctx.put_image_data(&data, 0.0, 0.0).map_err(js_err),
            None => Ok(()),
        }
    }

    fn read_pixels(&self) -> Result<Bitmap, SurfaceError> {
        let data = self.image_data()?;
        let (got_w, got_h) = (data.width(), data.height());
        Bitmap::from_rgba(got_w, got_h, data.data().0).ok_or(SurfaceError::SizeMismatch {
            got_w,
            got_h,
            want_w: self.width,
            want_h: self.height,
        })
    }

    fn write_pixels(&mut self, pixels: &Bitmap) -> Result<(), SurfaceError> {
        if (pixels.width(), pixels.height()) != (self.width, self.height) {
            return Err(SurfaceError::SizeMismatch {
                got_w: pixels.width(),
                got_h: pixels.height(),
                want_w: self.width,
                want_h: self.height,
            });
        }
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_rgba()), self.width, self.height)
            .map_err(js_err)?;
        self.restore(&data)
    }
}

// =============================================================
// Overlay
// =============================================================

impl Surface2d for CanvasRenderingContext2d {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        let canvas = self.canvas().ok_or_else(|| SurfaceError::Backend("overlay context is detached".into()))?;
        self.clear_rect(0.0, 0.0, f64::from(canvas.width()), f64::from(canvas.height()));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let canvas = self.canvas().ok_or_else(|| SurfaceError::Backend("overlay context is detached".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Ok(())
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::translate(self, x, y).map_err(js_err)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::rotate(self, angle).map_err(js_err)
    }

    fn set_fill(&mut self, color: Rgba) {
        self.set_fill_style_str(&color.to_hex());
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), SurfaceError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.begin_path();
        self.move_to(first.x, first.y);
        for p in rest {
            self.line_to(p.x, p.y);
        }
        self.close_path();
        self.fill();
        Ok(())
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) -> Result<(), SurfaceError> {
        self.begin_path();
        self.arc(cx, cy, r, 0.0, TAU).map_err(js_err)?;
        self.fill();
        Ok(())
    }

    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<(), SurfaceError> {
        let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
        self.begin_path();
        self.move_to(x + r, y);
        self.arc_to(x + w, y, x + w, y + h, r).map_err(js_err)?;
        self.arc_to(x + w, y + h, x, y + h, r).map_err(js_err)?;
        self.arc_to(x, y + h, x, y, r).map_err(js_err)?;
        self.arc_to(x, y, x + w, y, r).map_err(js_err)?;
        self.close_path();
        self.fill();
        Ok(())
    }
}

// =============================================================
// Frame loop
// =============================================================

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Drives [`EngineCore::tick`] from `requestAnimationFrame`.
///
/// At most one frame is pending at a time. [`FrameLoop::stop`] cancels it
/// synchronously, and a frame that finds the scheduler idle does not
/// request another.
pub struct FrameLoop<F = FrameCallback> {
    pending: Rc<RefCell<Option<i32>>>,
    callback: Rc<RefCell<Option<F>>>,
}

impl<F> Default for FrameLoop<F> {
    fn default() -> Self {
        Self { pending: Rc::default(), callback: Rc::new(RefCell::new(None)) }
    }
}

impl<F> FrameLoop<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// Cancel the pending frame, if any, and release the callback.
    ///
    /// The callback holds the engine core and its own cell, so it is only
    /// freed here.
    pub fn stop(&self) {
        let released = self.callback.borrow_mut().take();
        drop(released);
        let Some(handle) = self.pending.borrow_mut().take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.cancel_animation_frame(handle) {
                tracing::warn!(error = ?e, "cancelAnimationFrame failed");
            }
        }
    }
}

impl<F> Drop for FrameLoop<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl FrameLoop<FrameCallback> {
    /// Begin requesting frames for `core`. Does nothing if a frame is already pending.
    pub fn start(&self, core: &Rc<RefCell<WebCore>>) {
        if self.is_pending() {
            return;
        }
        let core = Rc::clone(core);
        let pending = Rc::clone(&self.pending);
        let holder = Rc::clone(&self.callback);
        let cb = Closure::wrap(Box::new(move |ts: f64| {
            pending.borrow_mut().take();
            let keep_going = {
                let mut core = core.borrow_mut();
                if core.is_running() {
                    match core.tick(ts) {
                        Ok(_) => true,
                        Err(e) => {
                            tracing::warn!(error = %e, "frame failed; stopping train");
                            if let Err(e) = core.stop_train() {
                                tracing::warn!(error = %e, "failed to clear overlay");
                            }
                            false
                        }
                    }
                } else {
                    false
                }
            };
            if keep_going {
                request_frame(&holder, &pending);
            }
        }) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(cb);
        request_frame(&self.callback, &self.pending);
    }
}

fn request_frame(holder: &Rc<RefCell<Option<FrameCallback>>>, pending: &Rc<RefCell<Option<i32>>>) {
    let Some(window) = web_sys::window() else {
        tracing::warn!("no window; animation frames unavailable");
        return;
    };
    let holder = holder.borrow();
    let Some(cb) = holder.as_ref() else {
        return;
    };
    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(handle) => *pending.borrow_mut() = Some(handle),
        Err(e) => tracing::warn!(error = ?e, "requestAnimationFrame failed"),
    }
}

// =============================================================
// Engine
// =============================================================

/// The engine as seen by the host page.
///
/// Event methods return a JSON array of actions, for example
/// `[{"type":"history-changed","data":{"can_undo":true,"can_redo":false}}]`.
#[wasm_bindgen]
pub struct Engine {
    core: Rc<RefCell<WebCore>>,
    frames: FrameLoop,
}

#[wasm_bindgen]
impl Engine {
    /// Bind to the drawing canvas and the overlay canvas stacked above it.
    /// `config_json` may be empty for defaults.
    ///
    /// # Errors
    ///
    /// Fails on a bad config or a canvas without a 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, overlay: HtmlCanvasElement, config_json: &str) -> Result<Engine, JsError> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(config_json).inspect_err(|e| tracing::warn!(error = %e, "config rejected"))?
        };
        let raster = CanvasRaster::new(&canvas)?;
        let overlay = context_2d(&overlay)?;
        let core = EngineCore::new(raster, overlay, config)?;
        Ok(Self { core: Rc::new(RefCell::new(core)), frames: FrameLoop::new() })
    }

    // --- Settings ---

    /// # Errors
    ///
    /// Fails on an unknown tool name.
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsError> {
        let tool: Tool = tool.parse()?;
        self.core.borrow_mut().set_tool(tool);
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.core.borrow_mut().set_stroke_width(width);
    }

    pub fn set_train_speed(&mut self, speed: u32) {
        self.core.borrow_mut().set_train_speed(speed);
    }

    /// # Errors
    ///
    /// Fails on a color that is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn set_pen_color(&mut self, color: &str) -> Result<(), JsError> {
        let color = Rgba::parse_hex(color)?;
        self.core.borrow_mut().set_pen_color(color);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails on a color that is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn set_train_color(&mut self, color: &str) -> Result<(), JsError> {
        let color = Rgba::parse_hex(color)?;
        self.core.borrow_mut().set_train_color(color);
        Ok(())
    }

    // --- Input events ---

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().on_pointer_down(Point::new(x, y))?;
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().on_pointer_move(Point::new(x, y))?;
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn on_pointer_up(&mut self) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().on_pointer_up()?;
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn on_pointer_leave(&mut self) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().on_pointer_leave()?;
        to_json(&actions)
    }

    // --- Toolbar ---

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn undo(&mut self) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().undo()?;
        to_json(&actions)
    }

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn redo(&mut self) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().redo()?;
        to_json(&actions)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.core.borrow().can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.core.borrow().can_redo()
    }

    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn clear_all(&mut self) -> Result<String, JsError> {
        self.frames.stop();
        let actions = self.core.borrow_mut().clear_all()?;
        to_json(&actions)
    }

    /// Resize both canvases, keeping the drawing. Hosts call this when the
    /// container changes size.
    ///
    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<String, JsError> {
        let actions = self.core.borrow_mut().resize(width, height)?;
        to_json(&actions)
    }

    // --- Trains ---

    /// Start `kind` (`steam`, `commuter`, `high-speed`, `monorail`) on every track.
    ///
    /// # Errors
    ///
    /// Fails on an unknown train name or a canvas failure.
    pub fn start_train(&mut self, kind: &str) -> Result<String, JsError> {
        let kind: TrainKind = kind.parse()?;
        self.frames.stop();
        let actions = self.core.borrow_mut().start_train(kind)?;
        if self.core.borrow().is_running() {
            self.frames.start(&self.core);
        }
        to_json(&actions)
    }

    /// Stop the train. No frame renders after this returns.
    ///
    /// # Errors
    ///
    /// Propagates canvas failures.
    pub fn stop_train(&mut self) -> Result<String, JsError> {
        self.frames.stop();
        let action = self.core.borrow_mut().stop_train()?;
        to_json(&[action])
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.core.borrow().is_running()
    }
}

fn to_json(actions: &[Action]) -> Result<String, JsError> {
    Ok(serde_json::to_string(actions)?)
}

// =============================================================
// Toolbar data
// =============================================================

/// Pen colors for the palette, as CSS hex strings.
#[wasm_bindgen]
#[must_use]
pub fn pen_palette() -> js_sys::Array {
    PEN_PALETTE.iter().map(|c| JsValue::from_str(c)).collect()
}

/// Train body colors for the palette, as CSS hex strings.
#[wasm_bindgen]
#[must_use]
pub fn train_palette() -> js_sys::Array {
    TRAIN_PALETTE.iter().map(|c| JsValue::from_str(c)).collect()
}

/// Train type names accepted by [`Engine::start_train`].
#[wasm_bindgen]
#[must_use]
pub fn train_kinds() -> js_sys::Array {
    TrainKind::ALL.iter().map(|k| JsValue::from_str(k.as_str())).collect()
}
