//! The engine: input handling, track commits, history and animation wired
//! together over abstract surfaces.
//!
//! `EngineCore` holds all application state and is generic over the raster
//! and overlay surfaces, so it runs under tests against an in-memory
//! [`Bitmap`](crate::raster::Bitmap) and a recording overlay. The browser
//! wrapper in [`crate::web`] plugs in canvas-backed surfaces.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::config::Config;
use crate::error::SurfaceError;
use crate::geom::Point;
use crate::history::{EntryKind, History};
use crate::input::{InputState, Tool, UiState};
use crate::raster::{RasterSurface, Rgba, flood_fill};
use crate::render::{Surface2d, draw_rail_segment, draw_sleepers};
use crate::scheduler::{FrameReport, Scheduler, StartOutcome};
use crate::track::{RawStroke, TrackStore, simplify};
use crate::trains::TrainKind;

/// Transient user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A train was requested but there is no track to run on.
    NoTrack,
    /// A train started running.
    Departed,
}

impl Notice {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::NoTrack => "no-track",
            Self::Departed => "departed",
        }
    }

    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::NoTrack => "Draw a track first!",
            Self::Departed => "All aboard!",
        }
    }

    /// Background color of the message banner.
    #[must_use]
    pub fn color(self) -> Rgba {
        match self {
            Self::NoTrack => Rgba::opaque(0xff, 0x98, 0x00),
            Self::Departed => Rgba::opaque(0x4c, 0xaf, 0x50),
        }
    }
}

/// Hosts receive `{ "code": "no-track", "text": ..., "color": "#ff9800" }`.
impl Serialize for Notice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Notice", 3)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("text", self.text())?;
        s.serialize_field("color", &self.color())?;
        s.end()
    }
}

/// Actions returned from engine calls for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Action {
    None,
    /// The raster or overlay changed.
    RenderNeeded,
    /// Undo/redo availability may have changed; refresh the toolbar.
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// Show a transient message.
    Notify(Notice),
}

/// Core engine state: everything except the browser objects.
pub struct EngineCore<R: RasterSurface, O: Surface2d> {
    pub raster: R,
    pub overlay: O,
    pub tracks: TrackStore,
    pub history: History<R::Snapshot>,
    pub scheduler: Scheduler,
    pub ui: UiState,
    pub input: InputState,
    config: Config,
}

impl<R: RasterSurface, O: Surface2d> EngineCore<R, O> {
    /// Wrap the surfaces, paint the raster white and record it as the baseline.
    ///
    /// # Errors
    ///
    /// Propagates surface failures from the initial fill or snapshot.
    pub fn new(mut raster: R, overlay: O, config: Config) -> Result<Self, SurfaceError> {
        raster.fill_all(Rgba::WHITE)?;
        let mut history = History::new(config.history_capacity);
        history.record(EntryKind::Draw, &raster)?;
        let (width, height) = raster.size();
        tracing::info!(width, height, "engine ready");
        Ok(Self {
            raster,
            overlay,
            tracks: TrackStore::new(),
            history,
            scheduler: Scheduler::new(),
            ui: UiState::default(),
            input: InputState::default(),
            config,
        })
    }

    // --- Settings ---

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    /// Pen and eraser width; zero is raised to one.
    pub fn set_stroke_width(&mut self, width: u32) {
        self.config.stroke_width = width.max(1);
    }

    /// Takes effect on the next frame.
    pub fn set_train_speed(&mut self, speed: u32) {
        self.config.train_speed = speed;
    }

    pub fn set_pen_color(&mut self, color: Rgba) {
        self.config.pen_color = color;
    }

    pub fn set_train_color(&mut self, color: Rgba) {
        self.config.train_color = color;
    }

    // --- Input events ---

    /// Begin a gesture with the active tool. A gesture still in progress is
    /// committed first.
    ///
    /// # Errors
    ///
    /// Propagates raster failures.
    pub fn on_pointer_down(&mut self, pt: Point) -> Result<Vec<Action>, SurfaceError> {
        let mut actions = self.on_pointer_up()?;
        let tool = self.ui.tool;
        if tool.is_freehand() {
            let eraser = tool == Tool::Eraser;
            let width = f64::from(self.config.stroke_width);
            self.raster.fill_disc(pt, width / 2.0, self.ink(eraser))?;
            self.input = InputState::Drawing { last: pt, eraser };
            actions.push(Action::RenderNeeded);
            return Ok(actions);
        }
        match tool {
            Tool::Pen | Tool::Eraser => {}
            Tool::Fill => {
                let (x, y) = pixel_of(pt);
                let changed = flood_fill(&mut self.raster, x, y, self.config.pen_color)?;
                tracing::debug!(x, y, changed, "flood fill");
                actions.push(self.record(EntryKind::Draw)?);
                actions.push(Action::RenderNeeded);
            }
            Tool::Track => {
                self.input = InputState::LayingTrack { stroke: RawStroke::begin(pt) };
            }
        }
        Ok(actions)
    }

    /// Extend the gesture in progress.
    ///
    /// # Errors
    ///
    /// Propagates raster failures.
    pub fn on_pointer_move(&mut self, pt: Point) -> Result<Vec<Action>, SurfaceError> {
        match &mut self.input {
            InputState::Idle => return Ok(Vec::new()),
            InputState::Drawing { last, eraser } => {
                let color = if *eraser { Rgba::WHITE } else { self.config.pen_color };
                let width = f64::from(self.config.stroke_width);
                self.raster.stroke_segment(*last, pt, width, color)?;
                *last = pt;
            }
            InputState::LayingTrack { stroke } => {
                if let Some(prev) = stroke.last() {
                    draw_rail_segment(&mut self.raster, prev, pt)?;
                }
                stroke.push(pt);
            }
        }
        Ok(vec![Action::RenderNeeded])
    }

    /// Finish the gesture in progress and record it. No-op when idle.
    ///
    /// # Errors
    ///
    /// Propagates raster failures.
    pub fn on_pointer_up(&mut self) -> Result<Vec<Action>, SurfaceError> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Ok(Vec::new()),
            InputState::Drawing { .. } => Ok(vec![self.record(EntryKind::Draw)?]),
            InputState::LayingTrack { stroke } => Ok(vec![self.commit_track(&stroke)?, Action::RenderNeeded]),
        }
    }

    /// The pointer left the canvas; same as releasing it.
    ///
    /// # Errors
    ///
    /// Propagates raster failures.
    pub fn on_pointer_leave(&mut self) -> Result<Vec<Action>, SurfaceError> {
        self.on_pointer_up()
    }

    fn commit_track(&mut self, stroke: &RawStroke) -> Result<Action, SurfaceError> {
        if stroke.len() < 2 {
            return self.record(EntryKind::Draw);
        }
        draw_sleepers(&mut self.raster, stroke.points())?;
        let Some(track) = simplify(stroke.points(), self.config.simplify_stride) else {
            tracing::debug!(raw = stroke.len(), "track stroke collapsed to a point");
            return self.record(EntryKind::Draw);
        };
        tracing::info!(raw = stroke.len(), kept = track.points().len(), length = track.length(), "track laid");
        self.tracks.add_track(track);
        self.record(EntryKind::Track)
    }

    // --- History ---

    /// # Errors
    ///
    /// Propagates raster failures from restoring the snapshot.
    pub fn undo(&mut self) -> Result<Vec<Action>, SurfaceError> {
        if self.history.undo(&mut self.raster, &mut self.tracks)? {
            Ok(vec![self.history_state(), Action::RenderNeeded])
        } else {
            Ok(Vec::new())
        }
    }

    /// # Errors
    ///
    /// Propagates raster failures from restoring the snapshot.
    pub fn redo(&mut self) -> Result<Vec<Action>, SurfaceError> {
        if self.history.redo(&mut self.raster, &mut self.tracks)? {
            Ok(vec![self.history_state(), Action::RenderNeeded])
        } else {
            Ok(Vec::new())
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Wipe the drawing, every track and all history, then record a fresh baseline.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn clear_all(&mut self) -> Result<Vec<Action>, SurfaceError> {
        self.input = InputState::Idle;
        self.scheduler.stop(&mut self.overlay)?;
        self.raster.fill_all(Rgba::WHITE)?;
        self.tracks.clear();
        self.history.reset();
        tracing::info!("canvas cleared");
        Ok(vec![self.record(EntryKind::Draw)?, Action::RenderNeeded])
    }

    /// Resize the raster and overlay. The drawing keeps its place at the
    /// origin, new area is white, and the overlay is redrawn on the next frame.
    /// History is untouched; older snapshots restore at the origin.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Vec<Action>, SurfaceError> {
        if self.raster.size() == (width, height) {
            return Ok(Vec::new());
        }
        self.raster.resize(width, height)?;
        self.overlay.resize(width, height)?;
        tracing::debug!(width, height, "surfaces resized");
        Ok(vec![Action::RenderNeeded])
    }

    fn record(&mut self, kind: EntryKind) -> Result<Action, SurfaceError> {
        self.history.record(kind, &self.raster)?;
        Ok(self.history_state())
    }

    fn history_state(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    // --- Trains ---

    /// Run `kind` on every track, replacing any running train.
    ///
    /// # Errors
    ///
    /// Propagates overlay failures from stopping the previous run.
    pub fn start_train(&mut self, kind: TrainKind) -> Result<Vec<Action>, SurfaceError> {
        if self.tracks.is_empty() {
            tracing::info!(train = %kind, "no track to run on");
            return Ok(vec![Action::Notify(Notice::NoTrack)]);
        }
        self.scheduler.stop(&mut self.overlay)?;
        match self.scheduler.start(kind, &self.tracks) {
            StartOutcome::NoTrack => Ok(vec![Action::Notify(Notice::NoTrack)]),
            StartOutcome::Departed => Ok(vec![Action::Notify(Notice::Departed), Action::RenderNeeded]),
        }
    }

    /// Stop the train and clear the overlay. Safe to call when idle.
    ///
    /// # Errors
    ///
    /// Propagates overlay failures.
    pub fn stop_train(&mut self) -> Result<Action, SurfaceError> {
        self.scheduler.stop(&mut self.overlay)?;
        Ok(Action::RenderNeeded)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Advance the animation by one frame.
    ///
    /// # Errors
    ///
    /// Propagates overlay failures.
    pub fn tick(&mut self, now_ms: f64) -> Result<FrameReport, SurfaceError> {
        self.scheduler.tick(&self.tracks, &mut self.overlay, &self.config, now_ms)
    }

    fn ink(&self, eraser: bool) -> Rgba {
        if eraser { Rgba::WHITE } else { self.config.pen_color }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn pixel_of(pt: Point) -> (i64, i64) {
    (pt.x.round() as i64, pt.y.round() as i64)
}
