//! Drawing surface with animated trains running on user-drawn tracks.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! drawing canvas (pen, eraser, flood fill), the track strokes laid by the
//! track tool, the train animation that runs along those tracks on a separate
//! overlay layer, and the undo/redo history that spans both raster edits and
//! track edits. The host JavaScript layer only wires DOM events and toolbar
//! buttons to the engine and reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] wiring input, tracks, history and animation |
//! | [`web`] | Browser bindings: canvas-backed surfaces, [`web::Engine`], [`web::FrameLoop`] |
//! | [`geom`] | Points and arc-length queries over polylines |
//! | [`track`] | Stroke simplification and the track store |
//! | [`trains`] | Static train catalog |
//! | [`scheduler`] | Per-frame train traversal |
//! | [`history`] | Undo/redo log over raster snapshots and track mutations |
//! | [`raster`] | Raster surface trait, in-memory bitmap, flood fill |
//! | [`render`] | Overlay surface trait, car shapes, rail decoration |
//! | [`input`] | Tools and the gesture state machine |
//! | [`config`] | User-tunable knobs with JSON loading |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants and palettes |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geom;
pub mod history;
pub mod input;
pub mod raster;
pub mod render;
pub mod scheduler;
pub mod track;
pub mod trains;
pub mod web;
