// SPDX-License-Identifier: MPL-2.0

//! Photo booth application
//!
//! This module contains the application state, message handling and the
//! session logic. Rendering lives in [`crate::terminal`].
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, CaptureStage, etc.)
//! - `session`: Photos of the current strip, view, timer and flash toggles
//! - `film_strip`: Drag-to-reorder and swipe-to-delete bookkeeping
//! - `handlers`: Message handlers grouped by domain
//! - `update`: Message dispatch
//! - `task` / `runtime`: Deferred work and the executor that runs it
//!
//! # Main Types
//!
//! - `AppModel`: Main application state with camera management
//! - `Message`: All possible user interactions and system events
//! - `Task`: Work an update schedules (delays, pipeline runs)

pub mod film_strip;
mod handlers;
pub mod runtime;
pub mod session;
mod state;
pub mod task;
mod update;

pub use film_strip::{DragState, FilmStrip};
pub use runtime::Executor;
pub use session::{Photo, PhotoId, Session, View};
pub use state::{AppModel, Backends, CameraStatus, CaptureStage, Message};
pub use task::Task;
