// SPDX-License-Identifier: MPL-2.0

//! Photo Booth - three shots, one film strip
//!
//! This library provides the core functionality for the photo booth,
//! including camera capture, color filters, the capture session and strip
//! composition.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Session state, messages and handlers
//! - [`backends`]: Camera, haptics, shutter sound and share abstraction
//! - [`filters`]: The filter catalog and its pixel transforms
//! - [`pipelines`]: Photo capture and strip export pipelines
//! - [`config`]: User configuration handling
//! - [`terminal`]: Terminal front-end
//!
//! # Example
//!
//! ```ignore
//! // This is an interactive application, typically run via:
//! // photobooth
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filters;
pub mod pipelines;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message, View};
pub use config::Config;
pub use filters::FilterType;
