// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for host capabilities
//!
//! Everything the booth needs from the machine it runs on sits behind a trait
//! here, so the application core can run against real hardware or fakes:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐    ┌──────────────────┐    │
//! │  │   Camera    │    │  Shutter sound   │    │
//! │  │ (V4L2/synth)│    │ (terminal bell)  │    │
//! │  └─────────────┘    └──────────────────┘    │
//! │  ┌─────────────┐    ┌──────────────────┐    │
//! │  │   Haptics   │    │      Share       │    │
//! │  │   (no-op)   │    │ (desktop opener) │    │
//! │  └─────────────┘    └──────────────────┘    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Camera enumeration and frame streams
//! - [`audio`]: Shutter sound
//! - [`feedback`]: Haptic feedback
//! - [`share`]: Native share capability

pub mod audio;
pub mod camera;
pub mod feedback;
pub mod share;
