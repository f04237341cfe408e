// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for photos and strips
//!
//! Heavy pixel work runs in background tasks so the live preview keeps
//! updating while a capture or an export is in flight.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  JPEG photo  │
//! │   (RGBA)     │     │  - Render         │     │  + filter id │
//! │              │     │  - Filter pass    │     │              │
//! │              │     │  - Encoding (85)  │     │              │
//! └──────────────┘     └───────────────────┘     └──────┬───────┘
//!                                                       │ × n
//!                      ┌───────────────────┐     ┌──────▼───────┐
//!                      │  Strip Pipeline   │ ◀── │   Session    │
//!                      │  - Compose        │     └──────────────┘
//!                      │  - Encoding (80)  │ ──▶ file / share target
//!                      └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Single capture, filter and JPEG encoding
//! - [`strip`]: Strip composition, export and share

pub mod photo;
pub mod strip;
