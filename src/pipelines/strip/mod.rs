// SPDX-License-Identifier: MPL-2.0

//! Film strip pipeline
//!
//! ```text
//! Photos (JPEG) → Decode → Compose (plate, perforations, frames) → JPEG
//!                                                                   ↓
//!                                              Export file / Share target
//! ```

pub mod compose;
pub mod export;

pub use compose::{StripLayout, compose_strip};
pub use export::{ShareOutcome, StripExporter, render_strip};
