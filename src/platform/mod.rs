//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (`clock`)
//! - Input events (`input`)
//! - Browser glue: animation frames, DOM listeners, catalog fetch (`web`)

pub mod clock;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::{FrameClock, FrameScheduler};
pub use input::InputSnapshot;
