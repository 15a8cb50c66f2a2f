//! # Backdrop Engine
//!
//! Per-frame animation and layout engine for an animated 3D landing-page
//! backdrop: a rotating starfield with shooting stars, a catalog of floating
//! textured spheres, a parallax-reactive world group, and an optional
//! extruded text logo.
//!
//! ## Features
//!
//! - **Backend agnostic**: all drawing goes through the [`render::RenderBackend`] trait
//! - **Deterministic**: motion is a pure function of one elapsed time per frame and a seeded RNG
//! - **Smoothed input**: pointer or device-tilt parallax with an idle drift fallback
//! - **Non-blocking assets**: the logo font loads off-thread with a bounded wait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use backdrop_engine::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     let config = BackdropConfig::default().with_seed(7);
//!     let mut loader = FileFontLoader::new();
//!     let mut backdrop = Backdrop::new(
//!         config,
//!         RecordingBackend::new(),
//!         &mut loader,
//!         false,
//!         Viewport::new(1280, 720),
//!     )?;
//!
//!     backdrop.handle_event(BackdropEvent::PointerMoved { x: 900.0, y: 200.0 })?;
//!     let mut clock = ManualClock::new();
//!     for _ in 0..60 {
//!         clock.advance(1.0 / 60.0);
//!         backdrop.frame(&clock)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

mod backdrop;

pub use backdrop::{Backdrop, BackdropError, BackdropEvent, FrameStats, Viewport};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Backdrop, BackdropError, BackdropEvent, FrameStats, Viewport,
        assets::{AssetLoader, FileFontLoader, FontData},
        config::Config,
        core::config::BackdropConfig,
        foundation::{
            math::{Vec2, Vec3, Transform},
            time::{Clock, FrameTimer, ManualClock, SystemClock},
        },
        input::InputMode,
        render::{Camera, RecordingBackend, RenderBackend},
    };
}

#[cfg(test)]
mod tests;
