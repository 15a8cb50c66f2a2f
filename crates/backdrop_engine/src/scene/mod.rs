//! Animated scene components
//!
//! Every component builds its entities once against a [`RenderBackend`] and
//! then updates them from the frame's elapsed time. Components never read one
//! another's state; the orchestrator hands each the values it needs.
//!
//! ```text
//! Input Sampler → Motion Smoother → Backdrop (offset, once per frame)
//!                                       ↓
//!          Starfield (+ shooting stars), Sphere Field, Logo, world group, Accents
//! ```
//!
//! [`RenderBackend`]: crate::render::RenderBackend

pub mod accents;
pub mod logo;
pub mod parallax;
pub mod shooting_stars;
pub mod spheres;
pub mod stage;
pub mod starfield;

pub use accents::{Accents, Ring};
pub use logo::{Logo, LogoElement};
pub use parallax::{MotionSmoother, ParallaxState};
pub use shooting_stars::{ShootingStar, ShootingStarManager};
pub use spheres::{SphereConfig, SphereField, SphereState};
pub use stage::Stage;
pub use starfield::Starfield;
