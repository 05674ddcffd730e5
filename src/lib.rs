//! Gallery interaction core
//!
//! Pointer picking, highlight reconciliation, avatar and jukebox animation,
//! camera choreography, day/night lighting and the security-camera mode of a
//! 3D portfolio gallery. Rendering, asset loading and audio decoding stay
//! with the host; the core talks to them through [`gfx::context`].

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod mode;
pub mod performance;
pub mod prelude;

// Re-export main types for convenience
pub use app::GalleryApp;
pub use config::GalleryConfig;
pub use error::{GalleryError, Result};

/// Install the `env_logger` backend; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
