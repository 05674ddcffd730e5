//! # Animation
//!
//! Discrete and continuous state transitions driven by picking and keys:
//!
//! - [`avatar`] - named avatar actions with weight crossfades and play-once returns
//! - [`jukebox`] - vinyl spin and music driven by hover and the click pin
//! - [`lighting`] - the day/night light blend

pub mod avatar;
pub mod jukebox;
pub mod lighting;

pub use avatar::{AvatarAnimator, AvatarConfig, WeightSet};
pub use jukebox::JukeboxController;
pub use lighting::{Color, LightState, LightUniform, LightingAnimator, LightingConfig};
