//! # Graphics Module
//!
//! Everything the gallery core does between an input event and the renderer.
//!
//! ## Architecture Overview
//!
//! - **Scene Registry** ([`scene`]) - Interactive objects keyed by stable ids
//! - **Picking** ([`picking`]) - Pointer rays against renderer proxies
//! - **Selection** ([`selection`]) - Highlight reconciliation and cursor affordance
//! - **Animation** ([`animation`]) - Avatar actions, jukebox spin, day/night lights
//! - **Camera System** ([`camera`]) - Orbit camera, free controls and choreographed moves
//! - **Context** ([`context`]) - Traits for the renderer-side collaborators
//!
//! Continuous effects are [`transition::ActiveTransition`] values sampled
//! against an injected clock, so the whole pipeline runs headless in tests
//! with the fakes from [`headless`].

pub mod animation;
pub mod camera;
pub mod context;
pub mod headless;
pub mod picking;
pub mod scene;
pub mod selection;
pub mod transition;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use context::SceneContext;
