//! # Gallery Prelude
//!
//! Commonly used types for hosts embedding the gallery core.
//!
//! ```
//! use gallery::prelude::*;
//! ```

// Re-export core application types
pub use crate::app::{ClickOutcome, FrameUniforms, GalleryApp};
pub use crate::config::{CameraConfig, GalleryConfig, KeyBindings};
pub use crate::error::{GalleryError, Result};
pub use crate::mode::Mode;

// Re-export scene and collaborator types
pub use crate::gfx::context::{
    ActionId, AnimationMixer, AudioSource, LightRig, MixerEvent, PostProcess, ProxyIntersector,
    SceneContext, TimeSource,
};
pub use crate::gfx::picking::{screen_to_ndc, BoundsIntersector, Ray, AABB};
pub use crate::gfx::scene::{
    Category, ContactKind, InteractiveObjectRegistry, ObjectId, Payload, ProjectInfo, ProxyHandle,
};
pub use crate::gfx::selection::CursorAffordance;

// Re-export performance monitoring
pub use crate::performance::{PerformanceMetrics, PerformanceMonitor};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
