//! # Scene Module
//!
//! The gallery core never owns geometry. What it knows about the scene is the
//! [`InteractiveObjectRegistry`]: stable identifiers mapped to a category, a
//! non-owning proxy handle and an optional payload.
//!
//! ```
//! use gallery::gfx::scene::{Category, InteractiveObjectRegistry, Payload, ProxyHandle};
//!
//! let mut registry = InteractiveObjectRegistry::new();
//! registry
//!     .register("jukebox", Category::Jukebox, ProxyHandle(7), Payload::None)
//!     .unwrap();
//! assert!(registry.lookup(&"jukebox".into()).is_ok());
//! ```

pub mod registry;

// Re-export main types
pub use registry::{
    Category, ContactKind, InteractiveObject, InteractiveObjectRegistry, ObjectId, Payload,
    ProjectInfo, ProxyHandle, CLICK_PRIORITY,
};
