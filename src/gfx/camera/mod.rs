pub mod camera_controller;
pub mod camera_utils;
pub mod choreographer;
pub mod orbit_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{CameraPose, CameraUniform};
pub use choreographer::{CameraChoreographer, CompletionCallback, MoveStatus};
pub use orbit_camera::{OrbitCamera, OrbitCameraBounds};
