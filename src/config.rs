//! Gallery settings.
//!
//! Everything has a `Default` matching the shipped gallery; override fields
//! before handing the config to [`crate::app::GalleryApp::new`].

use cgmath::Vector3;
use winit::keyboard::KeyCode;

use crate::gfx::animation::{AvatarConfig, LightingConfig};
use crate::gfx::camera::{CameraPose, OrbitCameraBounds};
use crate::gfx::context::ActionId;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Where the camera rests in normal browsing
    pub default_vantage: CameraPose,
    /// Vantage next to the security camera
    pub security_vantage: CameraPose,
    /// Length of every choreographed camera move
    pub move_duration_ms: f64,
    pub aspect: f32,
    pub bounds: OrbitCameraBounds,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_vantage: CameraPose::new(
                Vector3::new(0.0, 2.0, 10.0),
                Vector3::new(0.0, 3.0, 0.0),
            ),
            security_vantage: CameraPose::new(
                Vector3::new(4.5, 5.2, 4.5),
                Vector3::new(0.0, 2.0, 0.0),
            ),
            move_duration_ms: 1500.0,
            aspect: 16.0 / 9.0,
            bounds: OrbitCameraBounds::default(),
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

/// Keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub day_night: KeyCode,
    pub security_toggle: KeyCode,
    /// Leaves security view; ignored in normal mode
    pub cancel: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            day_night: KeyCode::KeyL,
            security_toggle: KeyCode::KeyC,
            cancel: KeyCode::Escape,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub avatar: AvatarConfig,
    /// Spin clip of the record player
    pub jukebox_spin: ActionId,
    pub keys: KeyBindings,
    /// Frame time samples kept for FPS reporting
    pub performance_samples: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            avatar: AvatarConfig::default(),
            jukebox_spin: ActionId::SPIN,
            keys: KeyBindings::default(),
            performance_samples: 120,
        }
    }
}
