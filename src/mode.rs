//! Global interaction mode: normal browsing or the security-camera view.
//!
//! Entering security view turns off picking, free camera controls and the
//! selection outline, turns on the alternate post-process effect and flies
//! the camera to the security camera's vantage. Leaving reverses all of it
//! and flies back to the default vantage.

use log::info;

use crate::error::{GalleryError, Result};
use crate::gfx::camera::{CameraChoreographer, CameraController, CameraPose, OrbitCamera};
use crate::gfx::context::PostProcess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    SecurityView,
}

/// Everything a mode switch touches
pub struct ModeTargets<'a> {
    pub camera: &'a OrbitCamera,
    pub controls: &'a mut CameraController,
    pub choreographer: &'a mut CameraChoreographer,
    pub post_process: &'a mut dyn PostProcess,
    pub now_ms: f64,
}

pub struct ModeController {
    mode: Mode,
    entered_at_ms: f64,
    default_vantage: CameraPose,
    security_vantage: CameraPose,
    move_duration_ms: f64,
}

impl ModeController {
    pub fn new(
        default_vantage: CameraPose,
        security_vantage: CameraPose,
        move_duration_ms: f64,
    ) -> Self {
        Self {
            mode: Mode::Normal,
            entered_at_ms: 0.0,
            default_vantage,
            security_vantage,
            move_duration_ms,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn enter_security_view(&mut self, targets: ModeTargets<'_>) -> Result<()> {
        if self.mode == Mode::SecurityView {
            return Err(GalleryError::InvalidModeTransition {
                from: self.mode,
                to: Mode::SecurityView,
            });
        }

        info!("Entering security view");
        targets.controls.set_enabled(false);
        targets.post_process.set_outline_enabled(false);
        targets.post_process.set_alternate_effect_enabled(true);
        targets.post_process.set_effect_time(0.0);
        targets.choreographer.move_to(
            targets.camera,
            self.security_vantage,
            self.move_duration_ms,
            targets.now_ms,
            None,
        );

        self.mode = Mode::SecurityView;
        self.entered_at_ms = targets.now_ms;
        Ok(())
    }

    pub fn exit(&mut self, targets: ModeTargets<'_>) -> Result<()> {
        if self.mode == Mode::Normal {
            return Err(GalleryError::InvalidModeTransition {
                from: self.mode,
                to: Mode::Normal,
            });
        }

        info!("Leaving security view");
        targets.controls.set_enabled(true);
        targets.post_process.set_alternate_effect_enabled(false);
        targets.post_process.set_outline_enabled(true);
        targets.choreographer.move_to(
            targets.camera,
            self.default_vantage,
            self.move_duration_ms,
            targets.now_ms,
            None,
        );

        self.mode = Mode::Normal;
        Ok(())
    }

    /// Seconds since security view was entered, for the effect's `time` uniform
    pub fn effect_time(&self, now_ms: f64) -> Option<f32> {
        match self.mode {
            Mode::SecurityView => Some(((now_ms - self.entered_at_ms).max(0.0) / 1000.0) as f32),
            Mode::Normal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::MoveStatus;
    use crate::gfx::headless::HeadlessPostProcess;
    use cgmath::Vector3;

    struct Fixture {
        camera: OrbitCamera,
        controls: CameraController,
        choreographer: CameraChoreographer,
        post: HeadlessPostProcess,
    }

    impl Fixture {
        fn new() -> (Self, ModeController) {
            let default_vantage =
                CameraPose::new(Vector3::new(0.0, 2.0, 10.0), Vector3::new(0.0, 3.0, 0.0));
            let security_vantage =
                CameraPose::new(Vector3::new(4.5, 5.2, 4.5), Vector3::new(0.0, 2.0, 0.0));
            let fixture = Self {
                camera: OrbitCamera::looking_at(
                    default_vantage.position,
                    default_vantage.target,
                    1.0,
                ),
                controls: CameraController::default(),
                choreographer: CameraChoreographer::new(),
                post: HeadlessPostProcess::new(),
            };
            (fixture, ModeController::new(default_vantage, security_vantage, 1000.0))
        }

        fn targets(&mut self, now_ms: f64) -> ModeTargets<'_> {
            ModeTargets {
                camera: &self.camera,
                controls: &mut self.controls,
                choreographer: &mut self.choreographer,
                post_process: &mut self.post,
                now_ms,
            }
        }

        fn settle(&mut self, now_ms: f64) {
            assert_ne!(
                self.choreographer.update(now_ms, &mut self.camera),
                MoveStatus::InFlight
            );
        }
    }

    #[test]
    fn test_enter_then_exit_round_trip() {
        let (mut fx, mut modes) = Fixture::new();
        let home = fx.camera.pose();

        modes.enter_security_view(fx.targets(0.0)).unwrap();
        assert_eq!(modes.mode(), Mode::SecurityView);
        assert!(!fx.controls.is_enabled());
        assert!(!fx.post.outline_enabled());
        assert!(fx.post.alternate_enabled());
        fx.settle(1000.0);
        assert_eq!(fx.camera.eye, Vector3::new(4.5, 5.2, 4.5));

        modes.exit(fx.targets(1000.0)).unwrap();
        fx.settle(2000.0);
        assert_eq!(modes.mode(), Mode::Normal);
        assert!(fx.controls.is_enabled());
        assert!(fx.post.outline_enabled());
        assert!(!fx.post.alternate_enabled());
        assert_eq!(fx.camera.pose(), home);
    }

    #[test]
    fn test_redundant_transitions_are_rejected() {
        let (mut fx, mut modes) = Fixture::new();
        let err = modes.exit(fx.targets(0.0)).unwrap_err();
        assert_eq!(
            err,
            GalleryError::InvalidModeTransition {
                from: Mode::Normal,
                to: Mode::Normal
            }
        );
        assert!(!fx.choreographer.is_active());

        modes.enter_security_view(fx.targets(0.0)).unwrap();
        assert!(modes.enter_security_view(fx.targets(10.0)).is_err());
    }

    #[test]
    fn test_exit_mid_flight_supersedes_move() {
        let (mut fx, mut modes) = Fixture::new();
        modes.enter_security_view(fx.targets(0.0)).unwrap();
        assert_eq!(modes.mode(), Mode::SecurityView);
        fx.choreographer.update(300.0, &mut fx.camera);
        modes.exit(fx.targets(300.0)).unwrap();
        assert_eq!(modes.mode(), Mode::Normal);
        fx.settle(1300.0);
        assert_eq!(fx.camera.eye, Vector3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn test_effect_time_only_in_security_view() {
        let (mut fx, mut modes) = Fixture::new();
        assert_eq!(modes.effect_time(500.0), None);
        modes.enter_security_view(fx.targets(1000.0)).unwrap();
        assert_eq!(modes.effect_time(3500.0), Some(2.5));
    }
}
