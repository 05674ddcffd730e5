//! Cancellable, time-bounded camera moves.
//!
//! At most one move is in flight. Issuing another samples the camera where it
//! is right now and starts from there; the superseded move is dropped without
//! restoring anything and its completion callback never fires.

use log::{debug, info};

use super::camera_utils::CameraPose;
use super::orbit_camera::OrbitCamera;
use crate::gfx::transition::ActiveTransition;

/// Runs once when a move reaches its destination
pub type CompletionCallback = Box<dyn FnOnce(&CameraPose)>;

struct CameraMove {
    transition: ActiveTransition<CameraPose>,
    on_complete: Option<CompletionCallback>,
}

/// What a choreographer update did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// No move is active; the camera was not touched
    Idle,
    InFlight,
    /// The move reached `t = 1` this frame and has been retired
    Completed,
}

#[derive(Default)]
pub struct CameraChoreographer {
    active: Option<CameraMove>,
}

impl CameraChoreographer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving the camera to `to` over `duration_ms`.
    ///
    /// The move starts from the camera's live pose, which is the mid-flight
    /// pose if another move is still running.
    pub fn move_to(
        &mut self,
        camera: &OrbitCamera,
        to: CameraPose,
        duration_ms: f64,
        now_ms: f64,
        on_complete: Option<CompletionCallback>,
    ) {
        if self.active.take().is_some() {
            debug!("Camera move superseded at {:.0}ms", now_ms);
        }
        info!(
            "Camera move to {:?} looking at {:?} over {:.0}ms",
            to.position, to.target, duration_ms
        );
        self.active = Some(CameraMove {
            transition: ActiveTransition::new(camera.pose(), to, now_ms, duration_ms),
            on_complete,
        });
    }

    /// Advance the active move, if any, and write the pose into `camera`
    pub fn update(&mut self, now_ms: f64, camera: &mut OrbitCamera) -> MoveStatus {
        let Some(active) = self.active.as_ref() else {
            return MoveStatus::Idle;
        };

        camera.set_pose(active.transition.sample(now_ms));
        if !active.transition.is_finished(now_ms) {
            return MoveStatus::InFlight;
        }

        if let Some(finished) = self.active.take() {
            debug!("Camera move completed at {:.0}ms", now_ms);
            if let Some(callback) = finished.on_complete {
                callback(&finished.transition.to);
            }
        }
        MoveStatus::Completed
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Destination of the active move
    pub fn destination(&self) -> Option<CameraPose> {
        self.active.as_ref().map(|active| active.transition.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};
    use std::cell::Cell;
    use std::rc::Rc;

    fn camera() -> OrbitCamera {
        OrbitCamera::looking_at(Vector3::new(0.0, 2.0, 10.0), Vector3::new(0.0, 3.0, 0.0), 1.0)
    }

    fn pose(x: f32, y: f32, z: f32) -> CameraPose {
        CameraPose::new(Vector3::new(x, y, z), Vector3::new(0.0, 1.0, 0.0))
    }

    #[test]
    fn test_move_reaches_destination_and_stops() {
        let mut camera = camera();
        let mut choreographer = CameraChoreographer::new();
        let destination = pose(4.0, 5.0, 4.0);

        choreographer.move_to(&camera, destination, 1000.0, 0.0, None);
        assert_eq!(choreographer.update(500.0, &mut camera), MoveStatus::InFlight);
        assert_eq!(choreographer.update(1000.0, &mut camera), MoveStatus::Completed);
        assert_eq!(camera.pose(), destination);

        // nothing left to schedule
        assert_eq!(choreographer.update(1100.0, &mut camera), MoveStatus::Idle);
        assert!(!choreographer.is_active());
    }

    #[test]
    fn test_reissue_supersedes_from_live_pose() {
        let mut camera = camera();
        let mut choreographer = CameraChoreographer::new();
        let p1 = pose(8.0, 2.0, 0.0);
        let p2 = CameraPose::new(Vector3::new(-6.0, 4.0, 2.0), Vector3::new(0.0, 6.0, 0.0));
        let first_fired = Rc::new(Cell::new(false));
        let flag = first_fired.clone();

        choreographer.move_to(&camera, p1, 1000.0, 0.0, Some(Box::new(move |_| flag.set(true))));
        choreographer.update(400.0, &mut camera);
        let mid_flight = camera.pose();

        choreographer.move_to(&camera, p2, 1000.0, 400.0, None);
        // no jump: the first sample of the new move is the mid-flight pose
        choreographer.update(400.0, &mut camera);
        assert!((camera.eye - mid_flight.position).magnitude() < 1e-5);

        // the look-at point heads for p2 and never drifts back to p1's target
        let mut last_gap = (camera.target - p1.target).magnitude();
        for step in 1..=10 {
            choreographer.update(400.0 + step as f64 * 100.0, &mut camera);
            assert_ne!(camera.pose(), p1);
            let gap = (camera.target - p1.target).magnitude();
            assert!(gap > 0.5);
            assert!(gap + 1e-5 >= last_gap);
            last_gap = gap;
        }

        assert_eq!(camera.pose(), p2);
        assert!(!first_fired.get());
    }

    #[test]
    fn test_zero_duration_completes_in_one_tick() {
        let mut camera = camera();
        let mut choreographer = CameraChoreographer::new();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let destination = pose(1.0, 1.0, 1.0);

        choreographer.move_to(
            &camera,
            destination,
            0.0,
            250.0,
            Some(Box::new(move |_| counter.set(counter.get() + 1))),
        );
        assert_eq!(choreographer.update(250.0, &mut camera), MoveStatus::Completed);
        assert_eq!(camera.pose(), destination);

        choreographer.update(300.0, &mut camera);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_callback_not_fired_before_end() {
        let mut camera = camera();
        let mut choreographer = CameraChoreographer::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();

        let on_complete: CompletionCallback = Box::new(move |_| flag.set(true));
        choreographer.move_to(&camera, pose(2.0, 2.0, 2.0), 1000.0, 0.0, Some(on_complete));
        choreographer.update(999.0, &mut camera);
        assert!(!fired.get());
        choreographer.update(1000.0, &mut camera);
        assert!(fired.get());
    }
}
