//! # Pointer Picking
//!
//! Resolves which interactive objects lie under the pointer.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: Unproject the pointer's normalized device coordinates
//!    through the camera into a world-space ray starting at the eye
//! 2. **Ray-Proxy Intersection**: Ask the renderer's [`ProxyIntersector`] for
//!    the hit distance of every candidate proxy
//! 3. **Ordering**: Return all hits sorted nearest first
//!
//! Picking is gated: in security view, or while a UI overlay has frozen
//! interaction, the picker returns an empty result without casting anything.
//!
//! ## Usage
//!
//! ```
//! use gallery::gfx::camera::OrbitCamera;
//! use gallery::gfx::picking::{BoundsIntersector, PickFilter, PointerPicker, AABB};
//! use gallery::gfx::scene::{Category, InteractiveObjectRegistry, Payload, ProxyHandle};
//! use gallery::mode::Mode;
//! use cgmath::Vector3;
//!
//! let mut registry = InteractiveObjectRegistry::new();
//! registry.register("F1", Category::Frame, ProxyHandle(1), Payload::None).unwrap();
//!
//! let mut bounds = BoundsIntersector::new();
//! let unit = Vector3::new(1.0, 1.0, 1.0);
//! bounds.insert(ProxyHandle(1), AABB::around(Vector3::new(0.0, 0.0, 0.0), unit));
//!
//! let eye = Vector3::new(0.0, 0.0, 10.0);
//! let camera = OrbitCamera::looking_at(eye, Vector3::new(0.0, 0.0, 0.0), 1.0);
//! let picker = PointerPicker::new();
//! let result =
//!     picker.pick((0.0, 0.0), &camera, &registry, PickFilter::All, Mode::Normal, &bounds);
//! assert_eq!(result.hits()[0].id.as_str(), "F1");
//! ```

use std::collections::HashMap;

use cgmath::{ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};
use log::trace;

use crate::gfx::camera::orbit_camera::OrbitCamera;
use crate::gfx::context::ProxyIntersector;
use crate::gfx::scene::{Category, InteractiveObjectRegistry, ObjectId, ProxyHandle, CLICK_PRIORITY};
use crate::mode::Mode;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Box of the given half extents around a center point
    pub fn around(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// World-space bounding boxes standing in for the renderer's proxies
#[derive(Debug, Default, Clone)]
pub struct BoundsIntersector {
    bounds: HashMap<ProxyHandle, AABB>,
}

impl BoundsIntersector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, proxy: ProxyHandle, aabb: AABB) {
        self.bounds.insert(proxy, aabb);
    }
}

impl ProxyIntersector for BoundsIntersector {
    fn intersect(&self, proxy: ProxyHandle, ray: &Ray) -> Option<f32> {
        self.bounds.get(&proxy)?.intersect_ray(ray)
    }
}

/// One object under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub id: ObjectId,
    pub category: Category,
    pub proxy: ProxyHandle,
    /// Distance from the camera eye along the pick ray
    pub distance: f32,
}

/// Every object under the pointer, nearest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickResult {
    hits: Vec<PickHit>,
}

impl PickResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from unordered hits
    pub fn from_hits(mut hits: Vec<PickHit>) -> Self {
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Self { hits }
    }

    pub fn hits(&self) -> &[PickHit] {
        &self.hits
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Nearest hit of the given category
    pub fn nearest(&self, category: Category) -> Option<&PickHit> {
        self.hits.iter().find(|hit| hit.category == category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.nearest(category).is_some()
    }

    /// The hit a click should act on, following [`CLICK_PRIORITY`]
    pub fn click_target(&self) -> Option<&PickHit> {
        CLICK_PRIORITY
            .iter()
            .find_map(|&category| self.nearest(category))
    }
}

/// Which registered objects a pick considers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickFilter<'a> {
    All,
    Only(&'a [Category]),
}

impl PickFilter<'_> {
    fn accepts(&self, category: Category) -> bool {
        match self {
            PickFilter::All => true,
            PickFilter::Only(categories) => categories.contains(&category),
        }
    }
}

/// Convert pixel coordinates to normalized device coordinates (-1 to 1, y up)
pub fn screen_to_ndc(screen_pos: (f32, f32), screen_size: (f32, f32)) -> (f32, f32) {
    let (mouse_x, mouse_y) = screen_pos;
    let (screen_width, screen_height) = screen_size;

    let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
    let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis
    (ndc_x, ndc_y)
}

/// Ray caster from pointer position into the interactive registry
#[derive(Debug)]
pub struct PointerPicker {
    interaction_enabled: bool,
}

impl PointerPicker {
    pub fn new() -> Self {
        Self {
            interaction_enabled: true,
        }
    }

    /// Freeze or resume picking while a UI overlay is open
    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// Whether picking runs at all in `mode`.
    ///
    /// Security view disables picking as a matter of policy.
    pub fn is_active(&self, mode: Mode) -> bool {
        self.interaction_enabled && mode == Mode::Normal
    }

    /// Convert normalized device coordinates to a world-space ray from the eye
    pub fn ndc_to_ray(&self, ndc: (f32, f32), camera: &OrbitCamera) -> Ray {
        let (ndc_x, ndc_y) = ndc;

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix =
            cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let inv_view_proj = (proj_matrix * view_matrix)
            .invert()
            .unwrap_or(Matrix4::from_scale(1.0));

        // Only the far point is needed: the near plane point lies on the
        // line from the eye, and distances are measured from the eye.
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far_3d = Vector3::new(
            world_far.x / world_far.w,
            world_far.y / world_far.w,
            world_far.z / world_far.w,
        );

        Ray::new(camera.eye, far_3d - camera.eye)
    }

    /// Cast the pointer ray against registered objects accepted by `filter`
    pub fn pick(
        &self,
        ndc: (f32, f32),
        camera: &OrbitCamera,
        registry: &InteractiveObjectRegistry,
        filter: PickFilter<'_>,
        mode: Mode,
        intersector: &dyn ProxyIntersector,
    ) -> PickResult {
        if !self.is_active(mode) {
            return PickResult::empty();
        }

        let ray = self.ndc_to_ray(ndc, camera);
        self.pick_ray(&ray, registry, filter, intersector)
    }

    /// Cast an explicit ray, ignoring the gate
    pub fn pick_ray(
        &self,
        ray: &Ray,
        registry: &InteractiveObjectRegistry,
        filter: PickFilter<'_>,
        intersector: &dyn ProxyIntersector,
    ) -> PickResult {
        let hits = registry
            .iter()
            .filter(|object| filter.accepts(object.category()))
            .filter_map(|object| {
                let distance = intersector.intersect(object.proxy, ray)?;
                Some(PickHit {
                    id: object.id.clone(),
                    category: object.category(),
                    proxy: object.proxy,
                    distance,
                })
            })
            .collect();

        let result = PickResult::from_hits(hits);
        trace!("Pick found {} hit(s)", result.hits.len());
        result
    }
}

impl Default for PointerPicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Payload;
    use cgmath::Zero;

    fn unit_box(center: Vector3<f32>) -> AABB {
        AABB::around(center, Vector3::new(1.0, 1.0, 1.0))
    }

    fn front_camera() -> OrbitCamera {
        OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 10.0), Vector3::zero(), 1.0)
    }

    #[test]
    fn test_aabb_creation() {
        let aabb = AABB::around(Vector3::zero(), Vector3::new(1.0, 1.0, 1.0));

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = unit_box(Vector3::zero());

        let ray = Ray::new(Vector3::new(0.1, 0.1, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let distance = aabb.intersect_ray(&ray).unwrap();
        assert!((distance - 4.0).abs() < 1e-5);

        let ray_miss = Ray::new(Vector3::new(5.0, 0.1, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let picker = PointerPicker::new();
        let ray = picker.ndc_to_ray((0.0, 0.0), &front_camera());

        assert_eq!(ray.origin, Vector3::new(0.0, 0.0, 10.0));
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-4);
    }

    #[test]
    fn test_hits_sorted_nearest_first() {
        let mut registry = InteractiveObjectRegistry::new();
        registry
            .register("far", Category::Frame, ProxyHandle(1), Payload::None)
            .unwrap();
        registry
            .register("near", Category::Jukebox, ProxyHandle(2), Payload::None)
            .unwrap();

        let mut bounds = BoundsIntersector::new();
        bounds.insert(ProxyHandle(1), unit_box(Vector3::new(0.1, 0.1, -4.0)));
        bounds.insert(ProxyHandle(2), unit_box(Vector3::new(0.1, 0.1, 4.0)));

        let picker = PointerPicker::new();
        let result = picker.pick(
            (0.0, 0.0),
            &front_camera(),
            &registry,
            PickFilter::All,
            Mode::Normal,
            &bounds,
        );

        let ids: Vec<_> = result.hits().iter().map(|hit| hit.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert!((result.hits()[0].distance - 5.0).abs() < 1e-3);
        assert!((result.hits()[1].distance - 13.0).abs() < 1e-3);
    }

    #[test]
    fn test_filter_restricts_candidates() {
        let mut registry = InteractiveObjectRegistry::new();
        registry
            .register("frame", Category::Frame, ProxyHandle(1), Payload::None)
            .unwrap();
        registry
            .register("avatar", Category::Avatar, ProxyHandle(2), Payload::None)
            .unwrap();

        let mut bounds = BoundsIntersector::new();
        bounds.insert(ProxyHandle(1), unit_box(Vector3::new(0.1, 0.1, 0.0)));
        bounds.insert(ProxyHandle(2), unit_box(Vector3::new(0.1, 0.1, 3.0)));

        let picker = PointerPicker::new();
        let frames_only = [Category::Frame];
        let result = picker.pick(
            (0.0, 0.0),
            &front_camera(),
            &registry,
            PickFilter::Only(&frames_only),
            Mode::Normal,
            &bounds,
        );

        assert_eq!(result.hits().len(), 1);
        assert_eq!(result.hits()[0].category, Category::Frame);
    }

    #[test]
    fn test_security_view_and_frozen_ui_pick_nothing() {
        let mut registry = InteractiveObjectRegistry::new();
        registry
            .register("frame", Category::Frame, ProxyHandle(1), Payload::None)
            .unwrap();
        let mut bounds = BoundsIntersector::new();
        bounds.insert(ProxyHandle(1), unit_box(Vector3::new(0.1, 0.1, 0.0)));

        let mut picker = PointerPicker::new();
        let camera = front_camera();
        let pick = |picker: &PointerPicker, mode| {
            picker.pick((0.0, 0.0), &camera, &registry, PickFilter::All, mode, &bounds)
        };

        assert!(pick(&picker, Mode::SecurityView).is_empty());
        assert!(!pick(&picker, Mode::Normal).is_empty());

        picker.set_interaction_enabled(false);
        assert!(pick(&picker, Mode::Normal).is_empty());
    }

    #[test]
    fn test_empty_registry_picks_nothing() {
        let picker = PointerPicker::new();
        let result = picker.pick(
            (0.3, -0.2),
            &front_camera(),
            &InteractiveObjectRegistry::new(),
            PickFilter::All,
            Mode::Normal,
            &BoundsIntersector::new(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_click_priority() {
        let hit = |id: &str, category, distance| PickHit {
            id: ObjectId::new(id),
            category,
            proxy: ProxyHandle(0),
            distance,
        };
        let result = PickResult::from_hits(vec![
            hit("camera", Category::SecurityCamera, 1.0),
            hit("jukebox", Category::Jukebox, 4.0),
            hit("frame", Category::Frame, 6.0),
        ]);

        assert_eq!(result.click_target().unwrap().id.as_str(), "frame");
    }

    #[test]
    fn test_screen_to_ndc() {
        assert_eq!(screen_to_ndc((600.0, 400.0), (1200.0, 800.0)), (0.0, 0.0));
        assert_eq!(screen_to_ndc((0.0, 0.0), (1200.0, 800.0)), (-1.0, 1.0));
    }
}
