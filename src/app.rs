use log::{debug, info, trace, warn};
use winit::{
    event::{DeviceEvent, ElementState},
    keyboard::KeyCode,
};

use crate::config::GalleryConfig;
use crate::error::Result;
use crate::gfx::{
    animation::{AvatarAnimator, JukeboxController, LightUniform, LightingAnimator},
    camera::{CameraChoreographer, CameraController, CameraUniform, OrbitCamera},
    context::SceneContext,
    picking::{screen_to_ndc, PickFilter, PickResult, PointerPicker},
    scene::{
        Category, ContactKind, InteractiveObjectRegistry, ObjectId, Payload, ProjectInfo,
        ProxyHandle, CLICK_PRIORITY,
    },
    selection::{CursorAffordance, SelectionReconciler, SelectionState},
};
use crate::mode::{Mode, ModeController, ModeTargets};
use crate::performance::{PerformanceMetrics, PerformanceMonitor};

/// What a click asks the UI layer to do
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A project card was clicked: open its page
    OpenProject(ProjectInfo),
    /// A frame was clicked: show its details. The frame stays highlighted
    /// until [`GalleryApp::dismiss_project`].
    ShowProject(ProjectInfo),
    /// The jukebox pin was flipped to the contained state
    JukeboxPinned(bool),
    OpenContact(ContactKind),
    EnteredSecurityView,
    None,
}

/// Per-frame data for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub camera: CameraUniform,
    pub lights: LightUniform,
}

/// The gallery's interaction core.
///
/// Feed it pointer, click, key and device events from the windowing layer and
/// call [`GalleryApp::tick`] once per displayed frame.
pub struct GalleryApp {
    config: GalleryConfig,
    registry: InteractiveObjectRegistry,
    ctx: SceneContext,
    camera: OrbitCamera,
    controls: CameraController,
    choreographer: CameraChoreographer,
    picker: PointerPicker,
    reconciler: SelectionReconciler,
    avatar: AvatarAnimator,
    jukebox: JukeboxController,
    lighting: LightingAnimator,
    modes: ModeController,
    performance: PerformanceMonitor,
    pointer_ndc: Option<(f32, f32)>,
}

impl GalleryApp {
    pub fn new(config: GalleryConfig, mut ctx: SceneContext) -> Self {
        let camera_config = &config.camera;
        let mut camera = OrbitCamera::looking_at(
            camera_config.default_vantage.position,
            camera_config.default_vantage.target,
            camera_config.aspect,
        );
        camera.bounds = camera_config.bounds;
        camera.update_view_proj();

        let avatar = AvatarAnimator::new(&config.avatar, ctx.avatar_mixer.as_mut());
        let jukebox =
            JukeboxController::new(config.jukebox_spin.clone(), ctx.jukebox_mixer.as_mut());
        let modes = ModeController::new(
            camera_config.default_vantage,
            camera_config.security_vantage,
            camera_config.move_duration_ms,
        );

        info!("Gallery core ready");
        Self {
            controls: CameraController::new(camera_config.rotate_speed, camera_config.zoom_speed),
            choreographer: CameraChoreographer::new(),
            picker: PointerPicker::new(),
            reconciler: SelectionReconciler::new(config.avatar.wave.clone()),
            lighting: LightingAnimator::new(&config.lighting),
            performance: PerformanceMonitor::with_config(config.performance_samples),
            registry: InteractiveObjectRegistry::new(),
            pointer_ndc: None,
            avatar,
            jukebox,
            modes,
            camera,
            ctx,
            config,
        }
    }

    /// Make an object pickable; fails on a duplicate id
    pub fn register(
        &mut self,
        id: impl Into<ObjectId>,
        category: Category,
        proxy: ProxyHandle,
        payload: Payload,
    ) -> Result<()> {
        self.registry.register(id, category, proxy, payload)
    }

    /// Remove an object; its highlight goes away immediately
    pub fn unregister(&mut self, id: &ObjectId) {
        self.registry.unregister(id);
        self.refresh_selection(self.ctx.now_ms());
    }

    /// Pointer moved, in normalized device coordinates
    pub fn on_pointer_move(&mut self, ndc: (f32, f32)) {
        self.pointer_ndc = Some(ndc);
        self.refresh_selection(self.ctx.now_ms());
    }

    /// Pointer moved, in pixels within a canvas of `size`
    pub fn on_pointer_move_pixels(&mut self, position: (f32, f32), size: (f32, f32)) {
        self.on_pointer_move(screen_to_ndc(position, size));
    }

    /// Pointer left the canvas
    pub fn on_pointer_leave(&mut self) {
        self.pointer_ndc = None;
        self.refresh_selection(self.ctx.now_ms());
    }

    /// Resolve a click at the last pointer position
    pub fn on_click(&mut self) -> ClickOutcome {
        let Some(ndc) = self.pointer_ndc else {
            return ClickOutcome::None;
        };

        let pick = self.picker.pick(
            ndc,
            &self.camera,
            &self.registry,
            PickFilter::Only(&CLICK_PRIORITY),
            self.modes.mode(),
            self.ctx.intersector.as_ref(),
        );
        let Some(target) = pick.click_target().cloned() else {
            return ClickOutcome::None;
        };
        debug!("Click on '{}' ({:?})", target.id, target.category);

        match target.category {
            Category::Card => match self.project_of(&target.id) {
                Some(project) => ClickOutcome::OpenProject(project),
                None => ClickOutcome::None,
            },
            Category::Frame => match self.project_of(&target.id) {
                Some(project) => {
                    self.reconciler.pin_frame(&target, &mut self.ctx);
                    ClickOutcome::ShowProject(project)
                }
                None => ClickOutcome::None,
            },
            Category::Jukebox => ClickOutcome::JukeboxPinned(
                self.jukebox
                    .toggle_pin(self.ctx.jukebox_mixer.as_mut(), self.ctx.audio.as_mut()),
            ),
            Category::Phone | Category::ContactLink => pick
                .nearest(Category::ContactLink)
                .and_then(|hit| self.registry.lookup(&hit.id).ok())
                .and_then(|object| object.contact())
                .map_or(ClickOutcome::None, ClickOutcome::OpenContact),
            Category::SecurityCamera => match self.enter_security_view() {
                Ok(()) => ClickOutcome::EnteredSecurityView,
                Err(err) => {
                    warn!("Security camera click ignored: {}", err);
                    ClickOutcome::None
                }
            },
            Category::Avatar => ClickOutcome::None,
        }
    }

    /// Handle a key press or release.
    ///
    /// Returns `true` if the key is bound.
    pub fn on_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if matches!(key, KeyCode::ShiftLeft | KeyCode::ShiftRight) {
            self.controls.set_shift_held(state == ElementState::Pressed);
            return true;
        }

        let keys = self.config.keys;
        if key != keys.day_night && key != keys.security_toggle && key != keys.cancel {
            return false;
        }
        if state != ElementState::Pressed {
            return true;
        }

        if key == keys.day_night {
            let now_ms = self.ctx.now_ms();
            self.lighting
                .toggle(self.config.lighting.transition_ms, now_ms);
        } else if key == keys.security_toggle {
            self.toggle_security_view();
        } else if let Err(err) = self.exit_security_view() {
            warn!("Cancel ignored: {}", err);
        }
        true
    }

    /// Raw mouse input for the free camera controls.
    ///
    /// Returns `true` if the camera moved.
    pub fn on_device_event(&mut self, event: &DeviceEvent) -> bool {
        self.controls.process_event(event, &mut self.camera)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
    }

    /// Freeze picking and clicks while a UI overlay is open
    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        if self.picker.interaction_enabled() == enabled {
            return;
        }
        info!(
            "Interaction {}",
            if enabled { "resumed" } else { "frozen" }
        );
        self.picker.set_interaction_enabled(enabled);
        self.refresh_selection(self.ctx.now_ms());
    }

    /// Close the project opened by a frame click
    pub fn dismiss_project(&mut self) {
        self.reconciler.unpin_frame(&mut self.ctx);
        self.refresh_selection(self.ctx.now_ms());
    }

    pub fn enter_security_view(&mut self) -> Result<()> {
        self.switch_mode(Mode::SecurityView)
    }

    pub fn exit_security_view(&mut self) -> Result<()> {
        self.switch_mode(Mode::Normal)
    }

    pub fn toggle_security_view(&mut self) -> Mode {
        let target = match self.modes.mode() {
            Mode::Normal => Mode::SecurityView,
            Mode::SecurityView => Mode::Normal,
        };
        if let Err(err) = self.switch_mode(target) {
            warn!("Mode toggle failed: {}", err);
        }
        self.modes.mode()
    }

    fn switch_mode(&mut self, target: Mode) -> Result<()> {
        let now_ms = self.ctx.now_ms();
        let targets = ModeTargets {
            camera: &self.camera,
            controls: &mut self.controls,
            choreographer: &mut self.choreographer,
            post_process: self.ctx.post_process.as_mut(),
            now_ms,
        };
        match target {
            Mode::SecurityView => self.modes.enter_security_view(targets)?,
            Mode::Normal => self.modes.exit(targets)?,
        }
        self.refresh_selection(now_ms);
        Ok(())
    }

    /// Advance one frame.
    ///
    /// Runs animation mixers, then the light blend, then the camera move, then
    /// picking and highlights, so highlights see this frame's camera pose.
    pub fn tick(&mut self) {
        let now_ms = self.ctx.now_ms();
        let delta_seconds = self.performance.record_frame(now_ms);

        self.ctx.avatar_mixer.update(delta_seconds);
        self.ctx.jukebox_mixer.update(delta_seconds);
        self.avatar.update(now_ms, self.ctx.avatar_mixer.as_mut());
        while let Some(event) = self.ctx.jukebox_mixer.poll_event() {
            trace!("Jukebox mixer event {:?}", event);
        }

        self.lighting
            .update(now_ms, &self.registry, self.ctx.lights.as_mut());

        self.choreographer.update(now_ms, &mut self.camera);
        if let Some(seconds) = self.modes.effect_time(now_ms) {
            self.ctx.post_process.set_effect_time(seconds);
        }

        self.refresh_selection(now_ms);
        self.camera.update_view_proj();
    }

    fn refresh_selection(&mut self, now_ms: f64) {
        let pick = self.pick_under_pointer();
        self.reconciler.reconcile(
            &pick,
            &self.registry,
            now_ms,
            &mut self.avatar,
            &mut self.jukebox,
            &mut self.ctx,
        );
    }

    fn pick_under_pointer(&self) -> PickResult {
        match self.pointer_ndc {
            Some(ndc) => self.pick_at(ndc),
            None => PickResult::empty(),
        }
    }

    /// Everything interactive under `ndc`, nearest first
    pub fn pick_at(&self, ndc: (f32, f32)) -> PickResult {
        self.picker.pick(
            ndc,
            &self.camera,
            &self.registry,
            PickFilter::All,
            self.modes.mode(),
            self.ctx.intersector.as_ref(),
        )
    }

    fn project_of(&self, id: &ObjectId) -> Option<ProjectInfo> {
        let project = self.registry.lookup(id).ok()?.project().cloned();
        if project.is_none() {
            warn!("'{}' has no project attached", id);
        }
        project
    }

    pub fn cursor(&self) -> CursorAffordance {
        self.reconciler.cursor()
    }

    pub fn armed_contact(&self) -> Option<ContactKind> {
        self.reconciler.armed_contact()
    }

    pub fn contact_selected(&self) -> bool {
        self.reconciler.contact_selected()
    }

    /// Project of the highlighted (or pinned) frame, for the details modal
    pub fn highlighted_project(&self) -> Option<&ProjectInfo> {
        let selected = self.reconciler.selection().highlighted(Category::Frame)?;
        self.registry.lookup(&selected.id).ok()?.project()
    }

    pub fn selection(&self) -> &SelectionState {
        self.reconciler.selection()
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn interaction_enabled(&self) -> bool {
        self.picker.interaction_enabled()
    }

    pub fn registry(&self) -> &InteractiveObjectRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn lighting(&self) -> &LightingAnimator {
        &self.lighting
    }

    pub fn avatar(&self) -> &AvatarAnimator {
        &self.avatar
    }

    pub fn jukebox(&self) -> &JukeboxController {
        &self.jukebox
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        self.performance.get_metrics()
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            camera: self.camera.uniform,
            lights: self.lighting.live().to_uniform(),
        }
    }
}
