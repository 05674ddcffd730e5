//! # Headless Collaborators
//!
//! In-memory implementations of every [`crate::gfx::context`] trait. They let
//! the gallery core run without a window or GPU: the `gallery_tour` demo uses
//! them, and so do the tests.
//!
//! Each type is a cheap handle over shared state, so a clone kept by the
//! caller observes what the core did with the boxed original.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::rc::Rc;
use std::time::Instant;

use log::trace;

use crate::gfx::animation::lighting::LightState;
use crate::gfx::context::{
    ActionId, AnimationMixer, AudioSource, LightRig, MixerEvent, PostProcess, TimeSource,
};
use crate::gfx::scene::ProxyHandle;

/// Wall clock measured from construction
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Default)]
struct MixerState {
    playing: BTreeSet<ActionId>,
    loop_once: BTreeSet<ActionId>,
    clip_seconds: HashMap<ActionId, f32>,
    elapsed: HashMap<ActionId, f32>,
    time_scales: HashMap<ActionId, f32>,
    crossfades: Vec<(ActionId, ActionId)>,
    events: VecDeque<MixerEvent>,
}

/// Mixer that tracks playing actions and emits `Finished` when a loop-once
/// action runs past its clip length
#[derive(Clone, Default)]
pub struct HeadlessMixer {
    state: Rc<RefCell<MixerState>>,
}

impl HeadlessMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the clip length of an action
    pub fn with_clip(self, action: ActionId, seconds: f32) -> Self {
        self.state.borrow_mut().clip_seconds.insert(action, seconds);
        self
    }

    pub fn is_playing(&self, action: &ActionId) -> bool {
        self.state.borrow().playing.contains(action)
    }

    pub fn time_scale(&self, action: &ActionId) -> f32 {
        self.state
            .borrow()
            .time_scales
            .get(action)
            .copied()
            .unwrap_or(1.0)
    }

    /// Every crossfade requested so far as `(from, to)`
    pub fn crossfades(&self) -> Vec<(ActionId, ActionId)> {
        self.state.borrow().crossfades.clone()
    }

    /// Queue a finished notification as if a clip had ended
    pub fn emit_finished(&self, action: ActionId) {
        self.state
            .borrow_mut()
            .events
            .push_back(MixerEvent::Finished(action));
    }
}

impl AnimationMixer for HeadlessMixer {
    fn update(&mut self, delta_seconds: f32) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let mut finished = Vec::new();

        for action in state.playing.iter() {
            if !state.loop_once.contains(action) {
                continue;
            }
            let Some(&length) = state.clip_seconds.get(action) else {
                continue;
            };
            let scale = state.time_scales.get(action).copied().unwrap_or(1.0);
            let elapsed = state.elapsed.entry(action.clone()).or_insert(0.0);
            *elapsed += delta_seconds * scale;
            if *elapsed >= length {
                finished.push(action.clone());
            }
        }

        for action in finished {
            trace!("Headless clip '{}' finished", action);
            state.playing.remove(&action);
            state.elapsed.remove(&action);
            state.events.push_back(MixerEvent::Finished(action));
        }
    }

    fn play(&mut self, action: &ActionId) {
        let mut state = self.state.borrow_mut();
        state.elapsed.insert(action.clone(), 0.0);
        state.playing.insert(action.clone());
    }

    fn crossfade_from(&mut self, from: &ActionId, to: &ActionId, _duration_seconds: f32) {
        let mut state = self.state.borrow_mut();
        state.crossfades.push((from.clone(), to.clone()));
        state.playing.insert(to.clone());
    }

    fn set_loop_once(&mut self, action: &ActionId) {
        self.state.borrow_mut().loop_once.insert(action.clone());
    }

    fn set_time_scale(&mut self, action: &ActionId, scale: f32) {
        self.state
            .borrow_mut()
            .time_scales
            .insert(action.clone(), scale);
    }

    fn poll_event(&mut self) -> Option<MixerEvent> {
        self.state.borrow_mut().events.pop_front()
    }
}

/// Audio source reduced to a playing flag
#[derive(Clone, Default)]
pub struct HeadlessAudio {
    playing: Rc<Cell<bool>>,
    starts: Rc<Cell<u32>>,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times playback was started from a paused state
    pub fn start_count(&self) -> u32 {
        self.starts.get()
    }
}

impl AudioSource for HeadlessAudio {
    fn play(&mut self) {
        if !self.playing.get() {
            self.starts.set(self.starts.get() + 1);
        }
        self.playing.set(true);
    }

    fn pause(&mut self) {
        self.playing.set(false);
    }

    fn is_playing(&self) -> bool {
        self.playing.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PostProcessState {
    outline_enabled: bool,
    selection: Vec<ProxyHandle>,
    alternate_enabled: bool,
    effect_time: f32,
}

impl Default for PostProcessState {
    fn default() -> Self {
        Self {
            outline_enabled: true,
            selection: Vec::new(),
            alternate_enabled: false,
            effect_time: 0.0,
        }
    }
}

/// Records the post-processing toggles it receives
#[derive(Clone, Default)]
pub struct HeadlessPostProcess {
    state: Rc<RefCell<PostProcessState>>,
}

impl HeadlessPostProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outline_enabled(&self) -> bool {
        self.state.borrow().outline_enabled
    }

    pub fn selection(&self) -> Vec<ProxyHandle> {
        self.state.borrow().selection.clone()
    }

    pub fn alternate_enabled(&self) -> bool {
        self.state.borrow().alternate_enabled
    }

    pub fn effect_time(&self) -> f32 {
        self.state.borrow().effect_time
    }
}

impl PostProcess for HeadlessPostProcess {
    fn set_outline_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().outline_enabled = enabled;
    }

    fn set_outline_selection(&mut self, proxies: &[ProxyHandle]) {
        self.state.borrow_mut().selection = proxies.to_vec();
    }

    fn set_alternate_effect_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().alternate_enabled = enabled;
    }

    fn set_effect_time(&mut self, seconds: f32) {
        self.state.borrow_mut().effect_time = seconds;
    }
}

#[derive(Default)]
struct LightRigState {
    global: Option<LightState>,
    accents: BTreeMap<ProxyHandle, Option<f32>>,
}

/// Light rig whose accent lights exist only once instantiated
#[derive(Clone, Default)]
pub struct HeadlessLightRig {
    state: Rc<RefCell<LightRigState>>,
}

impl HeadlessLightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the accent light of `proxy` available, as when its model loads
    pub fn instantiate(&self, proxy: ProxyHandle) {
        self.state.borrow_mut().accents.entry(proxy).or_insert(None);
    }

    pub fn global(&self) -> Option<LightState> {
        self.state.borrow().global
    }

    /// Last intensity written to the accent light of `proxy`
    pub fn accent(&self, proxy: ProxyHandle) -> Option<f32> {
        self.state.borrow().accents.get(&proxy).copied().flatten()
    }
}

impl LightRig for HeadlessLightRig {
    fn apply_global(&mut self, state: &LightState) {
        self.state.borrow_mut().global = Some(*state);
    }

    fn set_accent_intensity(&mut self, proxy: ProxyHandle, intensity: f32) -> bool {
        match self.state.borrow_mut().accents.get_mut(&proxy) {
            Some(slot) => {
                *slot = Some(intensity);
                true
            }
            None => false,
        }
    }
}
