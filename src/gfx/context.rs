//! # Scene Context
//!
//! The gallery core drives a renderer it does not own. Everything it needs
//! from that renderer is expressed as a trait here, and the handles are
//! bundled in a [`SceneContext`] that is passed explicitly into every
//! component update. Tests and the headless demo plug in the in-memory
//! implementations from [`crate::gfx::headless`].

use std::borrow::Cow;
use std::fmt;

use crate::gfx::animation::lighting::LightState;
use crate::gfx::picking::Ray;
use crate::gfx::scene::ProxyHandle;

/// Ray intersection against opaque proxies owned by the renderer
pub trait ProxyIntersector {
    /// Distance along `ray` to the nearest intersection with `proxy`, if any.
    ///
    /// Proxies the renderer does not know about (not loaded yet, already
    /// disposed) simply return `None`.
    fn intersect(&self, proxy: ProxyHandle, ray: &Ray) -> Option<f32>;
}

/// Monotonic time source in milliseconds
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Identity of a named animation action
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(Cow<'static, str>);

impl ActionId {
    pub const IDLE: ActionId = ActionId(Cow::Borrowed("idle"));
    pub const WAVE: ActionId = ActionId(Cow::Borrowed("wave"));
    pub const SPIN: ActionId = ActionId(Cow::Borrowed("spin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notifications emitted by an animation mixer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixerEvent {
    /// A loop-once action reached the end of its clip
    Finished(ActionId),
}

/// Animation playback engine; consumed, never reimplemented by the core
pub trait AnimationMixer {
    /// Advance playback by `delta_seconds`
    fn update(&mut self, delta_seconds: f32);
    fn play(&mut self, action: &ActionId);
    /// Fade `from` out while `to` fades in over `duration_seconds`
    fn crossfade_from(&mut self, from: &ActionId, to: &ActionId, duration_seconds: f32);
    fn set_loop_once(&mut self, action: &ActionId);
    fn set_time_scale(&mut self, action: &ActionId, scale: f32);
    /// Pop the next pending event, if any
    fn poll_event(&mut self) -> Option<MixerEvent>;
}

pub trait AudioSource {
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
}

/// Post-processing stack: the selection outline and the alternate
/// security-camera effect
pub trait PostProcess {
    fn set_outline_enabled(&mut self, enabled: bool);
    /// Replace the set of proxies the outline pass draws around
    fn set_outline_selection(&mut self, proxies: &[ProxyHandle]);
    fn set_alternate_effect_enabled(&mut self, enabled: bool);
    /// Advance the alternate effect's `time` uniform, in seconds
    fn set_effect_time(&mut self, seconds: f32);
}

/// Scene lights driven by the day/night blend
pub trait LightRig {
    fn apply_global(&mut self, state: &LightState);
    /// Set the accent light attached to `proxy`.
    ///
    /// Returns `false` when that light has not been instantiated yet.
    fn set_accent_intensity(&mut self, proxy: ProxyHandle, intensity: f32) -> bool;
}

/// Handles to every external collaborator the core talks to
pub struct SceneContext {
    pub intersector: Box<dyn ProxyIntersector>,
    pub clock: Box<dyn TimeSource>,
    pub avatar_mixer: Box<dyn AnimationMixer>,
    pub jukebox_mixer: Box<dyn AnimationMixer>,
    pub audio: Box<dyn AudioSource>,
    pub post_process: Box<dyn PostProcess>,
    pub lights: Box<dyn LightRig>,
}

impl SceneContext {
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }
}
