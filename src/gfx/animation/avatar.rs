//! Avatar action state machine.
//!
//! Exactly one named action is current. Swapping starts a crossfade in the
//! external mixer and mirrors the blend as a [`WeightSet`] transition, so the
//! influence weights always sum to one and settle on the new action.
//! Play-once actions return to idle when the mixer reports them finished.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};

use crate::gfx::context::{ActionId, AnimationMixer, MixerEvent};
use crate::gfx::transition::{lerp_scalar, ActiveTransition, Lerp};

/// Influence weight per action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightSet(BTreeMap<ActionId, f32>);

impl WeightSet {
    /// All influence on a single action
    pub fn solo(action: &ActionId) -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(action.clone(), 1.0);
        Self(weights)
    }

    pub fn get(&self, action: &ActionId) -> f32 {
        self.0.get(action).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActionId, f32)> {
        self.0.iter().map(|(action, weight)| (action, *weight))
    }
}

impl Lerp for WeightSet {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let actions: BTreeSet<&ActionId> = self.0.keys().chain(other.0.keys()).collect();
        Self(
            actions
                .into_iter()
                .map(|action| {
                    let weight = lerp_scalar(self.get(action), other.get(action), t);
                    (action.clone(), weight)
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarConfig {
    pub idle: ActionId,
    pub wave: ActionId,
    pub crossfade_seconds: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            idle: ActionId::IDLE,
            wave: ActionId::WAVE,
            crossfade_seconds: 0.5,
        }
    }
}

pub struct AvatarAnimator {
    idle: ActionId,
    current: ActionId,
    play_once: BTreeSet<ActionId>,
    weights: WeightSet,
    fade: Option<ActiveTransition<WeightSet>>,
    crossfade_seconds: f32,
}

impl AvatarAnimator {
    /// Start the idle action and register `wave` as play-once
    pub fn new(config: &AvatarConfig, mixer: &mut dyn AnimationMixer) -> Self {
        mixer.play(&config.idle);
        let mut animator = Self {
            idle: config.idle.clone(),
            current: config.idle.clone(),
            play_once: BTreeSet::new(),
            weights: WeightSet::solo(&config.idle),
            fade: None,
            crossfade_seconds: config.crossfade_seconds,
        };
        animator.track_play_once(config.wave.clone(), mixer);
        animator
    }

    /// Mark an action as play-once: it returns to idle when its clip ends
    pub fn track_play_once(&mut self, action: ActionId, mixer: &mut dyn AnimationMixer) {
        mixer.set_loop_once(&action);
        self.play_once.insert(action);
    }

    /// Crossfade to `target`.
    ///
    /// A no-op if `target` is already current, so repeated triggers while the
    /// action plays never restart it. Returns whether a crossfade started.
    pub fn swap(&mut self, target: &ActionId, now_ms: f64, mixer: &mut dyn AnimationMixer) -> bool {
        if *target == self.current {
            trace!("Avatar already in '{}'", target);
            return false;
        }

        let from = self.weights_at(now_ms);
        let mut to = WeightSet::solo(target);
        for (action, _) in from.iter() {
            to.0.entry(action.clone()).or_insert(0.0);
        }

        debug!("Avatar crossfade '{}' -> '{}'", self.current, target);
        mixer.play(target);
        mixer.crossfade_from(&self.current, target, self.crossfade_seconds);

        self.fade = Some(ActiveTransition::new(
            from,
            to,
            now_ms,
            f64::from(self.crossfade_seconds) * 1000.0,
        ));
        self.current = target.clone();
        true
    }

    /// React to a mixer notification.
    ///
    /// Only a finished play-once action that is still current triggers the
    /// return to idle; anything else is ignored.
    pub fn handle_event(
        &mut self,
        event: &MixerEvent,
        now_ms: f64,
        mixer: &mut dyn AnimationMixer,
    ) {
        match event {
            MixerEvent::Finished(action)
                if self.play_once.contains(action) && *action == self.current =>
            {
                debug!("Avatar action '{}' finished", action);
                let idle = self.idle.clone();
                self.swap(&idle, now_ms, mixer);
            }
            MixerEvent::Finished(action) => {
                trace!("Ignoring finished notification for '{}'", action);
            }
        }
    }

    /// Drain mixer notifications and settle the crossfade weights
    pub fn update(&mut self, now_ms: f64, mixer: &mut dyn AnimationMixer) {
        while let Some(event) = mixer.poll_event() {
            self.handle_event(&event, now_ms, mixer);
        }

        if let Some(fade) = &self.fade {
            self.weights = fade.sample(now_ms);
            if fade.is_finished(now_ms) {
                self.fade = None;
            }
        }
    }

    /// Live influence weights at `now_ms`
    pub fn weights_at(&self, now_ms: f64) -> WeightSet {
        match &self.fade {
            Some(fade) => fade.sample(now_ms),
            None => self.weights.clone(),
        }
    }

    pub fn current(&self) -> &ActionId {
        &self.current
    }

    pub fn is_crossfading(&self) -> bool {
        self.fade.is_some()
    }
}
