//! Day/night lighting blend.
//!
//! Lighting is not a mode: it is a continuous transition that runs in
//! parallel with everything else. The animator keeps the live [`LightState`]
//! and at most one [`ActiveTransition`] towards the day or night preset.

use log::{info, trace};

use crate::gfx::context::LightRig;
use crate::gfx::scene::{Category, InteractiveObjectRegistry};
use crate::gfx::transition::{lerp_scalar, ActiveTransition, Lerp};

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Lerp for Color {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Color::new(
            lerp_scalar(self.r, other.r, t),
            lerp_scalar(self.g, other.g, t),
            lerp_scalar(self.b, other.b, t),
        )
    }
}

/// Every lighting channel the day/night blend drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub ambient_intensity: f32,
    pub ambient_color: Color,
    pub directional_intensity: f32,
    pub directional_color: Color,
    pub background: Color,
    pub exposure: f32,
    /// Applied to the accent light of every registered frame
    pub frame_accent_intensity: f32,
    /// Applied to the spot light above the avatar
    pub avatar_spot_intensity: f32,
}

impl LightState {
    pub fn day() -> Self {
        Self {
            ambient_intensity: 1.0,
            ambient_color: Color::WHITE,
            directional_intensity: 1.0,
            directional_color: Color::WHITE,
            background: Color::from_hex(0x4d575e),
            exposure: 1.0,
            frame_accent_intensity: 0.0,
            avatar_spot_intensity: 0.0,
        }
    }

    pub fn night() -> Self {
        Self {
            ambient_intensity: 0.15,
            ambient_color: Color::from_hex(0x2a3550),
            directional_intensity: 0.1,
            directional_color: Color::from_hex(0x6677aa),
            background: Color::from_hex(0x0b0f1a),
            exposure: 0.6,
            frame_accent_intensity: 2.0,
            avatar_spot_intensity: 1.5,
        }
    }

    pub fn to_uniform(&self) -> LightUniform {
        let [ar, ag, ab] = self.ambient_color.to_array();
        let [dr, dg, db] = self.directional_color.to_array();
        let [br, bg, bb] = self.background.to_array();
        LightUniform {
            ambient: [ar, ag, ab, self.ambient_intensity],
            directional: [dr, dg, db, self.directional_intensity],
            background: [br, bg, bb, self.exposure],
        }
    }
}

impl Lerp for LightState {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            ambient_intensity: lerp_scalar(self.ambient_intensity, other.ambient_intensity, t),
            ambient_color: self.ambient_color.lerp(&other.ambient_color, t),
            directional_intensity: lerp_scalar(
                self.directional_intensity,
                other.directional_intensity,
                t,
            ),
            directional_color: self.directional_color.lerp(&other.directional_color, t),
            background: self.background.lerp(&other.background, t),
            exposure: lerp_scalar(self.exposure, other.exposure, t),
            frame_accent_intensity: lerp_scalar(
                self.frame_accent_intensity,
                other.frame_accent_intensity,
                t,
            ),
            avatar_spot_intensity: lerp_scalar(
                self.avatar_spot_intensity,
                other.avatar_spot_intensity,
                t,
            ),
        }
    }
}

/// GPU layout of the global lighting channels.
///
/// Each vector packs an RGB color with its scalar: ambient and directional
/// carry their intensity in `w`, background carries the tone-mapping exposure.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub directional: [f32; 4],
    pub background: [f32; 4],
}

/// Lighting presets and default blend length
#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub day: LightState,
    pub night: LightState,
    pub transition_ms: f64,
    pub start_in_daylight: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            day: LightState::day(),
            night: LightState::night(),
            transition_ms: 2000.0,
            start_in_daylight: true,
        }
    }
}

pub struct LightingAnimator {
    day: LightState,
    night: LightState,
    live: LightState,
    is_day: bool,
    transition: Option<ActiveTransition<LightState>>,
}

impl LightingAnimator {
    pub fn new(config: &LightingConfig) -> Self {
        let live = if config.start_in_daylight {
            config.day
        } else {
            config.night
        };
        Self {
            day: config.day,
            night: config.night,
            live,
            is_day: config.start_in_daylight,
            transition: None,
        }
    }

    /// Start blending towards the day or night preset.
    ///
    /// The live values become the new `from`, so interrupting an unfinished
    /// blend continues from wherever the lights are right now.
    pub fn start_transition(&mut self, target_is_day: bool, duration_ms: f64, now_ms: f64) {
        let to = if target_is_day { self.day } else { self.night };
        if self.transition.is_some() {
            trace!("Light transition superseded at {:.0}ms", now_ms);
        }
        info!(
            "Lighting transition to {} over {:.0}ms",
            if target_is_day { "day" } else { "night" },
            duration_ms
        );
        self.transition = Some(ActiveTransition::new(self.live, to, now_ms, duration_ms));
        self.is_day = target_is_day;
    }

    /// Flip between day and night
    pub fn toggle(&mut self, duration_ms: f64, now_ms: f64) {
        self.start_transition(!self.is_day, duration_ms, now_ms);
    }

    /// Advance the blend and push the live values into the light rig.
    ///
    /// Per-object channels are written by walking the live registry, so frames
    /// that streamed in after the blend started pick up the current value.
    /// Lights the rig has not instantiated yet are skipped.
    pub fn update(
        &mut self,
        now_ms: f64,
        registry: &InteractiveObjectRegistry,
        rig: &mut dyn LightRig,
    ) {
        if let Some(transition) = &self.transition {
            self.live = transition.sample(now_ms);
            if transition.is_finished(now_ms) {
                trace!("Light transition finished at {:.0}ms", now_ms);
                self.transition = None;
            }
        }

        rig.apply_global(&self.live);
        for object in registry.iter() {
            let intensity = match object.category() {
                Category::Frame => self.live.frame_accent_intensity,
                Category::Avatar => self.live.avatar_spot_intensity,
                _ => continue,
            };
            if !rig.set_accent_intensity(object.proxy, intensity) {
                trace!("Accent light for '{}' not instantiated yet", object.id);
            }
        }
    }

    pub fn live(&self) -> &LightState {
        &self.live
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }
}
