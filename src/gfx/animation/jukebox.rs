//! Record player: vinyl spin and music follow hover, unless pinned by click.
//!
//! Spin and sound always change together, so music never plays under a still
//! record and the record never spins in silence.

use log::{debug, info};

use crate::gfx::context::{ActionId, AnimationMixer, AudioSource};

pub struct JukeboxController {
    spin: ActionId,
    hovered: bool,
    manual_pin: bool,
    spinning: bool,
}

impl JukeboxController {
    /// Start the spin clip stopped (time scale 0)
    pub fn new(spin: ActionId, mixer: &mut dyn AnimationMixer) -> Self {
        mixer.play(&spin);
        mixer.set_time_scale(&spin, 0.0);
        Self {
            spin,
            hovered: false,
            manual_pin: false,
            spinning: false,
        }
    }

    /// Report whether the jukebox is under the pointer this tick
    pub fn apply_hover(
        &mut self,
        hovered: bool,
        mixer: &mut dyn AnimationMixer,
        audio: &mut dyn AudioSource,
    ) {
        self.hovered = hovered;
        self.sync(mixer, audio);
    }

    /// Flip the manual pin. Only a click may call this; hover never pins.
    pub fn toggle_pin(
        &mut self,
        mixer: &mut dyn AnimationMixer,
        audio: &mut dyn AudioSource,
    ) -> bool {
        self.manual_pin = !self.manual_pin;
        info!(
            "Jukebox {}",
            if self.manual_pin { "pinned" } else { "unpinned" }
        );
        self.sync(mixer, audio);
        self.manual_pin
    }

    /// Whether playback is wanted right now
    pub fn playback_intent(&self) -> bool {
        self.hovered || self.manual_pin
    }

    pub fn is_pinned(&self) -> bool {
        self.manual_pin
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    fn sync(&mut self, mixer: &mut dyn AnimationMixer, audio: &mut dyn AudioSource) {
        if self.playback_intent() {
            if !self.spinning {
                debug!("Jukebox spinning up");
                mixer.set_time_scale(&self.spin, 1.0);
                self.spinning = true;
            }
            if !audio.is_playing() {
                audio.play();
            }
        } else {
            if self.spinning {
                debug!("Jukebox stopping");
                mixer.set_time_scale(&self.spin, 0.0);
                self.spinning = false;
            }
            if audio.is_playing() {
                audio.pause();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::headless::{HeadlessAudio, HeadlessMixer};

    fn jukebox() -> (JukeboxController, HeadlessMixer, HeadlessAudio) {
        let mut mixer = HeadlessMixer::new();
        let jukebox = JukeboxController::new(ActionId::SPIN, &mut mixer);
        (jukebox, mixer, HeadlessAudio::new())
    }

    #[test]
    fn test_hover_plays_and_leaving_pauses() {
        let (mut jukebox, mut mixer, mut audio) = jukebox();
        assert_eq!(mixer.time_scale(&ActionId::SPIN), 0.0);

        jukebox.apply_hover(true, &mut mixer, &mut audio);
        assert_eq!(mixer.time_scale(&ActionId::SPIN), 1.0);
        assert!(audio.is_playing());

        jukebox.apply_hover(false, &mut mixer, &mut audio);
        assert_eq!(mixer.time_scale(&ActionId::SPIN), 0.0);
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_pin_survives_leaving() {
        let (mut jukebox, mut mixer, mut audio) = jukebox();
        jukebox.apply_hover(true, &mut mixer, &mut audio);
        assert!(jukebox.toggle_pin(&mut mixer, &mut audio));
        assert!(jukebox.is_pinned());

        jukebox.apply_hover(false, &mut mixer, &mut audio);
        assert!(audio.is_playing());
        assert!(jukebox.is_spinning());

        // unpinning away from the jukebox stops it right away
        assert!(!jukebox.toggle_pin(&mut mixer, &mut audio));
        assert!(!audio.is_playing());
        assert!(!jukebox.is_spinning());
    }

    #[test]
    fn test_repeated_hover_does_not_restart_audio() {
        let (mut jukebox, mut mixer, mut audio) = jukebox();
        for _ in 0..5 {
            jukebox.apply_hover(true, &mut mixer, &mut audio);
        }
        assert_eq!(audio.start_count(), 1);
    }
}
