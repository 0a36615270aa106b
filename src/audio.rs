//! Audio system using Web Audio API
//!
//! Sound effects are short sine tones with an exponential decay, generated
//! on the fly. Background music is a page `<audio>` element.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Short chirp
    Jump,
    /// Pleasant ding
    Score,
    /// Thud
    Hit,
}

/// Frequency (Hz) and duration (s) of a tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: f64,
}

impl SoundEffect {
    pub fn tone(&self) -> Tone {
        match self {
            SoundEffect::Jump => Tone {
                frequency: 800.0,
                duration: 0.1,
            },
            SoundEffect::Score => Tone {
                frequency: 1200.0,
                duration: 0.2,
            },
            SoundEffect::Hit => Tone {
                frequency: 200.0,
                duration: 0.3,
            },
        }
    }

    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Scored { .. } => Some(SoundEffect::Score),
            GameEvent::Crashed { .. } => Some(SoundEffect::Hit),
            GameEvent::Started => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Peak gain of a tone
    const TONE_GAIN: f32 = 0.1;
    /// Gain a tone decays to by its end
    const TONE_FLOOR: f32 = 0.001;
    /// Background music volume
    const MUSIC_VOLUME: f64 = 0.3;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        sound_enabled: bool,
        music_enabled: bool,
        /// Autoplay was blocked; retry on the next user gesture
        music_blocked: Rc<Cell<bool>>,
    }

    impl AudioManager {
        pub fn new(sound_enabled: bool, music_enabled: bool) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }

            let music = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("backgroundMusic"))
                .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
            if music.is_none() {
                log::warn!("No #backgroundMusic element - music disabled");
            }

            Self {
                ctx,
                music,
                sound_enabled,
                music_enabled,
                music_blocked: Rc::new(Cell::new(false)),
            }
        }

        pub fn set_sound_enabled(&mut self, enabled: bool) {
            self.sound_enabled = enabled;
        }

        pub fn set_music_enabled(&mut self, enabled: bool) {
            self.music_enabled = enabled;
            if enabled {
                self.start_music();
            } else if let Some(music) = &self.music {
                let _ = music.pause();
            }
        }

        /// Resume the audio context and retry blocked music
        /// (browsers require a user gesture for both)
        pub fn on_user_gesture(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
            if self.music_blocked.get() {
                self.start_music();
            }
        }

        pub fn start_music(&self) {
            if !self.music_enabled {
                return;
            }
            let Some(music) = &self.music else { return };
            music.set_volume(MUSIC_VOLUME);
            music.set_loop(true);

            let blocked = self.music_blocked.clone();
            match music.play() {
                Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                    match JsFuture::from(promise).await {
                        Ok(_) => blocked.set(false),
                        Err(e) => {
                            log::info!("Background music blocked until interaction: {:?}", e);
                            blocked.set(true);
                        }
                    }
                }),
                Err(e) => {
                    log::warn!("Background music failed: {:?}", e);
                    blocked.set(true);
                }
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if !self.sound_enabled {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let tone = effect.tone();
            let Some((osc, gain)) = self.create_osc(ctx, tone.frequency, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(TONE_GAIN, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(TONE_FLOOR, t + tone.duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + tone.duration).ok();
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }
}
