//! Audio system
//!
//! Gameplay events map to named sound effects. In the browser they are
//! procedurally generated with the Web Audio API - no external files needed!

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a side or top wall
    WallHit,
    /// Brick damaged but still standing
    BrickHit,
    /// Brick breaks
    BrickBreak,
    /// Explosive brick detonates
    Explosion,
    /// Power-up collected
    PowerUp,
    /// Laser pair fired
    Laser,
    /// Last ball fell through
    LifeLost,
    /// Level cleared
    LevelComplete,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Sound and base volume for an event, if it makes one
    pub fn for_event(event: &GameEvent) -> Option<(SoundEffect, f32)> {
        let sound = match event {
            GameEvent::PaddleHit { .. } => (SoundEffect::PaddleHit, 0.5),
            GameEvent::WallBounce { .. } => (SoundEffect::WallHit, 0.3),
            GameEvent::BrickHit { .. } => (SoundEffect::BrickHit, 0.3),
            GameEvent::BrickDestroyed { .. } => (SoundEffect::BrickBreak, 0.4),
            GameEvent::Explosion { .. } => (SoundEffect::Explosion, 0.5),
            GameEvent::PowerUpCollected { .. } => (SoundEffect::PowerUp, 0.6),
            GameEvent::LaserFired { .. } => (SoundEffect::Laser, 0.3),
            GameEvent::LifeLost { .. } => (SoundEffect::LifeLost, 0.5),
            GameEvent::LevelComplete { .. } => (SoundEffect::LevelComplete, 0.6),
            GameEvent::GameOver { .. } => (SoundEffect::GameOver, 0.7),
            GameEvent::BrickRegenerated { .. }
            | GameEvent::LaserHit { .. }
            | GameEvent::BallLaunched { .. }
            | GameEvent::ScreenShake { .. } => return None,
        };
        Some(sound)
    }
}

/// Anything that can play a sound effect
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Silent sink for tests and the native demo
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Play the sounds for a batch of events. Each effect sounds at most once
/// per batch, at the loudest volume requested.
pub fn play_events(sink: &mut impl AudioSink, events: &[GameEvent]) {
    let mut batch: Vec<(SoundEffect, f32)> = Vec::new();
    for (effect, volume) in events.iter().filter_map(SoundEffect::for_event) {
        match batch.iter_mut().find(|(queued, _)| *queued == effect) {
            Some((_, loudest)) => *loudest = loudest.max(volume),
            None => batch.push((effect, volume)),
        }
    }
    for (effect, volume) in batch {
        sink.play(effect, volume);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        gain: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, gain: 0.8 }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.resume().is_err() {
                    log::warn!("Could not resume AudioContext");
                }
            }
        }

        /// Overall gain from settings (master x sfx, zero when muted)
        pub fn set_gain(&mut self, gain: f32) {
            self.gain = gain.clamp(0.0, 1.0);
        }

        // === Sound generators ===

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

        /// Single oscillator with an optional pitch sweep and a fast decay
        fn blip(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            (from, to): (f32, f32),
            vol: f32,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            if to != from {
                osc.frequency().set_value_at_time(from, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + length)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Notes played one after another
        fn arpeggio(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            notes: &[f32],
            step: f64,
            vol: f32,
            length: f64,
        ) {
            for (i, &freq) in notes.iter().enumerate() {
                self.blip(ctx, osc_type, (freq, freq), vol, i as f64 * step, length);
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            let vol = self.gain * volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                // Solid thump
                SoundEffect::PaddleHit => {
                    self.blip(ctx, OscillatorType::Sine, (150.0, 60.0), vol * 0.6, 0.0, 0.1)
                }
                // Higher ping
                SoundEffect::WallHit => {
                    self.blip(ctx, OscillatorType::Sine, (400.0, 400.0), vol * 0.5, 0.0, 0.08)
                }
                // Soft tap
                SoundEffect::BrickHit => {
                    self.blip(ctx, OscillatorType::Triangle, (300.0, 300.0), vol * 0.4, 0.0, 0.05)
                }
                // Bright shatter over a bass thump
                SoundEffect::BrickBreak => {
                    self.blip(ctx, OscillatorType::Square, (1200.0, 300.0), vol * 0.3, 0.0, 0.12);
                    self.blip(ctx, OscillatorType::Sine, (90.0, 50.0), vol * 0.4, 0.0, 0.1);
                }
                // Deep boom with a crackle on top
                SoundEffect::Explosion => {
                    self.blip(ctx, OscillatorType::Sawtooth, (120.0, 30.0), vol * 0.6, 0.0, 0.35);
                    self.blip(ctx, OscillatorType::Square, (2500.0, 400.0), vol * 0.15, 0.0, 0.15);
                }
                // Happy ding
                SoundEffect::PowerUp => self.arpeggio(
                    ctx,
                    OscillatorType::Sine,
                    &[600.0, 800.0, 1000.0],
                    0.08,
                    vol * 0.4,
                    0.15,
                ),
                // Zap down
                SoundEffect::Laser => {
                    self.blip(ctx, OscillatorType::Sawtooth, (1800.0, 600.0), vol * 0.3, 0.0, 0.08)
                }
                // Ominous descend
                SoundEffect::LifeLost => {
                    self.blip(ctx, OscillatorType::Sine, (300.0, 40.0), vol * 0.5, 0.0, 0.6)
                }
                // Triumphant fanfare
                SoundEffect::LevelComplete => self.arpeggio(
                    ctx,
                    OscillatorType::Triangle,
                    &[400.0, 500.0, 600.0, 800.0],
                    0.1,
                    vol * 0.4,
                    0.4,
                ),
                // Sad descending
                SoundEffect::GameOver => self.arpeggio(
                    ctx,
                    OscillatorType::Sine,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    vol * 0.4,
                    0.3,
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BrickKind;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder(Vec<(SoundEffect, f32)>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.push((effect, volume));
        }
    }

    #[test]
    fn test_event_volumes() {
        let paddle = GameEvent::PaddleHit {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
        };
        assert_eq!(
            SoundEffect::for_event(&paddle),
            Some((SoundEffect::PaddleHit, 0.5))
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver { score: 0, level: 1 }),
            Some((SoundEffect::GameOver, 0.7))
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ScreenShake { duration_ms: 200 }),
            None
        );
    }

    #[test]
    fn test_batch_plays_each_sound_once() {
        let hit = GameEvent::BrickHit {
            center: Vec2::ZERO,
            kind: BrickKind::Metal,
        };
        let wall = GameEvent::WallBounce {
            pos: Vec2::ZERO,
            normal: Vec2::X,
        };
        let mut recorder = Recorder::default();
        play_events(
            &mut recorder,
            &[hit.clone(), wall, hit, GameEvent::LaserHit { pos: Vec2::ZERO }],
        );
        assert_eq!(
            recorder.0,
            vec![(SoundEffect::BrickHit, 0.3), (SoundEffect::WallHit, 0.3)]
        );
    }

    #[test]
    fn test_null_audio_accepts_everything() {
        play_events(&mut NullAudio, &[GameEvent::LifeLost { lives_left: 0 }]);
    }
}
