//! Power-up catalog, falling capsules and the effect manager

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::effects::{ActiveEffects, Effect};
use super::events::{EventSink, GameEvent};
use super::geometry::Rect;
use super::pulse::Pulse;
use crate::consts::*;
use crate::{Rgba, rgb};

/// Power-up kinds, as found in falling capsules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Enlarge,
    Shrink,
    SpeedUp,
    SlowDown,
    MultiBall,
    Laser,
    ExtraLife,
    ScoreBoost,
    StickyPaddle,
    PenetratingBall,
}

/// Effect applied once on collection instead of being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstantEffect {
    /// Clone the lead ball this many times
    MultiBall(u32),
    /// Grant this many lives (capped by the session)
    ExtraLife(u32),
}

/// What collecting a power-up does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    Timed { effect: Effect, duration_ms: f32 },
    Instant(InstantEffect),
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 10] = [
        PowerUpKind::Enlarge,
        PowerUpKind::Shrink,
        PowerUpKind::SpeedUp,
        PowerUpKind::SlowDown,
        PowerUpKind::MultiBall,
        PowerUpKind::Laser,
        PowerUpKind::ExtraLife,
        PowerUpKind::ScoreBoost,
        PowerUpKind::StickyPaddle,
        PowerUpKind::PenetratingBall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Enlarge => "Enlarge Paddle",
            PowerUpKind::Shrink => "Shrink Paddle",
            PowerUpKind::SpeedUp => "Speed Up",
            PowerUpKind::SlowDown => "Slow Down",
            PowerUpKind::MultiBall => "Multi Ball",
            PowerUpKind::Laser => "Laser Paddle",
            PowerUpKind::ExtraLife => "Extra Life",
            PowerUpKind::ScoreBoost => "Score Boost",
            PowerUpKind::StickyPaddle => "Sticky Paddle",
            PowerUpKind::PenetratingBall => "Penetrating Ball",
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            PowerUpKind::Enlarge => rgb(0x00ff00),
            PowerUpKind::Shrink => rgb(0xff4444),
            PowerUpKind::SpeedUp => rgb(0xffff00),
            PowerUpKind::SlowDown => rgb(0x00ccff),
            PowerUpKind::MultiBall => rgb(0xff00ff),
            PowerUpKind::Laser => rgb(0xff6600),
            PowerUpKind::ExtraLife => rgb(0xff69b4),
            PowerUpKind::ScoreBoost => rgb(0xffd700),
            PowerUpKind::StickyPaddle => rgb(0x8a2be2),
            PowerUpKind::PenetratingBall => rgb(0x32cd32),
        }
    }

    /// Glyph drawn on the capsule by text-capable front ends
    pub fn symbol(&self) -> char {
        match self {
            PowerUpKind::Enlarge => '▬',
            PowerUpKind::Shrink => '▪',
            PowerUpKind::SpeedUp => '►',
            PowerUpKind::SlowDown => '◄',
            PowerUpKind::MultiBall => '●',
            PowerUpKind::Laser => '↑',
            PowerUpKind::ExtraLife => '♥',
            PowerUpKind::ScoreBoost => '★',
            PowerUpKind::StickyPaddle => '═',
            PowerUpKind::PenetratingBall => '◆',
        }
    }

    /// Relative spawn weight (rare kinds are lower)
    pub fn weight(&self) -> u32 {
        match self {
            PowerUpKind::Enlarge => 15,
            PowerUpKind::Shrink => 10,
            PowerUpKind::SpeedUp => 12,
            PowerUpKind::SlowDown => 15,
            PowerUpKind::MultiBall => 8,
            PowerUpKind::Laser => 10,
            PowerUpKind::ExtraLife => 5,
            PowerUpKind::ScoreBoost => 12,
            PowerUpKind::StickyPaddle => 8,
            PowerUpKind::PenetratingBall => 5,
        }
    }

    pub fn payload(&self) -> Payload {
        let timed = |effect, duration_ms| Payload::Timed {
            effect,
            duration_ms,
        };
        match self {
            PowerUpKind::Enlarge => timed(Effect::PaddleSize(1.5), 10000.0),
            PowerUpKind::Shrink => timed(Effect::PaddleSize(0.7), 8000.0),
            PowerUpKind::SpeedUp => timed(Effect::BallSpeed(1.3), 8000.0),
            PowerUpKind::SlowDown => timed(Effect::BallSpeed(0.7), 10000.0),
            PowerUpKind::MultiBall => Payload::Instant(InstantEffect::MultiBall(2)),
            PowerUpKind::Laser => timed(Effect::Laser, 15000.0),
            PowerUpKind::ExtraLife => Payload::Instant(InstantEffect::ExtraLife(1)),
            PowerUpKind::ScoreBoost => timed(Effect::ScoreMultiplier(2), 12000.0),
            PowerUpKind::StickyPaddle => timed(Effect::StickyPaddle, 15000.0),
            PowerUpKind::PenetratingBall => timed(Effect::Penetrating, 8000.0),
        }
    }

    /// Weighted random pick over the full catalog
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL
            .choose_weighted(rng, |kind| kind.weight())
            .copied()
            .unwrap_or(PowerUpKind::Enlarge)
    }
}

/// A capsule falling toward the paddle
#[derive(Debug, Clone)]
pub struct PowerUp {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
    pub glow: Pulse,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            size: Vec2::new(POWER_UP_WIDTH, POWER_UP_HEIGHT),
            kind,
            speed: POWER_UP_FALL_SPEED,
            glow: Pulse::new(0.05),
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
        self.glow.advance();
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_off_screen(&self, playfield_height: f32) -> bool {
        self.pos.y > playfield_height
    }
}

/// Falling capsules plus the registry of effects they granted
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    pub falling: Vec<PowerUp>,
    effects: ActiveEffects,
    pub spawn_chance: f64,
}

impl Default for PowerUpManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerUpManager {
    pub fn new() -> Self {
        Self {
            falling: Vec::new(),
            effects: ActiveEffects::new(),
            spawn_chance: POWER_UP_SPAWN_CHANCE,
        }
    }

    /// Roll the spawn chance and drop a random capsule at `pos` on success
    pub fn spawn_power_up(&mut self, pos: Vec2, rng: &mut impl Rng) -> bool {
        if !rng.random_bool(self.spawn_chance) {
            return false;
        }
        let kind = PowerUpKind::random(rng);
        log::debug!("Power-up {:?} dropped at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.falling.push(PowerUp::new(pos, kind));
        true
    }

    /// Advance capsules, collect the ones touching the paddle, and count
    /// active effects down. Returns the instant effects the session must
    /// apply.
    pub fn update(
        &mut self,
        paddle: &Rect,
        playfield_height: f32,
        sink: &mut impl EventSink,
    ) -> Vec<InstantEffect> {
        let mut instants = Vec::new();
        let mut collected = Vec::new();

        self.falling.retain_mut(|power_up| {
            power_up.update();
            if power_up.bounds().intersects(paddle) {
                collected.push((power_up.kind, power_up.bounds().center()));
                return false;
            }
            !power_up.is_off_screen(playfield_height)
        });

        for (kind, pos) in collected {
            if let Some(instant) = self.collect_power_up(kind, pos, sink) {
                instants.push(instant);
            }
        }

        self.effects.tick();
        instants
    }

    /// Apply a power-up. Timed kinds replace their slot; instant kinds are
    /// handed back to the caller.
    pub fn collect_power_up(
        &mut self,
        kind: PowerUpKind,
        pos: Vec2,
        sink: &mut impl EventSink,
    ) -> Option<InstantEffect> {
        log::info!("Collected {}", kind.name());
        sink.publish(GameEvent::PowerUpCollected { kind, pos });

        match kind.payload() {
            Payload::Timed {
                effect,
                duration_ms,
            } => {
                self.effects.activate(effect, duration_ms, kind.name());
                None
            }
            Payload::Instant(instant) => Some(instant),
        }
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    /// Active effects for HUD display: (name, milliseconds left)
    pub fn active_power_ups(&self) -> Vec<(&'static str, f32)> {
        self.effects
            .iter()
            .map(|active| (active.name, active.remaining_ms.max(0.0)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.falling.clear();
        self.effects.clear();
    }
}
