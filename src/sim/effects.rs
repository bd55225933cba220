//! Timed power-up effects
//!
//! Each effect kind owns one slot. Collecting another power-up that targets
//! the same slot (enlarge after shrink, a second laser) replaces the value and
//! restarts the countdown instead of stacking.

use crate::consts::FRAME_MS;

/// Slot an effect occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    PaddleSize,
    BallSpeed,
    ScoreMultiplier,
    Laser,
    StickyPaddle,
    Penetrating,
}

/// A durable effect with its payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Paddle width multiplier
    PaddleSize(f32),
    /// Ball movement multiplier (applied to the position step only)
    BallSpeed(f32),
    /// Score multiplier on brick destruction
    ScoreMultiplier(u32),
    Laser,
    StickyPaddle,
    Penetrating,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::PaddleSize(_) => EffectKind::PaddleSize,
            Effect::BallSpeed(_) => EffectKind::BallSpeed,
            Effect::ScoreMultiplier(_) => EffectKind::ScoreMultiplier,
            Effect::Laser => EffectKind::Laser,
            Effect::StickyPaddle => EffectKind::StickyPaddle,
            Effect::Penetrating => EffectKind::Penetrating,
        }
    }

    /// Numeric view of the payload; flags read as 1.0
    pub fn value(&self) -> f32 {
        match *self {
            Effect::PaddleSize(v) | Effect::BallSpeed(v) => v,
            Effect::ScoreMultiplier(m) => m as f32,
            Effect::Laser | Effect::StickyPaddle | Effect::Penetrating => 1.0,
        }
    }
}

/// One effect currently in force
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub effect: Effect,
    /// Milliseconds left
    pub remaining_ms: f32,
    /// Display name of the power-up that granted it
    pub name: &'static str,
}

/// Registry of active effects, at most one per `EffectKind`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate an effect, replacing any effect in the same slot
    pub fn activate(&mut self, effect: Effect, duration_ms: f32, name: &'static str) {
        let kind = effect.kind();
        self.effects.retain(|active| active.effect.kind() != kind);
        self.effects.push(ActiveEffect {
            effect,
            remaining_ms: duration_ms,
            name,
        });
    }

    /// Count every effect down by one frame and evict the expired ones
    pub fn tick(&mut self) {
        self.effects.retain_mut(|active| {
            if active.remaining_ms > 0.0 {
                active.remaining_ms -= FRAME_MS;
                active.remaining_ms > 0.0
            } else {
                false
            }
        });
    }

    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.effects.iter().find(|active| active.effect.kind() == kind)
    }

    /// Value of the effect in `kind`'s slot, or `default` when inactive
    pub fn effect_value(&self, kind: EffectKind, default: f32) -> f32 {
        self.get(kind).map_or(default, |active| active.effect.value())
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn ball_speed(&self) -> f32 {
        self.effect_value(EffectKind::BallSpeed, 1.0)
    }

    pub fn score_multiplier(&self) -> u32 {
        match self.get(EffectKind::ScoreMultiplier).map(|active| active.effect) {
            Some(Effect::ScoreMultiplier(m)) => m,
            _ => 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
