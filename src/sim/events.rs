//! Gameplay events published by entities
//!
//! Entities never reach into particles, audio or UI directly. They publish
//! `GameEvent`s into whatever `EventSink` the caller hands them; the session
//! collects them for the particle engine and the host drains them for sound
//! and HUD notifications.

use glam::Vec2;

use super::brick::BrickKind;
use super::geometry::Rect;
use super::powerup::PowerUpKind;
use crate::Rgba;

/// Something observable happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Ball bounced off a side or top wall
    WallBounce { pos: Vec2, normal: Vec2 },
    /// Ball bounced off (or stuck to) the paddle
    PaddleHit { pos: Vec2, vel: Vec2 },
    /// Brick took damage but survived
    BrickHit { center: Vec2, kind: BrickKind },
    /// Brick reached zero hit points
    BrickDestroyed {
        bounds: Rect,
        kind: BrickKind,
        color: Rgba,
    },
    /// Regenerating brick came back to full health
    BrickRegenerated { center: Vec2, color: Rgba },
    /// Explosive brick detonated
    Explosion { center: Vec2, radius: f32 },
    /// Paddle fired a laser pair
    LaserFired { left: Vec2, right: Vec2 },
    /// Laser struck a brick
    LaserHit { pos: Vec2 },
    /// Falling power-up touched the paddle
    PowerUpCollected { kind: PowerUpKind, pos: Vec2 },
    /// Stuck balls left the paddle
    BallLaunched { count: usize },
    /// Last ball fell off the playfield
    LifeLost { lives_left: u32 },
    /// Request a screen shake of the given length
    ScreenShake { duration_ms: u32 },
    /// Every breakable brick is gone
    LevelComplete { level: u32, bonus: u64 },
    /// No lives left
    GameOver { score: u64, level: u32 },
}

/// Receiver for gameplay events
pub trait EventSink {
    fn publish(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: GameEvent) {}
}
