//! Bricks and their per-kind behavior
//!
//! - Hit points drop by the damage dealt; reaching zero destroys the brick
//! - Indestructible bricks ignore every hit
//! - Explosive and regenerating bricks hand a `SpecialEffect` back to the
//!   session, which owns area damage and level bookkeeping
//! - Moving bricks slide sideways and bounce off the playfield edges

use glam::Vec2;

use super::events::{EventSink, GameEvent};
use super::geometry::{Rect, Side, circle_rect_intersect, collision_side};
use super::pulse::Pulse;
use crate::consts::*;
use crate::{Rgba, hash_jitter, rgb};

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrickKind {
    Normal,
    Reinforced,
    Metal,
    Explosive,
    Regenerating,
    Moving,
    Indestructible,
}

impl BrickKind {
    /// Points awarded on destruction (before multipliers)
    pub fn score(&self) -> u32 {
        match self {
            BrickKind::Normal => 10,
            BrickKind::Reinforced => 25,
            BrickKind::Metal => 50,
            BrickKind::Explosive => 30,
            BrickKind::Regenerating => 40,
            BrickKind::Moving => 35,
            BrickKind::Indestructible => 0,
        }
    }

    /// Starting hit points. Indestructible bricks carry a nominal 1 that
    /// never changes.
    pub fn hit_points(&self) -> u32 {
        match self {
            BrickKind::Reinforced => 2,
            BrickKind::Metal => 3,
            _ => 1,
        }
    }

    /// Fill colors indexed by remaining hit points (1 hp = index 0)
    pub fn palette(&self) -> [Rgba; 3] {
        match self {
            BrickKind::Normal => [rgb(0x00ffff), rgb(0x0099cc), rgb(0x006699)],
            BrickKind::Reinforced => [rgb(0xff6b6b), rgb(0xcc5555), rgb(0x994444)],
            BrickKind::Metal => [rgb(0xc0c0c0), rgb(0x999999), rgb(0x666666)],
            BrickKind::Explosive => [rgb(0xffff00), rgb(0xffcc00), rgb(0xff9900)],
            BrickKind::Regenerating => [rgb(0x00ff00), rgb(0x00cc00), rgb(0x009900)],
            BrickKind::Moving => [rgb(0xff00ff), rgb(0xcc00cc), rgb(0x990099)],
            BrickKind::Indestructible => [rgb(0x444444), rgb(0x333333), rgb(0x222222)],
        }
    }

    pub fn glow_color(&self) -> Rgba {
        match self {
            BrickKind::Metal => rgb(0xffffff),
            BrickKind::Indestructible => rgb(0x666666),
            _ => self.palette()[0],
        }
    }

    /// Whether the brick must be destroyed to clear the level
    pub fn is_breakable(&self) -> bool {
        !matches!(self, BrickKind::Indestructible)
    }
}

/// Side effect the session must resolve after a destruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialEffect {
    /// Damage every brick whose center lies within `radius`
    Explosion { radius: f32 },
    /// The brick will come back after its regeneration delay
    Regenerate,
}

/// Outcome of hitting a brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub destroyed: bool,
    pub score: u32,
    pub special: Option<SpecialEffect>,
}

impl HitResult {
    pub const SURVIVED: HitResult = HitResult {
        destroyed: false,
        score: 0,
        special: None,
    };
}

#[derive(Debug, Clone)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub destroyed: bool,
    /// Countdown (ms) while a destroyed regenerating brick waits to return
    regenerate_ms: Option<f32>,
    move_direction: f32,
    pub glow: Pulse,
    shake_intensity: f32,
    pub shake_offset: Vec2,
    shake_seed: u32,
}

impl Brick {
    pub fn new(pos: Vec2, kind: BrickKind) -> Self {
        let hit_points = kind.hit_points();
        Self {
            pos,
            size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            kind,
            hit_points,
            max_hit_points: hit_points,
            destroyed: false,
            regenerate_ms: None,
            move_direction: 1.0,
            glow: Pulse::new(0.02),
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
            shake_seed: (pos.x as u32) ^ ((pos.y as u32) << 16),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Current fill color (darker while more hits remain)
    pub fn color(&self) -> Rgba {
        let palette = self.kind.palette();
        let index = (self.hit_points.max(1) as usize - 1).min(palette.len() - 1);
        palette[index]
    }

    /// Fraction of the regeneration delay already elapsed
    pub fn regeneration_progress(&self) -> Option<f32> {
        self.regenerate_ms
            .map(|left| (1.0 - left / REGENERATE_MS).clamp(0.0, 1.0))
    }

    /// Intact, or a regenerating brick waiting to return (those still
    /// deflect balls)
    pub fn is_collidable(&self) -> bool {
        !self.destroyed || self.kind == BrickKind::Regenerating
    }

    /// Whether this brick still blocks the level from completing
    pub fn blocks_clear(&self) -> bool {
        !self.destroyed && self.kind.is_breakable()
    }

    pub fn collides_with(&self, center: Vec2, radius: f32) -> bool {
        self.is_collidable() && circle_rect_intersect(center, radius, &self.bounds())
    }

    pub fn collision_side(&self, point: Vec2) -> Side {
        collision_side(point, &self.bounds())
    }

    /// Center-to-center distance test, inclusive
    pub fn is_in_explosion_radius(&self, center: Vec2, radius: f32) -> bool {
        self.center().distance(center) <= radius
    }

    /// Apply damage. Indestructible and already-destroyed bricks shrug it off.
    pub fn hit(&mut self, damage: u32, sink: &mut impl EventSink) -> HitResult {
        if !self.kind.is_breakable() || self.destroyed {
            return HitResult::SURVIVED;
        }

        self.hit_points = self.hit_points.saturating_sub(damage);
        self.shake_intensity = 3.0;

        if self.hit_points == 0 {
            return self.destroy(sink);
        }

        sink.publish(GameEvent::BrickHit {
            center: self.center(),
            kind: self.kind,
        });
        HitResult::SURVIVED
    }

    fn destroy(&mut self, sink: &mut impl EventSink) -> HitResult {
        self.destroyed = true;
        sink.publish(GameEvent::BrickDestroyed {
            bounds: self.bounds(),
            kind: self.kind,
            color: self.kind.palette()[0],
        });

        let special = match self.kind {
            BrickKind::Explosive => Some(SpecialEffect::Explosion {
                radius: EXPLOSION_RADIUS,
            }),
            BrickKind::Regenerating => {
                self.regenerate_ms = Some(REGENERATE_MS);
                Some(SpecialEffect::Regenerate)
            }
            _ => None,
        };

        HitResult {
            destroyed: true,
            score: self.kind.score(),
            special,
        }
    }

    fn regenerate(&mut self, sink: &mut impl EventSink) {
        self.destroyed = false;
        self.hit_points = self.max_hit_points;
        self.regenerate_ms = None;
        log::debug!("Brick at ({:.0}, {:.0}) regenerated", self.pos.x, self.pos.y);
        sink.publish(GameEvent::BrickRegenerated {
            center: self.center(),
            color: self.kind.glow_color(),
        });
    }

    /// Per-frame animation, movement and regeneration countdown
    pub fn update(&mut self, playfield_width: f32, sink: &mut impl EventSink) {
        self.glow.advance();

        if self.shake_intensity > 0.0 {
            self.shake_seed = self.shake_seed.wrapping_add(2);
            self.shake_offset = Vec2::new(
                hash_jitter(self.shake_seed),
                hash_jitter(self.shake_seed.wrapping_add(1)),
            ) * self.shake_intensity;
            self.shake_intensity *= 0.9;
            if self.shake_intensity < 0.1 {
                self.shake_intensity = 0.0;
                self.shake_offset = Vec2::ZERO;
            }
        }

        if self.kind == BrickKind::Moving && !self.destroyed {
            self.pos.x += MOVING_BRICK_SPEED * self.move_direction;
            if self.pos.x <= 0.0 || self.pos.x + self.size.x >= playfield_width {
                self.move_direction = -self.move_direction;
            }
        }

        if let Some(left) = self.regenerate_ms.as_mut() {
            *left -= FRAME_MS;
            if *left <= 0.0 {
                self.regenerate(sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::NullSink;
    use proptest::prelude::*;

    fn brick(kind: BrickKind) -> Brick {
        Brick::new(Vec2::new(100.0, 100.0), kind)
    }

    #[test]
    fn test_normal_brick_destroyed_in_one_hit() {
        let mut b = brick(BrickKind::Normal);
        let mut events = Vec::new();
        let result = b.hit(1, &mut events);
        assert!(result.destroyed);
        assert_eq!(result.score, 10);
        assert_eq!(result.special, None);
        assert!(b.destroyed);
        assert!(!b.is_collidable());
        assert!(matches!(events[0], GameEvent::BrickDestroyed { .. }));
    }

    #[test]
    fn test_metal_takes_three_hits() {
        let mut b = brick(BrickKind::Metal);
        let mut events = Vec::new();
        assert_eq!(b.color(), BrickKind::Metal.palette()[2]);
        assert!(!b.hit(1, &mut events).destroyed);
        assert_eq!(b.color(), BrickKind::Metal.palette()[1]);
        assert!(!b.hit(1, &mut events).destroyed);
        let result = b.hit(1, &mut events);
        assert!(result.destroyed);
        assert_eq!(result.score, 50);
        assert!(matches!(events[0], GameEvent::BrickHit { .. }));
    }

    #[test]
    fn test_indestructible_ignores_hits() {
        let mut b = brick(BrickKind::Indestructible);
        let mut events = Vec::new();
        for _ in 0..10 {
            assert_eq!(b.hit(5, &mut events), HitResult::SURVIVED);
        }
        assert_eq!(b.hit_points, 1);
        assert!(!b.destroyed);
        assert!(!b.blocks_clear());
        assert!(events.is_empty());
    }

    #[test]
    fn test_explosive_reports_radius() {
        let mut b = brick(BrickKind::Explosive);
        let result = b.hit(1, &mut NullSink);
        assert_eq!(
            result.special,
            Some(SpecialEffect::Explosion {
                radius: EXPLOSION_RADIUS
            })
        );
    }

    #[test]
    fn test_regenerating_cycle() {
        let mut b = brick(BrickKind::Regenerating);
        let result = b.hit(1, &mut NullSink);
        assert_eq!(result.special, Some(SpecialEffect::Regenerate));
        assert!(b.destroyed);
        // Still deflects balls while waiting
        assert!(b.is_collidable());
        assert!(!b.blocks_clear());

        // Hitting the ghost neither scores nor restarts the timer
        assert_eq!(b.hit(1, &mut NullSink), HitResult::SURVIVED);

        let mut events = Vec::new();
        let frames = (REGENERATE_MS / FRAME_MS).ceil() as usize;
        for _ in 0..frames - 1 {
            b.update(1200.0, &mut events);
        }
        assert!(b.destroyed);
        assert!(b.regeneration_progress().unwrap() > 0.99);
        b.update(1200.0, &mut events);
        assert!(!b.destroyed);
        assert_eq!(b.hit_points, b.max_hit_points);
        assert!(b.regeneration_progress().is_none());
        assert!(matches!(events[0], GameEvent::BrickRegenerated { .. }));
    }

    #[test]
    fn test_moving_brick_bounces() {
        let mut b = Brick::new(Vec2::new(1200.0 - 82.0, 100.0), BrickKind::Moving);
        b.update(1200.0, &mut NullSink); // x = 1119
        b.update(1200.0, &mut NullSink); // x = 1120 -> touches edge, turn
        assert!((b.pos.x - 1120.0).abs() < 0.001);
        b.update(1200.0, &mut NullSink);
        assert!((b.pos.x - 1119.0).abs() < 0.001);
    }

    #[test]
    fn test_destroyed_moving_brick_stays_put() {
        let mut b = brick(BrickKind::Moving);
        b.hit(1, &mut NullSink);
        b.update(1200.0, &mut NullSink);
        assert_eq!(b.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_explosion_radius_inclusive() {
        let b = brick(BrickKind::Normal);
        let center = b.center() + Vec2::new(80.0, 0.0);
        assert!(b.is_in_explosion_radius(center, 80.0));
        assert!(!b.is_in_explosion_radius(center, 79.9));
    }

    #[test]
    fn test_shake_decays() {
        let mut b = brick(BrickKind::Reinforced);
        b.hit(1, &mut NullSink);
        for _ in 0..60 {
            b.update(1200.0, &mut NullSink);
        }
        assert_eq!(b.shake_offset, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_hit_points_never_increase(hits in proptest::collection::vec(1u32..4, 1..10)) {
            for kind in [BrickKind::Normal, BrickKind::Reinforced, BrickKind::Metal, BrickKind::Moving] {
                let mut b = brick(kind);
                let mut last = b.hit_points;
                for &damage in &hits {
                    b.hit(damage, &mut NullSink);
                    prop_assert!(b.hit_points <= last);
                    last = b.hit_points;
                }
            }
        }

        #[test]
        fn prop_indestructible_never_destroyed(hits in proptest::collection::vec(1u32..100, 1..20)) {
            let mut b = brick(BrickKind::Indestructible);
            for &damage in &hits {
                let result = b.hit(damage, &mut NullSink);
                prop_assert!(!result.destroyed);
                prop_assert_eq!(result.score, 0);
            }
            prop_assert!(!b.destroyed);
            prop_assert_eq!(b.hit_points, 1);
        }
    }
}
