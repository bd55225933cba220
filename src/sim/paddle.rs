//! Player paddle and its laser cannon

use glam::Vec2;

use super::brick::Brick;
use super::effects::{ActiveEffects, Effect};
use super::events::{EventSink, GameEvent};
use super::geometry::Rect;
use super::pulse::Pulse;
use crate::consts::*;
use crate::{Rgba, rgb};

/// Laser bolt travelling up from the paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Laser {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Laser {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(LASER_WIDTH, LASER_HEIGHT),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Point the bolt strikes with
    pub fn tip(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }
}

/// Paddle tint, chosen by the most visible active effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleTint {
    Normal,
    Laser,
    Sticky,
    Enlarged,
    Shrunk,
}

impl PaddleTint {
    pub fn color(&self) -> Rgba {
        match self {
            PaddleTint::Normal => rgb(0x00ffff),
            PaddleTint::Laser => rgb(0xff6600),
            PaddleTint::Sticky => rgb(0x8a2be2),
            PaddleTint::Enlarged => rgb(0x00ff00),
            PaddleTint::Shrunk => rgb(0xff4444),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub default_width: f32,
    /// Current width (default times the size multiplier)
    pub width: f32,
    pub height: f32,
    /// Keyboard speed, pixels per frame
    pub speed: f32,
    pub size_multiplier: f32,
    pub has_laser: bool,
    pub is_sticky: bool,
    pub lasers: Vec<Laser>,
    /// Frames until the next shot
    pub laser_cooldown: u32,
    pub tint: PaddleTint,
    pub glow: Pulse,
}

impl Paddle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            default_width: PADDLE_WIDTH,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            size_multiplier: 1.0,
            has_laser: false,
            is_sticky: false,
            lasers: Vec::new(),
            laser_cooldown: 0,
            tint: PaddleTint::Normal,
            glow: Pulse::new(0.03),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Refresh abilities from the active effects, advance lasers and keep the
    /// paddle on the playfield
    pub fn update(&mut self, playfield_width: f32, effects: &ActiveEffects) {
        self.glow.advance();
        self.apply_effects(effects);
        self.update_lasers();
        self.clamp_to(playfield_width);
    }

    fn apply_effects(&mut self, effects: &ActiveEffects) {
        self.size_multiplier = 1.0;
        self.has_laser = false;
        self.is_sticky = false;

        for active in effects.iter() {
            match active.effect {
                Effect::PaddleSize(multiplier) => self.size_multiplier = multiplier,
                Effect::Laser => self.has_laser = true,
                Effect::StickyPaddle => self.is_sticky = true,
                Effect::BallSpeed(_) | Effect::ScoreMultiplier(_) | Effect::Penetrating => {}
            }
        }
        self.width = self.default_width * self.size_multiplier;

        self.tint = if self.has_laser {
            PaddleTint::Laser
        } else if self.is_sticky {
            PaddleTint::Sticky
        } else if self.size_multiplier > 1.0 {
            PaddleTint::Enlarged
        } else if self.size_multiplier < 1.0 {
            PaddleTint::Shrunk
        } else {
            PaddleTint::Normal
        };
    }

    fn update_lasers(&mut self) {
        self.laser_cooldown = self.laser_cooldown.saturating_sub(1);
        for laser in &mut self.lasers {
            laser.pos.y -= LASER_SPEED;
        }
        self.lasers.retain(|laser| laser.pos.y > -laser.size.y);
    }

    fn clamp_to(&mut self, playfield_width: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (playfield_width - self.width).max(0.0));
    }

    /// Keyboard movement; `direction` is -1, 0 or 1
    pub fn move_by(&mut self, direction: f32, playfield_width: f32) {
        self.pos.x += self.speed * direction;
        self.clamp_to(playfield_width);
    }

    /// Pointer movement: center the paddle on `x`
    pub fn set_position(&mut self, x: f32, playfield_width: f32) {
        self.pos.x = x - self.width / 2.0;
        self.clamp_to(playfield_width);
    }

    /// Fire a laser pair if the cannon is armed and cooled down
    pub fn fire_laser(&mut self, sink: &mut impl EventSink) -> bool {
        if !self.has_laser || self.laser_cooldown > 0 {
            return false;
        }

        let left = Laser::new(Vec2::new(self.pos.x + LASER_INSET, self.pos.y));
        let right = Laser::new(Vec2::new(
            self.pos.x + self.width - LASER_INSET - LASER_WIDTH,
            self.pos.y,
        ));
        self.lasers.push(left);
        self.lasers.push(right);
        self.laser_cooldown = LASER_COOLDOWN_FRAMES;

        sink.publish(GameEvent::LaserFired {
            left: left.tip(),
            right: right.tip(),
        });
        true
    }

    /// Test each laser against the intact bricks in order. A laser stops at
    /// the first brick it overlaps. Returns the indices of struck bricks for
    /// the session to damage (a brick hit by two bolts appears twice).
    pub fn check_laser_collisions(&mut self, bricks: &[Brick], sink: &mut impl EventSink) -> Vec<usize> {
        let mut hits = Vec::new();

        self.lasers.retain(|laser| {
            let bounds = laser.bounds();
            let struck = bricks
                .iter()
                .position(|brick| !brick.destroyed && bounds.intersects(&brick.bounds()));
            match struck {
                Some(index) => {
                    hits.push(index);
                    sink.publish(GameEvent::LaserHit { pos: laser.tip() });
                    false
                }
                None => true,
            }
        });

        hits
    }

    /// Return to a starting spot and drop any bolts in flight
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.width = self.default_width;
        self.size_multiplier = 1.0;
        self.lasers.clear();
        self.laser_cooldown = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick::BrickKind;
    use crate::sim::events::NullSink;

    fn armed_effects() -> ActiveEffects {
        let mut effects = ActiveEffects::new();
        effects.activate(Effect::Laser, 15000.0, "Laser Paddle");
        effects
    }

    #[test]
    fn test_size_effect_changes_width() {
        let mut paddle = Paddle::new(Vec2::new(500.0, 840.0));
        let mut effects = ActiveEffects::new();
        effects.activate(Effect::PaddleSize(1.5), 10000.0, "Enlarge Paddle");
        paddle.update(1200.0, &effects);
        assert!((paddle.width - 225.0).abs() < 0.001);
        assert_eq!(paddle.tint, PaddleTint::Enlarged);

        effects.clear();
        paddle.update(1200.0, &effects);
        assert!((paddle.width - 150.0).abs() < 0.001);
        assert_eq!(paddle.tint, PaddleTint::Normal);
    }

    #[test]
    fn test_laser_tint_wins() {
        let mut paddle = Paddle::new(Vec2::new(500.0, 840.0));
        let mut effects = armed_effects();
        effects.activate(Effect::StickyPaddle, 15000.0, "Sticky Paddle");
        effects.activate(Effect::PaddleSize(0.7), 8000.0, "Shrink Paddle");
        paddle.update(1200.0, &effects);
        assert_eq!(paddle.tint, PaddleTint::Laser);
        assert!(paddle.is_sticky);
    }

    #[test]
    fn test_clamped_to_playfield() {
        let mut paddle = Paddle::new(Vec2::new(500.0, 840.0));
        paddle.move_by(-1.0, 1200.0);
        assert_eq!(paddle.pos.x, 492.0);
        paddle.set_position(5.0, 1200.0);
        assert_eq!(paddle.pos.x, 0.0);
        paddle.set_position(1190.0, 1200.0);
        assert_eq!(paddle.pos.x, 1050.0);

        // Growing at the right edge pulls the paddle back in
        let mut effects = ActiveEffects::new();
        effects.activate(Effect::PaddleSize(1.5), 10000.0, "Enlarge Paddle");
        paddle.update(1200.0, &effects);
        assert_eq!(paddle.pos.x, 975.0);
    }

    #[test]
    fn test_fire_requires_laser_and_cooldown() {
        let mut paddle = Paddle::new(Vec2::new(500.0, 840.0));
        assert!(!paddle.fire_laser(&mut NullSink));

        paddle.update(1200.0, &armed_effects());
        let mut events = Vec::new();
        assert!(paddle.fire_laser(&mut events));
        assert_eq!(paddle.lasers.len(), 2);
        assert_eq!(paddle.lasers[0].pos.x, 510.0);
        assert_eq!(paddle.lasers[1].pos.x, 500.0 + 150.0 - 14.0);
        assert!(matches!(events[0], GameEvent::LaserFired { .. }));

        assert!(!paddle.fire_laser(&mut NullSink));
        for _ in 0..LASER_COOLDOWN_FRAMES {
            paddle.update(1200.0, &armed_effects());
        }
        assert!(paddle.fire_laser(&mut NullSink));
    }

    #[test]
    fn test_lasers_leave_the_top() {
        let mut paddle = Paddle::new(Vec2::new(500.0, 100.0));
        paddle.update(1200.0, &armed_effects());
        paddle.fire_laser(&mut NullSink);
        // 100 -> -10 after 11 frames, -20 after 12 (removed at y <= -15)
        for _ in 0..11 {
            paddle.update(1200.0, &armed_effects());
        }
        assert_eq!(paddle.lasers.len(), 2);
        paddle.update(1200.0, &armed_effects());
        assert!(paddle.lasers.is_empty());
    }

    #[test]
    fn test_laser_stops_at_first_intact_brick() {
        let mut paddle = Paddle::new(Vec2::new(500.0, 840.0));
        paddle.lasers.push(Laser::new(Vec2::new(520.0, 110.0)));

        let mut destroyed = Brick::new(Vec2::new(500.0, 100.0), BrickKind::Normal);
        destroyed.destroyed = true;
        let bricks = vec![
            destroyed,
            Brick::new(Vec2::new(500.0, 115.0), BrickKind::Metal),
            Brick::new(Vec2::new(500.0, 120.0), BrickKind::Normal),
        ];

        let mut events = Vec::new();
        let hits = paddle.check_laser_collisions(&bricks, &mut events);
        assert_eq!(hits, vec![1]);
        assert!(paddle.lasers.is_empty());
        assert!(matches!(events[0], GameEvent::LaserHit { .. }));
    }

    #[test]
    fn test_reset() {
        let mut paddle = Paddle::new(Vec2::new(10.0, 10.0));
        paddle.lasers.push(Laser::new(Vec2::ZERO));
        paddle.reset(Vec2::new(550.0, 860.0));
        assert_eq!(paddle.pos, Vec2::new(550.0, 860.0));
        assert!(paddle.lasers.is_empty());
    }
}
