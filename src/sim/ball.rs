//! Ball physics and collision response
//!
//! Velocities are in pixels per frame. The active ball-speed multiplier
//! scales only the position step, so the stored velocity never drifts when
//! speed effects come and go.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::brick::{Brick, HitResult};
use super::effects::{ActiveEffects, EffectKind};
use super::events::{EventSink, GameEvent};
use super::geometry::{Side, circle_rect_intersect};
use super::paddle::Paddle;
use super::pulse::Pulse;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Launch speed
    pub speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    pub glow: Pulse,
    pub launched: bool,
    /// Riding on the paddle
    pub stuck: bool,
    /// Horizontal offset from the paddle center while stuck
    pub stuck_offset: f32,
    pub penetrating: bool,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            speed: BALL_SPEED,
            min_speed: BALL_MIN_SPEED,
            max_speed: BALL_MAX_SPEED,
            trail: VecDeque::with_capacity(BALL_TRAIL_LENGTH + 1),
            glow: Pulse::new(0.05),
            launched: false,
            stuck: false,
            stuck_offset: 0.0,
            penetrating: false,
        }
    }

    /// Set velocity from a heading (radians, y down) and a speed, falling
    /// back to the ball's launch speed
    pub fn launch(&mut self, angle: f32, speed: Option<f32>) {
        self.launched = true;
        self.stuck = false;
        let speed = speed.filter(|s| *s > 0.0).unwrap_or(self.speed);
        self.vel = Vec2::from_angle(angle) * speed;
    }

    /// Integrate one frame and bounce off the side and top walls. The bottom
    /// is open; falling through it is handled by the session.
    pub fn update(&mut self, playfield: Vec2, effects: &ActiveEffects, sink: &mut impl EventSink) {
        if !self.launched || self.stuck {
            return;
        }

        self.penetrating = effects.has_effect(EffectKind::Penetrating);
        self.pos += self.vel * effects.ball_speed();

        self.trail.push_back(self.pos);
        while self.trail.len() > BALL_TRAIL_LENGTH {
            self.trail.pop_front();
        }

        self.glow.advance();
        self.handle_wall_collisions(playfield, sink);
        self.limit_speed();
    }

    fn handle_wall_collisions(&mut self, playfield: Vec2, sink: &mut impl EventSink) {
        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
            sink.publish(GameEvent::WallBounce {
                pos: self.pos,
                normal: Vec2::X,
            });
        }
        if self.pos.x + self.radius >= playfield.x {
            self.pos.x = playfield.x - self.radius;
            self.vel.x = -self.vel.x.abs();
            sink.publish(GameEvent::WallBounce {
                pos: self.pos,
                normal: Vec2::NEG_X,
            });
        }
        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.vel.y = self.vel.y.abs();
            sink.publish(GameEvent::WallBounce {
                pos: self.pos,
                normal: Vec2::Y,
            });
        }
    }

    /// Clamp speed into `[min_speed, max_speed]`, then floor the vertical
    /// component so the ball can never travel purely sideways. The floor runs
    /// every frame, not just after collisions.
    pub fn limit_speed(&mut self) {
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        } else if speed < self.min_speed && speed > 0.0 {
            self.vel *= self.min_speed / speed;
        }

        if self.vel.y.abs() < BALL_MIN_VERTICAL_SPEED {
            self.vel.y = if self.vel.y > 0.0 {
                BALL_MIN_VERTICAL_SPEED
            } else {
                -BALL_MIN_VERTICAL_SPEED
            };
        }
    }

    /// Bounce off (or stick to) the paddle. Only a descending ball can hit it.
    pub fn handle_paddle_collision(
        &mut self,
        paddle: &Paddle,
        effects: &ActiveEffects,
        sink: &mut impl EventSink,
    ) -> bool {
        if !circle_rect_intersect(self.pos, self.radius, &paddle.bounds()) || self.vel.y <= 0.0 {
            return false;
        }

        if effects.has_effect(EffectKind::StickyPaddle) && !self.stuck {
            self.stick_to_paddle(paddle);
            sink.publish(GameEvent::PaddleHit {
                pos: self.pos,
                vel: Vec2::ZERO,
            });
            return true;
        }

        // Impact point across the paddle maps to +-60 degrees from vertical
        let relative = ((self.pos.x - paddle.center_x()) / (paddle.width / 2.0)).clamp(-1.0, 1.0);
        let angle = relative * PADDLE_BOUNCE_ANGLE;
        let speed = self.vel.length();

        self.vel = Vec2::new(angle.sin() * speed, -(angle.cos() * speed).abs());
        self.pos.y = paddle.pos.y - self.radius;

        sink.publish(GameEvent::PaddleHit {
            pos: self.pos,
            vel: self.vel,
        });
        true
    }

    pub fn stick_to_paddle(&mut self, paddle: &Paddle) {
        self.stuck = true;
        self.launched = false;
        self.stuck_offset = self.pos.x - paddle.center_x();
        self.pos.y = paddle.pos.y - self.radius;
        self.vel = Vec2::ZERO;
    }

    /// Follow the paddle while stuck, staying within its width
    pub fn update_stuck_position(&mut self, paddle: &Paddle) {
        if !self.stuck {
            return;
        }
        let min_x = paddle.pos.x + self.radius;
        let max_x = paddle.pos.x + paddle.width - self.radius;
        let x = paddle.center_x() + self.stuck_offset;
        self.pos.x = if min_x <= max_x { x.clamp(min_x, max_x) } else { paddle.center_x() };
        self.pos.y = paddle.pos.y - self.radius;
    }

    /// Resolve contact with a brick. Reflects and pushes the ball flush with
    /// the struck face unless penetrating; the brick is hit either way.
    pub fn handle_brick_collision(
        &mut self,
        brick: &mut Brick,
        sink: &mut impl EventSink,
    ) -> Option<HitResult> {
        if !brick.collides_with(self.pos, self.radius) {
            return None;
        }

        if !self.penetrating {
            let side = brick.collision_side(self.pos);
            match side {
                Side::Left | Side::Right => self.vel.x = -self.vel.x,
                Side::Top | Side::Bottom => self.vel.y = -self.vel.y,
            }
            self.move_out_of_brick(brick, side);
        }

        Some(brick.hit(1, sink))
    }

    fn move_out_of_brick(&mut self, brick: &Brick, side: Side) {
        let bounds = brick.bounds();
        match side {
            Side::Left => self.pos.x = bounds.x - self.radius,
            Side::Right => self.pos.x = bounds.right() + self.radius,
            Side::Top => self.pos.y = bounds.y - self.radius,
            Side::Bottom => self.pos.y = bounds.bottom() + self.radius,
        }
    }

    /// Whether the ball has dropped past the paddle line
    pub fn is_below_paddle(&self, paddle_y: f32) -> bool {
        self.pos.y - self.radius > paddle_y
    }

    /// Independent copy with the same speed and a heading nudged by up to
    /// `CLONE_SPREAD` radians either way. Copies of a stuck ball ride the
    /// paddle too.
    pub fn spawn_clone(&self, rng: &mut impl Rng) -> Ball {
        let mut clone = Ball::new(self.pos, self.radius);
        clone.speed = self.speed;
        clone.min_speed = self.min_speed;
        clone.max_speed = self.max_speed;

        if self.stuck {
            clone.stuck = true;
            clone.stuck_offset = self.stuck_offset + rng.random_range(-1.0..1.0) * self.radius;
            return clone;
        }

        let heading = self.vel.y.atan2(self.vel.x) + rng.random_range(-CLONE_SPREAD..CLONE_SPREAD);
        clone.vel = Vec2::from_angle(heading) * self.vel.length();
        clone.launched = self.launched;
        clone
    }
}
