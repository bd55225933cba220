//! Particle effects
//!
//! Purely cosmetic: the engine reacts to published `GameEvent`s and never
//! feeds anything back into gameplay. It owns its own RNG so particle rolls
//! do not disturb the session's gameplay sequence.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::events::GameEvent;
use super::geometry::Rect;
use crate::consts::{FRAME_MS, MAX_PARTICLES};
use crate::{Rgba, rgb};

const GRAVITY: f32 = 0.1;
const SHRINK: f32 = 0.98;

const SPARK_COLOR: Rgba = rgb(0xff6600);
const EXPLOSION_COLOR: Rgba = rgb(0xffff00);
const PADDLE_HIT_COLOR: Rgba = rgb(0xffffff);
const WALL_BOUNCE_COLOR: Rgba = rgb(0x00cccc);
const FIREWORK_COLORS: [Rgba; 5] = [
    rgb(0x00ffff),
    rgb(0xff6b6b),
    rgb(0xffff00),
    rgb(0xff00ff),
    rgb(0x00ff00),
];
const FIREWORK_BURSTS: u32 = 5;
const FIREWORK_INTERVAL_MS: f32 = 200.0;

/// A single glowing speck
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
    /// Life lost per frame
    pub decay: f32,
    pub alpha: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Rgba, size: f32, life: f32, decay: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            size,
            life,
            max_life: life,
            decay,
            alpha: 1.0,
        }
    }

    /// Step one frame; returns false once the particle has burned out
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += GRAVITY;

        self.life -= self.decay;
        self.alpha = self.life / self.max_life;
        self.size = (self.size * SHRINK).max(0.0);

        self.life > 0.0
    }
}

/// Owner of every live particle
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    particles: VecDeque<Particle>,
    max_particles: usize,
    /// Countdowns (ms) for queued level-complete bursts
    fireworks: Vec<f32>,
    playfield: Vec2,
    rng: Pcg32,
}

impl ParticleEngine {
    pub fn new(seed: u64, playfield: Vec2) -> Self {
        Self {
            particles: VecDeque::new(),
            max_particles: MAX_PARTICLES,
            fireworks: Vec::new(),
            playfield,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Change the cap, dropping the oldest particles if over it
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        while self.particles.len() > max {
            self.particles.pop_front();
        }
    }

    pub fn add(&mut self, particle: Particle) {
        if self.max_particles == 0 {
            return;
        }
        if self.particles.len() >= self.max_particles {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    fn spawn(&mut self, pos: Vec2, vel: Vec2, color: Rgba, size: f32, life: f32) {
        let decay = self.rng.random_range(0.015..0.03);
        self.add(Particle::new(pos, vel, color, size, life, decay));
    }

    /// Radial burst with an even angular spread
    pub fn explosion(&mut self, pos: Vec2, count: u32, color: Rgba, intensity: f32) {
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32 + self.rng.random_range(-0.3..0.3);
            let speed = self.rng.random_range(2.0..6.0) * intensity;
            let size = self.rng.random_range(2.0..5.0);
            let life = self.rng.random_range(0.8..1.2);
            self.spawn(pos, Vec2::from_angle(angle) * speed, color, size, life);
        }
    }

    /// Small upward-biased sparks
    pub fn sparks(&mut self, pos: Vec2, count: u32, color: Rgba) {
        for _ in 0..count {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(1.0..4.0);
            let lift = self.rng.random_range(1.0..3.0);
            let vel = Vec2::from_angle(angle) * speed - Vec2::new(0.0, lift);
            let size = self.rng.random_range(1.0..3.0);
            let life = self.rng.random_range(0.5..1.0);
            self.spawn(pos, vel, color, size, life);
        }
    }

    /// Burst plus an expanding ring of eight
    pub fn power_up_burst(&mut self, pos: Vec2, color: Rgba) {
        self.explosion(pos, 16, color, 1.5);
        for i in 0..8 {
            let dir = Vec2::from_angle(TAU * i as f32 / 8.0);
            self.spawn(pos + dir * 20.0, dir * 2.0, color, 3.0, 1.0);
        }
    }

    /// Center burst, corner flicks and debris scattered over the brick
    pub fn brick_destruction(&mut self, bounds: &Rect, color: Rgba) {
        self.explosion(bounds.center(), 15, color, 1.2);

        let corners = [
            Vec2::new(bounds.x, bounds.y),
            Vec2::new(bounds.right(), bounds.y),
            Vec2::new(bounds.x, bounds.bottom()),
            Vec2::new(bounds.right(), bounds.bottom()),
        ];
        for corner in corners {
            for _ in 0..3 {
                let vel = Vec2::new(
                    self.rng.random_range(-3.0..3.0),
                    self.rng.random_range(-4.0..-1.0),
                );
                let size = self.rng.random_range(2.0..4.0);
                let life = self.rng.random_range(0.8..1.2);
                self.spawn(corner, vel, color, size, life);
            }
        }

        for _ in 0..8 {
            let pos = Vec2::new(
                bounds.x + self.rng.random_range(0.0..bounds.width),
                bounds.y + self.rng.random_range(0.0..bounds.height),
            );
            let vel = Vec2::new(
                self.rng.random_range(-2.0..2.0),
                self.rng.random_range(-3.0..1.0),
            );
            let size = self.rng.random_range(1.0..3.0);
            let life = self.rng.random_range(1.0..1.5);
            self.spawn(pos, vel, color, size, life);
        }
    }

    /// White flecks thrown along the rebound direction
    pub fn paddle_hit(&mut self, pos: Vec2, ball_vel: Vec2) {
        let heading = (-ball_vel.y).atan2(ball_vel.x);
        for _ in 0..6 {
            let angle = heading + self.rng.random_range(-0.5..0.5);
            let speed = self.rng.random_range(1.0..3.0);
            let size = self.rng.random_range(2.0..4.0);
            let life = self.rng.random_range(0.4..0.8);
            self.spawn(pos, Vec2::from_angle(angle) * speed, PADDLE_HIT_COLOR, size, life);
        }
    }

    /// Puff pushed away from the wall along its inward normal
    pub fn wall_bounce(&mut self, pos: Vec2, normal: Vec2) {
        for _ in 0..4 {
            let vel = Vec2::new(
                normal.x * self.rng.random_range(1.0..3.0) + self.rng.random_range(-1.0..1.0),
                normal.y * self.rng.random_range(1.0..3.0) + self.rng.random_range(-1.0..1.0),
            );
            let size = self.rng.random_range(1.0..3.0);
            let life = self.rng.random_range(0.3..0.6);
            self.spawn(pos, vel, WALL_BOUNCE_COLOR, size, life);
        }
    }

    /// Queue the staggered level-complete fireworks
    pub fn level_complete(&mut self) {
        for i in 0..FIREWORK_BURSTS {
            self.fireworks.push(i as f32 * FIREWORK_INTERVAL_MS);
        }
    }

    fn firework(&mut self) {
        let pos = Vec2::new(
            self.rng
                .random_range(self.playfield.x * 0.2..self.playfield.x * 0.8),
            self.rng
                .random_range(self.playfield.y * 0.2..self.playfield.y * 0.6),
        );
        let color = FIREWORK_COLORS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(FIREWORK_COLORS[0]);
        self.explosion(pos, 20, color, 2.0);
    }

    /// Spawn the particles a gameplay event calls for
    pub fn react(&mut self, event: &GameEvent) {
        match event {
            GameEvent::WallBounce { pos, normal } => self.wall_bounce(*pos, *normal),
            GameEvent::PaddleHit { pos, vel } => self.paddle_hit(*pos, *vel),
            GameEvent::BrickDestroyed { bounds, color, .. } => {
                self.brick_destruction(bounds, *color)
            }
            GameEvent::BrickRegenerated { center, color } => self.power_up_burst(*center, *color),
            GameEvent::Explosion { center, .. } => {
                self.explosion(*center, 20, EXPLOSION_COLOR, 2.0)
            }
            GameEvent::LaserHit { pos } => self.sparks(*pos, 6, SPARK_COLOR),
            GameEvent::PowerUpCollected { kind, pos } => self.power_up_burst(*pos, kind.color()),
            GameEvent::LevelComplete { .. } => self.level_complete(),
            GameEvent::BrickHit { .. }
            | GameEvent::LaserFired { .. }
            | GameEvent::BallLaunched { .. }
            | GameEvent::LifeLost { .. }
            | GameEvent::ScreenShake { .. }
            | GameEvent::GameOver { .. } => {}
        }
    }

    /// Step every particle and fire any due fireworks
    pub fn update(&mut self) {
        self.particles.retain_mut(|particle| particle.update());

        let mut due = 0;
        self.fireworks.retain_mut(|delay| {
            if *delay <= 0.0 {
                due += 1;
                false
            } else {
                *delay -= FRAME_MS;
                true
            }
        });
        for _ in 0..due {
            self.firework();
        }
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every particle and pending firework
    pub fn clear(&mut self) {
        self.particles.clear();
        self.fireworks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::powerup::PowerUpKind;

    fn engine() -> ParticleEngine {
        ParticleEngine::new(42, Vec2::new(1200.0, 900.0))
    }

    #[test]
    fn test_particle_physics() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), [1.0; 4], 4.0, 1.0, 0.02);
        assert!(p.update());
        assert!((p.pos.x - 1.0).abs() < 0.001);
        assert!((p.vel.y - GRAVITY).abs() < 0.001);
        assert!((p.size - 3.92).abs() < 0.001);
        assert!((p.alpha - 0.98).abs() < 0.001);
    }

    #[test]
    fn test_particle_burns_out() {
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, [1.0; 4], 2.0, 0.05, 0.03);
        assert!(p.update());
        assert!(!p.update());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut engine = engine();
        engine.set_max_particles(10);
        engine.explosion(Vec2::ZERO, 8, [1.0; 4], 1.0);
        engine.explosion(Vec2::new(500.0, 500.0), 8, [1.0; 4], 1.0);
        assert_eq!(engine.len(), 10);
        // The survivors from the first burst are the two youngest of it
        let from_first = engine.particles().filter(|p| p.pos == Vec2::ZERO).count();
        assert_eq!(from_first, 2);
    }

    #[test]
    fn test_zero_cap_disables() {
        let mut engine = engine();
        engine.set_max_particles(0);
        engine.power_up_burst(Vec2::ZERO, [1.0; 4]);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_brick_destruction_count() {
        let mut engine = engine();
        engine.brick_destruction(&Rect::new(0.0, 0.0, 80.0, 30.0), [1.0; 4]);
        // 15 burst + 4 corners x 3 + 8 debris
        assert_eq!(engine.len(), 35);
    }

    #[test]
    fn test_react_maps_events() {
        let mut engine = engine();
        engine.react(&GameEvent::PaddleHit {
            pos: Vec2::new(600.0, 840.0),
            vel: Vec2::new(2.0, -4.0),
        });
        assert_eq!(engine.len(), 6);
        engine.react(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::Laser,
            pos: Vec2::ZERO,
        });
        assert_eq!(engine.len(), 6 + 24);
        engine.react(&GameEvent::LifeLost { lives_left: 2 });
        assert_eq!(engine.len(), 30);
    }

    #[test]
    fn test_fireworks_are_staggered() {
        let mut engine = engine();
        engine.level_complete();
        engine.update();
        assert_eq!(engine.len(), 20);
        // Next burst is 200ms out: 13 frames of 16ms
        for _ in 0..12 {
            engine.update();
        }
        assert!(engine.len() <= 20);
        for _ in 0..2 {
            engine.update();
        }
        assert!(engine.len() > 20);
    }
}
