//! Scene assembly
//!
//! Each entity knows how to paint itself into a triangle list. Painting is
//! stateless: it only reads the entity and the frame's `SceneOptions`.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{LASER_INSET, LASER_WIDTH};
use crate::settings::Settings;
use crate::sim::{Ball, Brick, BrickKind, GamePhase, GameState, Laser, Paddle, Particle, PowerUp, Rect};
use crate::{Rgba, hash_jitter, with_alpha};

const CIRCLE_SEGMENTS: u32 = 20;
const PARTICLE_SEGMENTS: u32 = 8;

/// Per-frame drawing switches, derived from settings and host effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub trails: bool,
    /// Fraction of each trail to draw
    pub trail_quality: f32,
    pub glow: bool,
    pub max_particles: usize,
    /// Whole-scene offset from screen shake
    pub shake: Vec2,
}

impl SceneOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            trails: settings.trails,
            trail_quality: settings.quality.trail_quality(),
            glow: settings.quality.glow_enabled(),
            max_particles: settings.max_particles(),
            shake: Vec2::ZERO,
        }
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Something that can draw itself
pub trait Paint {
    fn paint(&self, out: &mut Vec<Vertex>, options: &SceneOptions);
}

/// Move a color toward white (positive) or black (negative)
fn shade(color: Rgba, amount: f32) -> Rgba {
    let target = if amount >= 0.0 { 1.0 } else { 0.0 };
    let t = amount.abs().min(1.0);
    [
        color[0] + (target - color[0]) * t,
        color[1] + (target - color[1]) * t,
        color[2] + (target - color[2]) * t,
        color[3],
    ]
}

impl Paint for Brick {
    fn paint(&self, out: &mut Vec<Vertex>, options: &SceneOptions) {
        // Waiting regenerating bricks fade back in
        let alpha = match (self.destroyed, self.regeneration_progress()) {
            (false, _) => 1.0,
            (true, Some(progress)) if self.kind == BrickKind::Regenerating => progress * 0.7,
            (true, _) => return,
        };

        let bounds = Rect::from_pos_size(self.pos + self.shake_offset, self.size);
        let color = with_alpha(self.color(), alpha);

        if options.glow && self.kind != BrickKind::Normal {
            let glow = with_alpha(self.kind.glow_color(), alpha);
            shapes::glow_rect(out, &bounds, 3.0 + self.glow.intensity * 8.0, glow);
        }

        shapes::gradient_rect(out, &bounds, shade(color, 0.15), shade(color, -0.3));
        shapes::rect_outline(out, &bounds, 2.0, shade(color, 0.4));

        if self.destroyed {
            return;
        }

        // Cracks, more of them the more damage taken
        if self.hit_points < self.max_hit_points {
            let damage = 1.0 - self.hit_points as f32 / self.max_hit_points as f32;
            let cracks = (damage * 4.0) as u32 + 1;
            let seed = (self.pos.x as u32).wrapping_mul(31) ^ (self.pos.y as u32);
            for i in 0..cracks {
                let s = seed.wrapping_add(i * 7);
                let start = bounds.center()
                    + Vec2::new(
                        hash_jitter(s) * (bounds.width / 2.0 - 5.0),
                        hash_jitter(s + 1) * (bounds.height / 2.0 - 2.0),
                    );
                let end = start + Vec2::new(hash_jitter(s + 2) * 15.0, hash_jitter(s + 3) * 8.0);
                shapes::line(out, start, end, 1.0, colors::CRACK);
            }
        }

        // Remaining hits as pips along the bottom edge
        if self.max_hit_points > 1 {
            let pip = 4.0;
            let gap = 3.0;
            let total = self.hit_points as f32 * (pip + gap) - gap;
            let mut x = bounds.center().x - total / 2.0;
            for _ in 0..self.hit_points {
                shapes::rect(out, &Rect::new(x, bounds.bottom() - 8.0, pip, pip), colors::HIT_PIP);
                x += pip + gap;
            }
        }

        let center = bounds.center();
        match self.kind {
            BrickKind::Explosive => {
                shapes::circle(out, center, 6.0, shade(color, -0.6), CIRCLE_SEGMENTS)
            }
            BrickKind::Regenerating => {
                shapes::ring(out, center, 4.0, 7.0, shade(color, 0.6), CIRCLE_SEGMENTS)
            }
            BrickKind::Moving => {
                let arm = Vec2::new(10.0, 0.0);
                shapes::line(out, center - arm, center + arm, 2.0, shade(color, 0.6));
            }
            BrickKind::Indestructible => {
                let a = Vec2::new(8.0, 8.0);
                let b = Vec2::new(8.0, -8.0);
                let cross = shade(color, 0.4);
                shapes::line(out, center - a, center + a, 2.0, cross);
                shapes::line(out, center - b, center + b, 2.0, cross);
            }
            BrickKind::Normal | BrickKind::Reinforced | BrickKind::Metal => {}
        }
    }
}

impl Paint for Paddle {
    fn paint(&self, out: &mut Vec<Vertex>, options: &SceneOptions) {
        let bounds = self.bounds();
        let tint = self.tint.color();

        if options.glow {
            shapes::glow_rect(out, &bounds, 4.0 + self.glow.intensity * 8.0, tint);
        }
        shapes::gradient_rect(out, &bounds, shade(tint, 0.3), shade(tint, -0.4));
        shapes::rect_outline(out, &bounds, 2.0, shade(tint, 0.5));

        // Laser emitters on top of each end
        if self.has_laser {
            for x in [
                bounds.x + LASER_INSET,
                bounds.right() - LASER_INSET - LASER_WIDTH,
            ] {
                shapes::rect(
                    out,
                    &Rect::new(x - 1.0, bounds.y - 5.0, LASER_WIDTH + 2.0, 5.0),
                    colors::LASER,
                );
            }
        }

        for laser in &self.lasers {
            laser.paint(out, options);
        }
    }
}

impl Paint for Laser {
    fn paint(&self, out: &mut Vec<Vertex>, options: &SceneOptions) {
        let bounds = self.bounds();
        if options.glow {
            shapes::glow_rect(out, &bounds, 4.0, colors::LASER);
        }
        shapes::rect(out, &bounds, colors::LASER);
        let core = Rect::new(bounds.x + 1.0, bounds.y, (bounds.width - 2.0).max(1.0), bounds.height);
        shapes::rect(out, &core, colors::LASER_CORE);
    }
}

impl Paint for Ball {
    fn paint(&self, out: &mut Vec<Vertex>, options: &SceneOptions) {
        let glow_color = if self.penetrating {
            colors::PENETRATING_GLOW
        } else {
            colors::BALL_GLOW
        };

        if options.trails && !self.trail.is_empty() {
            let keep = ((self.trail.len() as f32 * options.trail_quality).ceil() as usize)
                .min(self.trail.len());
            let points: Vec<Vec2> = self.trail.iter().skip(self.trail.len() - keep).copied().collect();
            shapes::trail(out, &points, self.radius, glow_color);
        }

        if options.glow {
            let halo = self.radius * (1.5 + self.glow.intensity * 0.8);
            shapes::radial_circle(
                out,
                self.pos,
                halo,
                with_alpha(glow_color, 0.45),
                with_alpha(glow_color, 0.0),
                CIRCLE_SEGMENTS,
            );
        }

        shapes::radial_circle(
            out,
            self.pos,
            self.radius,
            colors::BALL,
            shade(glow_color, -0.3),
            CIRCLE_SEGMENTS,
        );
        shapes::circle(
            out,
            self.pos - Vec2::splat(self.radius * 0.4),
            self.radius * 0.3,
            with_alpha(colors::BALL, 0.6),
            PARTICLE_SEGMENTS,
        );

        if self.penetrating {
            shapes::ring(
                out,
                self.pos,
                self.radius + 2.0,
                self.radius + 3.5,
                with_alpha(colors::PENETRATING_GLOW, 0.4 + self.glow.intensity * 0.6),
                CIRCLE_SEGMENTS,
            );
        }
    }
}

impl Paint for PowerUp {
    fn paint(&self, out: &mut Vec<Vertex>, options: &SceneOptions) {
        let bounds = self.bounds();
        let color = self.kind.color();

        if options.glow {
            shapes::glow_rect(out, &bounds, 3.0 + self.glow.intensity * 6.0, color);
        }
        shapes::gradient_rect(out, &bounds, shade(color, 0.3), shade(color, -0.3));
        shapes::rect_outline(out, &bounds, 1.5, with_alpha(colors::BALL, 0.8));
        // Center stripe pulses with the glow
        let stripe = Rect::new(bounds.x + 4.0, bounds.center().y - 1.0, bounds.width - 8.0, 2.0);
        shapes::rect(out, &stripe, with_alpha(colors::BALL, 0.4 + self.glow.intensity * 0.6));
    }
}

impl Paint for Particle {
    fn paint(&self, out: &mut Vec<Vertex>, _options: &SceneOptions) {
        if self.size <= 0.0 || self.alpha <= 0.0 {
            return;
        }
        let color = with_alpha(self.color, self.color[3] * self.alpha);
        shapes::circle(out, self.pos, self.size, color, PARTICLE_SEGMENTS);
    }
}

/// Faint background grid
fn grid(out: &mut Vec<Vertex>, playfield: Vec2) {
    const SPACING: f32 = 50.0;
    let mut x = SPACING;
    while x < playfield.x {
        shapes::rect(out, &Rect::new(x, 0.0, 1.0, playfield.y), colors::GRID);
        x += SPACING;
    }
    let mut y = SPACING;
    while y < playfield.y {
        shapes::rect(out, &Rect::new(0.0, y, playfield.x, 1.0), colors::GRID);
        y += SPACING;
    }
}

/// Triangle list for the whole frame, in playfield pixels. Entities are
/// drawn only while a level is on screen; particles always are.
pub fn build_scene(state: &GameState, options: &SceneOptions) -> Vec<Vertex> {
    let mut out = Vec::new();
    grid(&mut out, state.playfield);

    if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        for brick in &state.bricks {
            brick.paint(&mut out, options);
        }
        state.paddle.paint(&mut out, options);
        for ball in &state.balls {
            ball.paint(&mut out, options);
        }
        for power_up in &state.power_ups.falling {
            power_up.paint(&mut out, options);
        }
    }

    let skip = state.particles.len().saturating_sub(options.max_particles);
    for particle in state.particles.particles().skip(skip) {
        particle.paint(&mut out, options);
    }

    if options.shake != Vec2::ZERO {
        for vertex in &mut out {
            vertex.position[0] += options.shake.x;
            vertex.position[1] += options.shake.y;
        }
    }
    out
}

/// Screen shake requested by gameplay events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    remaining_ms: f32,
    frame: u32,
}

impl ScreenShake {
    /// Peak offset in pixels
    const AMPLITUDE: f32 = 6.0;

    /// Start a shake, keeping whichever of the current and new one lasts
    /// longer
    pub fn trigger(&mut self, duration_ms: u32) {
        self.remaining_ms = self.remaining_ms.max(duration_ms as f32);
    }

    pub fn update(&mut self, elapsed_ms: f32) {
        self.remaining_ms = (self.remaining_ms - elapsed_ms).max(0.0);
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    /// Current offset; zero once the shake has run out
    pub fn offset(&self) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        let seed = self.frame.wrapping_mul(2);
        Vec2::new(hash_jitter(seed), hash_jitter(seed + 1)) * Self::AMPLITUDE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MenuCommand, TickInput, tick};

    fn playing_state() -> GameState {
        let mut state = GameState::new(5);
        tick(
            &mut state,
            &TickInput {
                command: Some(MenuCommand::Start),
                ..Default::default()
            },
        );
        state
    }

    #[test]
    fn test_title_screen_draws_only_grid() {
        let state = GameState::new(5);
        let menu = build_scene(&state, &SceneOptions::default());
        let playing = build_scene(&playing_state(), &SceneOptions::default());
        assert!(!menu.is_empty());
        assert!(playing.len() > menu.len());
    }

    #[test]
    fn test_destroyed_brick_paints_nothing() {
        let mut brick = Brick::new(Vec2::new(100.0, 100.0), BrickKind::Normal);
        let mut out = Vec::new();
        brick.paint(&mut out, &SceneOptions::default());
        assert!(!out.is_empty());

        brick.destroyed = true;
        out.clear();
        brick.paint(&mut out, &SceneOptions::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_particle_cap_limits_drawing() {
        let mut state = GameState::new(5);
        state.particles.explosion(Vec2::new(600.0, 450.0), 40, [1.0; 4], 1.0);
        let full = build_scene(&state, &SceneOptions::default()).len();

        let options = SceneOptions {
            max_particles: 10,
            ..SceneOptions::default()
        };
        let capped = build_scene(&state, &options).len();
        assert_eq!(full - capped, 30 * (PARTICLE_SEGMENTS as usize) * 3);
    }

    #[test]
    fn test_shake_offsets_every_vertex() {
        let state = playing_state();
        let still = build_scene(&state, &SceneOptions::default());
        let options = SceneOptions {
            shake: Vec2::new(3.0, -2.0),
            ..SceneOptions::default()
        };
        let shaken = build_scene(&state, &options);
        assert_eq!(still.len(), shaken.len());
        assert!((shaken[0].position[0] - still[0].position[0] - 3.0).abs() < 1e-4);
        assert!((shaken[0].position[1] - still[0].position[1] + 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_screen_shake_runs_out() {
        let mut shake = ScreenShake::default();
        assert_eq!(shake.offset(), Vec2::ZERO);

        shake.trigger(300);
        shake.trigger(200);
        shake.update(16.0);
        assert!(shake.is_active());
        assert!(shake.offset().length() <= ScreenShake::AMPLITUDE * 2.0_f32.sqrt());

        for _ in 0..20 {
            shake.update(16.0);
        }
        assert!(!shake.is_active());
        assert_eq!(shake.offset(), Vec2::ZERO);
    }
}
