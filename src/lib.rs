//! Neon Breaker - A neon brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (balls, bricks, paddle, power-ups, particles)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input intent from keyboard/pointer/touch
//! - `persistence`: Key/value storage backends
//! - `audio`: Named sound effects and the Web Audio synthesizer

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Milliseconds subtracted from every timer per tick
    pub const FRAME_MS: f32 = 16.0;

    /// Playfield dimensions (4:3)
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 900.0;

    /// Ball defaults
    pub const BALL_SPAWN_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_MIN_SPEED: f32 = 3.0;
    pub const BALL_MAX_SPEED: f32 = 12.0;
    /// Vertical speed floor that keeps balls from travelling sideways forever
    pub const BALL_MIN_VERTICAL_SPEED: f32 = 0.5;
    pub const BALL_TRAIL_LENGTH: usize = 8;
    /// Max bounce angle off the paddle, from vertical (60°)
    pub const PADDLE_BOUNCE_ANGLE: f32 = std::f32::consts::PI / 3.0;
    /// Heading spread for multi-ball clones (radians, each way)
    pub const CLONE_SPREAD: f32 = 0.5;
    /// Heading spread when launching stuck balls
    pub const LAUNCH_SPREAD: f32 = 0.3;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 22.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 15.0;
    pub const LASER_SPEED: f32 = 10.0;
    /// Inset of each laser emitter from the paddle edges
    pub const LASER_INSET: f32 = 10.0;
    pub const LASER_COOLDOWN_FRAMES: u32 = 15;

    /// Brick defaults
    pub const BRICK_WIDTH: f32 = 80.0;
    pub const BRICK_HEIGHT: f32 = 30.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_OFFSET_TOP: f32 = 60.0;
    pub const EXPLOSION_RADIUS: f32 = 80.0;
    pub const EXPLOSION_DAMAGE: u32 = 2;
    pub const REGENERATE_MS: f32 = 5000.0;
    pub const MOVING_BRICK_SPEED: f32 = 1.0;

    /// Power-up defaults
    pub const POWER_UP_WIDTH: f32 = 30.0;
    pub const POWER_UP_HEIGHT: f32 = 15.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.15;
    pub const NOTIFICATION_MS: f32 = 3000.0;

    /// Session rules
    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;
    pub const MAX_COMBO_MULTIPLIER: u32 = 5;
    pub const MAX_PARTICLES: usize = 500;
}

/// Straight-alpha RGBA color
pub type Rgba = [f32; 4];

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Deterministic pseudo-random value in [-1, 1] for cosmetic jitter
#[inline]
pub fn hash_jitter(seed: u32) -> f32 {
    let hash = seed.wrapping_mul(2654435761);
    (hash % 2001) as f32 / 1000.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parses_channels() {
        let c = rgb(0xff8000);
        assert!((c[0] - 1.0).abs() < 0.001);
        assert!((c[1] - 128.0 / 255.0).abs() < 0.001);
        assert!(c[2].abs() < 0.001);
        assert_eq!(c[3], 1.0);
    }

    #[test]
    fn test_hash_jitter_range() {
        for seed in 0..500 {
            let j = hash_jitter(seed);
            assert!((-1.0..=1.0).contains(&j));
        }
    }
}
