//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bricks by grid index)
//! - No rendering or platform dependencies

pub mod ball;
pub mod brick;
pub mod effects;
pub mod events;
pub mod geometry;
pub mod level;
pub mod paddle;
pub mod particle;
pub mod powerup;
pub mod pulse;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use brick::{Brick, BrickKind, HitResult, SpecialEffect};
pub use effects::{ActiveEffect, ActiveEffects, Effect, EffectKind};
pub use events::{EventSink, GameEvent, NullSink};
pub use geometry::{Rect, Side, circle_rect_intersect, collision_side, rect_intersect};
pub use level::LevelConfig;
pub use paddle::{Laser, Paddle, PaddleTint};
pub use particle::{Particle, ParticleEngine};
pub use powerup::{InstantEffect, Payload, PowerUp, PowerUpKind, PowerUpManager};
pub use pulse::Pulse;
pub use state::{GamePhase, GameState};
pub use tick::{MenuCommand, TickInput, tick};
