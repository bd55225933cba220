//! Game state definitions
//!
//! The session owns every entity. Bricks, balls and the paddle are only
//! mutated from `tick` and the rule methods below.

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::Ball;
use super::brick::{Brick, HitResult, SpecialEffect};
use super::events::{EventSink, GameEvent};
use super::level::LevelConfig;
use super::paddle::Paddle;
use super::particle::ParticleEngine;
use super::powerup::PowerUpManager;
use crate::consts::*;

/// Screen shake lengths (ms)
const EXPLOSION_SHAKE_MS: u32 = 300;
const COMBO_SHAKE_MS: u32 = 200;
/// Combo at which every destruction shakes the screen
const COMBO_SHAKE_THRESHOLD: u32 = 5;
/// Spawn height of a fresh ball above the paddle
const BALL_SPAWN_LIFT: f32 = 20.0;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Start,
    Playing,
    Paused,
    /// All breakable bricks gone, waiting for the next level
    LevelComplete,
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub playfield: Vec2,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Destructions since the last paddle hit or lost life
    pub combo: u32,
    pub max_combo: u32,
    pub level_config: LevelConfig,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub paddle: Paddle,
    pub power_ups: PowerUpManager,
    pub particles: ParticleEngine,
    /// Events published since the host last drained them
    pub events: Vec<GameEvent>,
    /// Simulated frames while playing
    pub time_ticks: u64,
    pub rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_playfield(seed, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT))
    }

    pub fn with_playfield(seed: u64, playfield: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let level_config = LevelConfig::for_level(1);
        let bricks = level_config.build_bricks(playfield.x, &mut rng);
        let paddle = Paddle::new(Vec2::new(
            playfield.x / 2.0 - PADDLE_WIDTH / 2.0,
            playfield.y - 60.0,
        ));

        Self {
            phase: GamePhase::Start,
            playfield,
            score: 0,
            lives: START_LIVES,
            level: 1,
            combo: 0,
            max_combo: 0,
            level_config,
            balls: Vec::new(),
            bricks,
            paddle,
            power_ups: PowerUpManager::new(),
            particles: ParticleEngine::new(seed ^ 0x9e37_79b9_7f4a_7c15, playfield),
            events: Vec::new(),
            time_ticks: 0,
            rng,
        }
    }

    /// Fresh run from level 1
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.combo = 0;
        self.max_combo = 0;
        self.time_ticks = 0;
        self.balls.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.paddle.reset(Vec2::new(
            self.playfield.x / 2.0 - 50.0,
            self.playfield.y - 40.0,
        ));
        self.load_level(1);
    }

    pub fn start_game(&mut self) {
        self.reset_game();
        self.spawn_ball();
        self.phase = GamePhase::Playing;
        log::info!("New game started");
    }

    pub fn load_level(&mut self, level: u32) {
        self.level_config = LevelConfig::for_level(level);
        self.bricks = self
            .level_config
            .build_bricks(self.playfield.x, &mut self.rng);
        log::info!(
            "Level {}: {}x{} grid, {} breakable bricks, ball speed {}",
            level,
            self.level_config.rows,
            self.level_config.cols,
            self.bricks_remaining(),
            self.level_config.ball_speed
        );
    }

    pub fn next_level(&mut self) {
        self.level += 1;
        self.load_level(self.level);
        self.spawn_ball();
        self.phase = GamePhase::Playing;
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    pub fn show_main_menu(&mut self) {
        self.phase = GamePhase::Start;
    }

    /// Breakable bricks still standing
    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|brick| brick.blocks_clear()).count()
    }

    /// Combo multiplier: 1 + one step per three destructions, capped
    pub fn combo_multiplier(&self) -> u32 {
        (1 + self.combo / 3).min(MAX_COMBO_MULTIPLIER)
    }

    /// Replace every ball with a new one above the paddle center, launched
    /// straight up at the level's speed
    pub fn spawn_ball(&mut self) {
        let pos = Vec2::new(self.paddle.center_x(), self.paddle.pos.y - BALL_SPAWN_LIFT);
        let mut ball = Ball::new(pos, BALL_SPAWN_RADIUS);
        ball.speed = self.level_config.ball_speed;
        ball.launch(-FRAC_PI_2, Some(ball.speed));
        self.balls = vec![ball];
    }

    /// Release every ball riding the paddle; returns how many left
    pub fn launch_stuck_balls(&mut self) -> usize {
        let mut count = 0;
        for ball in self.balls.iter_mut().filter(|ball| ball.stuck) {
            let angle = -FRAC_PI_2 + self.rng.random_range(-LAUNCH_SPREAD..LAUNCH_SPREAD);
            ball.launch(angle, None);
            count += 1;
        }
        if count > 0 {
            self.events.publish(GameEvent::BallLaunched { count });
        }
        count
    }

    /// Clone the lead ball `count` times
    pub fn spawn_multi_balls(&mut self, count: u32) {
        let Some(lead) = self.balls.first().cloned() else {
            return;
        };
        for _ in 0..count {
            let clone = lead.spawn_clone(&mut self.rng);
            self.balls.push(clone);
        }
    }

    pub fn add_life(&mut self, count: u32) {
        self.lives = (self.lives + count).min(MAX_LIVES);
    }

    /// The last ball fell through
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo = 0;
        self.events.publish(GameEvent::LifeLost {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.game_over();
        } else {
            self.spawn_ball();
            self.power_ups.clear();
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over at level {} with {} points (best combo {})",
            self.level,
            self.score,
            self.max_combo
        );
        self.events.publish(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
    }

    /// Score a destroyed brick and resolve whatever it sets off.
    ///
    /// Explosions resolve in two phases: first every intact brick in range is
    /// collected, then each takes damage. Destructions caused that way queue
    /// up behind the current one, so chains settle within this call and the
    /// outcome does not depend on brick order.
    pub fn handle_brick_destruction(&mut self, result: HitResult, index: usize) {
        let mut pending = VecDeque::from([(result, index)]);

        while let Some((result, index)) = pending.pop_front() {
            if !result.destroyed {
                continue;
            }

            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);

            let points = u64::from(result.score)
                * u64::from(self.combo_multiplier())
                * u64::from(self.power_ups.effects().score_multiplier());
            self.score += points;

            let center = self.bricks[index].center();
            match result.special {
                Some(SpecialEffect::Explosion { radius }) => {
                    self.events.publish(GameEvent::Explosion { center, radius });
                    self.events.publish(GameEvent::ScreenShake {
                        duration_ms: EXPLOSION_SHAKE_MS,
                    });

                    let victims: Vec<usize> = self
                        .bricks
                        .iter()
                        .enumerate()
                        .filter(|(_, brick)| {
                            !brick.destroyed && brick.is_in_explosion_radius(center, radius)
                        })
                        .map(|(i, _)| i)
                        .collect();

                    for victim in victims {
                        let hit = self.bricks[victim].hit(EXPLOSION_DAMAGE, &mut self.events);
                        if hit.destroyed {
                            pending.push_back((hit, victim));
                        }
                    }
                }
                // Destroyed regenerating bricks simply stop counting toward
                // the clear until they return
                Some(SpecialEffect::Regenerate) | None => {}
            }

            self.power_ups.spawn_power_up(center, &mut self.rng);

            if self.combo >= COMBO_SHAKE_THRESHOLD {
                self.events.publish(GameEvent::ScreenShake {
                    duration_ms: COMBO_SHAKE_MS,
                });
            }
        }
    }

    /// Enter `LevelComplete` once every breakable brick is gone
    pub fn check_win_condition(&mut self) {
        if self.phase != GamePhase::Playing || self.bricks_remaining() > 0 {
            return;
        }

        let bonus = u64::from(self.level) * 100 + u64::from(self.max_combo) * 50;
        self.score += bonus;
        self.phase = GamePhase::LevelComplete;
        log::info!("Level {} complete, bonus {}", self.level, bonus);
        self.events.publish(GameEvent::LevelComplete {
            level: self.level,
            bonus,
        });
    }

    /// Hand the accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick::BrickKind;
    use crate::sim::effects::{Effect, EffectKind};
    use crate::sim::powerup::PowerUpKind;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345);
        state.start_game();
        state.power_ups.spawn_chance = 0.0;
        state
    }

    #[test]
    fn test_new_state_waits_on_title() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.bricks.len(), 50);
        assert_eq!(state.paddle.pos, Vec2::new(525.0, 840.0));
    }

    #[test]
    fn test_start_game_spawns_ball() {
        let state = playing_state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
        let ball = &state.balls[0];
        assert!(ball.launched);
        assert_eq!(ball.radius, BALL_SPAWN_RADIUS);
        assert!((ball.vel.length() - 5.0).abs() < 0.001);
        assert_eq!(state.paddle.pos, Vec2::new(550.0, 860.0));
    }

    #[test]
    fn test_combo_multiplier_scores_fourth_hit_double() {
        let mut state = playing_state();
        state.combo = 3;
        let result = state.bricks[0].hit(1, &mut Vec::new());
        state.handle_brick_destruction(result, 0);
        assert_eq!(state.combo, 4);
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_combo_multiplier_caps_at_five() {
        let mut state = playing_state();
        state.combo = 20;
        assert_eq!(state.combo_multiplier(), 5);
    }

    #[test]
    fn test_score_boost_multiplies() {
        let mut state = playing_state();
        state
            .power_ups
            .collect_power_up(PowerUpKind::ScoreBoost, Vec2::ZERO, &mut Vec::new());
        let result = state.bricks[0].hit(1, &mut Vec::new());
        state.handle_brick_destruction(result, 0);
        assert_eq!(state.score, 20);
        assert!(matches!(
            state.power_ups.effects().get(EffectKind::ScoreMultiplier).map(|a| a.effect),
            Some(Effect::ScoreMultiplier(2))
        ));
    }

    #[test]
    fn test_explosion_damages_bricks_within_radius() {
        let mut state = playing_state();
        state.bricks = vec![
            Brick::new(Vec2::new(500.0, 300.0), BrickKind::Explosive),
            // Center exactly 80 away: inclusive
            Brick::new(Vec2::new(580.0, 300.0), BrickKind::Normal),
            Brick::new(Vec2::new(500.0, 335.0), BrickKind::Metal),
            Brick::new(Vec2::new(420.0, 335.0), BrickKind::Indestructible),
            Brick::new(Vec2::new(800.0, 300.0), BrickKind::Normal),
        ];

        let result = state.bricks[0].hit(1, &mut state.events);
        state.handle_brick_destruction(result, 0);

        assert!(state.bricks[1].destroyed);
        assert_eq!(state.bricks[2].hit_points, 1);
        assert!(!state.bricks[3].destroyed);
        assert!(!state.bricks[4].destroyed);
        assert_eq!(state.bricks[4].hit_points, 1);
        // 30 x1 for the explosive, 10 x1 for the neighbor (combo 2)
        assert_eq!(state.score, 40);
        assert_eq!(state.combo, 2);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Explosion { radius, .. } if *radius == EXPLOSION_RADIUS)));
    }

    #[test]
    fn test_explosions_chain() {
        let mut state = playing_state();
        state.bricks = vec![
            Brick::new(Vec2::new(100.0, 300.0), BrickKind::Explosive),
            Brick::new(Vec2::new(170.0, 300.0), BrickKind::Explosive),
            Brick::new(Vec2::new(240.0, 300.0), BrickKind::Reinforced),
            Brick::new(Vec2::new(400.0, 300.0), BrickKind::Normal),
        ];
        let result = state.bricks[0].hit(1, &mut state.events);
        state.handle_brick_destruction(result, 0);

        assert!(state.bricks[1].destroyed);
        assert!(state.bricks[2].destroyed);
        assert!(!state.bricks[3].destroyed);
        assert_eq!(state.combo, 3);
    }

    #[test]
    fn test_regenerating_brick_leaves_and_returns_to_count() {
        let mut state = playing_state();
        state.bricks = vec![Brick::new(Vec2::new(100.0, 300.0), BrickKind::Regenerating)];
        let result = state.bricks[0].hit(1, &mut state.events);
        state.handle_brick_destruction(result, 0);
        assert_eq!(state.bricks_remaining(), 0);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_lose_life_respawns_and_clears_power_ups() {
        let mut state = playing_state();
        state.combo = 4;
        state
            .power_ups
            .collect_power_up(PowerUpKind::Laser, Vec2::ZERO, &mut Vec::new());
        state.balls.clear();
        state.lose_life();
        assert_eq!(state.lives, 2);
        assert_eq!(state.combo, 0);
        assert_eq!(state.balls.len(), 1);
        assert!(state.power_ups.effects().is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = playing_state();
        state.lives = 1;
        state.score = 1234;
        state.balls.clear();
        state.lose_life();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.balls.is_empty());
        assert!(state
            .events
            .contains(&GameEvent::GameOver { score: 1234, level: 1 }));
    }

    #[test]
    fn test_extra_life_capped() {
        let mut state = playing_state();
        state.add_life(1);
        state.add_life(1);
        state.add_life(1);
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_multi_ball_clones_lead() {
        let mut state = playing_state();
        state.spawn_multi_balls(2);
        assert_eq!(state.balls.len(), 3);

        state.balls.clear();
        state.spawn_multi_balls(2);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_next_level_starts_with_single_ball() {
        let mut state = playing_state();
        state.spawn_multi_balls(2);
        assert_eq!(state.balls.len(), 3);
        state.bricks = vec![Brick::new(Vec2::new(100.0, 100.0), BrickKind::Indestructible)];
        state.check_win_condition();
        assert_eq!(state.phase, GamePhase::LevelComplete);

        state.next_level();
        assert_eq!(state.balls.len(), 1);
        let ball = &state.balls[0];
        assert!(ball.launched);
        assert!(ball.vel.y < 0.0);
        assert_eq!(ball.radius, BALL_SPAWN_RADIUS);
    }

    #[test]
    fn test_launch_stuck_balls() {
        let mut state = playing_state();
        let paddle = state.paddle.clone();
        state.balls[0].stick_to_paddle(&paddle);
        assert_eq!(state.launch_stuck_balls(), 1);
        let ball = &state.balls[0];
        assert!(ball.launched && !ball.stuck);
        assert!(ball.vel.y < 0.0);
        let off_vertical = (ball.vel.x / ball.vel.length()).asin().abs();
        assert!(off_vertical <= LAUNCH_SPREAD + 0.001);
    }

    #[test]
    fn test_level_complete_awards_bonus_once() {
        let mut state = playing_state();
        state.max_combo = 6;
        for brick in &mut state.bricks {
            brick.destroyed = true;
        }
        state.check_win_condition();
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.score, 100 + 300);
        state.check_win_condition();
        assert_eq!(state.score, 400);

        state.next_level();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bricks.len(), 60);
    }

    #[test]
    fn test_indestructible_bricks_do_not_block_clear() {
        let mut state = playing_state();
        state.bricks = vec![Brick::new(Vec2::new(100.0, 100.0), BrickKind::Indestructible)];
        state.check_win_condition();
        assert_eq!(state.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = playing_state();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);

        state.phase = GamePhase::GameOver;
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
