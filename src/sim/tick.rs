//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one 60 Hz frame.

use super::powerup::InstantEffect;
use super::state::{GamePhase, GameState};

/// Menu and overlay buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Start a fresh run (title and game over screens)
    Start,
    Resume,
    NextLevel,
    MainMenu,
    /// Abandon the current run and start over
    Restart,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard direction: -1 left, 1 right, 0 none
    pub direction: f32,
    /// Pointer x in playfield coordinates (mouse/touch), centers the paddle
    pub pointer_x: Option<f32>,
    /// Fire the laser (held)
    pub fire: bool,
    /// Release stuck balls (space/click/tap); also fires
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    pub command: Option<MenuCommand>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    if let Some(command) = input.command {
        apply_command(state, command);
    }

    if input.pause {
        state.toggle_pause();
    }

    match state.phase {
        GamePhase::Playing => {}
        // Frozen, particles included
        GamePhase::Paused => return,
        // Menus keep the fireworks going
        GamePhase::Start | GamePhase::LevelComplete | GamePhase::GameOver => {
            state.particles.update();
            return;
        }
    }

    state.time_ticks += 1;
    let first_event = state.events.len();

    update_paddle(state, input);
    update_balls(state);
    update_lasers(state);
    update_bricks(state);
    update_power_ups(state);
    state.check_win_condition();

    for event in &state.events[first_event..] {
        state.particles.react(event);
    }
    state.particles.update();
}

fn apply_command(state: &mut GameState, command: MenuCommand) {
    match (command, state.phase) {
        (MenuCommand::Start, GamePhase::Start | GamePhase::GameOver) => state.start_game(),
        (MenuCommand::Restart, _) => state.start_game(),
        (MenuCommand::Resume, GamePhase::Paused) => state.toggle_pause(),
        (MenuCommand::NextLevel, GamePhase::LevelComplete) => state.next_level(),
        (MenuCommand::MainMenu, _) => state.show_main_menu(),
        (command, phase) => log::debug!("Ignoring {:?} during {:?}", command, phase),
    }
}

fn update_paddle(state: &mut GameState, input: &TickInput) {
    let width = state.playfield.x;

    if let Some(x) = input.pointer_x {
        state.paddle.set_position(x, width);
    } else if input.direction != 0.0 {
        state.paddle.move_by(input.direction.signum(), width);
    }
    state.paddle.update(width, state.power_ups.effects());

    if input.fire || input.launch {
        state.paddle.fire_laser(&mut state.events);
    }
    if input.launch {
        state.launch_stuck_balls();
    }
}

fn update_balls(state: &mut GameState) {
    let mut balls = std::mem::take(&mut state.balls);
    let paddle_y = state.paddle.pos.y;

    for ball in &mut balls {
        if ball.stuck {
            ball.update_stuck_position(&state.paddle);
            continue;
        }

        ball.update(state.playfield, state.power_ups.effects(), &mut state.events);

        if ball.handle_paddle_collision(&state.paddle, state.power_ups.effects(), &mut state.events) {
            state.combo = 0;
        }

        for index in 0..state.bricks.len() {
            let brick = &mut state.bricks[index];
            if !brick.is_collidable() {
                continue;
            }
            let Some(result) = ball.handle_brick_collision(brick, &mut state.events) else {
                continue;
            };
            if result.destroyed {
                state.handle_brick_destruction(result, index);
            }
            if !ball.penetrating {
                break;
            }
        }
    }

    balls.retain(|ball| !ball.is_below_paddle(paddle_y));
    state.balls = balls;

    if state.balls.is_empty() {
        state.lose_life();
    }
}

fn update_lasers(state: &mut GameState) {
    let hits = state
        .paddle
        .check_laser_collisions(&state.bricks, &mut state.events);

    for index in hits {
        let result = state.bricks[index].hit(1, &mut state.events);
        if result.destroyed {
            state.handle_brick_destruction(result, index);
        }
    }
}

fn update_bricks(state: &mut GameState) {
    let width = state.playfield.x;
    for brick in state.bricks.iter_mut().filter(|brick| brick.is_collidable()) {
        brick.update(width, &mut state.events);
    }
}

fn update_power_ups(state: &mut GameState) {
    let paddle = state.paddle.bounds();
    let instants = state
        .power_ups
        .update(&paddle, state.playfield.y, &mut state.events);

    for instant in instants {
        match instant {
            InstantEffect::MultiBall(count) => state.spawn_multi_balls(count),
            InstantEffect::ExtraLife(count) => state.add_life(count),
        }
    }
}

/// Demo player: track the lowest descending ball, grab capsules when no
/// ball threatens, and click through every menu
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver => input.command = Some(MenuCommand::Start),
        GamePhase::LevelComplete => input.command = Some(MenuCommand::NextLevel),
        GamePhase::Paused | GamePhase::Playing => {}
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    input.launch = state.balls.iter().any(|ball| ball.stuck);
    input.fire = state.paddle.has_laser;

    let threat = state
        .balls
        .iter()
        .filter(|ball| ball.launched && ball.vel.y > 0.0)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target = match threat {
        Some(ball) => {
            // Lead the ball and swing the contact point a little so bounces vary
            let frames_to_paddle = ((state.paddle.pos.y - ball.pos.y) / ball.vel.y).max(0.0);
            let landing = ball.pos.x + ball.vel.x * frames_to_paddle.min(30.0);
            let offset = (state.time_ticks as f32 * 0.01).sin() * state.paddle.width * 0.3;
            Some(landing + offset)
        }
        None => state
            .power_ups
            .falling
            .iter()
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|power_up| power_up.bounds().center().x)
            .or_else(|| state.balls.first().map(|ball| ball.pos.x)),
    };

    input.pointer_x = target;
}
