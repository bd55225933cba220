//! Whole-session scenarios driven through `tick`

use glam::Vec2;
use neon_breaker::audio::{AudioSink, SoundEffect, play_events};
use neon_breaker::consts::*;
use neon_breaker::highscores::HighScores;
use neon_breaker::persistence::MemoryStore;
use neon_breaker::sim::{Brick, BrickKind, GameEvent, GamePhase, GameState, MenuCommand, TickInput, tick};

fn command(command: MenuCommand) -> TickInput {
    TickInput {
        command: Some(command),
        ..Default::default()
    }
}

fn started(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    tick(&mut state, &command(MenuCommand::Start));
    assert_eq!(state.phase, GamePhase::Playing);
    state
}

/// Aim the lead ball straight up into the brick whose top-left is `brick`
fn aim_at(state: &mut GameState, brick: Vec2) {
    state.balls[0].pos = Vec2::new(brick.x + BRICK_WIDTH / 2.0, brick.y + BRICK_HEIGHT + 12.0);
    state.balls[0].vel = Vec2::new(0.0, -5.0);
}

fn drop_ball(state: &mut GameState) {
    state.balls[0].pos = Vec2::new(100.0, PLAYFIELD_HEIGHT - 10.0);
    state.balls[0].vel = Vec2::new(0.0, 5.0);
}

#[test]
fn test_combo_builds_across_consecutive_breaks() {
    let mut state = started(1);
    let targets: Vec<Vec2> = (0..4).map(|i| Vec2::new(100.0 + i as f32 * 200.0, 300.0)).collect();
    state.bricks = targets
        .iter()
        .map(|&pos| Brick::new(pos, BrickKind::Normal))
        .collect();
    state.bricks.push(Brick::new(Vec2::new(1000.0, 60.0), BrickKind::Normal));

    for &target in &targets {
        aim_at(&mut state, target);
        tick(&mut state, &TickInput::default());
    }

    assert!(state.bricks[..4].iter().all(|b| b.destroyed));
    assert_eq!(state.combo, 4);
    assert_eq!(state.max_combo, 4);
    // Third and fourth breaks land on the x2 multiplier
    assert_eq!(state.score, 10 + 10 + 20 + 20);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn test_explosion_reaches_neighbor_at_exact_radius() {
    let mut state = started(2);
    state.bricks = vec![
        Brick::new(Vec2::new(560.0, 500.0), BrickKind::Explosive),
        Brick::new(Vec2::new(560.0 + EXPLOSION_RADIUS, 500.0), BrickKind::Normal),
        Brick::new(Vec2::new(560.0 + EXPLOSION_RADIUS * 2.0 + 1.0, 500.0), BrickKind::Normal),
        Brick::new(Vec2::new(100.0, 60.0), BrickKind::Normal),
    ];
    aim_at(&mut state, Vec2::new(560.0, 500.0));
    tick(&mut state, &TickInput::default());

    assert!(state.bricks[0].destroyed);
    assert!(state.bricks[1].destroyed);
    assert!(!state.bricks[2].destroyed);
    assert_eq!(state.score, 30 + 10);

    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::Explosion { .. })));
    assert!(events.contains(&GameEvent::ScreenShake { duration_ms: 300 }));
    assert!(state.events.is_empty());
}

#[test]
fn test_clearing_a_level_then_advancing() {
    let mut state = started(3);
    state.bricks = vec![
        Brick::new(Vec2::new(560.0, 500.0), BrickKind::Normal),
        Brick::new(Vec2::new(100.0, 60.0), BrickKind::Indestructible),
    ];
    aim_at(&mut state, Vec2::new(560.0, 500.0));
    tick(&mut state, &TickInput::default());

    assert_eq!(state.phase, GamePhase::LevelComplete);
    // 10 for the brick, then level 1 x 100 + max combo 1 x 50
    assert_eq!(state.score, 10 + 150);

    for _ in 0..30 {
        tick(&mut state, &TickInput::default());
    }
    let completions: Vec<_> = state
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
        .collect();
    assert_eq!(completions, vec![GameEvent::LevelComplete { level: 1, bonus: 150 }]);
    assert_eq!(state.score, 160);

    tick(&mut state, &command(MenuCommand::NextLevel));
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.level, 2);
    assert!(state.bricks_remaining() > 0);
    assert_eq!(state.balls.len(), 1);
}

#[test]
fn test_losing_every_life_ends_game_and_records_score() {
    let mut state = started(4);
    state.score = 1234;
    let mut events = Vec::new();

    for _ in 0..START_LIVES {
        assert_eq!(state.phase, GamePhase::Playing);
        drop_ball(&mut state);
        tick(&mut state, &TickInput::default());
        events.extend(state.drain_events());
    }

    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.lives, 0);
    let lost = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
        .count();
    assert_eq!(lost, START_LIVES as usize);
    assert!(events.contains(&GameEvent::GameOver { score: 1234, level: 1 }));

    // The host offers the final score to the leaderboard and persists it
    let mut store = MemoryStore::new();
    let mut scores = HighScores::load(&store);
    for event in &events {
        if let GameEvent::GameOver { score, level } = event {
            assert_eq!(scores.add_score(*score, *level, "today".to_string()), Some(1));
        }
    }
    scores.save(&mut store);

    let reloaded = HighScores::load(&store);
    assert_eq!(reloaded, scores);
    assert_eq!(reloaded.top_score(), 1234);

    // A new run starts clean from the game over screen
    tick(&mut state, &command(MenuCommand::Start));
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.lives, START_LIVES);
}

#[test]
fn test_session_events_drive_sounds() {
    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.push(effect);
        }
    }

    let mut state = started(5);
    state.bricks = vec![
        Brick::new(Vec2::new(560.0, 500.0), BrickKind::Normal),
        Brick::new(Vec2::new(100.0, 60.0), BrickKind::Normal),
    ];
    aim_at(&mut state, Vec2::new(560.0, 500.0));
    tick(&mut state, &TickInput::default());

    let mut recorder = Recorder::default();
    play_events(&mut recorder, &state.drain_events());
    assert_eq!(recorder.0, vec![SoundEffect::BrickBreak]);
}

#[test]
fn test_autopilot_session_is_reproducible() {
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let run = |seed| {
        let mut state = GameState::new(seed);
        for _ in 0..1200 {
            tick(&mut state, &input);
        }
        (state.score, state.level, state.lives, state.phase)
    };

    assert_eq!(run(99), run(99));
    let (_, _, _, phase) = run(99);
    assert_ne!(phase, GamePhase::Start);
}
