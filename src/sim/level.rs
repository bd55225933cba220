//! Level layouts
//!
//! Levels 1-5 are hand-tuned; later levels keep growing the grid, the
//! special-brick share and the ball speed up to fixed caps.

use glam::Vec2;
use rand::Rng;

use super::brick::{Brick, BrickKind};
use crate::consts::*;

/// First level whose special pool includes indestructible bricks
const INDESTRUCTIBLE_FROM_LEVEL: u32 = 8;

/// Tuning for a single level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelConfig {
    pub rows: u32,
    pub cols: u32,
    /// First entry is the base kind; the rest form the special pool
    pub kinds: Vec<BrickKind>,
    /// Chance that a cell holds a brick from the special pool
    pub special_chance: f64,
    pub ball_speed: f32,
}

impl LevelConfig {
    pub fn for_level(level: u32) -> Self {
        use BrickKind::*;

        let level = level.max(1);
        let config = |rows, cols, kinds: &[BrickKind], special_chance, ball_speed| LevelConfig {
            rows,
            cols,
            kinds: kinds.to_vec(),
            special_chance,
            ball_speed,
        };

        match level {
            1 => config(5, 10, &[Normal], 0.1, 5.0),
            2 => config(6, 10, &[Normal, Reinforced], 0.15, 5.5),
            3 => config(6, 11, &[Normal, Reinforced, Explosive], 0.2, 6.0),
            4 => config(7, 11, &[Normal, Reinforced, Explosive, Moving], 0.25, 6.5),
            5 => config(
                7,
                12,
                &[Normal, Reinforced, Explosive, Moving, Regenerating],
                0.3,
                7.0,
            ),
            _ => {
                let past = level - 5;
                let mut kinds = vec![Normal, Reinforced, Explosive, Moving, Regenerating, Metal];
                if level >= INDESTRUCTIBLE_FROM_LEVEL {
                    kinds.push(Indestructible);
                }
                LevelConfig {
                    rows: (7 + past / 3).min(8),
                    cols: (12 + past / 2).min(13),
                    kinds,
                    special_chance: (0.3 + past as f64 * 0.02).min(0.4),
                    ball_speed: (7.0 + past as f32 * 0.2).min(10.0),
                }
            }
        }
    }

    /// Total grid width including the gaps between bricks
    pub fn grid_width(&self) -> f32 {
        self.cols as f32 * (BRICK_WIDTH + BRICK_PADDING) - BRICK_PADDING
    }

    /// Lay out the brick grid centered horizontally, rolling each cell's kind
    pub fn build_bricks(&self, playfield_width: f32, rng: &mut impl Rng) -> Vec<Brick> {
        let offset_x = (playfield_width - self.grid_width()) / 2.0;
        let base = self.kinds.first().copied().unwrap_or(BrickKind::Normal);
        let specials = self.kinds.get(1..).unwrap_or(&[]);

        let mut bricks = Vec::with_capacity((self.rows * self.cols) as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Vec2::new(
                    offset_x + col as f32 * (BRICK_WIDTH + BRICK_PADDING),
                    BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
                );
                let kind = if !specials.is_empty() && rng.random_bool(self.special_chance) {
                    specials[rng.random_range(0..specials.len())]
                } else {
                    base
                };
                bricks.push(Brick::new(pos, kind));
            }
        }
        bricks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hand_tuned_levels() {
        let l1 = LevelConfig::for_level(1);
        assert_eq!((l1.rows, l1.cols), (5, 10));
        assert_eq!(l1.kinds, vec![BrickKind::Normal]);

        let l5 = LevelConfig::for_level(5);
        assert_eq!((l5.rows, l5.cols), (7, 12));
        assert!((l5.ball_speed - 7.0).abs() < 0.001);
        assert_eq!(l5.kinds.len(), 5);
    }

    #[test]
    fn test_progression_caps() {
        let l6 = LevelConfig::for_level(6);
        assert_eq!((l6.rows, l6.cols), (7, 12));
        assert!(l6.kinds.contains(&BrickKind::Metal));
        assert!(!l6.kinds.contains(&BrickKind::Indestructible));
        assert!((l6.ball_speed - 7.2).abs() < 0.001);

        let l8 = LevelConfig::for_level(8);
        assert_eq!((l8.rows, l8.cols), (8, 13));
        assert!(l8.kinds.contains(&BrickKind::Indestructible));

        let l50 = LevelConfig::for_level(50);
        assert_eq!((l50.rows, l50.cols), (8, 13));
        assert!((l50.special_chance - 0.4).abs() < 1e-9);
        assert!((l50.ball_speed - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_grid_centered_and_fits() {
        let mut rng = Pcg32::seed_from_u64(9);
        for level in 1..12 {
            let config = LevelConfig::for_level(level);
            let bricks = config.build_bricks(PLAYFIELD_WIDTH, &mut rng);
            assert_eq!(bricks.len(), (config.rows * config.cols) as usize);

            let left = bricks.iter().map(|b| b.pos.x).fold(f32::MAX, f32::min);
            let right = bricks.iter().map(|b| b.bounds().right()).fold(f32::MIN, f32::max);
            assert!(left >= 0.0);
            assert!(right <= PLAYFIELD_WIDTH);
            assert!((left - (PLAYFIELD_WIDTH - right)).abs() < 0.01);
            assert_eq!(bricks[0].pos.y, BRICK_OFFSET_TOP);
        }
    }

    #[test]
    fn test_first_level_is_all_normal() {
        let mut rng = Pcg32::seed_from_u64(1);
        let bricks = LevelConfig::for_level(1).build_bricks(PLAYFIELD_WIDTH, &mut rng);
        assert!(bricks.iter().all(|b| b.kind == BrickKind::Normal));
    }

    #[test]
    fn test_specials_come_from_pool() {
        let mut rng = Pcg32::seed_from_u64(4);
        let config = LevelConfig::for_level(3);
        let bricks = config.build_bricks(PLAYFIELD_WIDTH, &mut rng);
        assert!(bricks.iter().all(|b| config.kinds.contains(&b.kind)));
        assert!(bricks.iter().any(|b| b.kind != BrickKind::Normal));
    }
}
