//! Collision detection between the player and obstacles
//!
//! Axis-aligned boxes only. Edges that merely touch do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Playfield};

/// Axis-aligned rectangle (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// ID of the first obstacle (in store order) the player overlaps
///
/// Each test is independent, so the hit/miss answer does not depend on
/// which obstacle is examined first.
pub fn first_collision(player: &Rect, obstacles: &[Obstacle], playfield: &Playfield) -> Option<u32> {
    obstacles
        .iter()
        .find(|obstacle| player.overlaps(&obstacle.bounds(playfield)))
        .map(|obstacle| obstacle.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Anchor, SizeClass};
    use proptest::prelude::*;

    fn obstacle(id: u32, x: f32, height: f32, anchor: Anchor) -> Obstacle {
        Obstacle {
            id,
            x,
            y: 300.0,
            width: 50.0,
            height,
            anchor,
            size: SizeClass::Medium,
            passed: false,
        }
    }

    fn playfield() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_bottom_anchored_hit() {
        // Occupies y in [500, 600]; player spans [520, 570]
        let obstacles = [obstacle(1, 50.0, 100.0, Anchor::Bottom)];
        let player = Rect::new(50.0, 520.0, 50.0, 50.0);
        assert_eq!(first_collision(&player, &obstacles, &playfield()), Some(1));
    }

    #[test]
    fn test_bottom_anchored_miss() {
        let obstacles = [obstacle(1, 50.0, 100.0, Anchor::Bottom)];
        let player = Rect::new(50.0, 100.0, 50.0, 50.0);
        assert_eq!(first_collision(&player, &obstacles, &playfield()), None);
    }

    #[test]
    fn test_top_anchored() {
        let obstacles = [obstacle(1, 60.0, 150.0, Anchor::Top)];
        assert!(first_collision(&Rect::new(50.0, 120.0, 50.0, 50.0), &obstacles, &playfield()).is_some());
        assert!(first_collision(&Rect::new(50.0, 150.0, 50.0, 50.0), &obstacles, &playfield()).is_none());
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let player = Rect::new(50.0, 450.0, 50.0, 50.0);
        // Bottom of player == top of obstacle
        let obstacles = [obstacle(1, 50.0, 100.0, Anchor::Bottom)];
        assert_eq!(first_collision(&player, &obstacles, &playfield()), None);

        // Obstacle left edge == player right edge
        let obstacles = [obstacle(1, 100.0, 150.0, Anchor::Bottom)];
        let player = Rect::new(50.0, 500.0, 50.0, 50.0);
        assert_eq!(first_collision(&player, &obstacles, &playfield()), None);
    }

    #[test]
    fn test_first_match_in_store_order() {
        let player = Rect::new(50.0, 520.0, 50.0, 50.0);
        let obstacles = [
            obstacle(1, 500.0, 100.0, Anchor::Bottom),
            obstacle(2, 60.0, 100.0, Anchor::Bottom),
            obstacle(3, 40.0, 100.0, Anchor::Bottom),
        ];
        assert_eq!(first_collision(&player, &obstacles, &playfield()), Some(2));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..900.0, ay in -100.0f32..700.0, aw in 1.0f32..200.0, ah in 1.0f32..200.0,
            bx in -100.0f32..900.0, by in -100.0f32..700.0, bw in 1.0f32..200.0, bh in 1.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_hit_independent_of_order(
            xs in proptest::collection::vec((-60.0f32..800.0, 10.0f32..200.0, any::<bool>()), 0..8),
            player_y in 0.0f32..550.0,
        ) {
            let obstacles: Vec<Obstacle> = xs
                .iter()
                .enumerate()
                .map(|(i, &(x, h, top))| {
                    obstacle(i as u32 + 1, x, h, if top { Anchor::Top } else { Anchor::Bottom })
                })
                .collect();
            let mut reversed = obstacles.clone();
            reversed.reverse();
            let player = Rect::new(50.0, player_y, 50.0, 50.0);
            prop_assert_eq!(
                first_collision(&player, &obstacles, &playfield()).is_some(),
                first_collision(&player, &reversed, &playfield()).is_some()
            );
        }
    }
}
