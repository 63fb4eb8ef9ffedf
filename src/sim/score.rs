//! Score tracking
//!
//! Monotonic counter bound to exactly one event source per session.

use super::state::{GameState, Obstacle};
use crate::config::ScorePolicy;

/// Award points for this tick and return how many were added
///
/// `spawned` is whether an obstacle entered this tick; `pruned` holds the
/// obstacles removed by the move pass (they may have crossed the player and
/// left the playfield within the same tick). Frozen once the game is over.
pub fn award(state: &mut GameState, spawned: bool, pruned: &[Obstacle]) -> u64 {
    if state.is_over() {
        return 0;
    }

    let points = match state.config.score_policy {
        ScorePolicy::PerSpawn => spawned as u64,
        ScorePolicy::PerPass => {
            let line = state.player.x;
            let mut passed = pruned.iter().filter(|o| !o.passed).count() as u64;
            for obstacle in state.obstacles.iter_mut() {
                if !obstacle.passed && obstacle.right() <= line {
                    obstacle.passed = true;
                    passed += 1;
                }
            }
            passed
        }
    };

    state.score += points;
    points
}
