//! Read-only view of the simulation handed to renderers

use serde::Serialize;

use super::collision::Rect;
use super::state::{Anchor, GameState, Playfield, SizeClass};

/// An obstacle as a renderer sees it (bounds already anchored)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub bounds: Rect,
    pub anchor: Anchor,
    pub size: SizeClass,
}

/// Committed simulation state for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub playfield: Playfield,
    pub player: Rect,
    pub obstacles: Vec<ObstacleView>,
    pub score: u64,
    pub is_over: bool,
    pub time_ticks: u64,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            playfield: self.playfield,
            player: self.player.bounds(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    bounds: o.bounds(&self.playfield),
                    anchor: o.anchor,
                    size: o.size,
                })
                .collect(),
            score: self.score,
            is_over: self.is_over(),
            time_ticks: self.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::sim::state::GameState;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(GameConfig::default().with_playfield(800.0, 1000.0), 3).unwrap();
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), 100);
        }
        let snapshot = state.snapshot();
        assert_eq!(snapshot.obstacles.len(), state.obstacles.len());
        assert_eq!(snapshot.player.min.y, state.player.y);
        assert_eq!(snapshot.time_ticks, 40);
        assert!(!snapshot.is_over);

        let view = &snapshot.obstacles[0];
        assert_eq!(view.bounds.left(), state.obstacles[0].x);
        assert_eq!(view.bounds.size.y, state.obstacles[0].height);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(GameConfig::default(), 3).unwrap();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"score\":0"));
        assert!(json.contains("\"is_over\":false"));
    }
}
