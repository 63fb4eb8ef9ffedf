//! Obstacle spawning
//!
//! Level-triggered: evaluated once per fixed-rate tick against the
//! accumulated simulation clock, never against render frames.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Anchor, GameState, Obstacle, Playfield, SizeClass};
use crate::config::{HeightPolicy, SizePolicy};

/// True once strictly more than `interval_ms` has passed since the last spawn
#[inline]
pub fn spawn_due(clock_ms: u64, last_spawn_ms: u64, interval_ms: u64) -> bool {
    clock_ms.saturating_sub(last_spawn_ms) > interval_ms
}

/// Pick a size class under the configured policy
pub fn choose_size(policy: SizePolicy, clock_ms: u64, interval_ms: u64, rng: &mut Pcg32) -> SizeClass {
    match policy {
        SizePolicy::Random => SizeClass::ALL[rng.random_range(0..SizeClass::ALL.len())],
        SizePolicy::Cyclic => {
            let window = clock_ms / interval_ms.max(1);
            SizeClass::CYCLE[(window % SizeClass::CYCLE.len() as u64) as usize]
        }
    }
}

/// Pick the anchor edge (uniform, independent of size)
pub fn choose_anchor(rng: &mut Pcg32) -> Anchor {
    if rng.random_bool(0.5) {
        Anchor::Top
    } else {
        Anchor::Bottom
    }
}

/// Obstacle height, never taller than the playfield
pub fn obstacle_height(policy: &HeightPolicy, size: SizeClass, playfield: &Playfield, rng: &mut Pcg32) -> f32 {
    let height = match *policy {
        HeightPolicy::Range { min, max } if min < max => rng.random_range(min..=max),
        HeightPolicy::Range { min, .. } => min,
        HeightPolicy::Fixed { .. } => policy.fixed_height(size).unwrap_or(0.0),
    };
    height.min(playfield.height)
}

/// Build one obstacle entering at the leading edge
pub fn create_obstacle(state: &mut GameState) -> Obstacle {
    let config = &state.config;
    let size = choose_size(
        config.size_policy,
        state.clock_ms,
        config.spawn_interval_ms,
        &mut state.rng,
    );
    let height = obstacle_height(&config.height_policy, size, &state.playfield, &mut state.rng);
    let anchor = choose_anchor(&mut state.rng);
    let y = match anchor {
        Anchor::Top => 0.0,
        Anchor::Bottom => state.playfield.height - height,
    };
    let width = config.obstacle_width;
    let x = state.playfield.width;
    let id = state.next_entity_id();

    Obstacle {
        id,
        x,
        y,
        width,
        height,
        anchor,
        size,
        passed: false,
    }
}

/// Spawn an obstacle if the interval has elapsed
///
/// The obstacle is returned rather than stored so the caller can insert it
/// after the move/prune pass.
pub fn maybe_spawn(state: &mut GameState) -> Option<Obstacle> {
    if !spawn_due(state.clock_ms, state.last_spawn_ms, state.config.spawn_interval_ms) {
        return None;
    }
    state.last_spawn_ms = state.clock_ms;
    let obstacle = create_obstacle(state);
    log::debug!(
        "Spawned obstacle {} ({} {:?}, h={}) at t={}ms",
        obstacle.id,
        obstacle.size.as_str(),
        obstacle.anchor,
        obstacle.height,
        state.clock_ms
    );
    Some(obstacle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_spawn_due_is_strict() {
        assert!(!spawn_due(3000, 0, 3000));
        assert!(spawn_due(3100, 0, 3000));
        assert!(!spawn_due(6100, 3100, 3000));
        assert!(spawn_due(6200, 3100, 3000));
    }

    #[test]
    fn test_cyclic_sizes() {
        let mut rng = rng();
        let sizes: Vec<SizeClass> = [0, 2999, 3000, 6500, 9000, 12000]
            .iter()
            .map(|&t| choose_size(SizePolicy::Cyclic, t, 3000, &mut rng))
            .collect();
        assert_eq!(
            sizes,
            vec![
                SizeClass::Small,
                SizeClass::Small,
                SizeClass::Large,
                SizeClass::Medium,
                SizeClass::Small,
                SizeClass::Large,
            ]
        );
    }

    #[test]
    fn test_random_sizes_cover_set() {
        let mut rng = rng();
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            let size = choose_size(SizePolicy::Random, 0, 3000, &mut rng);
            counts[SizeClass::ALL.iter().position(|s| *s == size).unwrap()] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "skewed distribution: {:?}", counts);
        }
    }

    #[test]
    fn test_anchor_both_edges() {
        let mut rng = rng();
        let tops = (0..1000).filter(|_| choose_anchor(&mut rng) == Anchor::Top).count();
        assert!((400..600).contains(&tops));
    }

    #[test]
    fn test_fixed_heights() {
        let mut rng = rng();
        let policy = HeightPolicy::default();
        let playfield = Playfield::new(800.0, 600.0);
        assert_eq!(obstacle_height(&policy, SizeClass::Small, &playfield, &mut rng), 50.0);
        assert_eq!(obstacle_height(&policy, SizeClass::Medium, &playfield, &mut rng), 100.0);
        assert_eq!(obstacle_height(&policy, SizeClass::Large, &playfield, &mut rng), 150.0);
    }

    #[test]
    fn test_ranged_heights_within_bounds() {
        let mut rng = rng();
        let policy = HeightPolicy::Range {
            min: 40.0,
            max: 90.0,
        };
        let playfield = Playfield::new(800.0, 600.0);
        for _ in 0..500 {
            let h = obstacle_height(&policy, SizeClass::Small, &playfield, &mut rng);
            assert!((40.0..=90.0).contains(&h));
        }
    }

    #[test]
    fn test_height_capped_by_shrunk_playfield() {
        let mut rng = rng();
        let playfield = Playfield::new(800.0, 120.0);
        let h = obstacle_height(&HeightPolicy::default(), SizeClass::Large, &playfield, &mut rng);
        assert_eq!(h, 120.0);
    }

    #[test]
    fn test_created_obstacle_geometry() {
        let mut state = GameState::new(GameConfig::default(), 9).unwrap();
        for _ in 0..50 {
            let obstacle = create_obstacle(&mut state);
            assert_eq!(obstacle.x, 800.0);
            assert_eq!(obstacle.width, 50.0);
            match obstacle.anchor {
                Anchor::Top => assert_eq!(obstacle.y, 0.0),
                Anchor::Bottom => assert_eq!(obstacle.y, 600.0 - obstacle.height),
            }
        }
    }

    #[test]
    fn test_maybe_spawn_resets_timer() {
        let mut state = GameState::new(GameConfig::default(), 9).unwrap();
        state.clock_ms = 3000;
        assert!(maybe_spawn(&mut state).is_none());
        state.clock_ms = 3100;
        assert!(maybe_spawn(&mut state).is_some());
        assert_eq!(state.last_spawn_ms, 3100);
        assert!(maybe_spawn(&mut state).is_none());
    }
}
