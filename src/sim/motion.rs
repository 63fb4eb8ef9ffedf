//! Motion integration
//!
//! Obstacles drift left at a constant speed; the player moves either in
//! discrete clamped steps or along a timed jump profile.

use super::state::{JumpState, Obstacle, Player, Playfield};
use crate::config::{GameConfig, PlayerControl};

/// Player commands routed through the tick input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    Jump,
    /// Reinitialise the session
    Restart,
}

/// Move every obstacle left by `speed`, then drop the ones fully off-screen
///
/// Returns the pruned obstacles so the scorer can account for them.
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, speed: f32) -> Vec<Obstacle> {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= speed;
    }
    let (kept, pruned): (Vec<_>, Vec<_>) = obstacles.drain(..).partition(|o| !o.is_off_screen());
    *obstacles = kept;
    for obstacle in &pruned {
        log::debug!("Pruned obstacle {} at x={}", obstacle.id, obstacle.x);
    }
    pruned
}

/// Move the player by `delta` and clamp to the playfield
pub fn step_player(player: &mut Player, delta: f32, playfield: &Playfield) {
    player.y += delta;
    player.clamp_to(playfield);
}

/// Begin a jump; no-op while one is already in flight
pub fn start_jump(player: &mut Player) -> bool {
    if player.is_jumping() {
        return false;
    }
    player.jump = Some(JumpState {
        start_y: player.y,
        elapsed_ms: 0,
    });
    true
}

/// Upward displacement of a jump at `elapsed_ms`
///
/// Linear rise to `height` over the first half of `duration_ms`, linear fall
/// back to zero over the second half. Peaks exactly at the half-way point.
pub fn jump_offset(elapsed_ms: u32, duration_ms: u32, height: f32) -> f32 {
    if duration_ms == 0 || elapsed_ms >= duration_ms {
        return 0.0;
    }
    let half = duration_ms as f32 / 2.0;
    let t = elapsed_ms as f32;
    if t <= half {
        height * (t / half)
    } else {
        height * (1.0 - (t - half) / half)
    }
}

/// Sample an in-flight jump after `dt_ms` more time
pub fn advance_jump(player: &mut Player, dt_ms: u32, config: &GameConfig, playfield: &Playfield) {
    let Some(mut jump) = player.jump else {
        return;
    };
    jump.elapsed_ms = jump.elapsed_ms.saturating_add(dt_ms);
    if jump.elapsed_ms >= config.jump_duration_ms {
        // Snap to rest and clear
        player.y = jump.start_y;
        player.jump = None;
    } else {
        player.y = jump.start_y - jump_offset(jump.elapsed_ms, config.jump_duration_ms, config.jump_height);
        player.jump = Some(jump);
    }
    player.clamp_to(playfield);
}

/// Apply queued commands in arrival order under the session's control mode
pub fn apply_commands(player: &mut Player, commands: &[Command], config: &GameConfig, playfield: &Playfield) {
    for command in commands {
        match (config.control, command) {
            (PlayerControl::Step, Command::MoveUp) => step_player(player, -config.player_step, playfield),
            (PlayerControl::Step, Command::MoveDown) => step_player(player, config.player_step, playfield),
            (PlayerControl::Jump, Command::Jump) => {
                start_jump(player);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Anchor, SizeClass};

    fn playfield() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    fn player(y: f32) -> Player {
        Player {
            x: 50.0,
            y,
            width: 50.0,
            height: 50.0,
            jump: None,
        }
    }

    fn obstacle(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id,
            x,
            y: 0.0,
            width: 50.0,
            height: 50.0,
            anchor: Anchor::Top,
            size: SizeClass::Small,
            passed: false,
        }
    }

    #[test]
    fn test_advance_moves_and_prunes() {
        let mut obstacles = vec![obstacle(1, -44.0), obstacle(2, 400.0), obstacle(3, -46.0)];
        let pruned = advance_obstacles(&mut obstacles, 5.0);
        assert_eq!(obstacles.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(obstacles[0].x, -49.0);
        assert_eq!(obstacles[1].x, 395.0);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].id, 3);
    }

    #[test]
    fn test_step_clamps() {
        let mut p = player(10.0);
        step_player(&mut p, -20.0, &playfield());
        assert_eq!(p.y, 0.0);
        let mut p = player(540.0);
        step_player(&mut p, 20.0, &playfield());
        assert_eq!(p.y, 550.0);
    }

    #[test]
    fn test_commands_in_order() {
        let config = GameConfig::default();
        let mut p = player(10.0);
        // Up clamps to 0 first, then down moves 20
        apply_commands(&mut p, &[Command::MoveUp, Command::MoveDown], &config, &playfield());
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_step_mode_ignores_jump() {
        let config = GameConfig::default();
        let mut p = player(300.0);
        apply_commands(&mut p, &[Command::Jump], &config, &playfield());
        assert!(!p.is_jumping());
    }

    #[test]
    fn test_jump_mode_ignores_steps() {
        let config = GameConfig {
            control: PlayerControl::Jump,
            ..Default::default()
        };
        let mut p = player(300.0);
        apply_commands(&mut p, &[Command::MoveUp, Command::MoveDown], &config, &playfield());
        assert_eq!(p.y, 300.0);
    }

    #[test]
    fn test_jump_profile_symmetry() {
        assert_eq!(jump_offset(0, 600, 100.0), 0.0);
        assert_eq!(jump_offset(300, 600, 100.0), 100.0);
        assert_eq!(jump_offset(150, 600, 100.0), 50.0);
        assert_eq!(jump_offset(450, 600, 100.0), 50.0);
        assert_eq!(jump_offset(600, 600, 100.0), 0.0);
        assert_eq!(jump_offset(900, 600, 100.0), 0.0);
        for t in 0..=300 {
            assert!((jump_offset(t, 600, 100.0) - jump_offset(600 - t, 600, 100.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_jump_runs_to_completion() {
        let config = GameConfig {
            control: PlayerControl::Jump,
            ..Default::default()
        };
        let mut p = player(300.0);
        assert!(start_jump(&mut p));
        // Second jump while airborne is ignored
        assert!(!start_jump(&mut p));

        let mut ys = Vec::new();
        while p.is_jumping() {
            advance_jump(&mut p, 100, &config, &playfield());
            ys.push(p.y);
        }
        assert_eq!(ys.len(), 6);
        assert_eq!(ys[2], 200.0);
        assert_eq!(*ys.last().unwrap(), 300.0);
        assert!(start_jump(&mut p));
    }

    #[test]
    fn test_jump_clamped_near_top() {
        let config = GameConfig {
            control: PlayerControl::Jump,
            ..Default::default()
        };
        let mut p = player(30.0);
        start_jump(&mut p);
        for _ in 0..3 {
            advance_jump(&mut p, 100, &config, &playfield());
            assert!(p.y >= 0.0);
        }
        assert_eq!(p.y, 0.0);
        for _ in 0..3 {
            advance_jump(&mut p, 100, &config, &playfield());
        }
        assert!(!p.is_jumping());
        assert_eq!(p.y, 30.0);
    }
}
