//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Within one
//! tick the order is fixed: spawn decision, move + prune, player motion,
//! spawn insertion, collision, score.

use super::collision::first_collision;
use super::motion::{self, Command};
use super::score;
use super::spawn;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Commands in arrival order
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn restart_requested(&self) -> bool {
        self.commands.contains(&Command::Restart)
    }

    /// Clear one-shot commands after they were consumed
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Advance the game state by one fixed timestep of `dt_ms`
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: u32) {
    // Restart wins over everything else queued this tick
    if input.restart_requested() {
        state.restart();
        return;
    }

    // Nothing moves after game over
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += dt_ms as u64;

    let spawned = spawn::maybe_spawn(state);

    let pruned = motion::advance_obstacles(&mut state.obstacles, state.config.obstacle_speed);

    motion::apply_commands(&mut state.player, &input.commands, &state.config, &state.playfield);
    motion::advance_jump(&mut state.player, dt_ms, &state.config, &state.playfield);
    // Viewport may have shrunk since the last tick
    state.player.clamp_to(&state.playfield);

    let did_spawn = spawned.is_some();
    state.obstacles.extend(spawned);

    if let Some(id) = first_collision(&state.player.bounds(), &state.obstacles, &state.playfield) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: hit obstacle {} at t={}ms, final score {}",
            id,
            state.clock_ms,
            state.score
        );
        return;
    }

    score::award(state, did_spawn, &pruned);
}
