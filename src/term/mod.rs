//! Terminal front-end
//!
//! Drives the simulation from a fixed-rate clock and draws it with
//! half-block characters. The logical playfield keeps its configured size
//! and is scaled to whatever the terminal offers.

pub mod input;
pub mod raster;

use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::{cursor, execute, queue, style, terminal};

use crate::assets::SpriteAtlas;
use crate::config::{GameConfig, PlayerControl};
use crate::error::StartupError;
use crate::sim::{FixedStep, GameState, TickInput, tick};

pub use input::{KeyAction, map_key};
pub use raster::Raster;

/// Render pacing, independent of the tick rate
const FRAME: Duration = Duration::from_millis(33);

/// Raw mode + alternate screen for as long as the guard lives
pub struct TerminalGuard {
    out: BufWriter<Stdout>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = BufWriter::new(stdout());
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::Clear(terminal::ClearType::All),
        )?;
        Ok(Self { out })
    }

    pub fn out(&mut self) -> &mut BufWriter<Stdout> {
        &mut self.out
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            style::ResetColor,
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Status line shown under the playfield
pub fn status_line(state: &GameState) -> String {
    if state.is_over() {
        format!(
            " GAME OVER  score {}  [Enter] restart  [q] quit",
            state.score
        )
    } else {
        format!(
            " score {}  t={}s  [{}] {}  [q] quit",
            state.score,
            state.clock_ms / 1000,
            state.config.control.as_str(),
            match state.config.control {
                PlayerControl::Step => "up/down move",
                PlayerControl::Jump => "space jump",
            }
        )
    }
}

fn draw(
    out: &mut impl Write,
    raster: &mut Raster,
    state: &GameState,
    atlas: &SpriteAtlas,
    render_frame: u64,
) -> io::Result<()> {
    raster.draw(&state.snapshot(), atlas, render_frame);
    raster.write_to(out)?;

    let status_row = (raster.height / 2) as u16;
    let mut line = status_line(state);
    line.truncate(raster.width);
    queue!(
        out,
        cursor::MoveTo(0, status_row),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(line),
    )?;
    out.flush()
}

/// Play until the user quits; returns the final score
pub fn run(config: GameConfig, atlas: SpriteAtlas, seed: u64) -> Result<u64, StartupError> {
    let mut state = GameState::new(config, seed)?;
    let mut clock = FixedStep::new(state.config.tick_ms, state.config.max_substeps);
    let mut input = TickInput::default();

    let mut guard = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size()?;
    // Last row holds the status line
    let mut raster = Raster::for_cells(cols, rows.saturating_sub(1));

    log::info!(
        "Terminal session started: {}x{} cells, seed {}",
        cols,
        rows,
        seed
    );

    let mut last = Instant::now();
    let mut render_frame = 0u64;

    'game: loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match map_key(&key) {
                    KeyAction::Command(command) => input.push(command),
                    KeyAction::Quit => break 'game,
                    KeyAction::Ignore => {}
                },
                Event::Resize(c, r) => {
                    raster = Raster::for_cells(c, r.saturating_sub(1));
                    execute!(guard.out(), terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        // Queued commands go to the first tick that runs
        for _ in 0..clock.advance(elapsed_ms) {
            tick(&mut state, &input, clock.step_ms());
            input.clear();
        }

        draw(guard.out(), &mut raster, &state, &atlas, render_frame)?;
        render_frame += 1;

        let spent = frame_start.elapsed();
        if spent < FRAME {
            std::thread::sleep(FRAME - spent);
        }
    }

    log::info!("Terminal session ended with score {}", state.score);
    Ok(state.score)
}
