//! Half-block pixel raster
//!
//! Each terminal cell shows two vertical pixels using `▀` with the top pixel
//! as foreground and the bottom one as background.

use std::io::{self, Write};

use crossterm::{cursor, queue, style};

use crate::assets::{Rgba, Sprite, SpriteAtlas};
use crate::renderer::shapes::flap_frame;
use crate::sim::{Rect, Snapshot};

pub type Rgb = [u8; 3];

const SKY: Rgb = [70, 150, 220];
const SHADE: Rgba = [0, 0, 0, 140];

#[derive(Debug, Clone)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Raster covering `cols` x `rows` terminal cells
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        let width = cols.max(1) as usize;
        let height = rows.max(1) as usize * 2;
        Self {
            width,
            height,
            pixels: vec![SKY; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    fn blend(&mut self, x: usize, y: usize, [r, g, b, a]: Rgba) {
        if a == 0 {
            return;
        }
        let dst = &mut self.pixels[y * self.width + x];
        let a = a as u16;
        for (d, s) in dst.iter_mut().zip([r, g, b]) {
            *d = ((s as u16 * a + *d as u16 * (255 - a)) / 255) as u8;
        }
    }

    /// Raster-space span `[start, end)` of a playfield interval
    fn span(min: f32, len: f32, scale: f32, limit: usize) -> (usize, usize) {
        let start = (min * scale).round().max(0.0) as usize;
        let end = ((min + len) * scale).round().max(0.0) as usize;
        (start.min(limit), end.min(limit))
    }

    fn fill(&mut self, rect: &Rect, scale: (f32, f32), color: Rgba) {
        let (x0, x1) = Self::span(rect.min.x, rect.size.x, scale.0, self.width);
        let (y0, y1) = Self::span(rect.min.y, rect.size.y, scale.1, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    /// Nearest-neighbour blit of `sprite` into the playfield rect `dest`
    fn blit(&mut self, sprite: &Sprite, dest: &Rect, scale: (f32, f32)) {
        let (x0, x1) = Self::span(dest.min.x, dest.size.x, scale.0, self.width);
        let (y0, y1) = Self::span(dest.min.y, dest.size.y, scale.1, self.height);
        let w = dest.size.x * scale.0;
        let h = dest.size.y * scale.1;
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let left = dest.min.x * scale.0;
        let top = dest.min.y * scale.1;
        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - top) / h).clamp(0.0, 1.0);
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - left) / w).clamp(0.0, 1.0);
                if let Some(color) = sprite.sample(u, v) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Draw one frame of the game scaled to the whole raster
    pub fn draw(&mut self, snapshot: &Snapshot, atlas: &SpriteAtlas, render_frame: u64) {
        let frame = flap_frame(render_frame);
        let scale = (
            self.width as f32 / snapshot.playfield.width,
            self.height as f32 / snapshot.playfield.height,
        );

        self.pixels.fill(SKY);
        let field = Rect::from_min_size(
            glam::Vec2::ZERO,
            glam::Vec2::new(snapshot.playfield.width, snapshot.playfield.height),
        );
        if let Some(background) = atlas.background() {
            self.blit(background, &field, scale);
        }
        for obstacle in &snapshot.obstacles {
            if let Some(image) = atlas.obstacle(obstacle.size, frame) {
                self.blit(image, &obstacle.bounds, scale);
            }
        }
        if let Some(bird) = atlas.bird(frame) {
            self.blit(bird, &snapshot.player, scale);
        }
        if snapshot.is_over {
            self.fill(&field, scale, SHADE);
        }
    }

    /// Emit the raster starting at the top-left cell
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let rows = self.height / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let top = self.get(col, row * 2);
                let bottom = self.get(col, row * 2 + 1);
                if bg != Some(bottom) {
                    queue!(out, style::SetBackgroundColor(color(bottom)))?;
                    bg = Some(bottom);
                }
                if top == bottom {
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(color(top)))?;
                        fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?;
                }
            }
        }
        queue!(out, style::ResetColor)
    }
}

fn color([r, g, b]: Rgb) -> style::Color {
    style::Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MANIFEST, MemorySource, load_all};
    use crate::config::GameConfig;
    use crate::sim::{GamePhase, GameState};

    const RED: &str = r#"{ "palette": { "r": [255, 0, 0, 255] }, "rows": ["r"] }"#;
    const CLEAR: &str = r#"{ "rows": ["."] }"#;

    fn atlas() -> SpriteAtlas {
        let source = MANIFEST.iter().fold(MemorySource::new(), |s, name| {
            s.with(name, if *name == "background" { CLEAR } else { RED })
        });
        load_all(&source).unwrap()
    }

    #[test]
    fn test_size_from_cells() {
        let raster = Raster::for_cells(80, 24);
        assert_eq!((raster.width, raster.height), (80, 48));
    }

    #[test]
    fn test_player_lands_in_scaled_position() {
        let state = GameState::new(GameConfig::default(), 1).unwrap();
        let mut raster = Raster::for_cells(80, 30);
        raster.draw(&state.snapshot(), &atlas(), 0);
        // 800x600 field onto 80x60 pixels: player at (50, 275) -> (5, 27.5)
        assert_eq!(raster.get(6, 30), [255, 0, 0]);
        assert_eq!(raster.get(2, 30), SKY);
        assert_eq!(raster.get(6, 10), SKY);
    }

    #[test]
    fn test_game_over_darkens() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        state.phase = GamePhase::GameOver;
        let mut raster = Raster::for_cells(40, 10);
        raster.draw(&state.snapshot(), &atlas(), 0);
        let [r, g, b] = raster.get(39, 0);
        assert!(r < SKY[0] && g < SKY[1] && b < SKY[2]);
    }

    #[test]
    fn test_write_emits_half_blocks() {
        let mut raster = Raster::for_cells(2, 1);
        raster.pixels[0] = [255, 0, 0];
        let mut out = Vec::new();
        raster.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\u{2580}'));
        assert!(text.contains(' '));
    }
}
