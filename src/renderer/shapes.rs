//! Shape generation for the playfield
//!
//! Everything is emitted in playfield coordinates (origin top-left, y down);
//! the pipeline maps them to clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors, linear_color};
use crate::assets::{Sprite, SpriteAtlas};
use crate::sim::{Rect, Snapshot};

/// Render frames per wing flap
pub const FLAP_FRAMES: u64 = 6;

/// Which of the two animation frames to show
pub fn flap_frame(render_frame: u64) -> usize {
    ((render_frame / FLAP_FRAMES) % 2) as usize
}

/// Two triangles covering `rect`
pub fn rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let Vec2 { x: x0, y: y0 } = rect.min;
    let Vec2 { x: x1, y: y1 } = rect.max();

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Stretch a sprite over `dest`, one quad per run of equal pixels
pub fn sprite(out: &mut Vec<Vertex>, sprite: &Sprite, dest: &Rect) {
    let pixel = Vec2::new(
        dest.size.x / sprite.width as f32,
        dest.size.y / sprite.height as f32,
    );
    for y in 0..sprite.height {
        for (x, len, color) in sprite.row_runs(y) {
            let min = dest.min + Vec2::new(x as f32, y as f32) * pixel;
            let size = Vec2::new(len as f32 * pixel.x, pixel.y);
            rect(out, &Rect::from_min_size(min, size), linear_color(color));
        }
    }
}

/// Full frame: background, obstacles, player, then the game-over overlay
pub fn scene(snapshot: &Snapshot, atlas: &SpriteAtlas, render_frame: u64) -> Vec<Vertex> {
    let frame = flap_frame(render_frame);
    let field = Rect::from_min_size(
        Vec2::ZERO,
        Vec2::new(snapshot.playfield.width, snapshot.playfield.height),
    );
    let mut out = Vec::with_capacity(4096);

    rect(&mut out, &field, colors::SKY);
    if let Some(background) = atlas.background() {
        sprite(&mut out, background, &field);
    }

    for obstacle in &snapshot.obstacles {
        if let Some(image) = atlas.obstacle(obstacle.size, frame) {
            sprite(&mut out, image, &obstacle.bounds);
        }
    }

    if let Some(bird) = atlas.bird(frame) {
        sprite(&mut out, bird, &snapshot.player);
    }

    if snapshot.is_over {
        rect(&mut out, &field, colors::GAME_OVER_SHADE);
        let band = Rect::from_min_size(
            Vec2::new(0.0, field.size.y * 0.5 - 30.0),
            Vec2::new(field.size.x, 60.0),
        );
        rect(&mut out, &band, colors::GAME_OVER_BAND);
    }

    out
}
