//! Plain-text canvas for headless output

use std::fmt;

use super::RenderFrame;
use crate::cell_of;

/// Fixed-size character grid; anything drawn outside it is clipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn put(&mut self, x: i32, y: i32, glyph: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = glyph;
    }

    /// Sprites first, in order (later ones win a shared cell), then overlays on top
    pub fn draw(&mut self, frame: &RenderFrame) {
        for sprite in &frame.sprites {
            let cell = cell_of(sprite.pos);
            self.put(cell.x, cell.y, sprite.glyph);
        }
        for overlay in &frame.overlays {
            for (i, ch) in overlay.text.chars().enumerate() {
                self.put(overlay.pos.x + i as i32, overlay.pos.y, ch);
            }
        }
    }

    pub fn row(&self, y: usize) -> String {
        self.cells[y * self.width..(y + 1) * self.width].iter().collect()
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            writeln!(f, "{}", self.row(y).trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Overlay, Sprite};
    use glam::{IVec2, Vec2};

    #[test]
    fn test_draw_clips_and_layers() {
        let frame = RenderFrame {
            sprites: vec![
                Sprite {
                    pos: Vec2::new(1.7, 0.2),
                    glyph: 'A',
                },
                Sprite {
                    pos: Vec2::new(-1.0, -1.0),
                    glyph: 'E',
                },
                Sprite {
                    pos: Vec2::new(1.0, 0.0),
                    glyph: '*',
                },
            ],
            overlays: vec![Overlay {
                pos: IVec2::new(3, 1),
                text: "Score".to_string(),
            }],
        };
        let mut canvas = Canvas::new(6, 2);
        canvas.draw(&frame);
        assert_eq!(canvas.row(0), " *    ");
        assert_eq!(canvas.row(1), "   Sco");
        assert_eq!(canvas.to_string(), " *\n   Sco\n");
    }
}
