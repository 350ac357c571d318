//! Render-frame extraction
//!
//! The simulation never draws. After each tick the host captures a
//! `RenderFrame`: every active entity as a positioned glyph, in collection
//! order, plus text overlays (info line, game-over banner). `Canvas` turns a
//! frame into plain text for terminals and logs.

pub mod canvas;

pub use canvas::Canvas;

use glam::{IVec2, Vec2};
use serde::Serialize;

use crate::sim::GameState;

/// One entity as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub pos: Vec2,
    pub glyph: char,
}

/// Screen text anchored at its first character
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub pos: IVec2,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderFrame {
    pub sprites: Vec<Sprite>,
    pub overlays: Vec<Overlay>,
}

impl RenderFrame {
    pub fn capture(state: &GameState) -> Self {
        let sprites = state
            .entities
            .iter()
            .filter(|e| e.active)
            .map(|e| Sprite {
                pos: e.pos,
                glyph: e.glyph,
            })
            .collect();

        let bounds = state.bounds();
        let mut overlays = Vec::new();
        if state.display_info() {
            let info = format!(
                "Iteration: {:>8}  Score: {:>6}  Aliens: {:>3}  Block walls: {:>3}",
                state.iteration(),
                state.score(),
                state.aliens(),
                state.wall_blocks()
            );
            overlays.push(centered(bounds.x, bounds.y as i32, info));
        }
        if state.is_game_over() {
            let middle = bounds.y as i32 / 2;
            overlays.push(centered(bounds.x, middle - 1, " Game Over ".to_string()));
            overlays.push(centered(
                bounds.x,
                middle + 1,
                format!(" Score: {} ", state.score()),
            ));
        }

        Self { sprites, overlays }
    }
}

fn centered(width: f32, row: i32, text: String) -> Overlay {
    let x = (width as i32 - text.chars().count() as i32) / 2;
    Overlay {
        pos: IVec2::new(x, row),
        text,
    }
}
