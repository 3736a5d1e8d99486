//! WebGPU rendering module
//!
//! Entities become flat-colored triangle lists in window pixels; the
//! pipeline maps them to clip space and draws them in one pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{entity_vertices, frame_vertices, polygon, polygon_outline};
pub use vertex::Vertex;

use crate::config::FontConfig;
use crate::sim::GameState;

/// Score line for the HUD
pub fn hud_text(state: &GameState) -> String {
    if state.paused {
        format!("Score: {} (paused)", state.score)
    } else {
        format!("Score: {}", state.score)
    }
}

/// Inline CSS for the HUD text from the `Font` section
pub fn hud_style(font: &FontConfig) -> String {
    let c = font.color;
    format!(
        "font-size: {}px; color: rgba({}, {}, {}, {:.3})",
        font.size,
        c.r,
        c.g,
        c.b,
        c.a as f32 / 255.0
    )
}
