//! 2D immediate-mode rendering
//!
//! Rendering is split in two. [`scene::render`] turns game state into a flat
//! list of [`DrawCommand`]s without touching any platform API; the wasm
//! driver replays the list on a Canvas 2D context.

pub mod scene;
pub mod shapes;

use glam::Vec2;

use crate::sim::{Block, BlockKind};

pub use scene::{UiView, render};

/// Linear RGBA in `0..=1`
pub type Color = [f32; 4];

/// Opaque color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Named colors
pub mod palette {
    use super::{Color, rgb, rgba};

    pub const BLACK: Color = rgb(0, 0, 0);
    pub const WHITE: Color = rgb(255, 255, 255);
    pub const GRAY: Color = rgb(128, 128, 128);
    pub const RED: Color = rgb(255, 0, 0);
    pub const GREEN: Color = rgb(0, 128, 0);
    pub const BLUE: Color = rgb(0, 0, 255);
    pub const YELLOW: Color = rgb(255, 255, 0);
    pub const GOLD: Color = rgb(255, 215, 0);

    pub const DUG: Color = rgb(0x3D, 0x28, 0x17);
    pub const DIRT: Color = rgb(0x8B, 0x45, 0x13);
    pub const DIAMOND: Color = rgb(0x00, 0xFF, 0xFF);
    pub const URANIUM: Color = rgb(0x32, 0xCD, 0x32);
    pub const LAVA: Color = rgb(0xFF, 0x45, 0x00);
    pub const QUARTZ: Color = rgb(0xF0, 0xF8, 0xFF);
    pub const BEDROCK: Color = rgb(0x4A, 0x4A, 0x4A);
    pub const GOLD_ORE: Color = rgb(0xFF, 0xD7, 0x00);

    pub const XP_TRACK: Color = rgba(0, 0, 0, 0.5);
    pub const SHOP_PANEL: Color = rgba(0, 0, 0, 0.8);
    pub const SHOP_SLOT: Color = rgba(255, 255, 255, 0.2);
    pub const WHEEL: Color = rgba(0, 0, 0, 0.5);
}

/// Fill color of a terrain cell
pub fn block_color(block: &Block) -> Color {
    if !block.present {
        return palette::DUG;
    }
    match block.kind {
        BlockKind::Dirt => palette::DIRT,
        BlockKind::Diamond => palette::DIAMOND,
        BlockKind::Uranium => palette::URANIUM,
        BlockKind::Lava => palette::LAVA,
        BlockKind::Quartz => palette::QUARTZ,
        BlockKind::Bedrock => palette::BEDROCK,
        BlockKind::GoldOre => palette::GOLD_ORE,
    }
}

/// CSS `rgba()` string for a color
pub fn css_color(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// One drawing operation. Text is vertically centered on `pos`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: Color },
    /// Enter world space: `screen = (world - offset) * scale`
    PushTransform { scale: f32, offset: Vec2 },
    /// Back to screen space
    PopTransform,
    FillRect { min: Vec2, size: Vec2, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, width: f32, color: Color },
    /// Clockwise (screen space) arc from `start` to `end` radians
    StrokeArc { center: Vec2, radius: f32, start: f32, end: f32, width: f32, color: Color },
    FillPolygon { points: Vec<Vec2>, color: Color, outline: Option<(Color, f32)> },
    Text { pos: Vec2, text: String, size: f32, color: Color, align: TextAlign },
}

/// Commands for one frame, in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Surface size in pixels
    pub viewport: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.push(DrawCommand::FillRect { min, size, color });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color, align: TextAlign) {
        self.push(DrawCommand::Text {
            pos,
            text: text.into(),
            size,
            color,
            align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_colors() {
        let mut block = Block::new(BlockKind::Lava);
        assert_eq!(block_color(&block), palette::LAVA);
        block.present = false;
        assert_eq!(block_color(&block), palette::DUG);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(palette::DUG), "rgba(61, 40, 23, 1)");
        assert_eq!(css_color(palette::SHOP_PANEL), "rgba(0, 0, 0, 0.8)");
    }
}
