//! Camera: zoom-out-as-you-grow and world-clamped follow

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::CellRect;
use crate::consts::*;

/// Axis-aligned world rectangle seen by the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ViewRect {
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Whether a circle of `radius` around `pos` touches the rectangle
    pub fn touches_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius >= self.min.x
            && pos.x - radius <= self.max.x
            && pos.y + radius >= self.min.y
            && pos.y - radius <= self.max.y
    }

    pub fn cells(&self) -> CellRect {
        CellRect::covering(self.min, self.max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Top-left corner of the view in world units
    pub pos: Vec2,
    pub zoom: f32,
    /// Screen size in pixels
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            zoom: MAX_ZOOM,
            viewport,
        }
    }

    /// Zoom the camera settles at for a digger of `size` (log-interpolated)
    pub fn target_zoom(size: f32) -> f32 {
        let factor = (size / MIN_SIZE).ln() / (MAX_SIZE / MIN_SIZE).ln();
        (MAX_ZOOM * ZOOM_FLOOR_RATIO.powf(factor)).max(ZOOM_CAP)
    }

    /// Ease toward the target zoom
    pub fn update_zoom(&mut self, size: f32) {
        let target = Self::target_zoom(size);
        self.zoom = self.zoom * ZOOM_SMOOTHING + target * (1.0 - ZOOM_SMOOTHING);
        self.zoom = self.zoom.clamp(ZOOM_CAP, MAX_ZOOM);
    }

    /// World units visible on screen
    pub fn visible_size(&self) -> Vec2 {
        self.viewport / self.zoom
    }

    /// Center on `focus` without showing anything past the world edge
    pub fn follow(&mut self, focus: Vec2, world: Vec2) {
        let visible = self.visible_size();
        let x = (focus.x - visible.x / 2.0).min(world.x - visible.x).max(0.0);
        let y = (focus.y - visible.y / 2.0).min(world.y - visible.y).max(0.0);
        self.pos = Vec2::new(x, y);
    }

    pub fn view_rect(&self) -> ViewRect {
        ViewRect {
            min: self.pos,
            max: self.pos + self.visible_size(),
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.pos + screen / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.pos) * self.zoom
    }
}
