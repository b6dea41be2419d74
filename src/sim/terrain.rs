//! Procedural terrain grid
//!
//! The world is a grid of 10x10 unit cells. Cells live in fixed-size chunks
//! keyed by chunk coordinate, so a world can be materialized up front (full
//! generation with ore clusters) or lazily as the camera uncovers it.
//!
//! Excavated cells (`present == false`) are never filled again: cluster
//! stamping and lazy generation both skip them.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{cell_center, world_to_cell};

/// Block material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Dirt,
    Diamond,
    Uranium,
    Lava,
    Quartz,
    Bedrock,
    GoldOre,
}

/// A single terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub present: bool,
    /// Remaining dig attempts before a bedrock block gives way
    pub durability: Option<u16>,
}

impl Block {
    /// A fresh block of the given kind (bedrock gets its default durability)
    pub fn new(kind: BlockKind) -> Self {
        let durability = match kind {
            BlockKind::Bedrock => Some(BEDROCK_DURABILITY),
            _ => None,
        };
        Self {
            kind,
            present: true,
            durability,
        }
    }

    pub fn with_durability(kind: BlockKind, durability: u16) -> Self {
        Self {
            kind,
            present: true,
            durability: Some(durability),
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new(BlockKind::Dirt)
    }
}

/// Half-open rectangle of cell indices: `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl CellRect {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest cell rectangle covering a world-space box
    pub fn covering(min: Vec2, max: Vec2) -> Self {
        Self {
            x0: world_to_cell(min.x),
            y0: world_to_cell(min.y),
            x1: (max.x / CELL_SIZE).ceil() as i64,
            y1: (max.y / CELL_SIZE).ceil() as i64,
        }
    }

    pub fn intersect(&self, other: &CellRect) -> CellRect {
        CellRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.x1 - self.x0) * (self.y1 - self.y0)) as usize
        }
    }
}

const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

#[derive(Debug, Clone)]
struct Chunk {
    /// Column-major; `None` means not generated yet
    cells: Vec<Option<Block>>,
}

impl Chunk {
    fn empty() -> Self {
        Self {
            cells: vec![None; CHUNK_AREA],
        }
    }
}

#[inline]
fn chunk_key(cx: i64, cy: i64) -> (i64, i64) {
    (cx.div_euclid(CHUNK_SIZE), cy.div_euclid(CHUNK_SIZE))
}

#[inline]
fn chunk_index(cx: i64, cy: i64) -> usize {
    (cx.rem_euclid(CHUNK_SIZE) * CHUNK_SIZE + cy.rem_euclid(CHUNK_SIZE)) as usize
}

/// Deterministic pseudo-noise in `[0, 1]` for a cell and cluster scale
pub fn cluster_noise(x: i64, y: i64, scale: u32) -> f64 {
    let (x, y) = (x as f64, y as f64);
    let value = (x * 0.1).sin() + (y * 0.1).sin() + ((x + y) * 0.1).sin();
    ((value * scale as f64).sin() + 1.0) / 2.0
}

/// The terrain grid
#[derive(Debug, Clone)]
pub struct Terrain {
    width: u32,
    height: u32,
    columns: i64,
    rows: i64,
    chunks: HashMap<(i64, i64), Chunk>,
    generated: usize,
}

impl Terrain {
    /// An empty world; no cell is materialized until generated
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            columns: (width as f32 / CELL_SIZE).ceil() as i64,
            rows: (height as f32 / CELL_SIZE).ceil() as i64,
            chunks: HashMap::new(),
            generated: 0,
        }
    }

    /// Materialize every cell as dirt, then run the ore and geode passes
    pub fn generate(width: u32, height: u32, rng: &mut impl Rng) -> Self {
        let mut terrain = Self::new(width, height);
        terrain.ensure_generated(terrain.bounds());
        for layer in ORE_LAYERS {
            terrain.generate_clusters(
                layer.kind,
                layer.chance,
                layer.min_radius,
                layer.max_radius,
                rng,
            );
        }
        terrain.generate_geodes(GEODE_CHANCE, GEODE_MIN_RADIUS, GEODE_MAX_RADIUS, rng);
        log::info!(
            "Terrain generated: {}x{} cells ({}x{} units)",
            terrain.columns,
            terrain.rows,
            width,
            height
        );
        terrain
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn columns(&self) -> i64 {
        self.columns
    }

    pub fn rows(&self) -> i64 {
        self.rows
    }

    /// Number of cells materialized so far
    pub fn generated_cells(&self) -> usize {
        self.generated
    }

    /// Every addressable cell
    pub fn bounds(&self) -> CellRect {
        CellRect::new(0, 0, self.columns, self.rows)
    }

    #[inline]
    pub fn in_bounds(&self, cx: i64, cy: i64) -> bool {
        cx >= 0 && cx < self.columns && cy >= 0 && cy < self.rows
    }

    /// Whether a world position lies inside `[0, width) x [0, height)`
    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.width as f32 && pos.y >= 0.0 && pos.y < self.height as f32
    }

    /// Read a cell by index (`None` when out of bounds or not generated)
    pub fn cell(&self, cx: i64, cy: i64) -> Option<&Block> {
        if !self.in_bounds(cx, cy) {
            return None;
        }
        self.chunks
            .get(&chunk_key(cx, cy))
            .and_then(|chunk| chunk.cells[chunk_index(cx, cy)].as_ref())
    }

    fn cell_mut(&mut self, cx: i64, cy: i64) -> Option<&mut Block> {
        if !self.in_bounds(cx, cy) {
            return None;
        }
        self.chunks
            .get_mut(&chunk_key(cx, cy))
            .and_then(|chunk| chunk.cells[chunk_index(cx, cy)].as_mut())
    }

    /// Overwrite a materialized cell. Returns false if the cell does not exist yet.
    pub fn set_cell(&mut self, cx: i64, cy: i64, block: Block) -> bool {
        match self.cell_mut(cx, cy) {
            Some(slot) => {
                *slot = block;
                true
            }
            None => false,
        }
    }

    /// Read the block under a world position
    pub fn block_at(&self, x: f32, y: f32) -> Option<Block> {
        self.cell(world_to_cell(x), world_to_cell(y)).copied()
    }

    /// Materialize any ungenerated cell in `rect` (clamped to the world) as dirt.
    /// Returns how many cells were created.
    pub fn ensure_generated(&mut self, rect: CellRect) -> usize {
        let rect = rect.intersect(&self.bounds());
        if rect.is_empty() {
            return 0;
        }
        let mut created = 0;
        for cx in rect.x0..rect.x1 {
            for cy in rect.y0..rect.y1 {
                let chunk = self
                    .chunks
                    .entry(chunk_key(cx, cy))
                    .or_insert_with(Chunk::empty);
                let slot = &mut chunk.cells[chunk_index(cx, cy)];
                if slot.is_none() {
                    *slot = Some(Block::default());
                    created += 1;
                }
            }
        }
        self.generated += created;
        created
    }

    /// Seed noise-shaped clusters of `kind` across every generated cell
    pub fn generate_clusters(
        &mut self,
        kind: BlockKind,
        chance: f64,
        min_radius: u32,
        max_radius: u32,
        rng: &mut impl Rng,
    ) {
        let mut seeded = 0;
        for cx in 0..self.columns {
            for cy in 0..self.rows {
                if self.cell(cx, cy).is_none() {
                    continue;
                }
                if rng.random::<f64>() < chance {
                    let radius = rng.random_range(min_radius..=max_radius);
                    self.stamp_cluster(cx, cy, radius, kind);
                    seeded += 1;
                }
            }
        }
        log::debug!("Seeded {} {:?} clusters", seeded, kind);
    }

    /// Seed geodes: diamond core inside half the radius, bedrock shell outside
    pub fn generate_geodes(
        &mut self,
        chance: f64,
        min_radius: u32,
        max_radius: u32,
        rng: &mut impl Rng,
    ) {
        let mut seeded = 0;
        for cx in 0..self.columns {
            for cy in 0..self.rows {
                if self.cell(cx, cy).is_none() {
                    continue;
                }
                if rng.random::<f64>() < chance {
                    let radius = rng.random_range(min_radius..=max_radius);
                    self.stamp_geode(cx, cy, radius);
                    seeded += 1;
                }
            }
        }
        log::debug!("Seeded {} geodes", seeded);
    }

    /// Visit every cell within `radius` of a seed whose noise accepts it
    fn for_each_cluster_cell(
        &mut self,
        cx: i64,
        cy: i64,
        radius: u32,
        mut place: impl FnMut(f64) -> Block,
    ) {
        let r = radius as i64;
        for dx in -r..=r {
            for dy in -r..=r {
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                if distance > radius as f64 {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if cluster_noise(x, y, radius) <= 0.5 {
                    continue;
                }
                if let Some(block) = self.cell_mut(x, y) {
                    if block.present {
                        *block = place(distance);
                    }
                }
            }
        }
    }

    fn stamp_cluster(&mut self, cx: i64, cy: i64, radius: u32, kind: BlockKind) {
        self.for_each_cluster_cell(cx, cy, radius, |_| Block::new(kind));
    }

    fn stamp_geode(&mut self, cx: i64, cy: i64, radius: u32) {
        let core = radius as f64 / 2.0;
        self.for_each_cluster_cell(cx, cy, radius, |distance| {
            if distance <= core {
                Block::new(BlockKind::Diamond)
            } else {
                Block::with_durability(BlockKind::Bedrock, GEODE_SHELL_DURABILITY)
            }
        });
    }

    /// Dig at a world position.
    ///
    /// Bedrock with durability above 1 only loses a point and stays put.
    /// Otherwise the block is excavated and its pre-removal state returned.
    pub fn remove_block(&mut self, x: f32, y: f32) -> Option<Block> {
        self.remove_cell(world_to_cell(x), world_to_cell(y))
    }

    /// Dig a cell by index (same rules as [`Terrain::remove_block`])
    pub fn remove_cell(&mut self, cx: i64, cy: i64) -> Option<Block> {
        let block = self.cell_mut(cx, cy)?;
        if !block.present {
            return None;
        }
        if block.kind == BlockKind::Bedrock {
            match block.durability {
                Some(durability) if durability > 1 => {
                    block.durability = Some(durability - 1);
                    return None;
                }
                _ => {}
            }
        }
        let before = *block;
        block.present = false;
        Some(before)
    }

    /// World-space center of the closest present `kind` cell within `radius`
    pub fn nearest_present(&self, kind: BlockKind, center: Vec2, radius: f32) -> Option<Vec2> {
        let reach = (radius / CELL_SIZE).ceil() as i64;
        let (ox, oy) = (world_to_cell(center.x), world_to_cell(center.y));
        let mut best: Option<(f32, Vec2)> = None;
        for cx in (ox - reach)..=(ox + reach) {
            for cy in (oy - reach)..=(oy + reach) {
                let Some(block) = self.cell(cx, cy) else {
                    continue;
                };
                if !block.present || block.kind != kind {
                    continue;
                }
                let pos = Vec2::new(cell_center(cx), cell_center(cy));
                let dist_sq = pos.distance_squared(center);
                if dist_sq > radius * radius {
                    continue;
                }
                if best.is_none_or(|(d, _)| dist_sq < d) {
                    best = Some((dist_sq, pos));
                }
            }
        }
        best.map(|(_, pos)| pos)
    }
}
