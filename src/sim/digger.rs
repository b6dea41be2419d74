//! Shared digger body
//!
//! Player and enemies are both diggers: a circle that moves through the
//! terrain, excavates a disk around itself and grows with its score. The
//! stat block and mechanics live in [`Digger`]; the [`MobileDigger`] trait is
//! the seam where the two variants differ (movement speed, steering).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::progression::Progression;
use super::terrain::{Block, BlockKind, CellRect, Terrain};
use crate::cell_center;
use crate::consts::*;
use crate::emotes::Emote;

/// `clamp(min, max, (min + sqrt(total) * growth) * level_multiplier)`
pub fn size_for_score(total: u64, progression: &Progression) -> f32 {
    let raw = (MIN_SIZE + (total as f32).sqrt() * GROWTH_FACTOR) * progression.size_multiplier();
    raw.clamp(MIN_SIZE, MAX_SIZE)
}

/// World units per tick for a unit input direction.
///
/// Shrinks with size down to a floor of `MIN_SPEED`, then grows 5% per level.
pub fn movement_speed(size: f32, progression: &Progression) -> f32 {
    let normalized = ((size - MIN_SIZE) / (MAX_SIZE - MIN_SIZE)).clamp(0.0, 1.0);
    let base = progression.base_speed();
    let slowed = (base - base * SIZE_SLOWDOWN * normalized).max(MIN_SPEED);
    slowed * progression.speed_multiplier()
}

/// An emote currently floating above a digger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEmote {
    pub emote: Emote,
    pub remaining_ms: f32,
}

/// Stat block shared by every digger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digger {
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
    pub shield: u32,
    /// Unit facing direction (zero until the first move)
    pub facing: Vec2,
    /// Continuous digging requested
    pub digging: bool,
    pub score: u64,
    pub gold: u64,
    pub progression: Progression,
    pub emote: Option<ActiveEmote>,
}

impl Digger {
    pub fn new(pos: Vec2, health: u32, score: u64, gold: u64) -> Self {
        let progression = Progression::from_gold(gold);
        let mut digger = Self {
            pos,
            size: MIN_SIZE,
            health: health.min(progression.max_health()),
            shield: 0,
            facing: Vec2::ZERO,
            digging: false,
            score,
            gold,
            progression,
            emote: None,
        };
        digger.recompute_size();
        digger
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn max_health(&self) -> u32 {
        self.progression.max_health()
    }

    pub fn max_shield(&self) -> u32 {
        self.progression.max_shield()
    }

    /// Score and gold combined; drives growth
    pub fn total_score(&self) -> u64 {
        self.score.saturating_add(self.gold)
    }

    pub fn recompute_size(&mut self) {
        self.size = size_for_score(self.total_score(), &self.progression);
    }

    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
        self.recompute_size();
    }

    /// Replace the gold total and rederive level, caps and size
    pub fn set_gold(&mut self, gold: u64) {
        self.gold = gold;
        self.refresh_progression();
        self.recompute_size();
    }

    /// Rederive level from gold. A level change re-applies the caps, which
    /// only ever lowers health or shield.
    pub fn refresh_progression(&mut self) {
        let next = Progression::from_gold(self.gold);
        if next.level != self.progression.level {
            if next.level > self.progression.level {
                log::info!("Level up! {} -> {}", self.progression.level, next.level);
            }
            self.health = self.health.min(next.max_health());
            self.shield = self.shield.min(next.max_shield());
        }
        self.progression = next;
    }

    /// Shield soaks damage first, the rest comes off health (floored at 0)
    pub fn take_damage(&mut self, amount: u32) {
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        self.health = self.health.saturating_sub(amount - absorbed);
    }

    pub fn adjust_shield(&mut self, delta: i32) {
        let shield = if delta < 0 {
            self.shield.saturating_sub(delta.unsigned_abs())
        } else {
            self.shield.saturating_add(delta.unsigned_abs())
        };
        self.shield = shield.min(self.max_shield());
    }

    pub fn recover_health(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health());
    }

    pub fn is_exhausted(&self) -> bool {
        self.health == 0
    }

    /// Apply the effect of one excavated block
    pub fn handle_dug_block(&mut self, block: &Block) {
        match block.kind {
            BlockKind::Uranium => self.take_damage(URANIUM_DAMAGE),
            BlockKind::Lava => self.take_damage(LAVA_DAMAGE),
            BlockKind::Quartz => self.adjust_shield(QUARTZ_SHIELD as i32),
            BlockKind::Bedrock => self.score = self.score.saturating_add(BEDROCK_SCORE),
            BlockKind::GoldOre => {
                self.gold = self.gold.saturating_add(GOLD_PER_ORE);
                self.refresh_progression();
            }
            BlockKind::Dirt | BlockKind::Diamond => {
                self.score = self.score.saturating_add(DIRT_SCORE)
            }
        }
    }

    /// Radius of the excavated disk (world units)
    pub fn dig_radius(&self) -> f32 {
        (self.size / 2.0).floor()
    }

    /// Excavate every cell whose center lies in the dig disk, scanning
    /// columns left to right and each column top to bottom.
    pub fn dig(&mut self, terrain: &mut Terrain) -> Vec<Block> {
        let radius = self.dig_radius();
        let span = Vec2::splat(radius);
        let rect = CellRect::covering(self.pos - span, self.pos + span);
        let mut dug = Vec::new();
        for cx in rect.x0..rect.x1 {
            for cy in rect.y0..rect.y1 {
                let center = Vec2::new(cell_center(cx), cell_center(cy));
                if center.distance_squared(self.pos) > radius * radius {
                    continue;
                }
                if let Some(block) = terrain.remove_cell(cx, cy) {
                    dug.push(block);
                }
            }
        }
        for block in &dug {
            self.handle_dug_block(block);
        }
        self.recompute_size();
        dug
    }

    /// Move by `direction * speed` if the destination stays inside the world,
    /// then dig there. Rejected moves change nothing and return `None`.
    pub fn step(&mut self, direction: Vec2, speed: f32, terrain: &mut Terrain) -> Option<Vec<Block>> {
        let next = self.pos + direction * speed;
        if !terrain.contains(next) {
            return None;
        }
        self.pos = next;
        if let Some(facing) = direction.try_normalize() {
            self.facing = facing;
        }
        Some(self.dig(terrain))
    }

    pub fn show_emote(&mut self, emote: Emote) {
        self.emote = Some(ActiveEmote {
            emote,
            remaining_ms: EMOTE_DURATION_MS,
        });
    }

    /// Count the emote timer down; expires at zero
    pub fn update_emote(&mut self, dt_ms: f32) {
        if let Some(active) = &mut self.emote {
            active.remaining_ms -= dt_ms;
            if active.remaining_ms <= 0.0 {
                self.emote = None;
            }
        }
    }
}

/// Capability shared by the player and enemies
pub trait MobileDigger {
    fn body(&self) -> &Digger;
    fn body_mut(&mut self) -> &mut Digger;

    /// World units per tick for a unit direction
    fn speed(&self) -> f32 {
        let body = self.body();
        movement_speed(body.size, &body.progression)
    }

    /// Move by `(dx, dy) * speed`; see [`Digger::step`]
    fn try_move(&mut self, dx: f32, dy: f32, terrain: &mut Terrain) -> Option<Vec<Block>> {
        let speed = self.speed();
        self.body_mut().step(Vec2::new(dx, dy), speed, terrain)
    }
}
