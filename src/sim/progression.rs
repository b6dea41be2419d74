//! Level and XP derived from gold
//!
//! Progression is never stored independently: it is recomputed from the gold
//! total whenever gold changes.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Level/XP snapshot for a gold total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u64,
}

impl Default for Progression {
    fn default() -> Self {
        Self::from_gold(0)
    }
}

impl Progression {
    /// `level = floor(sqrt(gold / 100)) + 1`, `xp = gold mod 100`
    pub fn from_gold(gold: u64) -> Self {
        let level = (gold / GOLD_PER_LEVEL_STEP).isqrt() + 1;
        Self {
            level: u32::try_from(level).unwrap_or(u32::MAX),
            xp: gold % XP_TO_NEXT_LEVEL,
        }
    }

    pub fn xp_to_next_level(&self) -> u64 {
        XP_TO_NEXT_LEVEL
    }

    /// Fraction of the XP bar filled
    pub fn xp_fraction(&self) -> f32 {
        self.xp as f32 / XP_TO_NEXT_LEVEL as f32
    }

    #[inline]
    fn levels_gained(&self) -> u32 {
        self.level.saturating_sub(1)
    }

    pub fn max_health(&self) -> u32 {
        BASE_MAX_HEALTH.saturating_add(self.levels_gained().saturating_mul(MAX_HEALTH_PER_LEVEL))
    }

    pub fn max_shield(&self) -> u32 {
        BASE_MAX_SHIELD.saturating_add(self.levels_gained().saturating_mul(MAX_SHIELD_PER_LEVEL))
    }

    /// Unscaled movement speed before the size penalty
    pub fn base_speed(&self) -> f32 {
        BASE_SPEED + self.levels_gained() as f32 * BASE_SPEED_PER_LEVEL
    }

    /// Multiplier applied to size (`1 + 0.1` per level above 1)
    pub fn size_multiplier(&self) -> f32 {
        1.0 + self.levels_gained() as f32 * LEVEL_SIZE_BONUS
    }

    /// Multiplier applied to speed (`1 + 0.05` per level above 1)
    pub fn speed_multiplier(&self) -> f32 {
        1.0 + self.levels_gained() as f32 * LEVEL_SPEED_BONUS
    }
}
