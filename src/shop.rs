//! Emote shop
//!
//! Holds up to 12 unowned emotes in a random order. Opening the shop drops
//! anything bought since and backfills from the rest of the catalog.

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::*;
use crate::emotes::{Emote, EmoteSet};
use crate::sim::Player;

/// Why a purchase was refused. Nothing changes on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{0:?} is already owned")]
    AlreadyOwned(Emote),
    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold { needed: u64, available: u64 },
}

/// Screen placement of the shop panel (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopLayout {
    /// Top-left corner of the panel
    pub origin: Vec2,
    /// Top-left corner of the first slot
    pub grid_origin: Vec2,
}

impl ShopLayout {
    pub const PANEL_WIDTH: f32 = 300.0;
    pub const PANEL_HEIGHT: f32 = 400.0;
    pub const SLOT_SIZE: f32 = 40.0;
    pub const SLOT_PADDING: f32 = 10.0;
    pub const COLUMNS: usize = 4;
    /// Grid starts this far below the panel top (under the title and gold line)
    pub const GRID_TOP: f32 = 80.0;

    /// Panel centered in a viewport of `viewport` pixels
    pub fn centered(viewport: Vec2) -> Self {
        let origin = (viewport - Vec2::new(Self::PANEL_WIDTH, Self::PANEL_HEIGHT)) / 2.0;
        let stride = Self::SLOT_SIZE + Self::SLOT_PADDING;
        let grid_width = stride * Self::COLUMNS as f32 - Self::SLOT_PADDING;
        Self {
            origin,
            grid_origin: origin + Vec2::new((Self::PANEL_WIDTH - grid_width) / 2.0, Self::GRID_TOP),
        }
    }

    pub fn size() -> Vec2 {
        Vec2::new(Self::PANEL_WIDTH, Self::PANEL_HEIGHT)
    }

    /// Top-left corner of slot `index`
    pub fn slot_origin(&self, index: usize) -> Vec2 {
        let stride = Self::SLOT_SIZE + Self::SLOT_PADDING;
        let column = (index % Self::COLUMNS) as f32;
        let row = (index / Self::COLUMNS) as f32;
        self.grid_origin + Vec2::new(column, row) * stride
    }

    /// Slot index whose square contains `point` (out of `count` slots)
    pub fn slot_at(&self, point: Vec2, count: usize) -> Option<usize> {
        (0..count).find(|&index| {
            let min = self.slot_origin(index);
            let max = min + Vec2::splat(Self::SLOT_SIZE);
            point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
        })
    }
}

#[derive(Debug, Clone)]
pub struct Shop {
    open: bool,
    slots: Vec<Emote>,
    rng: Pcg32,
}

impl Shop {
    /// Closed shop stocked with a random selection of unowned emotes
    pub fn new(owned: &EmoteSet, seed: u64) -> Self {
        let mut shop = Self {
            open: false,
            slots: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        shop.refresh(owned);
        shop
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Emotes on offer, in display order
    pub fn slots(&self) -> &[Emote] {
        &self.slots
    }

    /// Open or close; opening refreshes the stock
    pub fn toggle(&mut self, owned: &EmoteSet) {
        self.open = !self.open;
        if self.open {
            self.refresh(owned);
        }
    }

    /// Drop owned emotes and backfill up to the shop size from the rest of
    /// the catalog. Surviving slots keep their order.
    pub fn refresh(&mut self, owned: &EmoteSet) {
        self.slots.retain(|emote| !owned.contains(emote));
        let mut candidates: Vec<Emote> = Emote::ALL
            .into_iter()
            .filter(|emote| !owned.contains(emote) && !self.slots.contains(emote))
            .collect();
        candidates.shuffle(&mut self.rng);
        let missing = SHOP_SIZE.saturating_sub(self.slots.len());
        self.slots.extend(candidates.into_iter().take(missing));
    }

    /// Buy the emote in `slot`. Returns whether the purchase went through.
    pub fn purchase(&mut self, slot: usize, player: &mut Player) -> bool {
        let Some(&emote) = self.slots.get(slot) else {
            return false;
        };
        match player.buy_emote(emote) {
            Ok(()) => {
                self.refresh(player.owned_emotes());
                true
            }
            Err(e) => {
                log::info!("Purchase failed: {}", e);
                false
            }
        }
    }

    /// Slot under a screen point while the shop is open
    pub fn slot_at(&self, point: Vec2, viewport: Vec2) -> Option<usize> {
        if !self.open {
            return None;
        }
        ShopLayout::centered(viewport).slot_at(point, self.slots.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Profile;

    fn player(gold: u64) -> Player {
        let profile = Profile {
            gold_score: gold,
            ..Default::default()
        };
        Player::new(Vec2::new(10.0, 10.0), &profile)
    }

    #[test]
    fn test_stock_excludes_owned() {
        let owned = Emote::starter_set();
        let shop = Shop::new(&owned, 1);
        assert_eq!(shop.slots().len(), SHOP_SIZE);
        assert!(shop.slots().iter().all(|e| !owned.contains(e)));
        let unique: EmoteSet = shop.slots().iter().copied().collect();
        assert_eq!(unique.len(), SHOP_SIZE);
    }

    #[test]
    fn test_small_catalog_remainder() {
        let owned: EmoteSet = Emote::ALL[..15].iter().copied().collect();
        let shop = Shop::new(&owned, 2);
        assert_eq!(shop.slots().len(), 5);
    }

    #[test]
    fn test_purchase_refreshes_stock() {
        let mut player = player(600);
        let mut shop = Shop::new(player.owned_emotes(), 3);
        let first = shop.slots()[0];
        let kept: Vec<Emote> = shop.slots()[1..].to_vec();

        assert!(shop.purchase(0, &mut player));
        assert!(player.owns(first));
        assert_eq!(player.body.gold, 300);
        assert!(!shop.slots().contains(&first));
        assert_eq!(shop.slots().len(), SHOP_SIZE);
        // Untouched slots shift up but keep their order
        assert_eq!(&shop.slots()[..kept.len()], &kept[..]);
    }

    #[test]
    fn test_failed_purchase_changes_nothing() {
        let mut player = player(299);
        let mut shop = Shop::new(player.owned_emotes(), 4);
        let before = shop.slots().to_vec();
        assert!(!shop.purchase(0, &mut player));
        assert!(!shop.purchase(99, &mut player));
        assert_eq!(shop.slots(), &before[..]);
        assert_eq!(player.body.gold, 299);
    }

    #[test]
    fn test_toggle_refreshes_on_open() {
        let mut owned = Emote::starter_set();
        let mut shop = Shop::new(&owned, 5);
        let listed = shop.slots()[2];
        owned.insert(listed);

        shop.toggle(&owned);
        assert!(shop.is_open());
        assert!(!shop.slots().contains(&listed));

        shop.toggle(&owned);
        assert!(!shop.is_open());
    }

    #[test]
    fn test_layout_hit_testing() {
        let viewport = Vec2::new(800.0, 600.0);
        let layout = ShopLayout::centered(viewport);
        assert_eq!(layout.origin, Vec2::new(250.0, 100.0));
        assert_eq!(layout.grid_origin, Vec2::new(305.0, 180.0));
        assert_eq!(layout.slot_origin(5), Vec2::new(355.0, 230.0));

        let mut shop = Shop::new(&Emote::starter_set(), 6);
        assert_eq!(shop.slot_at(Vec2::new(310.0, 190.0), viewport), None);
        shop.toggle(&Emote::starter_set());
        assert_eq!(shop.slot_at(Vec2::new(310.0, 190.0), viewport), Some(0));
        assert_eq!(shop.slot_at(Vec2::new(360.0, 235.0), viewport), Some(5));
        // Padding between slots is dead space
        assert_eq!(shop.slot_at(Vec2::new(348.0, 190.0), viewport), None);
        assert_eq!(shop.slot_at(Vec2::new(0.0, 0.0), viewport), None);
    }
}
