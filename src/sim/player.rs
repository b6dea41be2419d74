//! The player-controlled digger

use glam::Vec2;

use super::digger::{Digger, MobileDigger};
use super::terrain::{Block, Terrain};
use crate::consts::*;
use crate::emotes::{Emote, EmoteSet};
use crate::persistence::Profile;
use crate::shop::PurchaseError;

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Digger,
    owned_emotes: EmoteSet,
}

impl MobileDigger for Player {
    fn body(&self) -> &Digger {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Digger {
        &mut self.body
    }
}

impl Player {
    /// Spawn at `pos` with the persisted gold and emotes
    pub fn new(pos: Vec2, profile: &Profile) -> Self {
        Self {
            body: Digger::new(pos, PLAYER_START_HEALTH, 0, profile.gold_score),
            owned_emotes: profile.owned_emotes.clone(),
        }
    }

    /// Per-tick update: keep digging in place while dig mode is on
    pub fn update(&mut self, terrain: &mut Terrain) -> Vec<Block> {
        if self.body.digging {
            self.body.dig(terrain)
        } else {
            Vec::new()
        }
    }

    pub fn toggle_digging(&mut self) {
        self.body.digging = !self.body.digging;
        log::debug!("Digging: {}", self.body.digging);
    }

    pub fn owns(&self, emote: Emote) -> bool {
        self.owned_emotes.contains(&emote)
    }

    pub fn owned_emotes(&self) -> &EmoteSet {
        &self.owned_emotes
    }

    /// Show an owned emote; unowned emotes are ignored
    pub fn display_emote(&mut self, emote: Emote) -> bool {
        if !self.owns(emote) {
            return false;
        }
        self.body.show_emote(emote);
        true
    }

    /// Spend gold on an emote. Nothing changes on failure.
    pub fn buy_emote(&mut self, emote: Emote) -> Result<(), PurchaseError> {
        if self.owns(emote) {
            return Err(PurchaseError::AlreadyOwned(emote));
        }
        if self.body.gold < EMOTE_PRICE {
            return Err(PurchaseError::InsufficientGold {
                needed: EMOTE_PRICE,
                available: self.body.gold,
            });
        }
        self.body.set_gold(self.body.gold - EMOTE_PRICE);
        self.owned_emotes.insert(emote);
        log::info!("Bought emote {:?} ({} gold left)", emote, self.body.gold);
        Ok(())
    }

    /// The persistable slice of the player
    pub fn profile(&self) -> Profile {
        Profile {
            gold_score: self.body.gold,
            owned_emotes: self.owned_emotes.clone(),
        }
    }

    /// Adopt a loaded profile (gold drives level, caps and size)
    pub fn apply_profile(&mut self, profile: &Profile) {
        self.owned_emotes = profile.owned_emotes.clone();
        self.body.set_gold(profile.gold_score);
    }
}
