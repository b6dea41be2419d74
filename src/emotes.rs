//! Emote catalog and the emote wheel overlay
//!
//! Emotes are identified on disk by their stable integer id (declaration order).

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Set of emotes a player owns
pub type EmoteSet = BTreeSet<Emote>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Emote {
    Happy,
    Sad,
    Angry,
    Surprised,
    Love,
    Cool,
    Thinking,
    Laughing,
    Wink,
    Confused,
    Sleepy,
    Excited,
    Nervous,
    Sick,
    Rich,
    Strong,
    Scared,
    Crazy,
    Evil,
    Dead,
}

impl Emote {
    /// Full catalog in id order
    pub const ALL: [Emote; 20] = [
        Emote::Happy,
        Emote::Sad,
        Emote::Angry,
        Emote::Surprised,
        Emote::Love,
        Emote::Cool,
        Emote::Thinking,
        Emote::Laughing,
        Emote::Wink,
        Emote::Confused,
        Emote::Sleepy,
        Emote::Excited,
        Emote::Nervous,
        Emote::Sick,
        Emote::Rich,
        Emote::Strong,
        Emote::Scared,
        Emote::Crazy,
        Emote::Evil,
        Emote::Dead,
    ];

    /// Emotes every new profile starts with
    pub const STARTER: [Emote; 4] = [Emote::Happy, Emote::Sad, Emote::Angry, Emote::Surprised];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn starter_set() -> EmoteSet {
        Self::STARTER.into_iter().collect()
    }

    /// Text glyph drawn above a digger
    pub fn glyph(self) -> &'static str {
        match self {
            Emote::Happy => ":)",
            Emote::Sad => ":(",
            Emote::Angry => ">:(",
            Emote::Surprised => ":O",
            Emote::Love => "<3",
            Emote::Cool => "B)",
            Emote::Thinking => "O.o",
            Emote::Laughing => ":D",
            Emote::Wink => ";)",
            Emote::Confused => ":/",
            Emote::Sleepy => ":Z",
            Emote::Excited => ":P",
            Emote::Nervous => ":|",
            Emote::Sick => ":X",
            Emote::Rich => ":$",
            Emote::Strong => ":@",
            Emote::Scared => ":!",
            Emote::Crazy => ":#",
            Emote::Evil => ">:)",
            Emote::Dead => "x_x",
        }
    }
}

impl From<Emote> for u8 {
    fn from(emote: Emote) -> Self {
        emote.id()
    }
}

impl TryFrom<u8> for Emote {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Emote::from_id(id).ok_or_else(|| format!("unknown emote id {id}"))
    }
}

/// Radial emote picker centered on the screen
#[derive(Debug, Clone, Default)]
pub struct EmoteWheel {
    open: bool,
    selected: Option<Emote>,
}

impl EmoteWheel {
    pub const RADIUS: f32 = 100.0;
    /// Glyphs sit at this fraction of the radius
    pub const GLYPH_RING: f32 = 0.8;

    /// Angular spacing between slots
    pub fn slot_angle() -> f32 {
        TAU / Emote::ALL.len() as f32
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<Emote> {
        self.selected
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if !self.open {
            self.selected = None;
        }
    }

    /// Screen position of the i-th owned emote
    pub fn slot_position(index: usize, center: Vec2) -> Vec2 {
        let angle = index as f32 * Self::slot_angle();
        center + Vec2::from_angle(angle) * Self::RADIUS * Self::GLYPH_RING
    }

    /// Owned emote under a screen point, if the point is inside the wheel
    pub fn emote_at(point: Vec2, center: Vec2, owned: &[Emote]) -> Option<Emote> {
        let offset = point - center;
        if offset.length() > Self::RADIUS {
            return None;
        }
        let step = Self::slot_angle();
        // Nearest slot: shift by half a slot so boundaries fall between glyphs
        let angle = (offset.y.atan2(offset.x) + step / 2.0).rem_euclid(TAU);
        let index = ((angle / step).floor() as usize) % Emote::ALL.len();
        owned.get(index).copied()
    }

    /// Track the hovered slot
    pub fn hover(&mut self, point: Vec2, center: Vec2, owned: &[Emote]) {
        if self.open {
            self.selected = Self::emote_at(point, center, owned);
        }
    }

    /// Confirm the hovered emote and close the wheel
    pub fn confirm(&mut self) -> Option<Emote> {
        let chosen = self.selected.take();
        if chosen.is_some() {
            self.open = false;
        }
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        for (i, emote) in Emote::ALL.iter().enumerate() {
            assert_eq!(emote.id() as usize, i);
            assert_eq!(Emote::from_id(i as u8), Some(*emote));
        }
        assert_eq!(Emote::from_id(20), None);
        assert_eq!(serde_json::to_string(&Emote::Rich).unwrap(), "14");
        assert_eq!(serde_json::from_str::<Emote>("19").unwrap(), Emote::Dead);
        assert!(serde_json::from_str::<Emote>("42").is_err());
    }

    #[test]
    fn test_wheel_selection_matches_drawn_slots() {
        let center = Vec2::new(400.0, 300.0);
        let owned = [Emote::Happy, Emote::Sad, Emote::Angry, Emote::Cool];
        for (i, emote) in owned.iter().enumerate() {
            let at = EmoteWheel::slot_position(i, center);
            assert_eq!(EmoteWheel::emote_at(at, center, &owned), Some(*emote));
        }
        // Slot past the owned list and outside the wheel select nothing
        let empty_slot = EmoteWheel::slot_position(10, center);
        assert_eq!(EmoteWheel::emote_at(empty_slot, center, &owned), None);
        assert_eq!(EmoteWheel::emote_at(center + Vec2::new(150.0, 0.0), center, &owned), None);
    }

    #[test]
    fn test_wheel_confirm_closes() {
        let center = Vec2::ZERO;
        let owned = [Emote::Happy];
        let mut wheel = EmoteWheel::default();
        wheel.hover(Vec2::new(80.0, 0.0), center, &owned);
        assert_eq!(wheel.selected(), None, "closed wheel ignores hover");

        wheel.toggle();
        wheel.hover(Vec2::new(80.0, 0.0), center, &owned);
        assert_eq!(wheel.confirm(), Some(Emote::Happy));
        assert!(!wheel.is_open());
    }
}
