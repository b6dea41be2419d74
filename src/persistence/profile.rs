//! Persistable player profile
//!
//! Stored as `{"goldScore": <int>, "ownedEmotes": [<emote id>, ...]}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PersistenceProvider;
use crate::emotes::{Emote, EmoteSet};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("malformed profile: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Gold and emote ownership carried between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub gold_score: u64,
    pub owned_emotes: EmoteSet,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            gold_score: 0,
            owned_emotes: Emote::starter_set(),
        }
    }
}

/// Wire shape before emote ids are validated
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    #[serde(default)]
    gold_score: u64,
    owned_emotes: Option<Vec<i64>>,
}

impl Profile {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "dig_blob_profile";

    /// Parse a stored profile. Unknown emote ids are dropped; a missing
    /// emote list means the starter set.
    pub fn decode(json: &str) -> Result<Self, ProfileError> {
        let raw: RawProfile = serde_json::from_str(json)?;
        let owned_emotes = match raw.owned_emotes {
            Some(ids) => ids
                .into_iter()
                .filter_map(|id| u8::try_from(id).ok().and_then(Emote::from_id))
                .collect(),
            None => Emote::starter_set(),
        };
        Ok(Self {
            gold_score: raw.gold_score,
            owned_emotes,
        })
    }

    pub fn encode(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load from storage, falling back to the defaults when absent or corrupt
    pub fn load(store: &dyn PersistenceProvider) -> Self {
        let Some(json) = store.load(Self::STORAGE_KEY) else {
            log::info!("No saved profile, starting fresh");
            return Self::default();
        };
        match Self::decode(&json) {
            Ok(profile) => {
                log::info!(
                    "Loaded profile: {} gold, {} emotes",
                    profile.gold_score,
                    profile.owned_emotes.len()
                );
                profile
            }
            Err(e) => {
                log::warn!("Ignoring saved profile ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn PersistenceProvider) {
        match self.encode() {
            Ok(json) => store.save(Self::STORAGE_KEY, &json),
            Err(e) => log::warn!("Failed to encode profile: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_wire_format() {
        let profile = Profile {
            gold_score: 250,
            owned_emotes: [Emote::Happy, Emote::Cool, Emote::Dead].into_iter().collect(),
        };
        assert_eq!(
            profile.encode().unwrap(),
            r#"{"goldScore":250,"ownedEmotes":[0,5,19]}"#
        );
        assert_eq!(Profile::decode(r#"{"goldScore":250,"ownedEmotes":[19,0,5]}"#).unwrap(), profile);
    }

    #[test]
    fn test_unknown_emote_ids_are_skipped() {
        let profile = Profile::decode(r#"{"goldScore":7,"ownedEmotes":[1,42,-3,1000,2]}"#).unwrap();
        assert_eq!(profile.gold_score, 7);
        assert_eq!(
            profile.owned_emotes,
            [Emote::Sad, Emote::Angry].into_iter().collect::<EmoteSet>()
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let profile = Profile::decode("{}").unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_corrupt_storage_falls_back() {
        for bad in ["not json", r#"{"goldScore":-5}"#, r#"{"ownedEmotes":"lots"}"#, "42"] {
            assert!(Profile::decode(bad).is_err(), "{bad}");
            let store = MemoryStore::new().with_entry(Profile::STORAGE_KEY, bad);
            assert_eq!(Profile::load(&store), Profile::default());
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        assert_eq!(Profile::load(&store), Profile::default());

        let mut profile = Profile::default();
        profile.gold_score = 1234;
        profile.owned_emotes.insert(Emote::Rich);
        profile.save(&mut store);
        assert_eq!(Profile::load(&store), profile);
    }
}
