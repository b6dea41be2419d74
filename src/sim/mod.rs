//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (terrain in raster order, enemies in spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod digger;
pub mod enemy;
pub mod player;
pub mod progression;
pub mod state;
pub mod terrain;
pub mod tick;

pub use camera::{Camera, ViewRect};
pub use collision::{CombatOutcome, Contact, circle_contact, resolve_combat};
pub use digger::{ActiveEmote, Digger, MobileDigger, movement_speed, size_for_score};
pub use enemy::{Enemy, Hunter, SteeringContext, SteeringPolicy};
pub use player::Player;
pub use progression::Progression;
pub use state::{GameState, SimEvent, WorldConfig};
pub use terrain::{Block, BlockKind, CellRect, Terrain, cluster_noise};
pub use tick::{TickInput, tick};
