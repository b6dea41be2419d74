//! Dig Blob - A dig-and-grow arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, diggers, camera, combat)
//! - `renderer`: Pure draw-command generation for a 2D immediate-mode surface
//! - `persistence`: Injected key-value storage for the player profile
//! - `session`: Entry points used by the presentation layer
//! - `shop` / `emotes`: Cosmetic emote catalog and the in-game shop

pub mod emotes;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod shop;
pub mod sim;

pub use emotes::Emote;
pub use session::{InputEvent, Session, SessionError, Viewport};
pub use settings::{ControlScheme, Settings};

/// Game configuration constants
pub mod consts {
    use crate::sim::terrain::BlockKind;

    /// Terrain cell edge length in world units
    pub const CELL_SIZE: f32 = 10.0;
    /// Cells per chunk edge in the terrain store
    pub const CHUNK_SIZE: i64 = 32;

    /// Default world dimensions (world units)
    pub const DEFAULT_WORLD_WIDTH: u32 = 10_000;
    pub const DEFAULT_WORLD_HEIGHT: u32 = 10_000;

    /// Digger size law
    pub const MIN_SIZE: f32 = 20.0;
    pub const MAX_SIZE: f32 = 1000.0;
    pub const GROWTH_FACTOR: f32 = 1.5;
    /// Size multiplier gained per level above 1
    pub const LEVEL_SIZE_BONUS: f32 = 0.1;

    /// Digger speed law
    pub const BASE_SPEED: f32 = 4.0;
    pub const BASE_SPEED_PER_LEVEL: f32 = 0.1;
    pub const MIN_SPEED: f32 = 0.3;
    /// Fraction of base speed lost at maximum size
    pub const SIZE_SLOWDOWN: f32 = 0.95;
    pub const LEVEL_SPEED_BONUS: f32 = 0.05;
    /// Enemies crawl at a fraction of the player formula
    pub const ENEMY_SPEED_FACTOR: f32 = 0.2;

    /// Vitals
    pub const BASE_MAX_HEALTH: u32 = 100;
    pub const MAX_HEALTH_PER_LEVEL: u32 = 10;
    pub const BASE_MAX_SHIELD: u32 = 100;
    pub const MAX_SHIELD_PER_LEVEL: u32 = 5;
    pub const PLAYER_START_HEALTH: u32 = 100;
    pub const ENEMY_START_HEALTH: u32 = 50;
    /// Enemies hatch already carrying this much score
    pub const ENEMY_START_SCORE: u64 = 20;

    /// Progression
    pub const GOLD_PER_LEVEL_STEP: u64 = 100;
    pub const XP_TO_NEXT_LEVEL: u64 = 100;

    /// Block effects
    pub const URANIUM_DAMAGE: u32 = 5;
    pub const LAVA_DAMAGE: u32 = 20;
    pub const QUARTZ_SHIELD: u32 = 10;
    pub const BEDROCK_SCORE: u64 = 5;
    pub const DIRT_SCORE: u64 = 1;
    pub const GOLD_PER_ORE: u64 = 1;

    /// Health regeneration
    pub const REGEN_INTERVAL_MS: f32 = 500.0;
    pub const REGEN_AMOUNT: u32 = 2;

    /// Camera
    pub const MAX_ZOOM: f32 = 1.0;
    pub const ZOOM_CAP: f32 = 0.4;
    /// Target zoom at maximum size before the cap is applied
    pub const ZOOM_FLOOR_RATIO: f32 = 0.05;
    pub const ZOOM_SMOOTHING: f32 = 0.9;

    /// Combat
    pub const BOUNCE_DISTANCE: f32 = 20.0;
    pub const DAMAGE_SIZE_DIVISOR: f32 = 10.0;

    /// Enemy population
    pub const MAX_ENEMIES: usize = 40;
    pub const SPAWN_BATCH: usize = 5;
    pub const INITIAL_ENEMIES: usize = 20;
    pub const GOLD_DETECTION_RADIUS: f32 = 100.0;
    pub const ENEMY_EMOTE_CHANCE: f64 = 0.001;

    /// Pointer-follow dead zone (world units)
    pub const POINTER_DEAD_ZONE: f32 = 5.0;

    /// Emotes and shop
    pub const EMOTE_DURATION_MS: f32 = 2000.0;
    pub const EMOTE_PRICE: u64 = 300;
    pub const SHOP_SIZE: usize = 12;

    /// Bedrock durabilities
    pub const BEDROCK_DURABILITY: u16 = 50;
    pub const GEODE_SHELL_DURABILITY: u16 = 100;

    /// Ore cluster passes, applied in this order (later passes overwrite earlier ones)
    pub const ORE_LAYERS: [OreLayer; 6] = [
        OreLayer::new(BlockKind::Diamond, 0.0001, 3, 7),
        OreLayer::new(BlockKind::Uranium, 0.00005, 2, 5),
        OreLayer::new(BlockKind::Lava, 0.0002, 3, 6),
        OreLayer::new(BlockKind::Quartz, 0.0001, 3, 7),
        OreLayer::new(BlockKind::Bedrock, 0.00005, 2, 5),
        OreLayer::new(BlockKind::GoldOre, 0.00015, 3, 6),
    ];

    /// Geodes are stamped after every ore layer
    pub const GEODE_CHANCE: f64 = 0.000005;
    pub const GEODE_MIN_RADIUS: u32 = 5;
    pub const GEODE_MAX_RADIUS: u32 = 8;

    /// One cluster pass of the terrain generator
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct OreLayer {
        pub kind: BlockKind,
        /// Per-cell chance of seeding a cluster
        pub chance: f64,
        /// Cluster radius range in cells (inclusive)
        pub min_radius: u32,
        pub max_radius: u32,
    }

    impl OreLayer {
        pub const fn new(kind: BlockKind, chance: f64, min_radius: u32, max_radius: u32) -> Self {
            Self {
                kind,
                chance,
                min_radius,
                max_radius,
            }
        }
    }
}

/// Map a world coordinate to its terrain cell index
#[inline]
pub fn world_to_cell(coord: f32) -> i64 {
    (coord / consts::CELL_SIZE).floor() as i64
}

/// World-space center of a terrain cell
#[inline]
pub fn cell_center(cell: i64) -> f32 {
    cell as f32 * consts::CELL_SIZE + consts::CELL_SIZE / 2.0
}
