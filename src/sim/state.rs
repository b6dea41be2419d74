//! Game state and world configuration
//!
//! Everything the simulation mutates lives in [`GameState`]: terrain, the
//! player, the enemy roster, the camera, the seeded RNG and the timers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::enemy::Enemy;
use super::player::Player;
use super::terrain::Terrain;
use crate::consts::*;
use crate::persistence::Profile;

/// World dimensions and enemy population rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in world units
    pub width: u32,
    /// World height in world units
    pub height: u32,
    /// Population cap
    pub max_enemies: usize,
    /// Most enemies spawned in a single tick
    pub spawn_batch: usize,
    /// Enemies placed when the session starts
    pub initial_enemies: usize,
    /// Generate the whole grid (with ore) up front. When false, cells are
    /// created on first view as plain dirt, so a lazy world has no ore.
    pub pregenerate_terrain: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            max_enemies: MAX_ENEMIES,
            spawn_batch: SPAWN_BATCH,
            initial_enemies: INITIAL_ENEMIES,
            pregenerate_terrain: true,
        }
    }
}

/// Something noteworthy that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// An enemy left the roster. `reward` is 0 when it was worn down by terrain.
    EnemyDefeated { id: u32, reward: u64 },
    /// A larger (or equal) enemy hit the player
    PlayerHit { enemy: u32, damage: u32 },
    LevelChanged { from: u32, to: u32 },
    EnemiesSpawned { count: usize },
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub terrain: Terrain,
    pub player: Player,
    /// Active enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub camera: Camera,
    /// Simulated milliseconds since start
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Milliseconds accumulated toward the next health regen
    pub regen_timer_ms: f32,
    pub max_enemies: usize,
    pub spawn_batch: usize,
    /// Events from the most recent tick
    pub events: Vec<SimEvent>,
    next_id: u32,
}

impl GameState {
    /// Build the world, place the player at its center and spawn the first enemies
    pub fn new(config: &WorldConfig, seed: u64, profile: &Profile, viewport: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = if config.pregenerate_terrain {
            Terrain::generate(config.width, config.height, &mut rng)
        } else {
            Terrain::new(config.width, config.height)
        };
        let center = Vec2::new(config.width as f32, config.height as f32) / 2.0;
        let player = Player::new(center, profile);

        let mut state = Self {
            seed,
            rng,
            terrain,
            player,
            enemies: Vec::new(),
            camera: Camera::new(viewport),
            time_ms: 0.0,
            time_ticks: 0,
            regen_timer_ms: 0.0,
            max_enemies: config.max_enemies,
            spawn_batch: config.spawn_batch,
            events: Vec::new(),
            next_id: 1,
        };

        state.camera.update_zoom(state.player.body.size);
        state.camera.follow(center, state.world_size());
        state.reveal_view();
        state.spawn_enemies(config.initial_enemies);
        state.events.clear();

        log::info!(
            "World ready: {}x{} (seed {}, {} enemies)",
            config.width,
            config.height,
            seed,
            state.enemies.len()
        );
        state
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.terrain.width() as f32, self.terrain.height() as f32)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Materialize any cells the camera can see that do not exist yet
    pub fn reveal_view(&mut self) -> usize {
        self.terrain.ensure_generated(self.camera.view_rect().cells())
    }

    /// Spawn `count` enemies at uniformly random positions inside the world
    pub fn spawn_enemies(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let world = self.world_size();
        for _ in 0..count {
            let pos = Vec2::new(
                self.rng.random_range(0.0..world.x),
                self.rng.random_range(0.0..world.y),
            );
            let id = self.next_entity_id();
            self.enemies.push(Enemy::new(id, pos));
        }
        log::debug!("Spawned {} enemies ({} active)", count, self.enemies.len());
        self.events.push(SimEvent::EnemiesSpawned { count });
    }

    /// Drop worn-out enemies, then backfill toward the cap at most one batch per call
    pub fn maintain_population(&mut self) {
        let events = &mut self.events;
        self.enemies.retain(|enemy| {
            if enemy.body.is_exhausted() {
                log::debug!("Enemy {} wore itself out", enemy.id);
                events.push(SimEvent::EnemyDefeated {
                    id: enemy.id,
                    reward: 0,
                });
                false
            } else {
                true
            }
        });

        let missing = self.max_enemies.saturating_sub(self.enemies.len());
        self.spawn_enemies(missing.min(self.spawn_batch));
    }
}
