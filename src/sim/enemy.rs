//! Enemy diggers and their steering policies
//!
//! An enemy is a digger that crawls at a fraction of the player's speed and
//! delegates "where do I go" to a [`SteeringPolicy`]. The policy sees the
//! player's position by value each tick; enemies never hold onto the player.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::camera::ViewRect;
use super::digger::{Digger, MobileDigger, movement_speed};
use super::terrain::{Block, BlockKind, Terrain};
use crate::consts::*;
use crate::emotes::Emote;

/// What a policy may look at when choosing a heading
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    /// Pursuit target (the player)
    pub target: Vec2,
    /// Current camera view; enemies outside it are "off-screen"
    pub view: ViewRect,
    pub terrain: &'a Terrain,
}

/// Chooses a movement direction each tick. Must finish in bounded time.
pub trait SteeringPolicy: fmt::Debug {
    /// Desired direction (unit length, or zero to stand still)
    fn steer(&mut self, me: &Digger, ctx: &SteeringContext<'_>, rng: &mut Pcg32) -> Vec2;

    /// Called when the chosen move was rejected at the world edge
    fn blocked(&mut self) {}
}

/// Wander while off-screen; on screen, chase whichever is closer of the
/// player and the nearest visible gold ore.
#[derive(Debug, Clone, Default)]
pub struct Hunter {
    wander_dir: Vec2,
    wander_ticks: u32,
}

impl Hunter {
    pub const MIN_WANDER_TICKS: u32 = 30;
    pub const MAX_WANDER_TICKS: u32 = 120;

    fn wander(&mut self, rng: &mut Pcg32) -> Vec2 {
        if self.wander_ticks == 0 {
            self.wander_dir = Vec2::from_angle(rng.random_range(0.0..TAU));
            self.wander_ticks = rng.random_range(Self::MIN_WANDER_TICKS..=Self::MAX_WANDER_TICKS);
        }
        self.wander_ticks -= 1;
        self.wander_dir
    }
}

impl SteeringPolicy for Hunter {
    fn steer(&mut self, me: &Digger, ctx: &SteeringContext<'_>, rng: &mut Pcg32) -> Vec2 {
        if !ctx.view.contains(me.pos) {
            return self.wander(rng);
        }
        let to_target = me.pos.distance_squared(ctx.target);
        let goal = match ctx
            .terrain
            .nearest_present(BlockKind::GoldOre, me.pos, GOLD_DETECTION_RADIUS)
        {
            Some(gold) if gold.distance_squared(me.pos) < to_target => gold,
            _ => ctx.target,
        };
        (goal - me.pos).normalize_or_zero()
    }

    fn blocked(&mut self) {
        self.wander_ticks = 0;
    }
}

#[derive(Debug)]
pub struct Enemy {
    pub id: u32,
    pub body: Digger,
    policy: Box<dyn SteeringPolicy>,
}

impl MobileDigger for Enemy {
    fn body(&self) -> &Digger {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Digger {
        &mut self.body
    }

    fn speed(&self) -> f32 {
        movement_speed(self.body.size, &self.body.progression) * ENEMY_SPEED_FACTOR
    }
}

impl Enemy {
    /// A fresh enemy with the default [`Hunter`] policy
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self::with_policy(id, pos, Box::new(Hunter::default()))
    }

    pub fn with_policy(id: u32, pos: Vec2, policy: Box<dyn SteeringPolicy>) -> Self {
        Self {
            id,
            body: Digger::new(pos, ENEMY_START_HEALTH, ENEMY_START_SCORE, 0),
            policy,
        }
    }

    /// Steer, move (digging on arrival) and maybe pull a face
    pub fn update(&mut self, target: Vec2, view: ViewRect, terrain: &mut Terrain, rng: &mut Pcg32) -> Vec<Block> {
        let heading = {
            let ctx = SteeringContext {
                target,
                view,
                terrain,
            };
            self.policy.steer(&self.body, &ctx, rng)
        };

        let mut dug = Vec::new();
        if heading != Vec2::ZERO {
            match self.try_move(heading.x, heading.y, terrain) {
                Some(blocks) => dug = blocks,
                None => self.policy.blocked(),
            }
        }

        if rng.random::<f64>() < ENEMY_EMOTE_CHANCE {
            let emote = Emote::STARTER[rng.random_range(0..Emote::STARTER.len())];
            self.body.show_emote(emote);
        }
        dug
    }
}
