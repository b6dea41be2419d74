//! Per-tick simulation step
//!
//! One call to [`tick`] advances the world by one frame. Steps run in a fixed
//! order: player input, player digging, regen, camera, enemies and combat,
//! population upkeep, emote timers.

use glam::Vec2;

use super::collision::{CombatOutcome, circle_contact, resolve_combat};
use super::digger::MobileDigger;
use super::state::{GameState, SimEvent};
use crate::consts::*;

/// Input sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Held keyboard direction, components in -1..=1
    pub direction: Vec2,
    /// Screen-space pointer to follow (pointer control scheme); overrides `direction`
    pub pointer: Option<Vec2>,
}

impl TickInput {
    /// Direction the player wants to move this tick
    pub fn resolve(&self, state: &GameState) -> Vec2 {
        match self.pointer {
            Some(screen) => {
                let offset = state.camera.screen_to_world(screen) - state.player.body.pos;
                if offset.length() > POINTER_DEAD_ZONE {
                    offset.normalize()
                } else {
                    Vec2::ZERO
                }
            }
            None => self.direction,
        }
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds
///
/// Negative or non-finite deltas count as zero elapsed time.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let dt_ms = if dt_ms.is_finite() && dt_ms > 0.0 { dt_ms } else { 0.0 };
    state.events.clear();
    let level_before = state.player.body.level();
    let world = state.world_size();

    // 1. Player movement (digs at the destination)
    let direction = input.resolve(state);
    if direction != Vec2::ZERO {
        state
            .player
            .try_move(direction.x, direction.y, &mut state.terrain);
    }

    // 2. Continuous digging
    state.player.update(&mut state.terrain);

    // 3. Health regen
    state.regen_timer_ms += dt_ms;
    if state.regen_timer_ms >= REGEN_INTERVAL_MS {
        let intervals = (state.regen_timer_ms / REGEN_INTERVAL_MS).floor() as u32;
        state.regen_timer_ms %= REGEN_INTERVAL_MS;
        state
            .player
            .body
            .recover_health(REGEN_AMOUNT.saturating_mul(intervals));
    }

    // 4-5. Camera zoom, follow, and lazily uncovered terrain
    state.camera.update_zoom(state.player.body.size);
    state.camera.follow(state.player.body.pos, world);
    state.reveal_view();

    // 6. Enemies and combat
    {
        let GameState {
            terrain,
            player,
            enemies,
            camera,
            rng,
            events,
            ..
        } = state;
        let view = camera.view_rect();

        let mut i = 0;
        while i < enemies.len() {
            let enemy = &mut enemies[i];
            enemy.update(player.body.pos, view, terrain, rng);

            let Some(contact) = circle_contact(player.body.pos, player.body.size, enemy.body.pos, enemy.body.size)
            else {
                i += 1;
                continue;
            };

            match resolve_combat(&player.body, &enemy.body, &contact, world) {
                CombatOutcome::PlayerWins { reward } => {
                    player.body.add_score(reward);
                    log::debug!("Enemy {} defeated (+{})", enemy.id, reward);
                    events.push(SimEvent::EnemyDefeated { id: enemy.id, reward });
                    enemies.remove(i);
                }
                CombatOutcome::EnemyWins { damage, bounce_to } => {
                    player.body.take_damage(damage);
                    enemy.body.pos = bounce_to;
                    events.push(SimEvent::PlayerHit {
                        enemy: enemy.id,
                        damage,
                    });
                    i += 1;
                }
            }
        }
    }

    // 7. Population upkeep
    state.maintain_population();

    // 8. Emote timers
    state.player.body.update_emote(dt_ms);
    for enemy in &mut state.enemies {
        enemy.body.update_emote(dt_ms);
    }

    let level_after = state.player.body.level();
    if level_after != level_before {
        state.events.push(SimEvent::LevelChanged {
            from: level_before,
            to: level_after,
        });
    }

    state.time_ms += dt_ms as f64;
    state.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Profile;
    use crate::sim::digger::Digger;
    use crate::sim::enemy::{Enemy, SteeringContext, SteeringPolicy};
    use crate::sim::state::WorldConfig;
    use rand_pcg::Pcg32;

    const DT: f32 = 16.0;

    /// Stands still so combat can be set up precisely
    #[derive(Debug)]
    struct Idle;

    impl SteeringPolicy for Idle {
        fn steer(&mut self, _me: &Digger, _ctx: &SteeringContext<'_>, _rng: &mut Pcg32) -> Vec2 {
            Vec2::ZERO
        }
    }

    fn empty_world() -> GameState {
        let config = WorldConfig {
            width: 1000,
            height: 1000,
            max_enemies: 0,
            initial_enemies: 0,
            pregenerate_terrain: false,
            ..Default::default()
        };
        GameState::new(&config, 99, &Profile::default(), Vec2::new(400.0, 300.0))
    }

    fn idle_enemy_on_player(state: &mut GameState, size: f32) -> u32 {
        let id = state.next_entity_id();
        let mut enemy = Enemy::with_policy(id, state.player.body.pos + Vec2::new(5.0, 0.0), Box::new(Idle));
        enemy.body.size = size;
        state.enemies.push(enemy);
        id
    }

    #[test]
    fn test_bigger_player_eats_enemy() {
        let mut state = empty_world();
        state.player.body.size = 40.0;
        let id = idle_enemy_on_player(&mut state, 30.0);

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.body.score, 30);
        assert_eq!(state.events, vec![SimEvent::EnemyDefeated { id, reward: 30 }]);
    }

    #[test]
    fn test_bigger_enemy_hurts_player() {
        let mut state = empty_world();
        state.player.body.size = 30.0;
        let id = idle_enemy_on_player(&mut state, 40.0);
        let player_pos = state.player.body.pos;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.body.health, 96);
        assert_eq!(state.enemies.len(), 1);
        // Knocked back 20 units, away from the player
        assert_eq!(state.enemies[0].body.pos, player_pos + Vec2::new(25.0, 0.0));
        assert_eq!(state.events, vec![SimEvent::PlayerHit { enemy: id, damage: 4 }]);
    }

    #[test]
    fn test_equal_sizes_favor_enemy() {
        let mut state = empty_world();
        state.player.body.size = 30.0;
        idle_enemy_on_player(&mut state, 30.0);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.body.health, 97);
        assert_eq!(state.player.body.score, 0);
    }

    #[test]
    fn test_population_cap_and_backfill() {
        let mut state = empty_world();
        state.max_enemies = MAX_ENEMIES;
        let mut counts = Vec::new();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
            counts.push(state.enemies.len());
        }
        assert_eq!(&counts[..8], &[5, 10, 15, 20, 25, 30, 35, 40]);
        assert!(counts.iter().all(|&c| c <= MAX_ENEMIES));
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_regen_every_half_second() {
        let mut state = empty_world();
        state.player.body.health = 50;
        tick(&mut state, &TickInput::default(), 250.0);
        assert_eq!(state.player.body.health, 50);
        tick(&mut state, &TickInput::default(), 250.0);
        assert_eq!(state.player.body.health, 52);
        tick(&mut state, &TickInput::default(), 1000.0);
        assert_eq!(state.player.body.health, 56);

        state.player.body.health = 99;
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.player.body.health, 100);
    }

    #[test]
    fn test_bad_frame_delta_keeps_timers_running() {
        let mut state = empty_world();
        state.player.body.health = 50;
        state.player.display_emote(crate::emotes::Emote::Happy);

        tick(&mut state, &TickInput::default(), f32::NAN);
        tick(&mut state, &TickInput::default(), f32::INFINITY);
        tick(&mut state, &TickInput::default(), -500.0);
        assert_eq!(state.player.body.health, 50);
        assert!(state.regen_timer_ms.is_finite());
        assert_eq!(state.time_ms, 0.0);

        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.player.body.health, 52);
        tick(&mut state, &TickInput::default(), 2000.0);
        assert!(state.player.body.emote.is_none());
    }

    #[test]
    fn test_huge_frame_delta_returns() {
        let mut state = empty_world();
        state.player.body.health = 10;
        tick(&mut state, &TickInput::default(), 1e10);
        assert_eq!(state.player.body.health, 100);
        assert!(state.regen_timer_ms >= 0.0 && state.regen_timer_ms < REGEN_INTERVAL_MS);

        state.player.body.health = 50;
        tick(&mut state, &TickInput::default(), REGEN_INTERVAL_MS);
        assert_eq!(state.player.body.health, 52);
    }

    #[test]
    fn test_move_rejected_at_world_edge() {
        let mut state = empty_world();
        state.player.body.pos = Vec2::new(0.0, 500.0);
        let input = TickInput {
            direction: Vec2::new(-1.0, 0.0),
            pointer: None,
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.body.pos, Vec2::new(0.0, 500.0));
    }

    #[test]
    fn test_keyboard_movement_digs_a_trail() {
        let mut state = empty_world();
        let start = state.player.body.pos;
        let input = TickInput {
            direction: Vec2::new(1.0, 0.0),
            pointer: None,
        };
        for _ in 0..10 {
            tick(&mut state, &input, DT);
        }
        assert!(state.player.body.pos.x > start.x);
        assert_eq!(state.player.body.pos.y, start.y);
        assert!(state.player.body.score > 0);
        assert_eq!(state.player.body.facing, Vec2::X);
    }

    #[test]
    fn test_pointer_follow_with_dead_zone() {
        let mut state = empty_world();
        let start = state.player.body.pos;
        let on_player = state.camera.world_to_screen(start);

        let input = TickInput {
            direction: Vec2::new(1.0, 0.0),
            pointer: Some(on_player + Vec2::new(3.0, 0.0)),
        };
        assert_eq!(input.resolve(&state), Vec2::ZERO);

        let input = TickInput {
            direction: Vec2::ZERO,
            pointer: Some(on_player + Vec2::new(0.0, 100.0)),
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.body.pos.x, start.x);
        assert!(state.player.body.pos.y > start.y);
    }

    #[test]
    fn test_level_change_event() {
        let mut state = empty_world();
        state.player.body.set_gold(99);
        // A gold ore cell right under the player
        let (cx, cy) = (
            crate::world_to_cell(state.player.body.pos.x),
            crate::world_to_cell(state.player.body.pos.y),
        );
        state
            .terrain
            .set_cell(cx, cy, crate::sim::terrain::Block::new(crate::sim::terrain::BlockKind::GoldOre));
        state.player.toggle_digging();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.body.level(), 2);
        assert!(state.events.contains(&SimEvent::LevelChanged { from: 1, to: 2 }));
    }

    #[test]
    fn test_emote_timers_advance() {
        let mut state = empty_world();
        assert!(state.player.display_emote(crate::emotes::Emote::Happy));
        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), 500.0);
        }
        assert!(state.player.body.emote.is_none());
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = WorldConfig {
            width: 1500,
            height: 1500,
            ..Default::default()
        };
        let viewport = Vec2::new(400.0, 300.0);
        let mut a = GameState::new(&config, 5, &Profile::default(), viewport);
        let mut b = GameState::new(&config, 5, &Profile::default(), viewport);
        let input = TickInput {
            direction: Vec2::new(1.0, 1.0),
            pointer: None,
        };
        for _ in 0..60 {
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.player.body.pos, b.player.body.pos);
        assert_eq!(a.player.body.score, b.player.body.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.id, eb.id);
            assert_eq!(ea.body.pos, eb.body.pos);
        }
    }
}
