//! Digger-vs-digger contact and combat resolution
//!
//! Diggers are circles whose diameter is their size. When the player and an
//! enemy overlap, the bigger one wins; equal sizes go to the enemy.

use glam::Vec2;

use super::digger::Digger;
use crate::consts::*;

/// Keeps bounced diggers strictly inside `[0, width) x [0, height)`
const WORLD_EDGE_INSET: f32 = 0.01;

/// Result of an overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the enemy toward the player
    pub normal: Vec2,
    /// Center distance
    pub distance: f32,
}

/// Circles overlap when their centers are closer than the mean of their sizes
pub fn circle_contact(player_pos: Vec2, player_size: f32, enemy_pos: Vec2, enemy_size: f32) -> Option<Contact> {
    let offset = player_pos - enemy_pos;
    let distance = offset.length();
    if distance >= (player_size + enemy_size) / 2.0 {
        return None;
    }
    Some(Contact {
        normal: offset.try_normalize().unwrap_or(Vec2::X),
        distance,
    })
}

/// What happens to the two combatants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatOutcome {
    /// Player eats the enemy and gains `reward` score
    PlayerWins { reward: u64 },
    /// Player takes `damage`; the enemy is knocked back to `bounce_to`
    EnemyWins { damage: u32, bounce_to: Vec2 },
}

/// Decide a contact. Ties resolve as an enemy win.
pub fn resolve_combat(player: &Digger, enemy: &Digger, contact: &Contact, world: Vec2) -> CombatOutcome {
    if player.size > enemy.size {
        CombatOutcome::PlayerWins {
            reward: enemy.size.floor() as u64,
        }
    } else {
        let bounced = enemy.pos - contact.normal * BOUNCE_DISTANCE;
        CombatOutcome::EnemyWins {
            damage: (enemy.size / DAMAGE_SIZE_DIVISOR).floor() as u32,
            bounce_to: clamp_into_world(bounced, world),
        }
    }
}

pub fn clamp_into_world(pos: Vec2, world: Vec2) -> Vec2 {
    pos.clamp(Vec2::ZERO, (world - Vec2::splat(WORLD_EDGE_INSET)).max(Vec2::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(1000.0, 1000.0);

    fn digger(pos: Vec2, size: f32) -> Digger {
        let mut d = Digger::new(pos, 100, 0, 0);
        d.size = size;
        d
    }

    #[test]
    fn test_contact_threshold() {
        let p = Vec2::new(100.0, 100.0);
        assert!(circle_contact(p, 40.0, p + Vec2::new(34.9, 0.0), 30.0).is_some());
        assert!(circle_contact(p, 40.0, p + Vec2::new(35.0, 0.0), 30.0).is_none());

        let contact = circle_contact(p, 40.0, p + Vec2::new(0.0, 10.0), 30.0).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));

        // Perfectly stacked circles still yield a usable normal
        let stacked = circle_contact(p, 40.0, p, 30.0).unwrap();
        assert_eq!(stacked.normal, Vec2::X);
    }

    #[test]
    fn test_bigger_player_wins() {
        let player = digger(Vec2::new(100.0, 100.0), 40.0);
        let enemy = digger(Vec2::new(120.0, 100.0), 30.0);
        let contact = circle_contact(player.pos, player.size, enemy.pos, enemy.size).unwrap();
        assert_eq!(
            resolve_combat(&player, &enemy, &contact, WORLD),
            CombatOutcome::PlayerWins { reward: 30 }
        );
    }

    #[test]
    fn test_bigger_enemy_hurts_and_bounces_away() {
        let player = digger(Vec2::new(100.0, 100.0), 30.0);
        let enemy = digger(Vec2::new(120.0, 100.0), 40.0);
        let contact = circle_contact(player.pos, player.size, enemy.pos, enemy.size).unwrap();
        match resolve_combat(&player, &enemy, &contact, WORLD) {
            CombatOutcome::EnemyWins { damage, bounce_to } => {
                assert_eq!(damage, 4);
                assert_eq!(bounce_to, Vec2::new(140.0, 100.0));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_equal_sizes_favor_enemy() {
        let player = digger(Vec2::new(100.0, 100.0), 35.0);
        let enemy = digger(Vec2::new(110.0, 100.0), 35.0);
        let contact = circle_contact(player.pos, player.size, enemy.pos, enemy.size).unwrap();
        assert!(matches!(
            resolve_combat(&player, &enemy, &contact, WORLD),
            CombatOutcome::EnemyWins { damage: 3, .. }
        ));
    }

    #[test]
    fn test_bounce_stays_in_world() {
        let player = digger(Vec2::new(15.0, 500.0), 30.0);
        let enemy = digger(Vec2::new(5.0, 500.0), 40.0);
        let contact = circle_contact(player.pos, player.size, enemy.pos, enemy.size).unwrap();
        let CombatOutcome::EnemyWins { bounce_to, .. } = resolve_combat(&player, &enemy, &contact, WORLD) else {
            panic!("enemy should win");
        };
        assert_eq!(bounce_to, Vec2::new(0.0, 500.0));
    }
}
