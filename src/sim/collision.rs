//! Collision detection and response
//!
//! Everything here is circle-vs-circle on the collision radius, which is
//! configured separately from the drawn shape radius.

use glam::Vec2;

use super::entity::{Entity, EntityId, Tag};
use super::spawn;
use super::state::GameState;
use crate::consts::{LARGE_ENEMY_SCORE, SMALL_ENEMY_SCORE};

/// Whether two circles overlap or touch
pub fn circles_touch(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) <= a_radius + b_radius
}

/// Bullet snapshot taken before enemies are borrowed mutably
#[derive(Debug, Clone, Copy)]
struct BulletHit {
    id: EntityId,
    center: Vec2,
    radius: f32,
    spent: bool,
}

/// System: resolve enemy-vs-bullet kills and enemy-vs-player resets
pub fn collision(state: &mut GameState) {
    let mut bullets: Vec<BulletHit> = state
        .entities
        .entities_with_tag(Tag::Bullet)
        .filter(|b| b.is_active())
        .filter_map(|b| {
            b.hit_circle().map(|(center, radius)| BulletHit {
                id: b.id(),
                center,
                radius,
                spent: false,
            })
        })
        .collect();
    let player = state
        .player()
        .filter(|p| p.is_active())
        .and_then(Entity::hit_circle);

    // Splits are spawned after the enemy pass
    let mut split_parents = Vec::new();
    let mut gained = 0;
    let mut player_hit = false;

    for enemy in state.entities.entities_with_tag_mut(Tag::Enemy) {
        if !enemy.is_active() {
            continue;
        }
        let Some((center, radius)) = enemy.hit_circle() else {
            continue;
        };

        if player.is_some_and(|(p, r)| circles_touch(center, radius, p, r)) {
            player_hit = true;
        }

        let Some(bullet) = bullets
            .iter_mut()
            .find(|b| !b.spent && circles_touch(center, radius, b.center, b.radius))
        else {
            continue;
        };
        bullet.spent = true;
        enemy.destroy();

        if enemy.lifespan.is_some() {
            gained += SMALL_ENEMY_SCORE;
        } else {
            gained += LARGE_ENEMY_SCORE;
            split_parents.push(enemy.clone());
        }
        log::debug!("{} {} killed {} {}", Tag::Bullet.as_str(), bullet.id, enemy.tag().as_str(), enemy.id());
    }

    for bullet in bullets.iter().filter(|b| b.spent) {
        if let Some(entity) = state.entities.get_mut(bullet.id) {
            entity.destroy();
        }
    }
    for parent in &split_parents {
        spawn::spawn_small_enemies(&mut state.entities, &state.config, parent);
    }
    state.score += gained;

    if player_hit {
        let center = state.config.window.center();
        if let Some(t) = state.player_mut().and_then(|p| p.transform.as_mut()) {
            t.position = center;
            t.velocity = Vec2::ZERO;
        }
        log::debug!("Player hit at frame {}, back to center", state.current_frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::entity::{CollisionBounds, Lifespan, Rgba, Shape, Transform};

    fn add(state: &mut GameState, tag: Tag, position: Vec2, radius: f32) -> EntityId {
        let e = state.entities.add_entity(tag);
        e.transform = Some(Transform::new(position, Vec2::new(1.0, 0.0), 0.0));
        e.shape = Some(Shape::new(radius, 5, Rgba::rgb(9, 9, 9), Rgba::WHITE, 1.0));
        e.collision = Some(CollisionBounds::new(radius));
        e.id()
    }

    /// Game with the player parked in a corner out of the way
    fn arena() -> GameState {
        let mut state = GameState::new(Config::default(), 1);
        state.player_mut().unwrap().transform.as_mut().unwrap().position = Vec2::new(5.0, 5.0);
        state.player_mut().unwrap().collision = Some(CollisionBounds::new(1.0));
        state
    }

    #[test]
    fn test_circles_touch_at_exact_sum() {
        assert!(circles_touch(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_touch(Vec2::ZERO, 5.0, Vec2::new(10.0001, 0.0), 5.0));
    }

    #[test]
    fn test_large_enemy_kill_scores_and_splits() {
        let mut state = arena();
        let enemy = add(&mut state, Tag::Enemy, Vec2::new(300.0, 300.0), 20.0);
        let bullet = add(&mut state, Tag::Bullet, Vec2::new(310.0, 300.0), 5.0);
        state.entities.update();

        collision(&mut state);
        assert_eq!(state.score, LARGE_ENEMY_SCORE);
        assert!(!state.entities.get(enemy).unwrap().is_active());
        assert!(!state.entities.get(bullet).unwrap().is_active());
        // One child per parent vertex, pending until the next update
        assert_eq!(state.entities.pending_len(), 5);

        state.entities.update();
        let children: Vec<_> = state.entities.entities_with_tag(Tag::Enemy).collect();
        assert_eq!(children.len(), 5);
        assert!(children.iter().all(|c| c.lifespan.is_some()));
        assert!(children.iter().all(|c| c.collision.unwrap().radius == 5.0));
    }

    #[test]
    fn test_small_enemy_kill_does_not_split() {
        let mut state = arena();
        let enemy = add(&mut state, Tag::Enemy, Vec2::new(300.0, 300.0), 8.0);
        state.entities.get_mut(enemy).unwrap().lifespan = Some(Lifespan::new(30));
        add(&mut state, Tag::Bullet, Vec2::new(300.0, 305.0), 5.0);
        state.entities.update();

        collision(&mut state);
        assert_eq!(state.score, SMALL_ENEMY_SCORE);
        assert_eq!(state.entities.pending_len(), 0);
    }

    #[test]
    fn test_first_bullet_wins_one_kill_per_enemy() {
        let mut state = arena();
        add(&mut state, Tag::Enemy, Vec2::new(300.0, 300.0), 20.0);
        let first = add(&mut state, Tag::Bullet, Vec2::new(300.0, 300.0), 5.0);
        let second = add(&mut state, Tag::Bullet, Vec2::new(305.0, 300.0), 5.0);
        state.entities.update();

        collision(&mut state);
        assert_eq!(state.score, LARGE_ENEMY_SCORE);
        assert!(!state.entities.get(first).unwrap().is_active());
        assert!(state.entities.get(second).unwrap().is_active());
    }

    #[test]
    fn test_spent_bullet_not_reused_on_overlapping_enemies() {
        let mut state = arena();
        let a = add(&mut state, Tag::Enemy, Vec2::new(300.0, 300.0), 20.0);
        let b = add(&mut state, Tag::Enemy, Vec2::new(310.0, 300.0), 20.0);
        add(&mut state, Tag::Bullet, Vec2::new(305.0, 300.0), 5.0);
        state.entities.update();

        collision(&mut state);
        assert!(!state.entities.get(a).unwrap().is_active());
        assert!(state.entities.get(b).unwrap().is_active());
        assert_eq!(state.score, LARGE_ENEMY_SCORE);
    }

    #[test]
    fn test_player_reset_on_enemy_contact() {
        let mut state = GameState::new(Config::default(), 1);
        let center = state.config.window.center();
        state.player_mut().unwrap().transform.as_mut().unwrap().position = Vec2::new(100.0, 100.0);
        let enemy = add(&mut state, Tag::Enemy, Vec2::new(110.0, 100.0), 10.0);
        state.entities.update();

        collision(&mut state);
        assert_eq!(state.player().unwrap().position(), Some(center));
        assert!(state.entities.get(enemy).unwrap().is_active());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_missing_collision_component_never_collides() {
        let mut state = arena();
        let enemy = add(&mut state, Tag::Enemy, Vec2::new(300.0, 300.0), 20.0);
        state.entities.get_mut(enemy).unwrap().collision = None;
        add(&mut state, Tag::Bullet, Vec2::new(300.0, 300.0), 5.0);
        state.entities.update();

        collision(&mut state);
        assert_eq!(state.score, 0);
        assert!(state.entities.get(enemy).unwrap().is_active());
    }
}
