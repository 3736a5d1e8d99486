//! Movement system
//!
//! Player moves from its held input and stays inside the window. Bullets
//! fly straight. Enemies bounce off the window edges.

use glam::Vec2;

use super::entity::{Entity, Tag, Transform};
use super::state::GameState;
use crate::consts::{ENEMY_SPIN, PLAYER_SPIN, SMALL_ENEMY_SPIN};

/// System: advance every active player, bullet and enemy by one frame
pub fn movement(state: &mut GameState) {
    let bounds = Vec2::new(state.config.window.width as f32, state.config.window.height as f32);
    let speed = state.config.player.speed;

    for player in state.entities.entities_with_tag_mut(Tag::Player) {
        if player.is_active() {
            move_player(player, speed, bounds);
        }
    }

    for bullet in state.entities.entities_with_tag_mut(Tag::Bullet) {
        if !bullet.is_active() {
            continue;
        }
        if let Some(t) = bullet.transform.as_mut() {
            t.position += t.velocity;
        }
    }

    for enemy in state.entities.entities_with_tag_mut(Tag::Enemy) {
        if !enemy.is_active() {
            continue;
        }
        let spin = if enemy.lifespan.is_some() {
            SMALL_ENEMY_SPIN
        } else {
            ENEMY_SPIN
        };
        if let Some(t) = enemy.transform.as_mut() {
            bounce(t, bounds);
            t.position += t.velocity;
            t.angle += spin;
        }
    }
}

/// Move from held directions at `speed`, clamped inside `bounds` by the shape radius
pub fn move_player(player: &mut Entity, speed: f32, bounds: Vec2) {
    let direction = player.input.map_or(Vec2::ZERO, |input| input.direction());
    let inset = Vec2::splat(player.shape.map_or(0.0, |s| s.radius));

    if let Some(t) = player.transform.as_mut() {
        t.velocity = direction * speed;
        t.position += t.velocity;
        // A shape wider than the window pins to the far edge
        t.position = t.position.max(inset).min(bounds - inset);
        t.angle += PLAYER_SPIN;
    }
}

/// Reflect each velocity component whose edge the position has crossed
pub fn bounce(t: &mut Transform, bounds: Vec2) {
    if (t.position.x <= 0.0 && t.velocity.x < 0.0) || (t.position.x >= bounds.x && t.velocity.x > 0.0) {
        t.velocity.x = -t.velocity.x;
    }
    if (t.position.y <= 0.0 && t.velocity.y < 0.0) || (t.position.y >= bounds.y && t.velocity.y > 0.0) {
        t.velocity.y = -t.velocity.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::entity::{CollisionBounds, EntityId, InputState, Lifespan, Rgba, Shape};

    fn small_window() -> Config {
        let mut config = Config::default();
        config.window.width = 800;
        config.window.height = 600;
        config
    }

    #[test]
    fn test_player_moves_at_speed() {
        let mut state = GameState::new(small_window(), 1);
        let start = state.player().unwrap().position().unwrap();

        state.player_mut().unwrap().input = Some(InputState {
            right: true,
            ..Default::default()
        });
        movement(&mut state);

        let pos = state.player().unwrap().position().unwrap();
        assert_eq!(pos, start + Vec2::new(state.config.player.speed, 0.0));
    }

    #[test]
    fn test_player_diagonal_is_normalized() {
        let mut state = GameState::new(small_window(), 1);
        let start = state.player().unwrap().position().unwrap();
        state.player_mut().unwrap().input = Some(InputState {
            up: true,
            left: true,
            ..Default::default()
        });
        movement(&mut state);

        let moved = state.player().unwrap().position().unwrap() - start;
        assert!((moved.length() - state.config.player.speed).abs() < 1e-4);
        assert!(moved.x < 0.0 && moved.y < 0.0);
    }

    #[test]
    fn test_player_without_input_stays() {
        let mut state = GameState::new(small_window(), 1);
        let start = state.player().unwrap().position().unwrap();
        movement(&mut state);
        assert_eq!(state.player().unwrap().position().unwrap(), start);
    }

    #[test]
    fn test_player_clamped_inside_window() {
        let mut player = Entity::new(EntityId(0), Tag::Player);
        player.transform = Some(Transform::new(Vec2::new(798.0, 2.0), Vec2::ZERO, 0.0));
        player.shape = Some(Shape::new(32.0, 8, Rgba::WHITE, Rgba::WHITE, 1.0));
        player.input = Some(InputState {
            up: true,
            right: true,
            ..Default::default()
        });

        move_player(&mut player, 5.0, Vec2::new(800.0, 600.0));
        assert_eq!(player.position(), Some(Vec2::new(768.0, 32.0)));
    }

    #[test]
    fn test_enemy_bounces_off_right_wall() {
        let mut state = GameState::new(small_window(), 1);
        let id = {
            let enemy = state.entities.add_entity(Tag::Enemy);
            enemy.transform = Some(Transform::new(Vec2::new(795.0, 300.0), Vec2::new(5.0, -5.0), 0.0));
            enemy.collision = Some(CollisionBounds::new(10.0));
            enemy.id()
        };
        state.entities.update();

        movement(&mut state);
        let t = state.entities.get(id).unwrap().transform.unwrap();
        assert_eq!(t.position, Vec2::new(800.0, 295.0));
        assert_eq!(t.velocity, Vec2::new(5.0, -5.0));

        movement(&mut state);
        let t = state.entities.get(id).unwrap().transform.unwrap();
        assert_eq!(t.velocity, Vec2::new(-5.0, -5.0));
        assert_eq!(t.position, Vec2::new(795.0, 290.0));
    }

    #[test]
    fn test_bounce_only_when_moving_outward() {
        let mut t = Transform::new(Vec2::new(-1.0, 700.0), Vec2::new(2.0, 3.0), 0.0);
        bounce(&mut t, Vec2::new(800.0, 600.0));
        // Already heading back in on x, past the bottom on y
        assert_eq!(t.velocity, Vec2::new(2.0, -3.0));
    }

    #[test]
    fn test_small_enemies_spin_faster() {
        let mut state = GameState::new(small_window(), 1);
        let big = {
            let e = state.entities.add_entity(Tag::Enemy);
            e.transform = Some(Transform::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0));
            e.id()
        };
        let small = {
            let e = state.entities.add_entity(Tag::Enemy);
            e.transform = Some(Transform::new(Vec2::new(200.0, 100.0), Vec2::ZERO, 0.0));
            e.lifespan = Some(Lifespan::new(10));
            e.id()
        };
        state.entities.update();
        movement(&mut state);

        let angle = |id| state.entities.get(id).unwrap().transform.unwrap().angle;
        assert_eq!(angle(big), ENEMY_SPIN);
        assert_eq!(angle(small), SMALL_ENEMY_SPIN);
    }

    #[test]
    fn test_bullets_advance_by_velocity() {
        let mut state = GameState::new(small_window(), 1);
        let id = {
            let b = state.entities.add_entity(Tag::Bullet);
            b.transform = Some(Transform::new(Vec2::new(10.0, 10.0), Vec2::new(3.0, 4.0), 0.0));
            b.id()
        };
        state.entities.update();
        movement(&mut state);
        assert_eq!(state.entities.get(id).unwrap().position(), Some(Vec2::new(13.0, 14.0)));
    }
}
