//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one frame.

use glam::Vec2;

use super::collision::collision;
use super::entity::{Entity, InputState, Tag};
use super::lifespan::lifespan;
use super::movement::movement;
use super::spawn::enemy_spawner;
use super::state::GameState;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement directions
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire a bullet toward this window position
    pub fire: Option<Vec2>,
    /// Fire the radial special weapon
    pub special: bool,
    /// Pause toggle
    pub pause: bool,
    /// Stop running after this frame
    pub quit: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.quit && state.running {
        log::info!("Quit requested at frame {}", state.current_frame);
        state.running = false;
    }

    if input.pause {
        let paused = !state.paused;
        state.set_paused(paused);
    }

    let mut input = input.clone();
    if input.idle_mode && !state.paused {
        autopilot(state, &mut input);
    }

    if let Some(player) = state.player_mut() {
        player.input = Some(InputState {
            up: input.up,
            down: input.down,
            left: input.left,
            right: input.right,
        });
    }

    if state.paused {
        return;
    }

    if let Some(target) = input.fire {
        state.fire_bullet(target);
    }
    if input.special {
        state.fire_special();
    }

    state.entities.update();
    enemy_spawner(state);
    movement(state);
    lifespan(state);
    collision(state);

    state.current_frame += 1;
}

/// Steer away from the nearest enemy and keep shooting at it
fn autopilot(state: &GameState, input: &mut TickInput) {
    let Some(origin) = state.player().and_then(Entity::position) else {
        return;
    };

    let nearest = state
        .entities
        .entities_with_tag(Tag::Enemy)
        .filter(|e| e.is_active())
        .filter_map(Entity::position)
        .min_by(|a, b| {
            a.distance_squared(origin)
                .partial_cmp(&b.distance_squared(origin))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let Some(enemy) = nearest else {
        return;
    };

    let distance = enemy.distance(origin);
    if distance < AUTOPILOT_EVADE_DISTANCE {
        let away = origin - enemy;
        input.left = away.x < 0.0;
        input.right = away.x > 0.0;
        input.up = away.y < 0.0;
        input.down = away.y > 0.0;
    }
    if distance < AUTOPILOT_SPECIAL_DISTANCE && state.special_ready() {
        input.special = true;
    }
    if state.current_frame % AUTOPILOT_FIRE_INTERVAL == 0 {
        input.fire = Some(enemy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::entity::{CollisionBounds, EntityId, Transform};

    fn add_enemy(state: &mut GameState, position: Vec2, velocity: Vec2) -> EntityId {
        let e = state.entities.add_entity(Tag::Enemy);
        e.transform = Some(Transform::new(position, velocity, 0.0));
        e.collision = Some(CollisionBounds::new(10.0));
        e.id()
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::new(Config::default(), 1);
        let enemy = add_enemy(&mut state, Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.current_frame, 1);
        let before = state.entities.get(enemy).unwrap().position();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert!(state.paused);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.current_frame, 1);
        assert_eq!(state.entities.get(enemy).unwrap().position(), before);

        tick(&mut state, &pause);
        assert!(!state.paused);
        assert_eq!(state.current_frame, 2);
        assert_ne!(state.entities.get(enemy).unwrap().position(), before);
    }

    #[test]
    fn test_quit_clears_running() {
        let mut state = GameState::new(Config::default(), 1);
        tick(
            &mut state,
            &TickInput {
                quit: true,
                ..Default::default()
            },
        );
        assert!(!state.running);
        // The frame in flight still completes
        assert_eq!(state.current_frame, 1);
    }

    #[test]
    fn test_held_input_moves_player() {
        let mut state = GameState::new(Config::default(), 1);
        let start = state.player().unwrap().position().unwrap();
        tick(
            &mut state,
            &TickInput {
                down: true,
                ..Default::default()
            },
        );
        let pos = state.player().unwrap().position().unwrap();
        assert_eq!(pos, start + Vec2::new(0.0, state.config.player.speed));
    }

    #[test]
    fn test_fire_spawns_bullet_toward_target() {
        let mut state = GameState::new(Config::default(), 1);
        let origin = state.player().unwrap().position().unwrap();
        tick(
            &mut state,
            &TickInput {
                fire: Some(origin + Vec2::new(0.0, -100.0)),
                ..Default::default()
            },
        );

        let bullets: Vec<_> = state.entities.entities_with_tag(Tag::Bullet).collect();
        assert_eq!(bullets.len(), 1);
        let t = bullets[0].transform.unwrap();
        assert_eq!(t.velocity, Vec2::new(0.0, -state.config.bullet.speed));
        // Admitted before movement, so it already flew one frame
        assert_eq!(t.position, origin + t.velocity);
    }

    #[test]
    fn test_enemy_spawns_after_interval() {
        let mut config = Config::default();
        config.enemy.spawn_interval = 5;
        let mut state = GameState::new(config, 9);

        for _ in 0..7 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.entities.entities_with_tag(Tag::Enemy).count(), 0);
        assert_eq!(state.entities.pending_len(), 1);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.entities.entities_with_tag(Tag::Enemy).count(), 1);
    }

    #[test]
    fn test_autopilot_fires_at_nearest_enemy() {
        let mut state = GameState::new(Config::default(), 1);
        add_enemy(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO);
        state.entities.update();

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle);
        assert_eq!(state.entities.entities_with_tag(Tag::Bullet).count(), 1);

        // Not again until the fire interval has passed
        tick(&mut state, &idle);
        assert_eq!(state.entities.entities_with_tag(Tag::Bullet).count(), 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut config = Config::default();
            config.enemy.spawn_interval = 20;
            let mut state = GameState::new(config, seed);
            let idle = TickInput {
                idle_mode: true,
                ..Default::default()
            };
            for _ in 0..600 {
                tick(&mut state, &idle);
            }
            (
                serde_json::to_string(state.entities.entities()).unwrap(),
                state.score,
                state.entities.total_entities(),
            )
        };
        let first = run(1234);
        assert_eq!(first, run(1234));
        assert!(first.2 > 1, "nothing spawned");
    }
}
