//! Entity spawning
//!
//! Every spawn goes through [`EntityManager::add_entity`], so new entities
//! show up at the next manager update. Randomized spawns take the RNG as a
//! parameter; pass a seeded generator for reproducible results.

use glam::Vec2;
use rand::Rng;

use super::entity::{CollisionBounds, Entity, EntityId, InputState, Lifespan, Rgba, Shape, Tag, Transform};
use super::manager::EntityManager;
use super::state::GameState;
use crate::config::Config;
use crate::consts::SPLIT_SCALE;
use crate::{direction_degrees, rotate_degrees};

/// Spawn the player at the window center
pub fn spawn_player(entities: &mut EntityManager, config: &Config) -> EntityId {
    let p = &config.player;
    let player = entities.add_entity(Tag::Player);
    player.transform = Some(Transform::new(config.window.center(), Vec2::ZERO, 0.0));
    player.shape = Some(Shape::new(
        p.shape_radius,
        p.vertices,
        p.fill,
        p.outline,
        p.outline_thickness,
    ));
    player.collision = Some(CollisionBounds::new(p.collision_radius));
    player.input = Some(InputState::default());
    player.id()
}

/// Magnitude in `[min, max]` with a random sign
fn signed_speed(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    let magnitude = rng.random_range(min..=max);
    if rng.random_bool(0.5) { -magnitude } else { magnitude }
}

/// Spawn an enemy fully inside the window with a random velocity,
/// vertex count and fill color
pub fn spawn_enemy(entities: &mut EntityManager, config: &Config, rng: &mut impl Rng) -> EntityId {
    let e = &config.enemy;
    let r = e.shape_radius;
    let width = config.window.width as f32;
    let height = config.window.height as f32;

    let position = Vec2::new(rng.random_range(r..=width - r), rng.random_range(r..=height - r));
    let velocity = Vec2::new(
        signed_speed(rng, e.min_speed, e.max_speed),
        signed_speed(rng, e.min_speed, e.max_speed),
    );
    let vertices = rng.random_range(e.min_vertices..=e.max_vertices);
    let fill = Rgba::rgb(rng.random(), rng.random(), rng.random());

    let enemy = entities.add_entity(Tag::Enemy);
    enemy.transform = Some(Transform::new(position, velocity, 0.0));
    enemy.shape = Some(Shape::new(r, vertices, fill, e.outline, e.outline_thickness));
    enemy.collision = Some(CollisionBounds::new(e.collision_radius));

    log::debug!(
        "Spawned {} {} at ({:.0}, {:.0}) with {} vertices",
        enemy.tag().as_str(),
        enemy.id(),
        position.x,
        position.y,
        vertices
    );
    enemy.id()
}

/// Split a destroyed enemy into one small enemy per vertex.
///
/// The i-th child (1-based) travels along the parent velocity rotated by
/// `360 / n * i` degrees, at a quarter of the parent's size, and expires
/// after the configured small-enemy lifespan.
pub fn spawn_small_enemies(entities: &mut EntityManager, config: &Config, parent: &Entity) -> Vec<EntityId> {
    let (Some(transform), Some(shape)) = (parent.transform, parent.shape) else {
        return Vec::new();
    };
    let collision_radius = parent
        .collision
        .map_or(config.enemy.collision_radius, |c| c.radius);

    let n = shape.vertices;
    let step = 360.0 / n as f32;
    let mut children = Vec::with_capacity(n as usize);

    for i in 1..=n {
        let child = entities.add_entity(Tag::Enemy);
        child.transform = Some(Transform::new(
            transform.position,
            rotate_degrees(transform.velocity, step * i as f32),
            transform.angle,
        ));
        child.shape = Some(Shape {
            radius: shape.radius * SPLIT_SCALE,
            ..shape
        });
        child.collision = Some(CollisionBounds::new(collision_radius * SPLIT_SCALE));
        child.lifespan = Some(Lifespan::new(config.enemy.small_lifespan));
        children.push(child.id());
    }

    log::debug!("Split {} into {} small enemies", parent.id(), n);
    children
}

/// Add a bullet with the bullet config's shape and lifespan
fn add_bullet(entities: &mut EntityManager, config: &Config, origin: Vec2, velocity: Vec2) -> EntityId {
    let b = &config.bullet;
    let bullet = entities.add_entity(Tag::Bullet);
    bullet.transform = Some(Transform::new(origin, velocity, 0.0));
    bullet.shape = Some(Shape::new(
        b.shape_radius,
        b.vertices,
        b.fill,
        b.outline,
        b.outline_thickness,
    ));
    bullet.collision = Some(CollisionBounds::new(b.collision_radius));
    bullet.lifespan = Some(Lifespan::new(b.lifespan));
    bullet.id()
}

/// Spawn a bullet at `origin` heading for `target` at the configured speed
pub fn spawn_bullet(entities: &mut EntityManager, config: &Config, origin: Vec2, target: Vec2) -> EntityId {
    let velocity = (target - origin).normalize_or_zero() * config.bullet.speed;
    add_bullet(entities, config, origin, velocity)
}

/// Spawn a ring of bullets evenly spaced around `origin`
pub fn spawn_special_weapon(entities: &mut EntityManager, config: &Config, origin: Vec2) -> Vec<EntityId> {
    let count = config.special.bullets;
    let step = 360.0 / count.max(1) as f32;
    let ids: Vec<_> = (0..count)
        .map(|i| {
            let velocity = direction_degrees(step * i as f32) * config.bullet.speed;
            add_bullet(entities, config, origin, velocity)
        })
        .collect();
    log::debug!("Special weapon fired {} bullets", ids.len());
    ids
}

/// System: spawn an enemy once the spawn interval has passed
pub fn enemy_spawner(state: &mut GameState) {
    let elapsed = state.current_frame.saturating_sub(state.last_enemy_spawn_frame);
    if elapsed > state.config.enemy.spawn_interval {
        spawn_enemy(&mut state.entities, &state.config, &mut state.rng);
        state.last_enemy_spawn_frame = state.current_frame;
    }
}
