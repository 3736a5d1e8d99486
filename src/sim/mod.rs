//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod lifespan;
pub mod manager;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_touch, collision};
pub use entity::{CollisionBounds, Entity, EntityId, InputState, Lifespan, Rgba, Shape, Tag, Transform};
pub use lifespan::lifespan;
pub use manager::EntityManager;
pub use movement::movement;
pub use spawn::enemy_spawner;
pub use state::GameState;
pub use tick::{TickInput, tick};
