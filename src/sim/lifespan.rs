//! Lifespan system
//!
//! Entities with a lifespan fade out linearly and are destroyed on the
//! frame their countdown reaches zero.

use super::entity::Entity;
use super::state::GameState;

/// System: count down every active entity carrying a lifespan
pub fn lifespan(state: &mut GameState) {
    for entity in state.entities.entities_mut() {
        if entity.is_active() {
            tick_lifespan(entity);
        }
    }
}

/// Advance one entity's countdown and fade its shape to match
pub fn tick_lifespan(entity: &mut Entity) {
    let Some(life) = entity.lifespan.as_mut() else {
        return;
    };
    if life.remaining > 0 {
        life.remaining -= 1;
    }
    let (remaining, alpha) = (life.remaining, life.alpha());

    if let Some(shape) = entity.shape.as_mut() {
        shape.set_alpha(alpha);
    }
    if remaining == 0 {
        entity.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::entity::{EntityId, Lifespan, Rgba, Shape, Tag};

    fn fading(total: u32) -> Entity {
        let mut e = Entity::new(EntityId(1), Tag::Bullet);
        e.shape = Some(Shape::new(4.0, 6, Rgba::WHITE, Rgba::WHITE, 1.0));
        e.lifespan = Some(Lifespan::new(total));
        e
    }

    #[test]
    fn test_fades_linearly_then_dies() {
        let mut e = fading(10);
        for _ in 0..5 {
            tick_lifespan(&mut e);
        }
        assert_eq!(e.lifespan.unwrap().remaining, 5);
        assert_eq!(e.shape.unwrap().fill.a, 127);
        assert_eq!(e.shape.unwrap().outline.a, 127);
        assert!(e.is_active());

        for _ in 0..4 {
            tick_lifespan(&mut e);
        }
        assert!(e.is_active());
        tick_lifespan(&mut e);
        assert!(!e.is_active());
        assert_eq!(e.shape.unwrap().fill.a, 0);
    }

    #[test]
    fn test_zero_lifespan_dies_immediately() {
        let mut e = fading(0);
        tick_lifespan(&mut e);
        assert!(!e.is_active());
    }

    #[test]
    fn test_without_lifespan_untouched() {
        let mut e = Entity::new(EntityId(2), Tag::Enemy);
        e.shape = Some(Shape::new(4.0, 6, Rgba::WHITE, Rgba::WHITE, 1.0));
        tick_lifespan(&mut e);
        assert!(e.is_active());
        assert_eq!(e.shape.unwrap().fill.a, 255);
    }

    #[test]
    fn test_system_removes_expired_at_next_update() {
        let mut state = GameState::new(Config::default(), 1);
        let id = {
            let e = state.entities.add_entity(Tag::Bullet);
            e.lifespan = Some(Lifespan::new(2));
            e.id()
        };
        state.entities.update();

        lifespan(&mut state);
        lifespan(&mut state);
        assert!(!state.entities.get(id).unwrap().is_active());
        state.entities.update();
        assert!(state.entities.get(id).is_none());
        // The player has no lifespan and survives
        assert!(state.player().is_some());
    }
}
