//! Entities and their optional components
//!
//! An entity is an id, a tag and a set of optional component slots. Systems
//! check for the components they need and skip entities that lack them.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::OPAQUE;

/// Sequential entity identifier, never reused within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Entity category, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Player,
    Enemy,
    Bullet,
}

impl Tag {
    /// Lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Player => "player",
            Tag::Enemy => "enemy",
            Tag::Bullet => "bullet",
        }
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: OPAQUE }
    }

    /// Normalized color for the GPU
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Position, velocity (pixels per frame) and visual rotation (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
}

impl Transform {
    pub fn new(position: Vec2, velocity: Vec2, angle: f32) -> Self {
        Self {
            position,
            velocity,
            angle,
        }
    }
}

/// Regular polygon drawn around the transform position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub radius: f32,
    pub vertices: u32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub outline_thickness: f32,
}

impl Shape {
    pub fn new(radius: f32, vertices: u32, fill: Rgba, outline: Rgba, outline_thickness: f32) -> Self {
        Self {
            radius,
            vertices,
            fill,
            outline,
            outline_thickness,
        }
    }

    /// Set fill and outline transparency
    pub fn set_alpha(&mut self, alpha: u8) {
        self.fill.a = alpha;
        self.outline.a = alpha;
    }
}

/// Hit-test circle, independent of the visual radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBounds {
    pub radius: f32,
}

impl CollisionBounds {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

/// Frames left before the entity expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifespan {
    pub remaining: u32,
    pub total: u32,
}

impl Lifespan {
    pub fn new(total: u32) -> Self {
        Self {
            remaining: total,
            total,
        }
    }

    /// Opacity for the remaining fraction, `255 * remaining / total`
    pub fn alpha(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (OPAQUE as u64 * self.remaining as u64 / self.total as u64) as u8
    }
}

/// Held movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Unit movement direction (y grows downward), zero when nothing is held
    pub fn direction(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32).normalize_or_zero()
    }
}

/// A game entity: id, tag, liveness and optional components
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: Tag,
    active: bool,
    pub transform: Option<Transform>,
    pub shape: Option<Shape>,
    pub collision: Option<CollisionBounds>,
    pub lifespan: Option<Lifespan>,
    pub input: Option<InputState>,
}

impl Entity {
    /// Only the entity manager hands out ids
    pub(crate) fn new(id: EntityId, tag: Tag) -> Self {
        Self {
            id,
            tag,
            active: true,
            transform: None,
            shape: None,
            collision: None,
            lifespan: None,
            input: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark for removal at the next manager update. Idempotent.
    pub fn destroy(&mut self) {
        self.active = false;
    }

    /// Position, if the entity has a transform
    pub fn position(&self) -> Option<Vec2> {
        self.transform.map(|t| t.position)
    }

    /// Center and collision radius, if the entity can collide
    pub fn hit_circle(&self) -> Option<(Vec2, f32)> {
        match (self.transform, self.collision) {
            (Some(t), Some(c)) => Some((t.position, c.radius)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_is_bare_and_active() {
        let e = Entity::new(EntityId(7), Tag::Enemy);
        assert_eq!(e.id(), EntityId(7));
        assert_eq!(e.tag(), Tag::Enemy);
        assert!(e.is_active());
        assert!(e.transform.is_none());
        assert!(e.shape.is_none());
        assert!(e.hit_circle().is_none());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut e = Entity::new(EntityId(0), Tag::Bullet);
        e.destroy();
        assert!(!e.is_active());
        e.destroy();
        assert!(!e.is_active());
    }

    #[test]
    fn test_hit_circle_needs_both_components() {
        let mut e = Entity::new(EntityId(1), Tag::Enemy);
        e.transform = Some(Transform::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 0.0));
        assert!(e.hit_circle().is_none());

        e.collision = Some(CollisionBounds::new(5.0));
        assert_eq!(e.hit_circle(), Some((Vec2::new(1.0, 2.0), 5.0)));
    }

    #[test]
    fn test_lifespan_alpha_truncates() {
        let mut l = Lifespan::new(10);
        assert_eq!(l.alpha(), 255);
        l.remaining = 5;
        assert_eq!(l.alpha(), 127);
        l.remaining = 0;
        assert_eq!(l.alpha(), 0);
        assert_eq!(Lifespan::new(0).alpha(), 0);
    }

    #[test]
    fn test_input_direction() {
        assert_eq!(InputState::default().direction(), Vec2::ZERO);

        let up = InputState {
            up: true,
            ..Default::default()
        };
        assert_eq!(up.direction(), Vec2::new(0.0, -1.0));

        let diagonal = InputState {
            down: true,
            right: true,
            ..Default::default()
        };
        assert!((diagonal.direction().length() - 1.0).abs() < 1e-6);

        let opposed = InputState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(opposed.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_shape_alpha() {
        let mut s = Shape::new(10.0, 4, Rgba::rgb(1, 2, 3), Rgba::WHITE, 1.0);
        s.set_alpha(42);
        assert_eq!(s.fill, Rgba { r: 1, g: 2, b: 3, a: 42 });
        assert_eq!(s.outline.a, 42);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(Tag::Player.as_str(), "player");
        assert_eq!(Tag::Enemy.as_str(), "enemy");
        assert_eq!(Tag::Bullet.as_str(), "bullet");
    }
}
