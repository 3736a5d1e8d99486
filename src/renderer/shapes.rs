//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;
use crate::direction_degrees;
use crate::sim::{Entity, EntityManager};

/// Corner `i` of a regular polygon; the first corner points up at zero rotation
fn corner(center: Vec2, radius: f32, sides: u32, i: u32, angle_deg: f32) -> Vec2 {
    let theta = angle_deg - 90.0 + 360.0 * i as f32 / sides as f32;
    center + direction_degrees(theta) * radius
}

/// Generate vertices for a filled regular polygon
pub fn polygon(center: Vec2, radius: f32, sides: u32, angle_deg: f32, color: [f32; 4]) -> Vec<Vertex> {
    if sides < 3 || radius <= 0.0 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity((sides * 3) as usize);

    for i in 0..sides {
        let a = corner(center, radius, sides, i, angle_deg);
        let b = corner(center, radius, sides, i + 1, angle_deg);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }

    vertices
}

/// Generate vertices for a polygon outline drawn outward from `radius`
pub fn polygon_outline(
    center: Vec2,
    radius: f32,
    thickness: f32,
    sides: u32,
    angle_deg: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    if sides < 3 || thickness <= 0.0 {
        return Vec::new();
    }
    let outer_radius = radius + thickness;
    let mut vertices = Vec::with_capacity((sides * 6) as usize);

    for i in 0..sides {
        let inner1 = corner(center, radius, sides, i, angle_deg);
        let outer1 = corner(center, outer_radius, sides, i, angle_deg);
        let inner2 = corner(center, radius, sides, i + 1, angle_deg);
        let outer2 = corner(center, outer_radius, sides, i + 1, angle_deg);

        // Two triangles per edge
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Fill plus outline for one entity; empty unless it is active with a transform and shape
pub fn entity_vertices(entity: &Entity) -> Vec<Vertex> {
    let (Some(t), Some(shape)) = (entity.transform, entity.shape) else {
        return Vec::new();
    };
    if !entity.is_active() {
        return Vec::new();
    }

    let mut vertices = polygon(
        t.position,
        shape.radius,
        shape.vertices,
        t.angle,
        shape.fill.to_f32(),
    );
    vertices.extend(polygon_outline(
        t.position,
        shape.radius,
        shape.outline_thickness,
        shape.vertices,
        t.angle,
        shape.outline.to_f32(),
    ));
    vertices
}

/// Every visible entity, in creation order
pub fn frame_vertices(entities: &EntityManager) -> Vec<Vertex> {
    entities.entities().iter().flat_map(entity_vertices).collect()
}
