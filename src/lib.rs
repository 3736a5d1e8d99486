//! Polyshot - A polygon arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, systems, game state)
//! - `config`: Plain-text game configuration
//! - `renderer`: Vertex generation and WebGPU pipeline

pub mod config;
pub mod renderer;
pub mod sim;

pub use config::{Config, ConfigError};

use glam::Vec2;

/// Game tuning constants not covered by the config file
pub mod consts {
    /// Score for a full-size enemy killed by a bullet
    pub const LARGE_ENEMY_SCORE: u64 = 100;
    /// Score for a split (lifespan-bearing) enemy, double the full-size value
    pub const SMALL_ENEMY_SCORE: u64 = 200;

    /// Split children get this fraction of the parent's radii
    pub const SPLIT_SCALE: f32 = 0.25;

    /// Player rotation per frame in degrees
    pub const PLAYER_SPIN: f32 = 1.0;
    /// Full-size enemy rotation per frame in degrees
    pub const ENEMY_SPIN: f32 = 1.0;
    /// Split enemies spin faster than their parent, in degrees per frame
    pub const SMALL_ENEMY_SPIN: f32 = 4.0;

    /// Autopilot fires once every this many frames
    pub const AUTOPILOT_FIRE_INTERVAL: u64 = 12;
    /// Autopilot starts evading when an enemy is closer than this (pixels)
    pub const AUTOPILOT_EVADE_DISTANCE: f32 = 150.0;
    /// Autopilot fires the special weapon inside this distance
    pub const AUTOPILOT_SPECIAL_DISTANCE: f32 = 80.0;

    /// Alpha channel maximum
    pub const OPAQUE: u8 = 255;
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit direction for an angle in degrees
#[inline]
pub fn direction_degrees(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}
