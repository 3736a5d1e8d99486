//! Game state
//!
//! Everything one running session mutates lives here and is passed
//! explicitly to each system.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId};
use super::manager::EntityManager;
use super::spawn;
use crate::config::Config;

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    /// Run seed for reproducibility
    pub seed: u64,
    pub entities: EntityManager,
    /// The player entity; it is never destroyed
    pub player: EntityId,
    pub score: u64,
    /// Simulated frames (does not advance while paused)
    pub current_frame: u64,
    pub last_enemy_spawn_frame: u64,
    pub last_special_frame: Option<u64>,
    pub paused: bool,
    /// Cleared by a quit request; the frontend stops after the current frame
    pub running: bool,
    /// Random source for spawning
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new game with the player at the window center
    pub fn new(config: Config, seed: u64) -> Self {
        let mut entities = EntityManager::new();
        let player = spawn::spawn_player(&mut entities, &config);
        // Make the player visible from the first frame
        entities.update();

        log::info!(
            "New game {}x{} with seed {}",
            config.window.width,
            config.window.height,
            seed
        );

        Self {
            config,
            seed,
            entities,
            player,
            score: 0,
            current_frame: 0,
            last_enemy_spawn_frame: 0,
            last_special_frame: None,
            paused: false,
            running: true,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.get(self.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.get_mut(self.player)
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("{} at frame {}", if paused { "Paused" } else { "Resumed" }, self.current_frame);
        }
        self.paused = paused;
    }

    /// Fire a bullet from the player toward `target`
    pub fn fire_bullet(&mut self, target: Vec2) -> Option<EntityId> {
        let origin = self.player()?.position()?;
        Some(spawn::spawn_bullet(&mut self.entities, &self.config, origin, target))
    }

    /// Whether the special weapon is off cooldown
    pub fn special_ready(&self) -> bool {
        self.config.special.bullets > 0
            && self
                .last_special_frame
                .is_none_or(|last| self.current_frame.saturating_sub(last) >= self.config.special.cooldown)
    }

    /// Fire the radial burst if it is ready; returns the bullets spawned
    pub fn fire_special(&mut self) -> Vec<EntityId> {
        if !self.special_ready() {
            return Vec::new();
        }
        let Some(origin) = self.player().and_then(Entity::position) else {
            return Vec::new();
        };
        self.last_special_frame = Some(self.current_frame);
        spawn::spawn_special_weapon(&mut self.entities, &self.config, origin)
    }
}
