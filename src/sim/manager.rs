//! Entity manager
//!
//! Owns every entity. New entities wait in a pending buffer until the next
//! [`EntityManager::update`], so systems iterating entities never see the
//! list change under them mid-frame. The same update drops every entity
//! that was destroyed since the last one.

use std::collections::BTreeMap;

use super::entity::{Entity, EntityId, Tag};

/// Canonical entity list plus a per-tag index
#[derive(Debug, Clone, Default)]
pub struct EntityManager {
    /// Visible entities in creation (and id) order
    entities: Vec<Entity>,
    /// Created since the last update, also in id order
    pending: Vec<Entity>,
    /// Positions into `entities`, ascending, one group per tag seen
    groups: BTreeMap<Tag, Vec<usize>>,
    /// Entities admitted over the manager's lifetime
    total_entities: u64,
    next_id: u64,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity. It becomes visible to queries after the next
    /// [`update`](Self::update); until then it is reachable through
    /// [`get_mut`](Self::get_mut) and the returned reference.
    pub fn add_entity(&mut self, tag: Tag) -> &mut Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entity::new(id, tag));
        let last = self.pending.len() - 1;
        &mut self.pending[last]
    }

    /// Admit pending entities, then drop inactive ones
    pub fn update(&mut self) {
        let admitted = self.pending.len();
        for entity in self.pending.drain(..) {
            let index = self.entities.len();
            self.groups.entry(entity.tag()).or_default().push(index);
            self.entities.push(entity);
        }
        self.total_entities += admitted as u64;

        let before = self.entities.len();
        self.entities.retain(Entity::is_active);
        let removed = before - self.entities.len();

        if removed > 0 {
            // Positions shifted; rebuild every group from the compacted list
            for group in self.groups.values_mut() {
                group.clear();
            }
            for (index, entity) in self.entities.iter().enumerate() {
                self.groups.entry(entity.tag()).or_default().push(index);
            }
        }

        if admitted > 0 || removed > 0 {
            log::trace!(
                "entity update: +{} -{} ({} live)",
                admitted,
                removed,
                self.entities.len()
            );
        }
    }

    /// All visible entities in creation order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable visible entities in creation order. Components and liveness
    /// can change; the order cannot.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.iter_mut()
    }

    /// Visible entities with `tag`, in creation order
    pub fn entities_with_tag(&self, tag: Tag) -> impl Iterator<Item = &Entity> + '_ {
        self.groups
            .get(&tag)
            .into_iter()
            .flatten()
            .map(move |&index| &self.entities[index])
    }

    /// Mutable visible entities with `tag`, in creation order
    pub fn entities_with_tag_mut(&mut self, tag: Tag) -> impl Iterator<Item = &mut Entity> + '_ {
        let group = self.groups.get(&tag).map(Vec::as_slice).unwrap_or_default();
        let mut wanted = group.iter().copied().peekable();
        self.entities
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, entity)| {
                if wanted.peek() == Some(&index) {
                    wanted.next();
                    Some(entity)
                } else {
                    None
                }
            })
    }

    /// Find an entity by id, visible or pending
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let list = if self.pending.first().is_some_and(|e| e.id() <= id) {
            &self.pending
        } else {
            &self.entities
        };
        list.binary_search_by_key(&id, Entity::id)
            .ok()
            .map(|index| &list[index])
    }

    /// Find an entity by id, visible or pending
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let list = if self.pending.first().is_some_and(|e| e.id() <= id) {
            &mut self.pending
        } else {
            &mut self.entities
        };
        match list.binary_search_by_key(&id, Entity::id) {
            Ok(index) => Some(&mut list[index]),
            Err(_) => None,
        }
    }

    /// Entities admitted so far (removed ones included)
    pub fn total_entities(&self) -> u64 {
        self.total_entities
    }

    /// Number of visible entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities waiting for the next update
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Every visible entity is in exactly its own tag group, in order
    #[cfg(test)]
    fn assert_index_consistent(&self) {
        let mut seen = vec![false; self.entities.len()];
        for (tag, group) in &self.groups {
            assert!(group.windows(2).all(|w| w[0] < w[1]), "group {tag:?} out of order");
            for &index in group {
                assert_eq!(self.entities[index].tag(), *tag);
                assert!(!seen[index], "entity indexed twice");
                seen[index] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "entity missing from its tag group");
    }
}
