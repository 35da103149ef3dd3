//! Fixed-capacity actor pools.
//!
//! Slots are never removed, only deactivated, so an index handed out by
//! [`Pool::spawn`] keeps naming the same slot for the whole round.

use tracing::debug;

use crate::entities::{Actor, ActorKind};

#[derive(Clone, Debug)]
pub struct Pool<const N: usize> {
    slots: [Actor; N],
}

impl<const N: usize> Pool<N> {
    /// A pool with every slot dormant.
    pub fn new(kind: ActorKind) -> Self {
        Self {
            slots: [Actor::dormant(kind); N],
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Place `actor` in the first free slot. A full pool drops the request.
    pub fn spawn(&mut self, actor: Actor) -> Option<usize> {
        let Some(index) = self.slots.iter().position(|slot| !slot.active) else {
            debug!(kind = ?actor.kind, capacity = N, "pool full, spawn dropped");
            return None;
        };
        self.slots[index] = Actor {
            active: true,
            ..actor
        };
        Some(index)
    }

    /// Overwrite a specific slot, e.g. to lay out a formation at round start.
    pub fn place(&mut self, index: usize, actor: Actor) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = actor;
        }
    }

    pub fn deactivate(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.active = false;
        }
    }

    /// Deactivate every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.active)
    }

    pub fn any_active(&self) -> bool {
        self.slots.iter().any(|slot| slot.active)
    }

    pub fn get(&self, index: usize) -> Option<&Actor> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.slots.get_mut(index)
    }

    /// Every slot, active or not, in slot order.
    pub fn slots(&self) -> &[Actor] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Actor] {
        &mut self.slots
    }

    /// `(index, actor)` for active slots only.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Actor)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.slots.iter_mut().filter(|slot| slot.active)
    }
}
