//! Bounded registry of vehicles currently inside the parking area.
//!
//! The registry is the single source of truth for occupancy. Membership
//! decides the direction of an authorized card: a card that is present is
//! leaving, a card that is absent is arriving. Mutation happens only at the
//! instant a passage is confirmed, never when a card is merely read.

use parkgate_core::{CardUid, constants::DEFAULT_CAPACITY};

/// Bounded set of cards currently parked inside.
///
/// Backed by a small vector; with a handful of slots a linear scan beats any
/// hashed structure and keeps iteration order cheap to reason about. Removal
/// swaps with the last element, so order is not preserved.
///
/// # Examples
///
/// ```
/// use parkgate_controller::VehicleRegistry;
/// use parkgate_core::CardUid;
///
/// let mut registry = VehicleRegistry::new(4);
/// let uid = CardUid::new([0xD3, 0xA7, 0xB1, 0x28]);
///
/// assert!(registry.try_add(uid));
/// assert!(registry.contains(&uid));
/// assert_eq!(registry.free_slots(), 3);
///
/// assert!(registry.remove(&uid));
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct VehicleRegistry {
    slots: Vec<CardUid>,
    capacity: usize,
}

impl VehicleRegistry {
    /// Create an empty registry with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Check whether a card is currently inside.
    #[must_use]
    pub fn contains(&self, uid: &CardUid) -> bool {
        self.slots.iter().any(|slot| slot == uid)
    }

    /// Add a card to the registry.
    ///
    /// Returns `false` without mutating if the registry is full or the card
    /// is already present. The controller only calls this for cards it has
    /// established as absent, so the duplicate branch is a guard, not a flow.
    pub fn try_add(&mut self, uid: CardUid) -> bool {
        if self.is_full() || self.contains(&uid) {
            return false;
        }
        self.slots.push(uid);
        true
    }

    /// Remove a card from the registry.
    ///
    /// Returns `true` if the card was present. Removing an absent card is a
    /// no-op returning `false`.
    pub fn remove(&mut self, uid: &CardUid) -> bool {
        match self.slots.iter().position(|slot| slot == uid) {
            Some(index) => {
                self.slots.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of unoccupied slots.
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.capacity - self.slots.len()
    }

    /// Number of vehicles currently inside.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the parking area is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Total slot capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the cards currently inside, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CardUid> {
        self.slots.iter()
    }
}

impl Default for VehicleRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
