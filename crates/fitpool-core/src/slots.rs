//! Slot+generation table backing record and pool handles.
//!
//! A [`SlotTable`] stores values in index-addressable slots and hands out a
//! [`SlotKey`] (index + generation) for each insertion. Removing a value
//! bumps the slot's generation, so stale keys resolve to `None` instead of
//! aliasing whatever occupies the slot next. Double-remove is a safe no-op.

use std::fmt;

/// Index + generation pair identifying one occupancy of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    index: u32,
    generation: u32,
}

impl SlotKey {
    /// Build a key from its parts.
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index within the table.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this key was issued.
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a `u64`: upper 32 bits index, lower 32 bits generation.
    pub const fn to_bits(self) -> u64 {
        ((self.index as u64) << 32) | (self.generation as u64)
    }

    /// Inverse of [`to_bits`](Self::to_bits).
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            index: (bits >> 32) as u32,
            generation: bits as u32,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    data: Option<T>,
}

/// Slot+generation table mapping [`SlotKey`]s to owned values.
///
/// Reuses slots via a free list. If a slot's generation wraps back to 0 on
/// removal, the slot is permanently retired instead of recycled, so a key
/// from the first epoch can never resolve to later data.
#[derive(Debug)]
pub struct SlotTable<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live: usize,
}

impl<T> SlotTable<T> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Insert a value and return its key.
    pub fn insert(&mut self, value: T) -> SlotKey {
        self.live += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.data = Some(value);
            SlotKey::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                data: Some(value),
            });
            SlotKey::new(index, 0)
        }
    }

    /// Shared access to the value behind `key`.
    ///
    /// Returns `None` if the key is stale or was never issued.
    pub fn get(&self, key: SlotKey) -> Option<&T> {
        let slot = self.slots.get(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.data.as_ref()
    }

    /// Mutable access to the value behind `key`.
    pub fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        slot.data.as_mut()
    }

    /// Shared access to the live value in slot `index`, ignoring generation.
    ///
    /// Used for intra-table links, which always point at live slots.
    pub fn get_at(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize)?.data.as_ref()
    }

    /// Mutable access to the live value in slot `index`, ignoring generation.
    pub fn get_at_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize)?.data.as_mut()
    }

    /// Current key of the live value in slot `index`.
    pub fn key_at(&self, index: u32) -> Option<SlotKey> {
        let slot = self.slots.get(index as usize)?;
        slot.data.as_ref()?;
        Some(SlotKey::new(index, slot.generation))
    }

    /// Whether `key` was issued by this table at some point.
    ///
    /// True for live keys and for stale keys of slots that have since moved
    /// to a newer generation. Lets callers tell "released" apart from
    /// "never issued".
    pub fn was_issued(&self, key: SlotKey) -> bool {
        match self.slots.get(key.index as usize) {
            // An empty slot at generation 0 can only be a retired one.
            Some(slot) if slot.generation == key.generation => {
                slot.data.is_some() || slot.generation == 0
            }
            Some(slot) => generation_precedes(key.generation, slot.generation),
            None => false,
        }
    }

    /// Remove the value behind `key`, returning it.
    ///
    /// Returns `None` if the key is stale (double-remove is safe).
    pub fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let value = slot.data.take()?;
        self.live -= 1;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(key.index);
        }
        Some(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the table holds no live values.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A retired slot sits at generation 0 after wrapping; every nonzero key
/// generation below the current one was issued earlier.
fn generation_precedes(key_generation: u32, slot_generation: u32) -> bool {
    if slot_generation == 0 {
        key_generation != 0
    } else {
        key_generation < slot_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_round_trip() {
        let mut table = SlotTable::new();
        let k = table.insert(42i32);
        assert_eq!(table.get(k), Some(&42));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_mut_modifies_value() {
        let mut table = SlotTable::new();
        let k = table.insert(10i32);
        *table.get_mut(k).unwrap() = 20;
        assert_eq!(table.get(k), Some(&20));
    }

    #[test]
    fn remove_returns_value_and_stales_key() {
        let mut table = SlotTable::new();
        let k = table.insert(99i32);
        assert_eq!(table.remove(k), Some(99));
        assert_eq!(table.get(k), None);
        assert_eq!(table.get_mut(k), None);
        assert!(table.is_empty());
    }

    #[test]
    fn double_remove_returns_none() {
        let mut table = SlotTable::new();
        let k = table.insert(1i32);
        assert_eq!(table.remove(k), Some(1));
        assert_eq!(table.remove(k), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn free_list_reuses_slots_with_new_generation() {
        let mut table = SlotTable::new();
        let k1 = table.insert(1i32);
        table.remove(k1);
        let k2 = table.insert(2i32);
        assert_eq!(k1.index(), k2.index());
        assert_eq!(k2.generation(), k1.generation() + 1);
        assert_eq!(table.get(k2), Some(&2));
        assert_eq!(table.get(k1), None);
    }

    #[test]
    fn index_access_ignores_generation() {
        let mut table = SlotTable::new();
        let k1 = table.insert('a');
        table.remove(k1);
        let k2 = table.insert('b');
        assert_eq!(table.get_at(k2.index()), Some(&'b'));
        assert_eq!(table.key_at(k2.index()), Some(k2));
        assert_eq!(table.get_at(7), None);
        assert_eq!(table.key_at(7), None);
    }

    #[test]
    fn was_issued_distinguishes_released_from_unknown() {
        let mut table = SlotTable::new();
        let k = table.insert(5u8);
        assert!(table.was_issued(k));
        table.remove(k);
        assert!(table.was_issued(k));
        assert!(!table.was_issued(SlotKey::new(0, 9)));
        assert!(!table.was_issued(SlotKey::new(3, 0)));
    }

    #[test]
    fn bits_round_trip() {
        let k = SlotKey::new(0xDEAD, 0xBEEF);
        assert_eq!(k.to_bits(), 0x0000_DEAD_0000_BEEF);
        assert_eq!(SlotKey::from_bits(k.to_bits()), k);
    }

    #[test]
    fn generation_exhaustion_retires_slot() {
        let mut table = SlotTable::new();
        let k = table.insert(1i32);
        table.remove(k);

        table.slots[0].generation = u32::MAX;
        let k2 = table.insert(2i32);
        assert_eq!(k2.generation(), u32::MAX);

        // Removal wraps the generation to 0: the slot must not be recycled.
        table.remove(k2);
        assert_eq!(table.slots[0].generation, 0);
        assert!(!table.free_list.contains(&0));

        assert_eq!(table.get(SlotKey::new(0, 0)), None);
        assert!(table.was_issued(SlotKey::new(0, 0)));
        assert!(table.was_issued(k2));
        let k3 = table.insert(3i32);
        assert_ne!(k3.index(), 0, "retired slot must not be reused");
    }
}
