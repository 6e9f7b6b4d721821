use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of local variable slots, packed into 64 bits
///
/// Only slots `0..64` can be stored. Every slot past that is conservatively reported as present
/// (used, modified, escaping, depending on what the mask tracks) and is never stored. There is
/// intentionally no way to remove a slot: facts only accumulate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct SlotMask(u64);

impl SlotMask {
    /// Number of slots that can be tracked precisely
    pub const CAPACITY: u16 = 64;

    pub const EMPTY: SlotMask = SlotMask(0);
    pub const ALL: SlotMask = SlotMask(u64::MAX);

    /// Only `this` (or the first parameter of a static method)
    pub const FIRST: SlotMask = SlotMask(1);

    pub const fn from_bits(bits: u64) -> SlotMask {
        SlotMask(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Mask with just one slot set (empty if the slot can't be stored)
    pub fn single(slot: u16) -> SlotMask {
        let mut mask = SlotMask::EMPTY;
        mask.insert(slot);
        mask
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Is the slot in the set? Slots past the capacity always are.
    pub fn contains(self, slot: u16) -> bool {
        slot >= Self::CAPACITY || self.0 & (1u64 << slot) != 0
    }

    pub fn insert(&mut self, slot: u16) {
        if slot < Self::CAPACITY {
            self.0 |= 1u64 << slot;
        }
    }

    /// Insert `width` consecutive slots starting at `slot`
    pub fn insert_range(&mut self, slot: u16, width: u16) {
        for offset in 0..width {
            self.insert(slot.saturating_add(offset));
        }
    }

    /// Slots in both sets
    pub fn intersection(self, other: SlotMask) -> SlotMask {
        SlotMask(self.0 & other.0)
    }

    /// Stored slots, in ascending order
    pub fn iter(self) -> impl Iterator<Item = u16> {
        (0..Self::CAPACITY).filter(move |slot| self.0 & (1u64 << slot) != 0)
    }
}

impl BitOr for SlotMask {
    type Output = SlotMask;

    fn bitor(self, other: SlotMask) -> SlotMask {
        SlotMask(self.0 | other.0)
    }
}

impl BitOrAssign for SlotMask {
    fn bitor_assign(&mut self, other: SlotMask) {
        self.0 |= other.0;
    }
}

impl fmt::Debug for SlotMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slots_past_capacity_are_always_present() {
        let mut mask = SlotMask::EMPTY;
        assert!(mask.contains(64));
        assert!(mask.contains(u16::MAX));
        mask.insert(64);
        assert_eq!(mask, SlotMask::EMPTY);
    }

    #[test]
    fn inserting_only_touches_one_slot() {
        for slot in 0..64 {
            let mask = SlotMask::single(slot);
            assert_eq!(mask.iter().collect::<Vec<_>>(), vec![slot]);
            assert_eq!(mask.bits(), 1u64 << slot);
        }
    }

    #[test]
    fn ranges_straddling_capacity() {
        let mut mask = SlotMask::EMPTY;
        mask.insert_range(63, 2);
        assert_eq!(mask.bits(), 1u64 << 63);
    }

    #[test]
    fn union_accumulates() {
        let mut mask = SlotMask::from_bits(0b0011);
        mask |= SlotMask::from_bits(0b0110);
        assert_eq!(mask.bits(), 0b0111);
        assert_eq!(format!("{:?}", mask), "{0, 1, 2}");
    }
}
