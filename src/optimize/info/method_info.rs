use super::SlotMask;
use bitflags::bitflags;

bitflags! {
    /// Boolean facts about a method
    struct MethodFacts: u8 {
        const NO_SIDE_EFFECTS = 0x01;
        const NO_EXTERNAL_SIDE_EFFECTS = 0x02;
        const SIDE_EFFECTS = 0x04;
        const INVOKES_DYNAMICALLY = 0x08;
        const CATCHES_EXCEPTIONS = 0x10;
        const SYNCHRONIZED_BLOCK = 0x20;
        const MODIFIES_ANYTHING = 0x40;

        /// What a method nobody has looked at might do
        const UNKNOWN = Self::SIDE_EFFECTS.bits
            | Self::INVOKES_DYNAMICALLY.bits
            | Self::CATCHES_EXCEPTIONS.bits
            | Self::SYNCHRONIZED_BLOCK.bits
            | Self::MODIFIES_ANYTHING.bits;
    }
}

/// Facts about a method, used to decide what optimizations are safe
///
/// Parameters are identified by their local variable slot, so a `long` or `double` parameter
/// takes up two slots and `this` (for instance methods) is slot 0.
///
/// There are two starting points:
///
///   - [`Self::program`] for methods whose code gets analyzed: nothing is known yet, so every
///     mask is empty and every flag unset. Analysis adds facts as it finds evidence.
///
///   - [`Self::library`] for methods that won't be analyzed: anything could happen, so every mask
///     is full and every hazard flag set. Callers can still narrow these down with
///     [`Self::set_no_side_effects`] and [`Self::set_no_external_side_effects`].
///
/// Setters never take a value: flags can only be raised and masks can only grow.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MethodOptimizationInfo {
    facts: MethodFacts,
    modified_parameters: SlotMask,
    escaping_parameters: SlotMask,
    used_parameters: SlotMask,
    parameter_size: usize,
    invocation_count: u32,
}

impl MethodOptimizationInfo {
    /// Info for a method whose code will be analyzed
    pub fn program(parameter_size: usize) -> MethodOptimizationInfo {
        MethodOptimizationInfo {
            facts: MethodFacts::empty(),
            modified_parameters: SlotMask::EMPTY,
            escaping_parameters: SlotMask::EMPTY,
            used_parameters: SlotMask::EMPTY,
            parameter_size,
            invocation_count: 0,
        }
    }

    /// Conservative info for a method whose code is unavailable
    pub fn library(parameter_size: usize) -> MethodOptimizationInfo {
        MethodOptimizationInfo {
            facts: MethodFacts::UNKNOWN,
            modified_parameters: SlotMask::ALL,
            escaping_parameters: SlotMask::ALL,
            used_parameters: SlotMask::ALL,
            parameter_size,
            invocation_count: 0,
        }
    }

    /// Number of local variable slots taken up by parameters (including `this`)
    pub fn parameter_size(&self) -> usize {
        self.parameter_size
    }

    pub fn has_no_side_effects(&self) -> bool {
        self.facts.contains(MethodFacts::NO_SIDE_EFFECTS)
    }

    /// Assert that calling the method has no observable effect
    pub fn set_no_side_effects(&mut self) {
        self.facts.insert(MethodFacts::NO_SIDE_EFFECTS);
    }

    /// No effect outside of `this`
    pub fn has_no_external_side_effects(&self) -> bool {
        self.facts
            .intersects(MethodFacts::NO_SIDE_EFFECTS | MethodFacts::NO_EXTERNAL_SIDE_EFFECTS)
    }

    /// Assert that calling the method can at most modify `this`
    pub fn set_no_external_side_effects(&mut self) {
        self.facts.insert(MethodFacts::NO_EXTERNAL_SIDE_EFFECTS);
    }

    pub fn has_side_effects(&self) -> bool {
        !self.has_no_side_effects() && self.facts.contains(MethodFacts::SIDE_EFFECTS)
    }

    pub fn set_side_effects(&mut self) {
        self.facts.insert(MethodFacts::SIDE_EFFECTS);
    }

    /// Does the method contain an `invokedynamic`?
    pub fn invokes_dynamically(&self) -> bool {
        self.facts.contains(MethodFacts::INVOKES_DYNAMICALLY)
    }

    pub fn set_invokes_dynamically(&mut self) {
        self.facts.insert(MethodFacts::INVOKES_DYNAMICALLY);
    }

    /// Does the method have an exception handler whose protected range may throw?
    pub fn catches_exceptions(&self) -> bool {
        self.facts.contains(MethodFacts::CATCHES_EXCEPTIONS)
    }

    pub fn set_catches_exceptions(&mut self) {
        self.facts.insert(MethodFacts::CATCHES_EXCEPTIONS);
    }

    /// Is the method synchronized or does it contain a `monitorenter`?
    pub fn has_synchronized_block(&self) -> bool {
        self.facts.contains(MethodFacts::SYNCHRONIZED_BLOCK)
    }

    pub fn set_has_synchronized_block(&mut self) {
        self.facts.insert(MethodFacts::SYNCHRONIZED_BLOCK);
    }

    /// May the method modify state reachable from outside of its parameters?
    pub fn modifies_anything(&self) -> bool {
        !self.has_no_external_side_effects() && self.facts.contains(MethodFacts::MODIFIES_ANYTHING)
    }

    pub fn set_modifies_anything(&mut self) {
        self.facts.insert(MethodFacts::MODIFIES_ANYTHING);
    }

    /// Slots of parameters whose objects the method may write to
    pub fn modified_parameters(&self) -> SlotMask {
        if self.has_no_side_effects() {
            SlotMask::EMPTY
        } else if self.facts.contains(MethodFacts::NO_EXTERNAL_SIDE_EFFECTS) {
            self.modified_parameters.intersection(SlotMask::FIRST)
        } else {
            self.modified_parameters
        }
    }

    pub fn is_parameter_modified(&self, slot: u16) -> bool {
        if self.has_no_side_effects() {
            false
        } else if self.facts.contains(MethodFacts::NO_EXTERNAL_SIDE_EFFECTS) {
            slot == 0 && self.modified_parameters.contains(0)
        } else {
            self.modified_parameters.contains(slot)
        }
    }

    pub fn set_parameter_modified(&mut self, slot: u16) {
        self.modified_parameters.insert(slot);
    }

    /// Add to the modified parameters (never removes any)
    pub fn update_modified_parameters(&mut self, modified: SlotMask) {
        self.modified_parameters |= modified;
    }

    /// Slots of parameters whose objects may become reachable after the method returns
    pub fn escaping_parameters(&self) -> SlotMask {
        self.escaping_parameters
    }

    pub fn is_parameter_escaping(&self, slot: u16) -> bool {
        self.escaping_parameters.contains(slot)
    }

    pub fn set_parameter_escaping(&mut self, slot: u16) {
        self.escaping_parameters.insert(slot);
    }

    /// Add to the escaping parameters (never removes any)
    pub fn update_escaping_parameters(&mut self, escaping: SlotMask) {
        self.escaping_parameters |= escaping;
    }

    /// Slots of parameters the method reads
    pub fn used_parameters(&self) -> SlotMask {
        self.used_parameters
    }

    pub fn is_parameter_used(&self, slot: u16) -> bool {
        self.used_parameters.contains(slot)
    }

    pub fn mark_parameter_used(&mut self, slot: u16) {
        self.used_parameters.insert(slot);
    }

    /// Add to the used parameters (never removes any)
    pub fn update_used_parameters(&mut self, used: SlotMask) {
        self.used_parameters |= used;
    }

    /// Is any parameter slot (up to the parameter size) unused?
    pub fn has_unused_parameters(&self) -> bool {
        let parameter_size = self.parameter_size.min(SlotMask::CAPACITY as usize) as u16;
        (0..parameter_size).any(|slot| !self.used_parameters.contains(slot))
    }

    /// Number of references to the method seen in program code
    pub fn invocation_count(&self) -> u32 {
        self.invocation_count
    }

    pub fn increment_invocation_count(&mut self) {
        self.invocation_count = self.invocation_count.saturating_add(1);
    }
}
