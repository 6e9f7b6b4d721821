use crate::jvm::class_graph::ClassId;
use bitflags::bitflags;

bitflags! {
    /// Boolean facts about a class
    pub struct ClassFacts: u16 {
        /// Must survive optimization as-is (eg. it is an entry point)
        const KEPT = 0x0001;
        const CONTAINS_CONSTRUCTORS = 0x0002;
        const INSTANTIATED = 0x0004;
        const INSTANCEOFED = 0x0008;

        /// Referenced as a class literal (`Foo.class`)
        const DOT_CLASSED = 0x0010;

        /// Caught by some exception handler
        const CAUGHT = 0x0020;
        const SIMPLE_ENUM = 0x0040;
        const ESCAPING = 0x0080;

        /// Static initialization may have side effects
        const HAS_SIDE_EFFECTS = 0x0100;
        const CONTAINS_PACKAGE_VISIBLE_MEMBERS = 0x0200;
        const INVOKES_PACKAGE_VISIBLE_MEMBERS = 0x0400;

        /// Facts combined when two classes become one
        const MERGED = Self::CONTAINS_CONSTRUCTORS.bits
            | Self::INSTANTIATED.bits
            | Self::INSTANCEOFED.bits
            | Self::DOT_CLASSED.bits
            | Self::CAUGHT.bits
            | Self::SIMPLE_ENUM.bits
            | Self::ESCAPING.bits
            | Self::HAS_SIDE_EFFECTS.bits
            | Self::CONTAINS_PACKAGE_VISIBLE_MEMBERS.bits
            | Self::INVOKES_PACKAGE_VISIBLE_MEMBERS.bits;
    }
}

/// Facts about a class, used to decide what optimizations are safe
///
/// Like [`super::MethodOptimizationInfo`], there is one starting point for program classes (no
/// facts yet) and one for library classes (everything that could be true is). Facts only ever get
/// raised, except for `may_be_merged` which only ever gets lowered.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ClassOptimizationInfo<'g> {
    facts: ClassFacts,
    may_be_merged: bool,
    initializer_checked: bool,
    wrapped_class: Option<ClassId<'g>>,
    target_class: Option<ClassId<'g>>,
}

impl<'g> ClassOptimizationInfo<'g> {
    /// Info for a class whose code will be analyzed
    pub fn program() -> ClassOptimizationInfo<'g> {
        ClassOptimizationInfo {
            facts: ClassFacts::empty(),
            may_be_merged: true,
            initializer_checked: false,
            wrapped_class: None,
            target_class: None,
        }
    }

    /// Conservative info for a class whose code is unavailable
    ///
    /// Being a simple enum is the one fact whose safe value is `false`.
    pub fn library() -> ClassOptimizationInfo<'g> {
        ClassOptimizationInfo {
            facts: ClassFacts::all() - ClassFacts::SIMPLE_ENUM,
            may_be_merged: false,
            initializer_checked: true,
            wrapped_class: None,
            target_class: None,
        }
    }

    /// All of the boolean facts at once
    pub fn facts(&self) -> ClassFacts {
        self.facts
    }

    pub fn is_kept(&self) -> bool {
        self.facts.contains(ClassFacts::KEPT)
    }

    pub fn set_kept(&mut self) {
        self.facts.insert(ClassFacts::KEPT);
    }

    pub fn contains_constructors(&self) -> bool {
        self.facts.contains(ClassFacts::CONTAINS_CONSTRUCTORS)
    }

    pub fn set_contains_constructors(&mut self) {
        self.facts.insert(ClassFacts::CONTAINS_CONSTRUCTORS);
    }

    pub fn is_instantiated(&self) -> bool {
        self.facts.contains(ClassFacts::INSTANTIATED)
    }

    pub fn set_instantiated(&mut self) {
        self.facts.insert(ClassFacts::INSTANTIATED);
    }

    pub fn is_instanceofed(&self) -> bool {
        self.facts.contains(ClassFacts::INSTANCEOFED)
    }

    pub fn set_instanceofed(&mut self) {
        self.facts.insert(ClassFacts::INSTANCEOFED);
    }

    pub fn is_dot_classed(&self) -> bool {
        self.facts.contains(ClassFacts::DOT_CLASSED)
    }

    pub fn set_dot_classed(&mut self) {
        self.facts.insert(ClassFacts::DOT_CLASSED);
    }

    pub fn is_caught(&self) -> bool {
        self.facts.contains(ClassFacts::CAUGHT)
    }

    pub fn set_caught(&mut self) {
        self.facts.insert(ClassFacts::CAUGHT);
    }

    pub fn is_simple_enum(&self) -> bool {
        self.facts.contains(ClassFacts::SIMPLE_ENUM)
    }

    pub fn set_simple_enum(&mut self) {
        self.facts.insert(ClassFacts::SIMPLE_ENUM);
    }

    pub fn is_escaping(&self) -> bool {
        self.facts.contains(ClassFacts::ESCAPING)
    }

    pub fn set_escaping(&mut self) {
        self.facts.insert(ClassFacts::ESCAPING);
    }

    pub fn has_side_effects(&self) -> bool {
        self.facts.contains(ClassFacts::HAS_SIDE_EFFECTS)
    }

    pub fn set_side_effects(&mut self) {
        self.facts.insert(ClassFacts::HAS_SIDE_EFFECTS);
    }

    /// Has the static initializer (if there is one) been checked for side effects?
    ///
    /// Until it has, `has_side_effects` being unset proves nothing.
    pub fn is_initializer_checked(&self) -> bool {
        self.initializer_checked
    }

    pub fn set_initializer_checked(&mut self) {
        self.initializer_checked = true;
    }

    pub fn contains_package_visible_members(&self) -> bool {
        self.facts
            .contains(ClassFacts::CONTAINS_PACKAGE_VISIBLE_MEMBERS)
    }

    pub fn set_contains_package_visible_members(&mut self) {
        self.facts
            .insert(ClassFacts::CONTAINS_PACKAGE_VISIBLE_MEMBERS);
    }

    pub fn invokes_package_visible_members(&self) -> bool {
        self.facts
            .contains(ClassFacts::INVOKES_PACKAGE_VISIBLE_MEMBERS)
    }

    pub fn set_invokes_package_visible_members(&mut self) {
        self.facts
            .insert(ClassFacts::INVOKES_PACKAGE_VISIBLE_MEMBERS);
    }

    pub fn may_be_merged(&self) -> bool {
        self.may_be_merged
    }

    pub fn set_may_not_be_merged(&mut self) {
        self.may_be_merged = false;
    }

    /// Class whose single instance this class wraps
    pub fn wrapped_class(&self) -> Option<ClassId<'g>> {
        self.wrapped_class
    }

    pub fn set_wrapped_class(&mut self, wrapped_class: Option<ClassId<'g>>) {
        self.wrapped_class = wrapped_class;
    }

    /// Class this class has been merged into
    pub fn target_class(&self) -> Option<ClassId<'g>> {
        self.target_class
    }

    pub fn set_target_class(&mut self, target_class: Option<ClassId<'g>>) {
        self.target_class = target_class;
    }

    /// Fold the facts of another class into this one
    ///
    /// Every fact except `kept` is OR-ed in. The merged initializer is only checked if both were.
    /// Being kept, mergeability, and the wrapped and target classes are up to whoever is doing
    /// the merging.
    pub fn merge(&mut self, other: &ClassOptimizationInfo<'g>) {
        self.facts |= other.facts & ClassFacts::MERGED;
        self.initializer_checked &= other.initializer_checked;
    }
}
