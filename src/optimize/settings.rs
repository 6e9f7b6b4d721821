/// Knobs for deciding what counts as a side effect
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Settings {
    /// Treat returning from a method (or a subroutine, via `ret`) as a side effect
    ///
    /// This matters when the question is "can this code be removed?" rather than "can this code
    /// be moved?".
    pub include_return_instructions: bool,

    /// Treat stores into arrays as side effects
    ///
    /// Arrays might be shared with the caller, so this is only safe to disable for callers that
    /// separately track where arrays come from.
    pub include_array_store_instructions: bool,

    /// Treat instructions that may throw a built-in exception (eg. `ArithmeticException` from
    /// `idiv`) as side effects
    pub include_built_in_exceptions: bool,
}

impl Settings {
    pub fn new() -> Settings {
        Settings {
            include_return_instructions: false,
            include_array_store_instructions: true,
            include_built_in_exceptions: true,
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings::new()
    }
}
