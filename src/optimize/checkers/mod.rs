//! Folds over the instructions of a method body
//!
//! Checkers don't store anything: they answer a question about a stretch of code and leave it to
//! the caller (usually a marker) to record the answer.

mod exception;
mod side_effect;

pub use exception::*;
pub use side_effect::*;
