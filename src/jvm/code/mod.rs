//! Method bodies
//!
//! ### Structure
//!
//! A method [`Code`] is a flat stream of [`Instruction`]s keyed by bytecode offset, along with the
//! number of local variable slots and the exception table. There is no CFG here: every analysis
//! in this crate is a single pass over the stream in offset order.
//!
//! Passes that care about instructions of a certain shape implement [`InstructionVisitor`] and
//! get driven by [`Code::accept`]. Passes that only need a fold (eg. "does anything in this range
//! throw?") iterate over the instructions directly.

mod code;
mod instructions;
mod visitor;

pub use code::*;
pub use instructions::*;
pub use visitor::*;

pub use crate::util::Offset;
