//! Optimization info: what is known about classes and methods, and how it gets found out
//!
//! ### Structure
//!
//! Facts live in [`ClassOptimizationInfo`] and [`MethodOptimizationInfo`], attached to the nodes
//! of the class graph. They get computed in a few layers:
//!
//!   - [`classify`] answers per-instruction questions (can this throw?)
//!   - [`checkers`] fold those answers over a stretch of code
//!   - [`markers`] walk the members of a class and record what they find
//!   - [`Analyzer`] sets everything up and runs the markers in order
//!
//! Consumers can then read the facts directly, or use the [`filters`] to only visit the
//! parameters and methods they care about.
//!
//! ### Monotonicity
//!
//! Every fact only moves in one direction: flags get set but never cleared, slot masks gain bits
//! but never lose them. A fact that hasn't been set yet is always the optimistic one for program
//! code, so anything reading facts before analysis has finished may see too optimistic a picture.

mod analyzer;
pub mod checkers;
pub mod classify;
pub mod filters;
mod info;
pub mod markers;
mod settings;

pub use analyzer::*;
pub use info::*;
pub use settings::*;
