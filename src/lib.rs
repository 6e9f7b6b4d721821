//! Conservative optimization facts for JVM bytecode
//!
//! This crate computes the per-method and per-class facts that a bytecode optimizer needs before
//! it can safely remove parameters, inline methods, or merge classes: whether a method has side
//! effects, which parameters it modifies or lets escape, which parameters and locals it actually
//! uses, and whether it ever invokes dynamically.
//!
//!   - [`jvm`] is the in-memory bytecode model: the class graph, constant pools, instructions
//!   - [`optimize`] holds the facts themselves and the instruction-stream passes that compute them
//!
//! Every fact starts at a value that is safe to act on and only ever moves in one direction as
//! evidence accumulates. Library code (which is never analyzed) is assumed to do anything.

pub mod jvm;
pub mod optimize;
mod util;
