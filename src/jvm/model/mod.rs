//! Semantic representations of program classes
//!
//! This is the "body" side of a class: the parts the class graph doesn't know about, which are
//! only available for classes being optimized.
//!
//!   - __Class__ is represented using [`Class`], which owns the constant pool
//!   - __Method__ is represented using [`Method`], which owns the code
//!   - __Field__ is represented using [`Field`]
//!
//! In all of these cases, the structs have an `id` field to query the class graph representation.

mod class;
mod field;
mod method;
mod visitor;

pub use class::*;
pub use field::*;
pub use method::*;
pub use visitor::*;
