//! Facts about classes and methods
//!
//! The facts live directly on the class graph nodes (see [`ClassData::optimization_info`] and
//! [`MethodData::optimization_info`]), so any pass holding a class or method id can read what
//! earlier passes found out about it.
//!
//! [`ClassData::optimization_info`]: crate::jvm::class_graph::ClassData::optimization_info
//! [`MethodData::optimization_info`]: crate::jvm::class_graph::MethodData::optimization_info

mod attachment;
mod class_info;
mod method_info;
mod slot_mask;

pub use class_info::*;
pub use method_info::*;
pub use slot_mask::*;
