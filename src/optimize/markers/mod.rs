//! Passes that record facts on the class graph
//!
//! Each marker is a [`MemberVisitor`] and most are also [`InstructionVisitor`]s: visiting a
//! method runs over its code and writes whatever was found into the optimization info of the
//! method (or of the classes it refers to). Markers only ever move facts in their safe direction,
//! so running one twice or in any order relative to the others gives the same result.
//!
//! [`MemberVisitor`]: crate::jvm::model::MemberVisitor
//! [`InstructionVisitor`]: crate::jvm::code::InstructionVisitor

mod catch_exception;
mod class_usage;
mod dynamic_invocation;
mod method_invocation;
mod package_visibility;
mod parameter_escape;
mod parameter_usage;
mod side_effect_method;
mod synchronization;
mod variable_usage;

pub use catch_exception::*;
pub use class_usage::*;
pub use dynamic_invocation::*;
pub use method_invocation::*;
pub use package_visibility::*;
pub use parameter_escape::*;
pub use parameter_usage::*;
pub use side_effect_method::*;
pub use synchronization::*;
pub use variable_usage::*;
