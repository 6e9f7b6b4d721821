//! In-memory model of JVM classes, as far as the optimizer needs it
//!
//! ### Structure
//!
//! The model is split in two layers:
//!
//!   - the [`class_graph`], which has one node per class, method, and field that the program
//!     refers to (whether or not its body is available). Nodes live in arenas and are compared by
//!     identity. They also carry the slots in which optimization info gets stored.
//!
//!   - the [`model`], which is the "body" of program classes: the constant pool, and the code of
//!     each method.
//!
//! Method bodies are a flat stream of [`code::Instruction`]s keyed by bytecode offset. Passes over
//! the stream either match on instructions directly or implement [`code::InstructionVisitor`],
//! which gets one callback per instruction shape.
//!
//! ### Example
//!
//! ```
//! use jvm_optinfo::jvm::class_graph::*;
//! use jvm_optinfo::jvm::code::{Code, Instruction::*};
//! use jvm_optinfo::jvm::model::{Class, Method};
//! use jvm_optinfo::jvm::*;
//!
//! # fn build() -> Result<(), Error> {
//! let arenas = ClassGraphArenas::new();
//! let class_graph = ClassGraph::new(&arenas);
//! let java = class_graph.insert_java_library_types();
//!
//! let point = class_graph.add_class(ClassData::new(
//!     BinaryName::from_string(String::from("com/example/Point")).map_err(Error::MalformedName)?,
//!     Some(java.object),
//!     ClassAccessFlags::PUBLIC,
//! ));
//! let sum = class_graph.add_method(MethodData::new(
//!     point,
//!     UnqualifiedName::from_string(String::from("sum")).map_err(Error::MalformedName)?,
//!     MethodDescriptor::parse("(II)I").map_err(|e| Error::BadDescriptor(e.to_string()))?,
//!     MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
//! ));
//!
//! let mut class = Class::new(point);
//! let mut method = Method::new(sum);
//! method.code_impl = Some(Code::new(2, vec![ILoad(0), ILoad(1), IAdd, IReturn]));
//! class.add_method(method);
//! # Ok(())
//! # }
//! ```

mod access_flags;
pub mod class_graph;
pub mod code;
mod constants;
mod descriptors;
mod errors;
pub mod model;
mod names;

pub use access_flags::*;
pub use constants::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
