use super::ConstantIndex;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Optimization info was read from a class or method before it was attached
    ///
    /// This is an ordering bug: the info needs to be initialized before any pass runs.
    MissingOptimizationInfo(String),

    /// A constant index that doesn't point at the start of a constant pool entry
    MissingConstant(ConstantIndex),

    /// A constant pool entry whose kind doesn't match what the instruction needs
    UnexpectedConstant {
        index: ConstantIndex,
        expected: &'static str,
    },

    /// A pass that needs a method body was run on an abstract or native method
    MissingCode(String),

    /// The operand stack had fewer entries than an instruction pops
    StackUnderflow { method: String, offset: usize },

    /// The constant pool has no room left for another entry
    ConstantPoolOverflow { offset: usize },

    BadDescriptor(String),
    MalformedName(String),
    MissingClass(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingOptimizationInfo(owner) => {
                write!(f, "no optimization info attached to {}", owner)
            }
            Error::MissingConstant(index) => write!(f, "no constant at index {}", index.0),
            Error::UnexpectedConstant { index, expected } => {
                write!(f, "constant at index {} is not a {}", index.0, expected)
            }
            Error::MissingCode(method) => write!(f, "method {} has no code", method),
            Error::StackUnderflow { method, offset } => {
                write!(f, "operand stack underflow in {} at offset {}", method, offset)
            }
            Error::ConstantPoolOverflow { offset } => {
                write!(f, "constant pool overflow at offset {}", offset)
            }
            Error::BadDescriptor(msg) => write!(f, "bad descriptor: {}", msg),
            Error::MalformedName(msg) => write!(f, "malformed name: {}", msg),
            Error::MissingClass(name) => write!(f, "class {} is not in the class graph", name),
        }
    }
}

impl std::error::Error for Error {}
