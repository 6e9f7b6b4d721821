//! This module contains the AST of JVM bytecode, as far as analysis needs it. The representation
//! is slightly different from the usual presentation to make it more convenient to match on:
//!
//!   - The "wide" instruction doesn't show up at all, but instead gets merged into the
//!     instructions it is allowed to modify
//!
//!   - Some instructions (like the branches) get abstracted into one instruction with a field.
//!     This helps with repetitive pattern matches.
//!
//!   - Instructions that reference the constant pool just hold the index. Resolving it is the job
//!     of whoever has the class at hand.
//!
//! Jump operands are relative to the offset of the jumping instruction, just like in a class file.

use crate::jvm::{BaseType, ConstantIndex};
use crate::util::Width;

/// JVM bytecode instruction
#[derive(Clone, PartialEq, Debug)]
pub enum Instruction {
    Nop,
    AConstNull,
    IConstM1,
    IConst0,
    IConst1,
    IConst2,
    IConst3,
    IConst4,
    IConst5,
    LConst0,
    LConst1,
    FConst0,
    FConst1,
    FConst2,
    DConst0,
    DConst1,
    BiPush(i8),
    SiPush(i16),
    Ldc(ConstantIndex), // covers both `ldc` and `ldc_w`
    Ldc2(ConstantIndex),
    ILoad(u16), // covers `iload`, `iload{0,3}`, and `wide iload`
    LLoad(u16),
    FLoad(u16),
    DLoad(u16),
    ALoad(u16),
    IALoad,
    LALoad,
    FALoad,
    DALoad,
    AALoad,
    BALoad,
    CALoad,
    SALoad,
    IStore(u16), // covers `istore`, `istore{0,3}`, and `wide istore`
    LStore(u16),
    FStore(u16),
    DStore(u16),
    AStore(u16),
    IAStore,
    LAStore,
    FAStore,
    DAStore,
    AAStore,
    BAStore,
    CAStore,
    SAStore,
    Pop,
    Pop2,
    Dup,
    DupX1,
    DupX2,
    Dup2,
    Dup2X1,
    Dup2X2,
    Swap,
    IAdd,
    LAdd,
    FAdd,
    DAdd,
    ISub,
    LSub,
    FSub,
    DSub,
    IMul,
    LMul,
    FMul,
    DMul,
    IDiv,
    LDiv,
    FDiv,
    DDiv,
    IRem,
    LRem,
    FRem,
    DRem,
    INeg,
    LNeg,
    FNeg,
    DNeg,
    ISh(ShiftType), // covers `ishr`, `ishl`, and `iushr`
    LSh(ShiftType), // covers `lshr`, `lshl`, and `lushr`
    IAnd,
    LAnd,
    IOr,
    LOr,
    IXor,
    LXor,
    IInc(u16, i16), // covers `iinc` and `wide iinc`
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
    I2B,
    I2C,
    I2S,
    LCmp,
    FCmp(CompareMode), // covers `fcmpl` and `fcmpg`
    DCmp(CompareMode), // covers `dcmpl` and `dcmpg`
    If(OrdComparison, i16), // covers `ifeq`, `ifne`, `iflt`, `ifge`, `ifgt`, `ifle`
    IfICmp(OrdComparison, i16), // covers `if_icmpeq`, `if_icmpne`, ... `if_icmple`
    IfACmp(EqComparison, i16), // covers `if_acmpeq`, `if_acmpne`
    Goto(i16),
    Jsr(i16),
    Ret(u16), // covers `ret` and `wide ret`
    TableSwitch {
        /// `default` must be at a multiple of four bytes from the start of the current method, so
        /// there must be a 0-3 inclusive byte padding
        padding: u8,

        /// Jump target if the argument is less than `low` or greater than
        /// `low + targets.len()`
        default: i32,

        /// Value associated with the first jump target
        low: i32,

        /// Jump targets
        targets: Vec<i32>,
    },
    LookupSwitch {
        /// Same alignment requirement as `TableSwitch`
        padding: u8,

        /// Jump target if there is no corresponding key
        default: i32,

        /// Jump targets (sorted so that the keys are ascending)
        targets: Vec<(i32, i32)>,
    },
    IReturn,
    LReturn,
    FReturn,
    DReturn,
    AReturn,
    Return,
    GetStatic(ConstantIndex),
    PutStatic(ConstantIndex),
    GetField(ConstantIndex),
    PutField(ConstantIndex),
    Invoke(InvokeType, ConstantIndex),
    InvokeDynamic(ConstantIndex),
    New(ConstantIndex),
    NewArray(BaseType),
    ANewArray(ConstantIndex),
    ArrayLength,
    AThrow,
    CheckCast(ConstantIndex),
    InstanceOf(ConstantIndex),
    MonitorEnter,
    MonitorExit,
    MultiANewArray(ConstantIndex, u8),
    IfNull(EqComparison, i16), // covers `ifnull`, `ifnonnull`
    GotoW(i32),
    JsrW(i32),
}

/// How an instruction refers to things outside of the operand stack
///
/// This is what visitors dispatch on: every instruction has exactly one shape.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InstructionShape {
    /// Operates only on the operand stack (and maybe an immediate)
    Simple,

    /// Reads or writes a local variable slot
    Variable(u16),

    /// References a constant pool entry
    Constant(ConstantIndex),

    /// Jumps to a single relative offset (possibly conditionally)
    Branch(i32),

    /// `tableswitch` or `lookupswitch`
    Switch,
}

impl Instruction {
    pub fn shape(&self) -> InstructionShape {
        use Instruction::*;
        match self {
            ILoad(idx) | LLoad(idx) | FLoad(idx) | DLoad(idx) | ALoad(idx) | IStore(idx)
            | LStore(idx) | FStore(idx) | DStore(idx) | AStore(idx) | IInc(idx, _) | Ret(idx) => {
                InstructionShape::Variable(*idx)
            }

            Ldc(idx)
            | Ldc2(idx)
            | GetStatic(idx)
            | PutStatic(idx)
            | GetField(idx)
            | PutField(idx)
            | Invoke(_, idx)
            | InvokeDynamic(idx)
            | New(idx)
            | ANewArray(idx)
            | CheckCast(idx)
            | InstanceOf(idx)
            | MultiANewArray(idx, _) => InstructionShape::Constant(*idx),

            If(_, off) | IfICmp(_, off) | IfACmp(_, off) | IfNull(_, off) | Goto(off)
            | Jsr(off) => InstructionShape::Branch(*off as i32),
            GotoW(off) | JsrW(off) => InstructionShape::Branch(*off),

            TableSwitch { .. } | LookupSwitch { .. } => InstructionShape::Switch,

            _ => InstructionShape::Simple,
        }
    }

    /// Does this instruction load or store a `long` or `double` local (so two slots)?
    pub fn is_category2_variable(&self) -> bool {
        matches!(
            self,
            Instruction::LLoad(_)
                | Instruction::LStore(_)
                | Instruction::DLoad(_)
                | Instruction::DStore(_)
        )
    }

    /// Is this one of the method return instructions?
    pub fn is_return(&self) -> bool {
        matches!(
            self,
            Instruction::IReturn
                | Instruction::LReturn
                | Instruction::FReturn
                | Instruction::DReturn
                | Instruction::AReturn
                | Instruction::Return
        )
    }

    /// Can control continue to the next instruction?
    pub fn falls_through(&self) -> bool {
        !matches!(
            self,
            Instruction::Goto(_)
                | Instruction::GotoW(_)
                | Instruction::TableSwitch { .. }
                | Instruction::LookupSwitch { .. }
                | Instruction::Ret(_)
                | Instruction::AThrow
        ) && !self.is_return()
    }

    /// Relative offsets of every explicit jump target (not including fall-through)
    pub fn jump_targets(&self) -> Vec<i32> {
        match self {
            Instruction::TableSwitch {
                default, targets, ..
            } => {
                let mut ts = vec![*default];
                ts.extend(targets.iter().copied());
                ts
            }
            Instruction::LookupSwitch {
                default, targets, ..
            } => {
                let mut ts = vec![*default];
                ts.extend(targets.iter().map(|(_, target)| *target));
                ts
            }
            other => match other.shape() {
                InstructionShape::Branch(off) => vec![off],
                _ => vec![],
            },
        }
    }
}

impl Width for Instruction {
    fn width(&self) -> usize {
        match self {
          Instruction::Nop
          | Instruction::AConstNull
          | Instruction::IConstM1
          | Instruction::IConst0
          | Instruction::IConst1
          | Instruction::IConst2
          | Instruction::IConst3
          | Instruction::IConst4
          | Instruction::IConst5
          | Instruction::LConst0
          | Instruction::LConst1
          | Instruction::FConst0
          | Instruction::FConst1
          | Instruction::FConst2
          | Instruction::DConst0
          | Instruction::DConst1
          | Instruction::ILoad(0..=3)
          | Instruction::LLoad(0..=3)
          | Instruction::FLoad(0..=3)
          | Instruction::DLoad(0..=3)
          | Instruction::ALoad(0..=3)
          | Instruction::IALoad
          | Instruction::LALoad
          | Instruction::FALoad
          | Instruction::DALoad
          | Instruction::AALoad
          | Instruction::BALoad
          | Instruction::CALoad
          | Instruction::SALoad
          | Instruction::IStore(0..=3)
          | Instruction::LStore(0..=3)
          | Instruction::FStore(0..=3)
          | Instruction::DStore(0..=3)
          | Instruction::AStore(0..=3)
          | Instruction::IAStore
          | Instruction::LAStore
          | Instruction::FAStore
          | Instruction::DAStore
          | Instruction::AAStore
          | Instruction::BAStore
          | Instruction::CAStore
          | Instruction::SAStore
          | Instruction::Pop
          | Instruction::Pop2
          | Instruction::Dup
          | Instruction::DupX1
          | Instruction::DupX2
          | Instruction::Dup2
          | Instruction::Dup2X1
          | Instruction::Dup2X2
          | Instruction::Swap
          | Instruction::IAdd
          | Instruction::LAdd
          | Instruction::FAdd
          | Instruction::DAdd
          | Instruction::ISub
          | Instruction::LSub
          | Instruction::FSub
          | Instruction::DSub
          | Instruction::IMul
          | Instruction::LMul
          | Instruction::FMul
          | Instruction::DMul
          | Instruction::IDiv
          | Instruction::LDiv
          | Instruction::FDiv
          | Instruction::DDiv
          | Instruction::IRem
          | Instruction::LRem
          | Instruction::FRem
          | Instruction::DRem
          | Instruction::INeg
          | Instruction::LNeg
          | Instruction::FNeg
          | Instruction::DNeg
          | Instruction::ISh(_)
          | Instruction::LSh(_)
          | Instruction::IAnd
          | Instruction::LAnd
          | Instruction::IOr
          | Instruction::LOr
          | Instruction::IXor
          | Instruction::LXor
          | Instruction::I2L
          | Instruction::I2F
          | Instruction::I2D
          | Instruction::L2I
          | Instruction::L2F
          | Instruction::L2D
          | Instruction::F2I
          | Instruction::F2L
          | Instruction::F2D
          | Instruction::D2I
          | Instruction::D2L
          | Instruction::D2F
          | Instruction::I2B
          | Instruction::I2C
          | Instruction::I2S
          | Instruction::LCmp
          | Instruction::FCmp(_)
          | Instruction::DCmp(_)
          | Instruction::IReturn
          | Instruction::LReturn
          | Instruction::FReturn
          | Instruction::DReturn
          | Instruction::AReturn
          | Instruction::Return
          | Instruction::ArrayLength
          | Instruction::AThrow
          | Instruction::MonitorEnter
          | Instruction::MonitorExit
          => 1,

          Instruction::BiPush(_)
          | Instruction::ILoad(4..=255)
          | Instruction::LLoad(4..=255)
          | Instruction::FLoad(4..=255)
          | Instruction::DLoad(4..=255)
          | Instruction::ALoad(4..=255)
          | Instruction::IStore(4..=255)
          | Instruction::LStore(4..=255)
          | Instruction::FStore(4..=255)
          | Instruction::DStore(4..=255)
          | Instruction::AStore(4..=255)
          | Instruction::Ret(0..=255)
          | Instruction::Ldc(ConstantIndex(0..=255))
          | Instruction::NewArray(_)
          => 2,

          Instruction::SiPush(_)
          | Instruction::Ldc(_)
          | Instruction::Ldc2(_) // always wide, unlike `ldc` vs. `ldc_w`
          | Instruction::IInc(0..=255, -128..=127)
          | Instruction::If(_, _)
          | Instruction::IfICmp(_, _)
          | Instruction::IfACmp(_, _)
          | Instruction::IfNull(_, _)
          | Instruction::Goto(_)
          | Instruction::Jsr(_)
          | Instruction::GetStatic(_)
          | Instruction::PutStatic(_)
          | Instruction::GetField(_)
          | Instruction::PutField(_)
          | Instruction::Invoke(InvokeType::Special, _)
          | Instruction::Invoke(InvokeType::Static, _)
          | Instruction::Invoke(InvokeType::Virtual, _)
          | Instruction::New(_)
          | Instruction::ANewArray(_)
          | Instruction::CheckCast(_)
          | Instruction::InstanceOf(_)
          => 3,

          Instruction::ILoad(_)
          | Instruction::LLoad(_)
          | Instruction::FLoad(_)
          | Instruction::DLoad(_)
          | Instruction::ALoad(_)
          | Instruction::IStore(_)
          | Instruction::LStore(_)
          | Instruction::FStore(_)
          | Instruction::DStore(_)
          | Instruction::AStore(_)
          | Instruction::Ret(_)
          | Instruction::MultiANewArray(_, _)
          => 4,

          Instruction::Invoke(InvokeType::Interface(_), _)
          | Instruction::InvokeDynamic(_)
          | Instruction::GotoW(_)
          | Instruction::JsrW(_)
          => 5,

          Instruction::IInc(_, _)
          => 6,

          Instruction::TableSwitch {
              padding, targets, ..
          } => 1 + *padding as usize + 4 * (3 + targets.len()),

          Instruction::LookupSwitch {
              padding, targets, ..
          } => 1 + *padding as usize + 8 * (1 + targets.len()),
        }
    }
}

/// Possible bit shifts
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ShiftType {
    Left,
    LogicalRight,
    ArithmeticRight,
}

/// Comparison modes for floating point
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum CompareMode {
    /// -1 on NaN
    L,

    /// 1 on NaN
    G,
}

/// Binary comparison operators available for `int` branches
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum OrdComparison {
    EQ,
    GE,
    GT,
    LE,
    LT,
    NE,
}

/// Equality/inequality comparison operators
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum EqComparison {
    EQ,
    NE,
}

/// Type of method to invoke
///
/// Note: `InvokeDynamic` is kept separate because the constant argument it expects is not to a
/// `Constant::MethodRef`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum InvokeType {
    Virtual,
    Special,
    Static,
    Interface(u8), // `count` is of total arguments, where `long`/`double` count for 2
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shapes() {
        assert_eq!(Instruction::IAdd.shape(), InstructionShape::Simple);
        assert_eq!(Instruction::LLoad(4).shape(), InstructionShape::Variable(4));
        assert_eq!(Instruction::IInc(2, -1).shape(), InstructionShape::Variable(2));
        assert_eq!(Instruction::Ret(7).shape(), InstructionShape::Variable(7));
        assert_eq!(
            Instruction::InvokeDynamic(ConstantIndex(9)).shape(),
            InstructionShape::Constant(ConstantIndex(9))
        );
        assert_eq!(
            Instruction::If(OrdComparison::EQ, -4).shape(),
            InstructionShape::Branch(-4)
        );
        assert_eq!(Instruction::AThrow.shape(), InstructionShape::Simple);
    }

    #[test]
    fn wide_forms() {
        assert_eq!(Instruction::ILoad(2).width(), 1);
        assert_eq!(Instruction::ILoad(200).width(), 2);
        assert_eq!(Instruction::ILoad(300).width(), 4);
        assert_eq!(Instruction::IInc(3, 1).width(), 3);
        assert_eq!(Instruction::IInc(3, 1000).width(), 6);
        assert_eq!(Instruction::Ldc(ConstantIndex(3)).width(), 2);
        assert_eq!(Instruction::Ldc(ConstantIndex(300)).width(), 3);
    }

    #[test]
    fn control_flow() {
        assert!(!Instruction::AThrow.falls_through());
        assert!(!Instruction::AReturn.falls_through());
        assert!(Instruction::IfNull(EqComparison::NE, 8).falls_through());
        let switch = Instruction::LookupSwitch {
            padding: 0,
            default: 20,
            targets: vec![(1, 12), (5, 16)],
        };
        assert_eq!(switch.jump_targets(), vec![20, 12, 16]);
    }
}
