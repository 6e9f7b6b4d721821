//! Per-instruction facts that don't depend on anything but the opcode

use super::Settings;
use crate::jvm::code::Instruction;

/// Can executing this instruction throw an exception on its own?
///
/// This is a fixed list of opcodes: integer division and remainder, array accesses and creation,
/// `athrow` and `monitorenter`. Instructions that go through the constant pool are not on it, so
/// field accesses and invocations count as not throwing.
///
/// `monitorexit` is not included: in well-formed code it can only fail asynchronously.
pub fn may_throw_exceptions(instruction: &Instruction) -> bool {
    use Instruction::*;
    match instruction {
        IDiv | LDiv | IRem | LRem => true,

        IALoad | LALoad | FALoad | DALoad | AALoad | BALoad | CALoad | SALoad => true,
        IAStore | LAStore | FAStore | DAStore | AAStore | BAStore | CAStore | SAStore => true,
        NewArray(_) | ArrayLength => true,

        AThrow | MonitorEnter => true,
        MonitorExit => false,

        _ => false,
    }
}

/// Does an instruction indexing a local variable have a side effect?
///
/// Moving values between locals and the stack never does. Returning from a subroutine counts
/// only when returns count.
pub fn variable_has_side_effects(instruction: &Instruction, settings: &Settings) -> bool {
    match instruction {
        Instruction::Ret(_) => settings.include_return_instructions,
        _ => false,
    }
}

/// Is this one of the array store instructions?
pub fn is_array_store(instruction: &Instruction) -> bool {
    use Instruction::*;
    matches!(
        instruction,
        IAStore | LAStore | FAStore | DAStore | AAStore | BAStore | CAStore | SAStore
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::code::{EqComparison, Instruction::*, InvokeType};
    use crate::jvm::{BaseType, ConstantIndex};

    #[test]
    fn may_throw() {
        let throwing = [
            IDiv, LDiv, IRem, LRem, IALoad, LALoad, FALoad, DALoad, AALoad, BALoad, CALoad,
            SALoad, IAStore, LAStore, FAStore, DAStore, AAStore, BAStore, CAStore, SAStore,
            NewArray(BaseType::Int), ArrayLength, AThrow, MonitorEnter,
        ];
        for instruction in &throwing {
            assert!(may_throw_exceptions(instruction), "{:?}", instruction);
        }

        let safe = [
            MonitorExit, FDiv, DRem, IAdd, ILoad(0), AStore(1), Pop, Return, AReturn,
            IfNull(EqComparison::EQ, 3), IInc(1, 1),
        ];
        for instruction in &safe {
            assert!(!may_throw_exceptions(instruction), "{:?}", instruction);
        }
    }

    #[test]
    fn constant_instructions_never_throw() {
        let index = ConstantIndex(3);
        let constant_instructions = [
            GetStatic(index),
            PutStatic(index),
            GetField(index),
            PutField(index),
            Invoke(InvokeType::Virtual, index),
            Invoke(InvokeType::Static, index),
            InvokeDynamic(index),
            New(index),
            ANewArray(index),
            CheckCast(index),
            InstanceOf(index),
            MultiANewArray(index, 2),
            Ldc(index),
        ];
        for instruction in &constant_instructions {
            assert!(!may_throw_exceptions(instruction), "{:?}", instruction);
        }
    }

    #[test]
    fn variable_instructions() {
        let mut settings = Settings::new();
        settings.include_return_instructions = false;
        assert!(!variable_has_side_effects(&Ret(2), &settings));
        assert!(!variable_has_side_effects(&LStore(2), &settings));

        settings.include_return_instructions = true;
        settings.include_array_store_instructions = true;
        settings.include_built_in_exceptions = true;
        assert!(variable_has_side_effects(&Ret(2), &settings));
        assert!(!variable_has_side_effects(&ILoad(2), &settings));
        assert!(!variable_has_side_effects(&IInc(2, 5), &settings));
    }
}
