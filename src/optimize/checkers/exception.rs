use crate::jvm::code::Code;
use crate::optimize::classify;
use crate::util::Offset;

/// Checks whether any instruction in a range of code may throw
pub struct ExceptionInstructionChecker;

impl ExceptionInstructionChecker {
    /// Fold over the instructions whose offsets fall in `start..end`
    pub fn may_throw_exceptions(code: &Code, start: Offset, end: Offset) -> bool {
        code.instructions
            .range(start, end)
            .any(|(_, _, instruction)| classify::may_throw_exceptions(instruction))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::code::{Instruction::*, InvokeType};
    use crate::jvm::ConstantIndex;

    #[test]
    fn ranges_are_half_open() {
        // offsets: 0 iload_0, 1 iload_1, 2 idiv, 3 istore_2, 4 monitorexit, 5 return
        let code = Code::new(3, vec![ILoad(0), ILoad(1), IDiv, IStore(2), MonitorExit, Return]);
        assert!(ExceptionInstructionChecker::may_throw_exceptions(
            &code,
            Offset(0),
            Offset(3)
        ));
        assert!(!ExceptionInstructionChecker::may_throw_exceptions(
            &code,
            Offset(0),
            Offset(2)
        ));
        assert!(!ExceptionInstructionChecker::may_throw_exceptions(
            &code,
            Offset(3),
            Offset(6)
        ));
    }

    #[test]
    fn calls_and_field_accesses_do_not_throw() {
        // offsets: 0 aload_0, 1 getfield, 4 invokevirtual, 7 pop, 8 return
        let code = Code::new(
            1,
            vec![
                ALoad(0),
                GetField(ConstantIndex(1)),
                Invoke(InvokeType::Virtual, ConstantIndex(2)),
                Pop,
                Return,
            ],
        );
        assert!(!ExceptionInstructionChecker::may_throw_exceptions(
            &code,
            Offset(0),
            Offset(9)
        ));
    }
}
