use super::Instruction;
use crate::jvm::ConstantIndex;
use crate::util::{Offset, OffsetVec, Width};

/// Semantic representation of a method body
#[derive(Clone, Debug)]
pub struct Code {
    /// Number of local variable slots (including the ones holding parameters)
    pub max_locals: u16,

    /// Instructions, keyed by their bytecode offset
    pub instructions: OffsetVec<Instruction>,

    /// Exception handlers, in the order the JVM tries them
    pub exception_table: Vec<ExceptionHandler>,
}

/// Entry in the exception table of a method
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExceptionHandler {
    /// Start of the protected range (inclusive)
    pub start: Offset,

    /// End of the protected range (exclusive)
    pub end: Offset,

    /// Start of the handler code
    pub handler: Offset,

    /// Class constant of the exception caught (`None` catches everything, as in `finally`)
    pub catch_type: Option<ConstantIndex>,
}

impl Code {
    /// Lay out instructions one after another
    ///
    /// Switch paddings are recomputed from the offsets at which the switches end up, so callers
    /// can leave them at 0.
    pub fn new(max_locals: u16, instructions: Vec<Instruction>) -> Code {
        let mut laid_out = OffsetVec::new();
        for mut instruction in instructions {
            let Offset(offset) = laid_out.offset_len();
            match &mut instruction {
                Instruction::TableSwitch { padding, .. }
                | Instruction::LookupSwitch { padding, .. } => {
                    *padding = ((4 - (offset + 1) % 4) % 4) as u8;
                }
                _ => (),
            }
            let _ = laid_out.push(instruction);
        }
        Code {
            max_locals,
            instructions: laid_out,
            exception_table: vec![],
        }
    }

    /// Add an entry to the exception table
    pub fn with_exception_handler(mut self, handler: ExceptionHandler) -> Code {
        self.exception_table.push(handler);
        self
    }

    /// Length of the bytecode in bytes
    pub fn code_length(&self) -> usize {
        self.instructions.offset_len().0
    }

    /// Instruction starting at a given offset
    pub fn instruction_at(&self, offset: Offset) -> Option<&Instruction> {
        self.instructions.get_offset(offset)
    }

    /// Absolute offset of a jump relative to the instruction at `from`
    ///
    /// Targets before the start of the method come back as `None`.
    pub fn jump_target(from: Offset, relative: i32) -> Option<Offset> {
        let target = from.0 as i64 + relative as i64;
        usize::try_from(target).ok().map(Offset)
    }

    /// Offset just past the instruction at `offset`
    pub fn next_offset(offset: Offset, instruction: &Instruction) -> Offset {
        Offset(offset.0 + instruction.width())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::code::Instruction::*;

    #[test]
    fn instructions_are_keyed_by_offset() {
        let code = Code::new(2, vec![ILoad(0), BiPush(3), IAdd, IStore(1), Return]);
        assert_eq!(code.code_length(), 6);
        assert_eq!(code.instruction_at(Offset(1)), Some(&BiPush(3)));
        assert_eq!(code.instruction_at(Offset(2)), None);
        assert_eq!(code.instruction_at(Offset(3)), Some(&IAdd));
    }

    #[test]
    fn switch_padding_is_aligned() {
        let code = Code::new(
            1,
            vec![
                ILoad(0),
                TableSwitch {
                    padding: 0,
                    default: 20,
                    low: 0,
                    targets: vec![20],
                },
                Return,
            ],
        );
        match code.instruction_at(Offset(1)) {
            Some(TableSwitch { padding, .. }) => assert_eq!(*padding, 2),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(code.code_length(), 1 + 1 + 2 + 16 + 1);
    }

    #[test]
    fn jump_targets_are_relative() {
        assert_eq!(Code::jump_target(Offset(10), -4), Some(Offset(6)));
        assert_eq!(Code::jump_target(Offset(2), -4), None);
    }
}
