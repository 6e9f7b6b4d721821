use super::{Code, Instruction, InstructionShape};
use crate::jvm::class_graph::MethodId;
use crate::jvm::model::Class;
use crate::jvm::{ConstantIndex, Error};
use crate::util::Offset;

/// Where an instruction being visited lives
pub struct InstructionContext<'a, 'g> {
    /// Class declaring the method (for resolving constants)
    pub class: &'a Class<'g>,

    /// Method whose code is being visited
    pub method: MethodId<'g>,

    pub code: &'a Code,

    /// Offset of the instruction in the code
    pub offset: Offset,
}

/// Callbacks for walking the instructions of a method body, one per instruction shape
///
/// Every callback defaults to doing nothing. See [`Code::accept`].
pub trait InstructionVisitor<'g> {
    /// Called once before any instruction of a method body
    fn visit_code(
        &mut self,
        _class: &Class<'g>,
        _method: MethodId<'g>,
        _code: &Code,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_simple_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_variable_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
        _variable: u16,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_constant_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
        _constant: ConstantIndex,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_branch_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
        _relative_target: i32,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_switch_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
    ) -> Result<(), Error> {
        Ok(())
    }
}

impl Code {
    /// Walk every instruction in offset order, dispatching on its shape
    pub fn accept<'g>(
        &self,
        class: &Class<'g>,
        method: MethodId<'g>,
        visitor: &mut impl InstructionVisitor<'g>,
    ) -> Result<(), Error> {
        visitor.visit_code(class, method, self)?;
        for (offset, _, instruction) in &self.instructions {
            let ctx = InstructionContext {
                class,
                method,
                code: self,
                offset,
            };
            match instruction.shape() {
                InstructionShape::Simple => visitor.visit_simple_instruction(&ctx, instruction)?,
                InstructionShape::Variable(variable) => {
                    visitor.visit_variable_instruction(&ctx, instruction, variable)?
                }
                InstructionShape::Constant(constant) => {
                    visitor.visit_constant_instruction(&ctx, instruction, constant)?
                }
                InstructionShape::Branch(target) => {
                    visitor.visit_branch_instruction(&ctx, instruction, target)?
                }
                InstructionShape::Switch => visitor.visit_switch_instruction(&ctx, instruction)?,
            }
        }
        Ok(())
    }
}
