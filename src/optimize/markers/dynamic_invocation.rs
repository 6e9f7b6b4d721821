use crate::jvm::code::{Instruction, InstructionContext, InstructionVisitor};
use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::{ConstantIndex, Error};

/// Marks methods containing an `invokedynamic`
#[derive(Default)]
pub struct DynamicInvocationMarker;

impl DynamicInvocationMarker {
    pub fn new() -> DynamicInvocationMarker {
        DynamicInvocationMarker
    }
}

impl<'g> InstructionVisitor<'g> for DynamicInvocationMarker {
    fn visit_constant_instruction(
        &mut self,
        ctx: &InstructionContext<'_, 'g>,
        instruction: &Instruction,
        _constant: ConstantIndex,
    ) -> Result<(), Error> {
        if let Instruction::InvokeDynamic(_) = instruction {
            ctx.method
                .optimization_info_mut()?
                .set_invokes_dynamically();
        }
        Ok(())
    }
}

impl<'g> MemberVisitor<'g> for DynamicInvocationMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        match &method.code_impl {
            Some(code) => code.accept(class, method.id, self),
            None => Ok(()),
        }
    }
}
