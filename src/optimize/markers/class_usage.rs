use crate::jvm::code::{Instruction, InstructionContext, InstructionVisitor};
use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::{Constant, ConstantIndex, Error};

/// Marks classes by how code uses them
///
///   - `new` makes a class instantiated
///   - `instanceof` and `checkcast` make it instanceofed
///   - `ldc` of a class literal makes it dot-classed
#[derive(Default)]
pub struct ClassUsageMarker;

impl ClassUsageMarker {
    pub fn new() -> ClassUsageMarker {
        ClassUsageMarker
    }
}

impl<'g> InstructionVisitor<'g> for ClassUsageMarker {
    fn visit_constant_instruction(
        &mut self,
        ctx: &InstructionContext<'_, 'g>,
        instruction: &Instruction,
        constant: ConstantIndex,
    ) -> Result<(), Error> {
        let constants = &ctx.class.constants;
        match instruction {
            Instruction::New(_) => {
                let class = constants.lookup_class(constant)?;
                class.optimization_info_mut()?.set_instantiated();
            }
            Instruction::InstanceOf(_) | Instruction::CheckCast(_) => {
                let class = constants.lookup_class(constant)?;
                class.optimization_info_mut()?.set_instanceofed();
            }
            Instruction::Ldc(_) => {
                if let Constant::Class(class) = constants.get(constant)? {
                    class.optimization_info_mut()?.set_dot_classed();
                }
            }
            _ => (),
        }
        Ok(())
    }
}

impl<'g> MemberVisitor<'g> for ClassUsageMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        match &method.code_impl {
            Some(code) => code.accept(class, method.id, self),
            None => Ok(()),
        }
    }
}
