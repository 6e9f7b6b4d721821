use crate::jvm::class_graph::MethodId;
use crate::jvm::code::{Instruction, InstructionContext, InstructionVisitor};
use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::{ConstantIndex, ConstantVisitor, Error};
use log::trace;

/// Counts how often each method is referenced from program code
///
/// Every instruction referencing the constant pool gets its entry visited exactly once, with
/// this marker as the constant visitor. Method references and method handles bump the
/// invocation count of the method they point at.
#[derive(Default)]
pub struct MethodInvocationMarker {
    entries_visited: usize,
}

impl MethodInvocationMarker {
    pub fn new() -> MethodInvocationMarker {
        MethodInvocationMarker { entries_visited: 0 }
    }

    /// Constant pool entries visited so far
    pub fn entries_visited(&self) -> usize {
        self.entries_visited
    }
}

impl<'g> InstructionVisitor<'g> for MethodInvocationMarker {
    fn visit_constant_instruction(
        &mut self,
        ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
        constant: ConstantIndex,
    ) -> Result<(), Error> {
        self.entries_visited += 1;
        ctx.class.constants.visit_constant_pool_entry(constant, self)
    }
}

impl<'g> ConstantVisitor<'g> for MethodInvocationMarker {
    fn visit_method_ref_constant(
        &mut self,
        _index: ConstantIndex,
        method: MethodId<'g>,
    ) -> Result<(), Error> {
        trace!("invocation of {:?}", method);
        method.optimization_info_mut()?.increment_invocation_count();
        Ok(())
    }

    fn visit_method_handle_constant(
        &mut self,
        _index: ConstantIndex,
        method: MethodId<'g>,
    ) -> Result<(), Error> {
        method.optimization_info_mut()?.increment_invocation_count();
        Ok(())
    }
}

impl<'g> MemberVisitor<'g> for MethodInvocationMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        match &method.code_impl {
            Some(code) => code.accept(class, method.id, self),
            None => Ok(()),
        }
    }
}
