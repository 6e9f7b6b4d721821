use crate::jvm::class_graph::MethodId;
use crate::jvm::code::{Code, Instruction, InstructionContext, InstructionVisitor};
use crate::jvm::model::Class;
use crate::jvm::Error;
use log::warn;

/// Marks which local variable slots a method body touches
///
/// Unlike parameter usage, this is not stored anywhere: it describes the last method body
/// visited, and visiting another body starts over.
#[derive(Default)]
pub struct VariableUsageMarker {
    variable_used: Vec<bool>,
}

impl VariableUsageMarker {
    pub fn new() -> VariableUsageMarker {
        VariableUsageMarker::default()
    }

    /// Was the local at this slot loaded, stored, or incremented?
    pub fn is_variable_used(&self, variable: usize) -> bool {
        self.variable_used.get(variable).copied().unwrap_or(false)
    }

    fn mark(&mut self, variable: usize) {
        match self.variable_used.get_mut(variable) {
            Some(used) => *used = true,
            None => warn!(
                "local {} is out of range (only {} locals)",
                variable,
                self.variable_used.len()
            ),
        }
    }
}

impl<'g> InstructionVisitor<'g> for VariableUsageMarker {
    fn visit_code(
        &mut self,
        _class: &Class<'g>,
        _method: MethodId<'g>,
        code: &Code,
    ) -> Result<(), Error> {
        self.variable_used = vec![false; code.max_locals as usize];
        Ok(())
    }

    fn visit_variable_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        instruction: &Instruction,
        variable: u16,
    ) -> Result<(), Error> {
        let variable = variable as usize;
        self.mark(variable);
        if instruction.is_category2_variable() {
            self.mark(variable + 1);
        }
        Ok(())
    }
}
