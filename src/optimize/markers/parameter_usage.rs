use crate::jvm::class_graph::{MethodData, MethodId};
use crate::jvm::code::{Code, Instruction, InstructionContext, InstructionVisitor};
use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::Error;
use crate::optimize::SlotMask;
use log::{debug, warn};

/// Marks which parameters a method reads
///
/// A parameter slot is used if any instruction reads the local at that slot: a load, `iinc`, or
/// `ret`. Loading a `long` or `double` reads two slots. Methods without code could read anything,
/// so all of their parameters count as used.
#[derive(Default)]
pub struct ParameterUsageMarker {
    used: SlotMask,
    parameter_size: usize,
}

impl ParameterUsageMarker {
    pub fn new() -> ParameterUsageMarker {
        ParameterUsageMarker::default()
    }

    /// Parameter slots read by some instruction of the code
    pub fn used_parameters(method: &MethodData<'_>, code: &Code) -> SlotMask {
        let parameter_size = method.parameter_size();
        code.instructions
            .iter()
            .fold(SlotMask::EMPTY, |used, (_, _, instruction)| {
                used | Self::parameters_read(instruction, parameter_size)
            })
    }

    /// Has the parameter at this slot been marked as used?
    pub fn is_parameter_used(method: MethodId<'_>, slot: u16) -> Result<bool, Error> {
        Ok(method.optimization_info()?.is_parameter_used(slot))
    }

    fn parameters_read(instruction: &Instruction, parameter_size: usize) -> SlotMask {
        let (slot, width) = match instruction {
            Instruction::ILoad(slot)
            | Instruction::FLoad(slot)
            | Instruction::ALoad(slot)
            | Instruction::IInc(slot, _)
            | Instruction::Ret(slot) => (*slot, 1),
            Instruction::LLoad(slot) | Instruction::DLoad(slot) => (*slot, 2),
            _ => return SlotMask::EMPTY,
        };
        let mut read = SlotMask::EMPTY;
        for slot in slot..slot.saturating_add(width) {
            if (slot as usize) < parameter_size {
                read.insert(slot);
            }
        }
        read
    }
}

impl<'g> InstructionVisitor<'g> for ParameterUsageMarker {
    fn visit_code(
        &mut self,
        _class: &Class<'g>,
        method: MethodId<'g>,
        _code: &Code,
    ) -> Result<(), Error> {
        self.used = SlotMask::EMPTY;
        self.parameter_size = method.parameter_size();
        Ok(())
    }

    fn visit_variable_instruction(
        &mut self,
        _ctx: &InstructionContext<'_, 'g>,
        instruction: &Instruction,
        _variable: u16,
    ) -> Result<(), Error> {
        self.used |= Self::parameters_read(instruction, self.parameter_size);
        Ok(())
    }
}

impl<'g> MemberVisitor<'g> for ParameterUsageMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        let parameter_size = method.id.parameter_size();
        if parameter_size > SlotMask::CAPACITY as usize {
            warn!(
                "{:?} has parameters past slot {}, assuming they are used",
                method.id,
                SlotMask::CAPACITY
            );
        }

        let used = match &method.code_impl {
            Some(code) => {
                code.accept(class, method.id, self)?;
                self.used
            }
            None => {
                let mut all = SlotMask::EMPTY;
                for parameter in method.id.descriptor.parameter_slots(!method.id.is_static()) {
                    all.insert_range(parameter.slot, parameter.width);
                }
                all
            }
        };
        debug!("{:?} uses parameters {:?}", method.id, used);
        method.id.optimization_info_mut()?.update_used_parameters(used);
        Ok(())
    }
}
