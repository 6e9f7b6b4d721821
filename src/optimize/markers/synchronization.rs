use crate::jvm::code::Instruction;
use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::{Error, MethodAccessFlags};

/// Marks methods that are synchronized or contain a `monitorenter`
#[derive(Default)]
pub struct SynchronizationMarker;

impl SynchronizationMarker {
    pub fn new() -> SynchronizationMarker {
        SynchronizationMarker
    }
}

impl<'g> MemberVisitor<'g> for SynchronizationMarker {
    fn visit_method(&mut self, _class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        let synchronized_method = method
            .id
            .access_flags
            .contains(MethodAccessFlags::SYNCHRONIZED);
        let synchronized_block = method.code_impl.as_ref().map_or(false, |code| {
            code.instructions
                .iter()
                .any(|(_, _, instruction)| matches!(instruction, Instruction::MonitorEnter))
        });
        if synchronized_method || synchronized_block {
            method.id.optimization_info_mut()?.set_has_synchronized_block();
        }
        Ok(())
    }
}
