use crate::jvm::class_graph::ClassId;
use crate::jvm::code::{Code, Instruction, InstructionShape, InvokeType};
use crate::jvm::{ConstantsPool, Error};
use crate::optimize::{classify, Settings};

/// Decides whether instructions have side effects
///
/// A side effect is anything observable outside of the method's own frame: writing a field or
/// array, calling something that might, triggering class initialization that might, throwing,
/// synchronizing, and (depending on the settings) returning or failing with a built-in exception.
///
/// Facts about other classes and methods are read from their optimization info, so it needs to
/// be attached before checking. A program class whose static initializer hasn't been checked yet
/// is assumed to have side effects.
pub struct SideEffectInstructionChecker<'a, 'g> {
    settings: Settings,
    constants: &'a ConstantsPool<'g>,
}

impl<'a, 'g> SideEffectInstructionChecker<'a, 'g> {
    pub fn new(
        settings: Settings,
        constants: &'a ConstantsPool<'g>,
    ) -> SideEffectInstructionChecker<'a, 'g> {
        SideEffectInstructionChecker {
            settings,
            constants,
        }
    }

    /// Does this one instruction have a side effect?
    pub fn has_side_effects(&self, instruction: &Instruction) -> Result<bool, Error> {
        if self.settings.include_built_in_exceptions && classify::may_throw_exceptions(instruction)
        {
            return Ok(true);
        }

        let side_effect = match instruction.shape() {
            InstructionShape::Variable(_) => {
                classify::variable_has_side_effects(instruction, &self.settings)
            }
            InstructionShape::Constant(_) => self.constant_has_side_effects(instruction)?,
            InstructionShape::Branch(_) | InstructionShape::Switch => false,
            InstructionShape::Simple => match instruction {
                Instruction::AThrow | Instruction::MonitorEnter | Instruction::MonitorExit => true,
                other if other.is_return() => self.settings.include_return_instructions,
                other if classify::is_array_store(other) => {
                    self.settings.include_array_store_instructions
                }
                _ => false,
            },
        };
        Ok(side_effect)
    }

    fn constant_has_side_effects(&self, instruction: &Instruction) -> Result<bool, Error> {
        match instruction {
            Instruction::PutStatic(_) | Instruction::PutField(_) => Ok(true),
            Instruction::InvokeDynamic(_) => Ok(true),

            // These may run the static initializers of the class and its superclasses
            Instruction::GetStatic(index) => {
                let field = self.constants.lookup_field_ref(*index)?;
                self.initialization_has_side_effects(field.class)
            }
            Instruction::New(index) => {
                let class = self.constants.lookup_class(*index)?;
                self.initialization_has_side_effects(class)
            }

            Instruction::Invoke(invoke_type, index) => {
                let method = self.constants.lookup_method_ref(*index)?;
                if !method.optimization_info()?.has_no_side_effects() {
                    return Ok(true);
                }
                if let InvokeType::Static = invoke_type {
                    return self.initialization_has_side_effects(method.class);
                }
                Ok(false)
            }

            _ => Ok(false),
        }
    }

    /// Could initializing this class have side effects?
    ///
    /// Initializing a class first initializes its superclasses. `java/lang/Object` is always
    /// initialized before any other code runs.
    fn initialization_has_side_effects(&self, class: ClassId<'g>) -> Result<bool, Error> {
        let mut next_class = Some(class);
        while let Some(class) = next_class {
            if class.superclass.is_none() {
                break;
            }
            let info = class.optimization_info()?;
            if info.has_side_effects() {
                return Ok(true);
            }
            let unchecked_initializer = !info.is_initializer_checked()
                && class.methods().any(|method| method.is_static_initializer());
            if unchecked_initializer {
                return Ok(true);
            }
            next_class = class.superclass;
        }
        Ok(false)
    }

    /// One step of the fold: once a side effect is found, it stays found
    pub fn fold(&self, found: bool, instruction: &Instruction) -> Result<bool, Error> {
        if found {
            Ok(true)
        } else {
            self.has_side_effects(instruction)
        }
    }

    /// Does any instruction of the code have a side effect?
    pub fn code_has_side_effects(&self, code: &Code) -> Result<bool, Error> {
        code.instructions
            .iter()
            .try_fold(false, |found, (_, _, instruction)| self.fold(found, instruction))
    }
}
