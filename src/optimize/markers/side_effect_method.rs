use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::Error;
use crate::optimize::checkers::SideEffectInstructionChecker;
use crate::optimize::Settings;
use log::debug;

/// Marks methods that have side effects
///
/// A static initializer with side effects also marks its class, since then merely touching the
/// class has side effects. Either way the class is marked as having its initializer checked.
pub struct SideEffectMethodMarker {
    settings: Settings,
}

impl SideEffectMethodMarker {
    pub fn new(settings: Settings) -> SideEffectMethodMarker {
        SideEffectMethodMarker { settings }
    }
}

impl<'g> MemberVisitor<'g> for SideEffectMethodMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        let has_side_effects = match &method.code_impl {
            Some(code) => {
                SideEffectInstructionChecker::new(self.settings, &class.constants)
                    .code_has_side_effects(code)?
            }

            // Abstract and native methods could be doing anything
            None => true,
        };
        debug!("{:?} has side effects: {}", method.id, has_side_effects);

        if has_side_effects {
            method.id.optimization_info_mut()?.set_side_effects();
        }
        if method.id.is_static_initializer() {
            let mut class_info = class.id.optimization_info_mut()?;
            if has_side_effects {
                class_info.set_side_effects();
            }
            class_info.set_initializer_checked();
        }
        Ok(())
    }
}
