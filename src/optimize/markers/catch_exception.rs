use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::Error;
use crate::optimize::checkers::ExceptionInstructionChecker;
use log::debug;

/// Marks methods whose exception handlers may actually catch something, and the classes caught
pub struct CatchExceptionMarker;

impl CatchExceptionMarker {
    pub fn new() -> CatchExceptionMarker {
        CatchExceptionMarker
    }
}

impl Default for CatchExceptionMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> MemberVisitor<'g> for CatchExceptionMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        let code = match &method.code_impl {
            Some(code) => code,
            None => return Ok(()),
        };
        for handler in &code.exception_table {
            if ExceptionInstructionChecker::may_throw_exceptions(code, handler.start, handler.end)
            {
                debug!(
                    "{:?} catches exceptions from {}..{}",
                    method.id, handler.start.0, handler.end.0
                );
                method.id.optimization_info_mut()?.set_catches_exceptions();
            }
            if let Some(catch_type) = handler.catch_type {
                let caught = class.constants.lookup_class(catch_type)?;
                caught.optimization_info_mut()?.set_caught();
            }
        }
        Ok(())
    }
}
