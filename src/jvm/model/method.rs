use super::{Class, ParameterVisitor};
use crate::jvm::class_graph::MethodId;
use crate::jvm::code::Code;
use crate::jvm::{Error, RenderDescriptor};

/// Semantic representation of a method
pub struct Method<'g> {
    /// The current method
    pub id: MethodId<'g>,

    /// Method code implementation (absent for abstract and native methods)
    pub code_impl: Option<Code>,
}

impl<'g> Method<'g> {
    /// Create a new method
    pub fn new(id: MethodId<'g>) -> Method<'g> {
        Method {
            id,
            code_impl: None,
        }
    }

    /// Create a method with a body
    pub fn with_code(id: MethodId<'g>, code: Code) -> Method<'g> {
        Method {
            id,
            code_impl: Some(code),
        }
    }

    /// Get the code, or fail if the method has none
    pub fn code(&self) -> Result<&Code, Error> {
        self.code_impl
            .as_ref()
            .ok_or_else(|| Error::MissingCode(self.describe()))
    }

    /// Visit every parameter of the method (`this` included, for instance methods)
    pub fn accept_parameters(
        &self,
        class: &Class<'g>,
        visitor: &mut impl ParameterVisitor<'g>,
    ) -> Result<(), Error> {
        for parameter in self.id.descriptor.parameter_slots(!self.id.is_static()) {
            visitor.visit_parameter(class, self.id, parameter)?;
        }
        Ok(())
    }

    pub(crate) fn describe(&self) -> String {
        format!(
            "{}.{}{}",
            self.id.class.name,
            self.id.name,
            self.id.descriptor.render()
        )
    }
}
