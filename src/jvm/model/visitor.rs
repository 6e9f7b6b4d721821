use super::{Class, Field, Method};
use crate::jvm::class_graph::MethodId;
use crate::jvm::{Error, ParameterSlot};

/// Callbacks for the members of a class
pub trait MemberVisitor<'g> {
    fn visit_field(&mut self, _class: &Class<'g>, _field: &Field<'g>) -> Result<(), Error> {
        Ok(())
    }

    fn visit_method(&mut self, _class: &Class<'g>, _method: &Method<'g>) -> Result<(), Error> {
        Ok(())
    }
}

/// Callback for the parameters of a method
pub trait ParameterVisitor<'g> {
    fn visit_parameter(
        &mut self,
        class: &Class<'g>,
        method: MethodId<'g>,
        parameter: ParameterSlot,
    ) -> Result<(), Error>;
}

/// Member visitor that visits every parameter of every method it sees
pub struct AllParameterVisitor<P> {
    pub parameter_visitor: P,
}

impl<P> AllParameterVisitor<P> {
    pub fn new(parameter_visitor: P) -> AllParameterVisitor<P> {
        AllParameterVisitor { parameter_visitor }
    }
}

impl<'g, P: ParameterVisitor<'g>> MemberVisitor<'g> for AllParameterVisitor<P> {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        method.accept_parameters(class, &mut self.parameter_visitor)
    }
}

impl<'g, P: ParameterVisitor<'g> + ?Sized> ParameterVisitor<'g> for &mut P {
    fn visit_parameter(
        &mut self,
        class: &Class<'g>,
        method: MethodId<'g>,
        parameter: ParameterSlot,
    ) -> Result<(), Error> {
        (**self).visit_parameter(class, method, parameter)
    }
}

impl<'g, M: MemberVisitor<'g> + ?Sized> MemberVisitor<'g> for &mut M {
    fn visit_field(&mut self, class: &Class<'g>, field: &Field<'g>) -> Result<(), Error> {
        (**self).visit_field(class, field)
    }

    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        (**self).visit_method(class, method)
    }
}

/// Parameter visitor collecting what it sees
impl<'g> ParameterVisitor<'g> for Vec<(MethodId<'g>, ParameterSlot)> {
    fn visit_parameter(
        &mut self,
        _class: &Class<'g>,
        method: MethodId<'g>,
        parameter: ParameterSlot,
    ) -> Result<(), Error> {
        self.push((method, parameter));
        Ok(())
    }
}
