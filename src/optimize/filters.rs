//! Visitor decorators for passes that consume parameter usage
//!
//! These let a downstream pass (eg. one that strips unused parameters) only look at what it
//! cares about, without re-checking the usage facts itself.

use crate::jvm::class_graph::MethodId;
use crate::jvm::model::{Class, Field, MemberVisitor, Method, ParameterVisitor};
use crate::jvm::{Error, ParameterSlot};

/// Routes each parameter to one of two delegates depending on whether it is used
///
/// Either delegate can be absent, in which case the parameters it would have gotten are dropped.
pub struct UsedParameterFilter<P> {
    /// Gets the parameters that are used
    pub used: Option<P>,

    /// Gets the parameters that are unused
    pub unused: Option<P>,
}

impl<P> UsedParameterFilter<P> {
    /// Filter that only passes on used parameters
    pub fn new(used: Option<P>) -> UsedParameterFilter<P> {
        UsedParameterFilter::with_unused(used, None)
    }

    pub fn with_unused(used: Option<P>, unused: Option<P>) -> UsedParameterFilter<P> {
        UsedParameterFilter { used, unused }
    }
}

impl<'g, P: ParameterVisitor<'g>> ParameterVisitor<'g> for UsedParameterFilter<P> {
    fn visit_parameter(
        &mut self,
        class: &Class<'g>,
        method: MethodId<'g>,
        parameter: ParameterSlot,
    ) -> Result<(), Error> {
        let is_used = method.optimization_info()?.is_parameter_used(parameter.slot);
        let delegate = if is_used {
            &mut self.used
        } else {
            &mut self.unused
        };
        match delegate {
            Some(visitor) => visitor.visit_parameter(class, method, parameter),
            None => Ok(()),
        }
    }
}

/// Only passes on methods that have at least one unused parameter
pub struct UnusedParameterMethodFilter<M> {
    pub visitor: M,
}

impl<M> UnusedParameterMethodFilter<M> {
    pub fn new(visitor: M) -> UnusedParameterMethodFilter<M> {
        UnusedParameterMethodFilter { visitor }
    }
}

impl<'g, M: MemberVisitor<'g>> MemberVisitor<'g> for UnusedParameterMethodFilter<M> {
    fn visit_field(&mut self, _class: &Class<'g>, _field: &Field<'g>) -> Result<(), Error> {
        Ok(())
    }

    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        let has_unused_parameters = method.id.optimization_info()?.has_unused_parameters();
        if has_unused_parameters {
            self.visitor.visit_method(class, method)
        } else {
            Ok(())
        }
    }
}
