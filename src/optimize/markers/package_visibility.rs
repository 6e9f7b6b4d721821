use crate::jvm::code::{Instruction, InstructionContext, InstructionVisitor};
use crate::jvm::model::{Class, Field, MemberVisitor, Method};
use crate::jvm::{Constant, ConstantIndex, Error, Visibility};

/// Marks classes by the kinds of members they declare and reference
///
/// A class declaring a member that is neither public, protected, nor private contains package
/// visible members. A class whose code references such a member of another class invokes package
/// visible members. Both block moving code across packages. Declaring an `<init>` method means
/// the class contains constructors.
#[derive(Default)]
pub struct PackageVisibilityMarker;

impl PackageVisibilityMarker {
    pub fn new() -> PackageVisibilityMarker {
        PackageVisibilityMarker
    }
}

impl<'g> MemberVisitor<'g> for PackageVisibilityMarker {
    fn visit_field(&mut self, class: &Class<'g>, field: &Field<'g>) -> Result<(), Error> {
        if field.id.access_flags.is_package_visible() {
            class
                .id
                .optimization_info_mut()?
                .set_contains_package_visible_members();
        }
        Ok(())
    }

    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        {
            let mut info = class.id.optimization_info_mut()?;
            if method.id.access_flags.is_package_visible() {
                info.set_contains_package_visible_members();
            }
            if method.id.is_initializer() {
                info.set_contains_constructors();
            }
        }
        match &method.code_impl {
            Some(code) => code.accept(class, method.id, self),
            None => Ok(()),
        }
    }
}

impl<'g> InstructionVisitor<'g> for PackageVisibilityMarker {
    fn visit_constant_instruction(
        &mut self,
        ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
        constant: ConstantIndex,
    ) -> Result<(), Error> {
        let referenced = match ctx.class.constants.get(constant)? {
            Constant::FieldRef(field) => {
                field.class != ctx.class.id && field.access_flags.is_package_visible()
            }
            Constant::MethodRef(method) | Constant::MethodHandle(method) => {
                method.class != ctx.class.id && method.access_flags.is_package_visible()
            }
            _ => false,
        };
        if referenced {
            ctx.class
                .id
                .optimization_info_mut()?
                .set_invokes_package_visible_members();
        }
        Ok(())
    }
}
