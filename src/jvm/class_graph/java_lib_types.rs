use super::{ClassData, ClassGraph, ClassId, MethodData, MethodId};
use crate::jvm::{
    BinaryName, ClassAccessFlags, FieldType, MethodAccessFlags, MethodDescriptor, RefType,
    UnqualifiedName,
};

/// Commonly referenced classes and methods of the Java standard library
///
/// These are all library classes: nothing about them gets analyzed, so their optimization info
/// is always the conservative default (unless a caller asserts otherwise).
pub struct JavaLibrary<'g> {
    pub object: ClassId<'g>,
    pub string: ClassId<'g>,
    pub class: ClassId<'g>,
    pub system: ClassId<'g>,
    pub integer: ClassId<'g>,
    pub throwable: ClassId<'g>,
    pub exception: ClassId<'g>,
    pub runtime_exception: ClassId<'g>,
    pub arithmetic_exception: ClassId<'g>,

    pub object_init: MethodId<'g>,
    pub object_hash_code: MethodId<'g>,
    pub object_equals: MethodId<'g>,
    pub string_length: MethodId<'g>,
    pub system_arraycopy: MethodId<'g>,
    pub integer_value_of: MethodId<'g>,
}

impl<'g> JavaLibrary<'g> {
    pub fn add_to_graph(class_graph: &ClassGraph<'g>) -> JavaLibrary<'g> {
        let public = ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER;
        let final_public = public | ClassAccessFlags::FINAL;

        let object = class_graph.add_class(ClassData::library(BinaryName::OBJECT, None, public));
        let library_class = |name: BinaryName, superclass: ClassId<'g>, flags| {
            class_graph.add_class(ClassData::library(name, Some(superclass), flags))
        };
        let string = library_class(BinaryName::STRING, object, final_public);
        let class = library_class(BinaryName::CLASS, object, final_public);
        let system = library_class(BinaryName::SYSTEM, object, final_public);
        let integer = library_class(BinaryName::INTEGER, object, final_public);
        let throwable = library_class(BinaryName::THROWABLE, object, public);
        let exception = library_class(BinaryName::EXCEPTION, throwable, public);
        let runtime_exception = library_class(BinaryName::RUNTIMEEXCEPTION, exception, public);
        let arithmetic_exception =
            library_class(BinaryName::ARITHMETICEXCEPTION, runtime_exception, public);

        let library_method = |class, name, parameters, return_type, access_flags| {
            class_graph.add_method(MethodData::new(
                class,
                name,
                MethodDescriptor {
                    parameters,
                    return_type,
                },
                access_flags,
            ))
        };
        let object_type = FieldType::object(BinaryName::OBJECT);

        let object_init = library_method(
            object,
            UnqualifiedName::INIT,
            vec![],
            None,
            MethodAccessFlags::PUBLIC,
        );
        let object_hash_code = library_method(
            object,
            UnqualifiedName::HASHCODE,
            vec![],
            Some(FieldType::int()),
            MethodAccessFlags::PUBLIC | MethodAccessFlags::NATIVE,
        );
        let object_equals = library_method(
            object,
            UnqualifiedName::EQUALS,
            vec![object_type.clone()],
            Some(FieldType::boolean()),
            MethodAccessFlags::PUBLIC,
        );
        let string_length = library_method(
            string,
            UnqualifiedName::LENGTH,
            vec![],
            Some(FieldType::int()),
            MethodAccessFlags::PUBLIC,
        );
        let system_arraycopy = library_method(
            system,
            UnqualifiedName::ARRAYCOPY,
            vec![
                object_type.clone(),
                FieldType::int(),
                object_type,
                FieldType::int(),
                FieldType::int(),
            ],
            None,
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC | MethodAccessFlags::NATIVE,
        );
        let integer_value_of = library_method(
            integer,
            UnqualifiedName::VALUEOF,
            vec![FieldType::int()],
            Some(FieldType::Ref(RefType::Object(BinaryName::INTEGER))),
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
        );

        JavaLibrary {
            object,
            string,
            class,
            system,
            integer,
            throwable,
            exception,
            runtime_exception,
            arithmetic_exception,
            object_init,
            object_hash_code,
            object_equals,
            string_length,
            system_arraycopy,
            integer_value_of,
        }
    }
}
