use super::{
    BinaryName, ClassAccessFlags, FieldAccessFlags, FieldType, MethodAccessFlags,
    MethodDescriptor, Name, RenderDescriptor, UnqualifiedName,
};
use crate::optimize::{ClassOptimizationInfo, MethodOptimizationInfo};
use crate::util::RefId;
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use std::cell::RefCell;
use std::fmt;
use std::fmt::Debug;
use typed_arena::Arena;

mod java_lib_types;

pub use java_lib_types::*;

pub type ClassId<'g> = RefId<'g, ClassData<'g>>;
pub type MethodId<'g> = RefId<'g, MethodData<'g>>;
pub type FieldId<'g> = RefId<'g, FieldData<'g>>;

pub struct ClassGraphArenas<'g> {
    class_arena: Arena<ClassData<'g>>,
    method_arena: Arena<MethodData<'g>>,
    field_arena: Arena<FieldData<'g>>,
}

impl<'g> ClassGraphArenas<'g> {
    pub fn new() -> Self {
        ClassGraphArenas {
            class_arena: Arena::new(),
            method_arena: Arena::new(),
            field_arena: Arena::new(),
        }
    }
}

impl<'g> Default for ClassGraphArenas<'g> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks all the classes and members the program refers to
///
/// Program classes (whose code gets analyzed) and library classes (which are only ever
/// referenced) both live here. Every node carries a slot for its optimization info, which is how
/// passes over one method learn about the methods it calls.
pub struct ClassGraph<'g> {
    arenas: &'g ClassGraphArenas<'g>,
    classes: FrozenMap<BinaryName, ClassId<'g>>,
    class_order: RefCell<Vec<ClassId<'g>>>,
}

impl<'g> ClassGraph<'g> {
    /// New empty graph
    pub fn new(arenas: &'g ClassGraphArenas<'g>) -> Self {
        ClassGraph {
            arenas,
            classes: FrozenMap::new(),
            class_order: RefCell::new(vec![]),
        }
    }

    pub fn lookup_class(&self, name: &BinaryName) -> Option<ClassId<'g>> {
        self.classes.map_get(name, |class| *class)
    }

    /// All classes, in the order they were added
    pub fn classes(&self) -> Vec<ClassId<'g>> {
        self.class_order.borrow().clone()
    }

    /// Add a new class to the class graph
    ///
    /// If a class with the same name is already present, that one is returned instead.
    pub fn add_class(&self, data: ClassData<'g>) -> ClassId<'g> {
        if let Some(existing) = self.lookup_class(&data.name) {
            return existing;
        }
        let data: &'g ClassData<'g> = self.arenas.class_arena.alloc(data);
        let class = RefId(data);
        self.classes.insert(data.name.clone(), class);
        self.class_order.borrow_mut().push(class);
        class
    }

    /// Add a field to the class graph and to its class
    pub fn add_field(&self, field: FieldData<'g>) -> FieldId<'g> {
        if let Some(existing) = field
            .class
            .fields()
            .find(|f| f.name == field.name && f.descriptor == field.descriptor)
        {
            return existing;
        }
        let data: &'g FieldData<'g> = self.arenas.field_arena.alloc(field);
        data.class.0.fields.push(RefId(data));
        RefId(data)
    }

    /// Add a method to the class graph and to its class
    ///
    /// Adding a method that is already declared returns the existing one.
    pub fn add_method(&self, method: MethodData<'g>) -> MethodId<'g> {
        if let Some(existing) = method
            .class
            .methods()
            .find(|m| m.name == method.name && m.descriptor == method.descriptor)
        {
            return existing;
        }
        let data: &'g MethodData<'g> = self.arenas.method_arena.alloc(method);
        data.class.0.methods.push(RefId(data));
        RefId(data)
    }

    /// Add standard types to the class graph
    pub fn insert_java_library_types(&self) -> JavaLibrary<'g> {
        JavaLibrary::add_to_graph(self)
    }
}

/// Is the body of a class available to the optimizer?
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ClassOrigin {
    /// Class being optimized: its code is available and gets analyzed
    Program,

    /// Class that is only referenced (eg. the JDK): nothing about it can be proven
    Library,
}

pub struct ClassData<'g> {
    /// Name of the class
    pub name: BinaryName,

    /// Superclass is only ever missing for `java/lang/Object` itself
    pub superclass: Option<ClassId<'g>>,

    /// Interfaces implemented (or super-interfaces)
    pub interfaces: FrozenVec<ClassId<'g>>,

    pub access_flags: ClassAccessFlags,

    pub origin: ClassOrigin,

    /// Methods
    pub methods: FrozenVec<MethodId<'g>>,

    /// Fields
    pub fields: FrozenVec<FieldId<'g>>,

    /// Facts about the class, attached once analysis starts
    pub(crate) optimization_info: RefCell<Option<ClassOptimizationInfo<'g>>>,
}

impl<'g> ClassData<'g> {
    /// Program class
    pub fn new(
        name: BinaryName,
        superclass: Option<ClassId<'g>>,
        access_flags: ClassAccessFlags,
    ) -> ClassData<'g> {
        ClassData {
            name,
            superclass,
            interfaces: FrozenVec::new(),
            access_flags,
            origin: ClassOrigin::Program,
            methods: FrozenVec::new(),
            fields: FrozenVec::new(),
            optimization_info: RefCell::new(None),
        }
    }

    /// Library class
    pub fn library(
        name: BinaryName,
        superclass: Option<ClassId<'g>>,
        access_flags: ClassAccessFlags,
    ) -> ClassData<'g> {
        ClassData {
            origin: ClassOrigin::Library,
            ..ClassData::new(name, superclass, access_flags)
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    pub fn is_library(&self) -> bool {
        self.origin == ClassOrigin::Library
    }
}

impl<'g> RefId<'g, ClassData<'g>> {
    /// Methods declared on the class
    pub fn methods(self) -> impl Iterator<Item = MethodId<'g>> {
        let class: &'g ClassData<'g> = self.0;
        class.methods.iter().map(RefId)
    }

    /// Fields declared on the class
    pub fn fields(self) -> impl Iterator<Item = FieldId<'g>> {
        let class: &'g ClassData<'g> = self.0;
        class.fields.iter().map(RefId)
    }

    /// Look up a method declared on this class or inherited from one of its superclasses
    pub fn resolve_method(
        self,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor<BinaryName>,
    ) -> Option<MethodId<'g>> {
        let mut next_class = Some(self);
        while let Some(class) = next_class {
            if let Some(method) = class
                .methods()
                .find(|m| &m.name == name && &m.descriptor == descriptor)
            {
                return Some(method);
            }
            next_class = class.superclass;
        }
        None
    }

    /// Is this class `java/lang/Throwable` or one of its subclasses?
    pub fn is_throwable(self) -> bool {
        let mut next_class = Some(self);
        while let Some(class) = next_class {
            if class.name == BinaryName::THROWABLE {
                return true;
            }
            next_class = class.superclass;
        }
        false
    }
}

impl<'g> PartialEq for ClassData<'g> {
    fn eq(&self, other: &ClassData<'g>) -> bool {
        self.name == other.name
    }
}

impl<'g> Eq for ClassData<'g> {}

impl<'g> RenderDescriptor for ClassData<'g> {
    fn render_to(&self, write_to: &mut String) {
        self.name.render_to(write_to)
    }
}

impl<'g> Debug for ClassData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

pub struct MethodData<'g> {
    /// Class
    pub class: ClassId<'g>,

    /// Name of the method
    pub name: UnqualifiedName,

    /// Type of the method
    pub descriptor: MethodDescriptor<BinaryName>,

    pub access_flags: MethodAccessFlags,

    /// Facts about the method, attached once analysis starts
    pub(crate) optimization_info: RefCell<Option<MethodOptimizationInfo>>,
}

impl<'g> MethodData<'g> {
    pub fn new(
        class: ClassId<'g>,
        name: UnqualifiedName,
        descriptor: MethodDescriptor<BinaryName>,
        access_flags: MethodAccessFlags,
    ) -> MethodData<'g> {
        MethodData {
            class,
            name,
            descriptor,
            access_flags,
            optimization_info: RefCell::new(None),
        }
    }

    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }

    /// Abstract and native methods have no code to analyze
    pub fn has_body(&self) -> bool {
        !self
            .access_flags
            .intersects(MethodAccessFlags::ABSTRACT | MethodAccessFlags::NATIVE)
    }

    pub fn is_initializer(&self) -> bool {
        self.name == UnqualifiedName::INIT
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name == UnqualifiedName::CLINIT
    }

    /// Number of local variable slots taken up by the parameters (including `this`)
    pub fn parameter_size(&self) -> usize {
        self.descriptor.parameter_length(!self.is_static())
    }
}

impl<'g> PartialEq for MethodData<'g> {
    fn eq(&self, other: &MethodData<'g>) -> bool {
        self.class == other.class && self.name == other.name && self.descriptor == other.descriptor
    }
}

impl<'g> Eq for MethodData<'g> {}

impl<'g> Debug for MethodData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{}.{}:{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render(),
        ))
    }
}

pub struct FieldData<'g> {
    /// Class
    ///
    /// Note: this is a pointer back to the class (so don't derive `Debug`)
    pub class: ClassId<'g>,

    /// Name of the field
    pub name: UnqualifiedName,

    /// Type of the field
    pub descriptor: FieldType<BinaryName>,

    pub access_flags: FieldAccessFlags,
}

impl<'g> FieldData<'g> {
    pub fn new(
        class: ClassId<'g>,
        name: UnqualifiedName,
        descriptor: FieldType<BinaryName>,
        access_flags: FieldAccessFlags,
    ) -> FieldData<'g> {
        FieldData {
            class,
            name,
            descriptor,
            access_flags,
        }
    }

    pub fn is_static(&self) -> bool {
        self.access_flags.contains(FieldAccessFlags::STATIC)
    }
}

impl<'g> PartialEq for FieldData<'g> {
    fn eq(&self, other: &FieldData<'g>) -> bool {
        self.class == other.class && self.name == other.name && self.descriptor == other.descriptor
    }
}

impl<'g> Eq for FieldData<'g> {}

impl<'g> Debug for FieldData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{}.{}:{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render(),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn members_are_deduplicated() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let point = class_graph.add_class(ClassData::new(
            BinaryName::from_string(String::from("com/example/Point")).unwrap(),
            Some(java.object),
            ClassAccessFlags::PUBLIC,
        ));
        let again = class_graph.add_class(ClassData::new(
            BinaryName::from_string(String::from("com/example/Point")).unwrap(),
            Some(java.object),
            ClassAccessFlags::PUBLIC,
        ));
        assert_eq!(point, again);

        let descriptor = MethodDescriptor {
            parameters: vec![FieldType::int()],
            return_type: None,
        };
        let first = class_graph.add_method(MethodData::new(
            point,
            UnqualifiedName::INIT,
            descriptor.clone(),
            MethodAccessFlags::PUBLIC,
        ));
        let second = class_graph.add_method(MethodData::new(
            point,
            UnqualifiedName::INIT,
            descriptor,
            MethodAccessFlags::PUBLIC,
        ));
        assert_eq!(first, second);
        assert_eq!(point.methods().count(), 1);
        assert_eq!(first.parameter_size(), 2);
    }

    #[test]
    fn methods_resolve_through_superclasses() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        let point = class_graph.add_class(ClassData::new(
            BinaryName::from_string(String::from("com/example/Point")).unwrap(),
            Some(java.object),
            ClassAccessFlags::PUBLIC,
        ));
        let hash_code = MethodDescriptor {
            parameters: vec![],
            return_type: Some(FieldType::int()),
        };
        assert_eq!(
            point.resolve_method(&UnqualifiedName::HASHCODE, &hash_code),
            Some(java.object_hash_code)
        );
        assert!(!point.is_throwable());
        assert!(java.arithmetic_exception.is_throwable());
        assert_eq!(class_graph.lookup_class(&BinaryName::OBJECT), Some(java.object));
    }
}
