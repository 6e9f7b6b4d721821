use super::class_graph::{ClassId, FieldId, MethodId};
use super::{BinaryName, Error, MethodDescriptor, UnqualifiedName};
use crate::util::{Offset, OffsetVec, Width};
use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::result::Result;

/// Index into the constant pool
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ConstantIndex(pub u16);

/// Constant pool entry
///
/// Unlike in a class file, references to classes and members point straight into the class
/// graph. There are no `Utf8` or `NameAndType` entries since nothing here gets serialized.
#[derive(Clone, Debug)]
pub enum Constant<'g> {
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(Cow<'static, str>),
    Class(ClassId<'g>),
    FieldRef(FieldId<'g>),
    MethodRef(MethodId<'g>),
    MethodHandle(MethodId<'g>),
    MethodType(MethodDescriptor<BinaryName>),
    InvokeDynamic {
        bootstrap: MethodId<'g>,
        name: UnqualifiedName,
        descriptor: MethodDescriptor<BinaryName>,
    },
}

impl<'g> Constant<'g> {
    fn kind(&self) -> &'static str {
        match self {
            Constant::Integer(_) => "integer",
            Constant::Float(_) => "float",
            Constant::Long(_) => "long",
            Constant::Double(_) => "double",
            Constant::String(_) => "string",
            Constant::Class(_) => "class",
            Constant::FieldRef(_) => "field reference",
            Constant::MethodRef(_) => "method reference",
            Constant::MethodHandle(_) => "method handle",
            Constant::MethodType(_) => "method type",
            Constant::InvokeDynamic { .. } => "invoke dynamic",
        }
    }
}

impl<'g> Width for Constant<'g> {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

/// Callbacks for `ConstantsPool::visit_constant_pool_entry`
///
/// Every callback defaults to doing nothing, so visitors only override the kinds they care about.
pub trait ConstantVisitor<'g> {
    fn visit_class_constant(
        &mut self,
        _index: ConstantIndex,
        _class: ClassId<'g>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_field_ref_constant(
        &mut self,
        _index: ConstantIndex,
        _field: FieldId<'g>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_method_ref_constant(
        &mut self,
        _index: ConstantIndex,
        _method: MethodId<'g>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_method_handle_constant(
        &mut self,
        _index: ConstantIndex,
        _method: MethodId<'g>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_invoke_dynamic_constant(
        &mut self,
        _index: ConstantIndex,
        _bootstrap: MethodId<'g>,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Literals and method types
    fn visit_other_constant(
        &mut self,
        _index: ConstantIndex,
        _constant: &Constant<'g>,
    ) -> Result<(), Error> {
        Ok(())
    }
}

// Note: elements can be easily added to the pool, but not so easily removed
pub struct ConstantsPool<'g> {
    constants: OffsetVec<Constant<'g>>,

    classes: HashMap<ClassId<'g>, ConstantIndex>,
    fieldrefs: HashMap<FieldId<'g>, ConstantIndex>,
    methodrefs: HashMap<MethodId<'g>, ConstantIndex>,
    integers: HashMap<i32, ConstantIndex>,
    longs: HashMap<i64, ConstantIndex>,
    strings: HashMap<Cow<'static, str>, ConstantIndex>,
}

impl<'g> ConstantsPool<'g> {
    /// Make a fresh empty constants pool
    pub fn new() -> ConstantsPool<'g> {
        ConstantsPool {
            constants: OffsetVec::new_starting_at(Offset(1)),
            classes: HashMap::new(),
            fieldrefs: HashMap::new(),
            methodrefs: HashMap::new(),
            integers: HashMap::new(),
            longs: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    /// Push a constant into the constant pool, provided there is space for it
    ///
    /// Note: the largest valid index is 65535, indexing starts at 1, and some constants take two
    /// spaces.
    pub fn push_constant(&mut self, constant: Constant<'g>) -> Result<ConstantIndex, Error> {
        let Offset(offset) = self.constants.offset_len();

        if offset + constant.width() <= u16::MAX.into() {
            let _ = self.constants.push(constant);
            Ok(ConstantIndex(offset as u16))
        } else {
            Err(Error::ConstantPoolOverflow { offset })
        }
    }

    /// Number of entries in the pool
    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Get a constant from the pool
    pub fn get(&self, index: ConstantIndex) -> Result<&Constant<'g>, Error> {
        self.constants
            .get_offset(Offset(index.0 as usize))
            .ok_or(Error::MissingConstant(index))
    }

    /// Get or insert a class constant
    pub fn get_class(&mut self, class: ClassId<'g>) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.classes.get(&class) {
            return Ok(*idx);
        }
        let idx = self.push_constant(Constant::Class(class))?;
        self.classes.insert(class, idx);
        Ok(idx)
    }

    /// Get or insert a field reference constant
    pub fn get_field_ref(&mut self, field: FieldId<'g>) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.fieldrefs.get(&field) {
            return Ok(*idx);
        }
        let idx = self.push_constant(Constant::FieldRef(field))?;
        self.fieldrefs.insert(field, idx);
        Ok(idx)
    }

    /// Get or insert a method reference constant
    pub fn get_method_ref(&mut self, method: MethodId<'g>) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.methodrefs.get(&method) {
            return Ok(*idx);
        }
        let idx = self.push_constant(Constant::MethodRef(method))?;
        self.methodrefs.insert(method, idx);
        Ok(idx)
    }

    /// Get or insert an integer constant
    pub fn get_integer(&mut self, integer: i32) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.integers.get(&integer) {
            return Ok(*idx);
        }
        let idx = self.push_constant(Constant::Integer(integer))?;
        self.integers.insert(integer, idx);
        Ok(idx)
    }

    /// Get or insert a long constant
    pub fn get_long(&mut self, long: i64) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.longs.get(&long) {
            return Ok(*idx);
        }
        let idx = self.push_constant(Constant::Long(long))?;
        self.longs.insert(long, idx);
        Ok(idx)
    }

    /// Get or insert a string constant
    pub fn get_string<S: Into<Cow<'static, str>>>(
        &mut self,
        string: S,
    ) -> Result<ConstantIndex, Error> {
        let string = string.into();
        match self.strings.entry(string.clone()) {
            Entry::Occupied(occupied) => Ok(*occupied.get()),
            Entry::Vacant(vacant) => {
                let offset = self.constants.offset_len().0;
                if offset + 1 > u16::MAX.into() {
                    return Err(Error::ConstantPoolOverflow { offset });
                }
                let _ = self.constants.push(Constant::String(string));
                let idx = ConstantIndex(offset as u16);
                let _ = vacant.insert(idx);
                Ok(idx)
            }
        }
    }

    /// Add a bootstrapped call site
    ///
    /// These are never deduplicated: every `invokedynamic` instruction gets its own call site.
    pub fn get_invoke_dynamic(
        &mut self,
        bootstrap: MethodId<'g>,
        name: UnqualifiedName,
        descriptor: MethodDescriptor<BinaryName>,
    ) -> Result<ConstantIndex, Error> {
        self.push_constant(Constant::InvokeDynamic {
            bootstrap,
            name,
            descriptor,
        })
    }

    /// Look up the class referenced by a class constant
    pub fn lookup_class(&self, index: ConstantIndex) -> Result<ClassId<'g>, Error> {
        match self.get(index)? {
            Constant::Class(class) => Ok(*class),
            other => Err(Self::unexpected(index, other, "class")),
        }
    }

    /// Look up the field referenced by a field reference constant
    pub fn lookup_field_ref(&self, index: ConstantIndex) -> Result<FieldId<'g>, Error> {
        match self.get(index)? {
            Constant::FieldRef(field) => Ok(*field),
            other => Err(Self::unexpected(index, other, "field reference")),
        }
    }

    /// Look up the method referenced by a method reference constant
    pub fn lookup_method_ref(&self, index: ConstantIndex) -> Result<MethodId<'g>, Error> {
        match self.get(index)? {
            Constant::MethodRef(method) => Ok(*method),
            other => Err(Self::unexpected(index, other, "method reference")),
        }
    }

    /// Look up the call site descriptor of an invoke dynamic constant
    pub fn lookup_invoke_dynamic(
        &self,
        index: ConstantIndex,
    ) -> Result<&MethodDescriptor<BinaryName>, Error> {
        match self.get(index)? {
            Constant::InvokeDynamic { descriptor, .. } => Ok(descriptor),
            other => Err(Self::unexpected(index, other, "invoke dynamic")),
        }
    }

    fn unexpected(index: ConstantIndex, found: &Constant<'g>, expected: &'static str) -> Error {
        log::debug!("constant {} is a {}, not a {}", index.0, found.kind(), expected);
        Error::UnexpectedConstant { index, expected }
    }

    /// Dispatch the entry at `index` to the matching callback of `visitor`
    pub fn visit_constant_pool_entry(
        &self,
        index: ConstantIndex,
        visitor: &mut impl ConstantVisitor<'g>,
    ) -> Result<(), Error> {
        match self.get(index)? {
            Constant::Class(class) => visitor.visit_class_constant(index, *class),
            Constant::FieldRef(field) => visitor.visit_field_ref_constant(index, *field),
            Constant::MethodRef(method) => visitor.visit_method_ref_constant(index, *method),
            Constant::MethodHandle(method) => visitor.visit_method_handle_constant(index, *method),
            Constant::InvokeDynamic { bootstrap, .. } => {
                visitor.visit_invoke_dynamic_constant(index, *bootstrap)
            }
            other => visitor.visit_other_constant(index, other),
        }
    }
}

impl<'g> Default for ConstantsPool<'g> {
    fn default() -> Self {
        Self::new()
    }
}
