use super::{Field, MemberVisitor, Method};
use crate::jvm::class_graph::ClassId;
use crate::jvm::{ConstantsPool, Error};

/// Semantic representation of a class
pub struct Class<'g> {
    /// The current class
    pub id: ClassId<'g>,

    /// Constants referenced from the code of the methods
    pub constants: ConstantsPool<'g>,

    /// Fields
    ///
    /// Use [`Self::add_field`] for additional validation (like sanity checking that the field
    /// added really does belong on this class)
    pub fields: Vec<Field<'g>>,

    /// Methods
    ///
    /// Use [`Self::add_method`] for additional validation (like sanity checking that the method
    /// added really does belong on this class)
    pub methods: Vec<Method<'g>>,
}

impl<'g> Class<'g> {
    /// Create a new class
    pub fn new(id: ClassId<'g>) -> Class<'g> {
        Class {
            id,
            constants: ConstantsPool::new(),
            fields: vec![],
            methods: vec![],
        }
    }

    /// Add a method to the class
    pub fn add_method(&mut self, method: Method<'g>) {
        assert_eq!(
            method.id.class, self.id,
            "Method doesn't belong to this class"
        );
        self.methods.push(method);
    }

    /// Add a field to the class
    pub fn add_field(&mut self, field: Field<'g>) {
        assert_eq!(field.id.class, self.id, "Field doesn't belong to this class");
        self.fields.push(field);
    }

    /// Visit fields first, then methods
    pub fn accept_members(&self, visitor: &mut impl MemberVisitor<'g>) -> Result<(), Error> {
        for field in &self.fields {
            visitor.visit_field(self, field)?;
        }
        for method in &self.methods {
            visitor.visit_method(self, method)?;
        }
        Ok(())
    }
}
