use crate::jvm::class_graph::FieldId;

/// In-memory representation of a field
pub struct Field<'g> {
    /// The current field
    pub id: FieldId<'g>,
}

impl<'g> Field<'g> {
    pub fn new(id: FieldId<'g>) -> Field<'g> {
        Field { id }
    }
}
