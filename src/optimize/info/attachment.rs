use super::{ClassOptimizationInfo, MethodOptimizationInfo};
use crate::jvm::class_graph::{ClassData, MethodData};
use crate::jvm::{Error, RenderDescriptor};
use std::cell::{Ref, RefMut};

impl<'g> ClassData<'g> {
    /// Attach (or replace) the optimization info of the class
    pub fn set_optimization_info(&self, info: ClassOptimizationInfo<'g>) {
        *self.optimization_info.borrow_mut() = Some(info);
    }

    pub fn has_optimization_info(&self) -> bool {
        self.optimization_info.borrow().is_some()
    }

    /// Read the optimization info, which must have been attached already
    pub fn optimization_info(&self) -> Result<Ref<'_, ClassOptimizationInfo<'g>>, Error> {
        Ref::filter_map(self.optimization_info.borrow(), Option::as_ref)
            .map_err(|_| Error::MissingOptimizationInfo(self.name.to_string()))
    }

    /// Update the optimization info, which must have been attached already
    pub fn optimization_info_mut(&self) -> Result<RefMut<'_, ClassOptimizationInfo<'g>>, Error> {
        RefMut::filter_map(self.optimization_info.borrow_mut(), Option::as_mut)
            .map_err(|_| Error::MissingOptimizationInfo(self.name.to_string()))
    }
}

impl<'g> MethodData<'g> {
    /// Attach (or replace) the optimization info of the method
    pub fn set_optimization_info(&self, info: MethodOptimizationInfo) {
        *self.optimization_info.borrow_mut() = Some(info);
    }

    pub fn has_optimization_info(&self) -> bool {
        self.optimization_info.borrow().is_some()
    }

    /// Read the optimization info, which must have been attached already
    pub fn optimization_info(&self) -> Result<Ref<'_, MethodOptimizationInfo>, Error> {
        Ref::filter_map(self.optimization_info.borrow(), Option::as_ref)
            .map_err(|_| Error::MissingOptimizationInfo(self.qualified_name()))
    }

    /// Update the optimization info, which must have been attached already
    pub fn optimization_info_mut(&self) -> Result<RefMut<'_, MethodOptimizationInfo>, Error> {
        RefMut::filter_map(self.optimization_info.borrow_mut(), Option::as_mut)
            .map_err(|_| Error::MissingOptimizationInfo(self.qualified_name()))
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}{}", self.class.name, self.name, self.descriptor.render())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::class_graph::{ClassGraph, ClassGraphArenas};

    #[test]
    fn reading_before_attaching_fails() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        match java.string_length.optimization_info() {
            Err(Error::MissingOptimizationInfo(name)) => {
                assert_eq!(name, "java/lang/String.length()I")
            }
            other => panic!("unexpected {:?}", other.map(|info| info.clone())),
        }
        assert!(java.string.optimization_info_mut().is_err());
    }

    #[test]
    fn attached_info_is_shared() {
        let arenas = ClassGraphArenas::new();
        let class_graph = ClassGraph::new(&arenas);
        let java = class_graph.insert_java_library_types();

        java.string_length
            .set_optimization_info(MethodOptimizationInfo::library(1));
        java.string_length
            .optimization_info_mut()
            .unwrap()
            .set_no_side_effects();
        assert!(java.string_length.has_optimization_info());
        assert!(!java.string_length.optimization_info().unwrap().has_side_effects());

        java.string.set_optimization_info(ClassOptimizationInfo::program());
        java.string.optimization_info_mut().unwrap().set_caught();
        assert!(java.string.optimization_info().unwrap().is_caught());
    }
}
