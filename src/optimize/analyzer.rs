use crate::jvm::class_graph::ClassGraph;
use crate::jvm::model::{Class, MemberVisitor};
use crate::jvm::Error;
use crate::optimize::markers::*;
use crate::optimize::{ClassOptimizationInfo, MethodOptimizationInfo, Settings};
use log::debug;

/// Computes optimization info for a whole program
///
/// Analysis happens in two steps:
///
///   1. [`Analyzer::initialize`] attaches fresh info to every class and method of the class
///      graph. Program classes start out with precise facts, library classes with conservative
///      ones (their code is never looked at).
///
///   2. [`Analyzer::analyze_class`] runs every marker over the members of a program class.
///
/// Until its static initializer has been checked, a program class is assumed to have side effects
/// when it gets initialized. [`Analyzer::analyze`] checks every static initializer before anything
/// else, so that the order of the classes doesn't matter.
///
/// Facts that come from outside (eg. "this method is known to have no side effects") should be
/// attached between the two steps, or before `initialize` since it leaves existing info alone.
///
/// Analyzing the same class twice is harmless for the flags and masks, but counts every
/// invocation twice.
pub struct Analyzer {
    settings: Settings,
}

impl Analyzer {
    pub fn new(settings: Settings) -> Analyzer {
        Analyzer { settings }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Attach optimization info to every class and method that doesn't already have it
    pub fn initialize(&self, class_graph: &ClassGraph<'_>) {
        for class in class_graph.classes() {
            let is_library = class.is_library();
            if !class.has_optimization_info() {
                class.set_optimization_info(if is_library {
                    ClassOptimizationInfo::library()
                } else {
                    ClassOptimizationInfo::program()
                });
            }
            for method in class.methods() {
                if method.has_optimization_info() {
                    continue;
                }
                let parameter_size = method.parameter_size();
                method.set_optimization_info(if is_library {
                    MethodOptimizationInfo::library(parameter_size)
                } else {
                    MethodOptimizationInfo::program(parameter_size)
                });
            }
        }
    }

    /// Run every marker over the members of a class
    ///
    /// Every class and method the code refers to must already have optimization info attached.
    pub fn analyze_class<'g>(&self, class: &Class<'g>) -> Result<(), Error> {
        debug!("analyzing {:?}", class.id);

        class.accept_members(&mut ClassUsageMarker::new())?;
        class.accept_members(&mut PackageVisibilityMarker::new())?;
        class.accept_members(&mut MethodInvocationMarker::new())?;
        class.accept_members(&mut DynamicInvocationMarker::new())?;
        class.accept_members(&mut SynchronizationMarker::new())?;
        class.accept_members(&mut CatchExceptionMarker::new())?;
        class.accept_members(&mut ParameterUsageMarker::new())?;
        class.accept_members(&mut ParameterEscapeMarker::new())?;
        class.accept_members(&mut SideEffectMethodMarker::new(self.settings))?;

        Ok(())
    }

    /// Check static initializers for side effects
    pub fn check_static_initializers<'g>(&self, classes: &[Class<'g>]) -> Result<(), Error> {
        let mut marker = SideEffectMethodMarker::new(self.settings);
        for class in classes {
            for method in &class.methods {
                if method.id.is_static_initializer() {
                    marker.visit_method(class, method)?;
                }
            }
        }
        Ok(())
    }

    /// Initialize the class graph, then analyze every program class
    pub fn analyze<'g>(
        &self,
        class_graph: &ClassGraph<'g>,
        classes: &[Class<'g>],
    ) -> Result<(), Error> {
        self.initialize(class_graph);
        self.check_static_initializers(classes)?;
        for class in classes {
            self.analyze_class(class)?;
        }
        debug!("analyzed {} classes", classes.len());
        Ok(())
    }
}

impl Default for Analyzer {
    fn default() -> Analyzer {
        Analyzer::new(Settings::new())
    }
}
