use jvm_optinfo::jvm::class_graph::*;
use jvm_optinfo::jvm::code::{
    Code, ExceptionHandler, Instruction, Instruction::*, InstructionContext, InstructionVisitor,
    InvokeType, Offset,
};
use jvm_optinfo::jvm::model::{AllParameterVisitor, Class, Field, Method};
use jvm_optinfo::jvm::*;
use jvm_optinfo::optimize::checkers::SideEffectInstructionChecker;
use jvm_optinfo::optimize::classify;
use jvm_optinfo::optimize::filters::{UnusedParameterMethodFilter, UsedParameterFilter};
use jvm_optinfo::optimize::markers::*;
use jvm_optinfo::optimize::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn program_class<'g>(
    class_graph: &ClassGraph<'g>,
    superclass: ClassId<'g>,
    name: &str,
) -> ClassId<'g> {
    class_graph.add_class(ClassData::new(
        BinaryName::from_string(name.to_owned()).unwrap(),
        Some(superclass),
        ClassAccessFlags::PUBLIC,
    ))
}

fn program_method<'g>(
    class_graph: &ClassGraph<'g>,
    class: ClassId<'g>,
    name: &str,
    descriptor: &str,
    access_flags: MethodAccessFlags,
) -> MethodId<'g> {
    class_graph.add_method(MethodData::new(
        class,
        UnqualifiedName::from_string(name.to_owned()).unwrap(),
        MethodDescriptor::parse(descriptor).unwrap(),
        access_flags,
    ))
}

#[test]
fn long_parameter_usage() {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Longs");
    let id = program_method(&class_graph, owner, "take", "(J)V", MethodAccessFlags::PUBLIC);

    let mut class = Class::new(owner);
    class.add_method(Method::with_code(id, Code::new(3, vec![LLoad(1), Pop2, Return])));
    Analyzer::default().analyze(&class_graph, &[class]).unwrap();

    let info = id.optimization_info().unwrap();
    assert_eq!(info.parameter_size(), 3);
    assert!(!info.is_parameter_used(0));
    assert!(info.is_parameter_used(1));
    assert!(info.is_parameter_used(2));
    assert!(info.has_unused_parameters());
}

#[test]
fn modified_parameters_accumulate() {
    let mut info = MethodOptimizationInfo::program(3);
    info.set_parameter_modified(0);
    info.set_parameter_modified(2);
    assert_eq!(info.modified_parameters().bits(), 5);

    info.update_modified_parameters(SlotMask::from_bits(0b1000));
    assert_eq!(info.modified_parameters().bits(), 0b1101);
}

#[test]
fn side_effects_stick_once_found() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Thrower");
    let class = Class::new(owner);

    let settings = Settings {
        include_return_instructions: false,
        ..Settings::new()
    };
    let checker = SideEffectInstructionChecker::new(settings, &class.constants);

    let after_div = checker.fold(false, &IDiv).unwrap();
    assert!(after_div);
    let after_throw = checker.fold(after_div, &AThrow).unwrap();
    assert!(after_throw);

    assert!(!checker.fold(false, &Return).unwrap());
    assert!(!checker.fold(false, &IAdd).unwrap());
}

#[test]
fn dynamic_invocation_is_only_invokedynamic() {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Lambdas");
    let bootstrap = program_method(
        &class_graph,
        owner,
        "bootstrap",
        "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;",
        MethodAccessFlags::STATIC,
    );
    let plain = program_method(
        &class_graph,
        owner,
        "plain",
        "(Ljava/lang/String;)I",
        MethodAccessFlags::STATIC,
    );
    let dynamic = program_method(
        &class_graph,
        owner,
        "dynamic",
        "()Ljava/lang/Runnable;",
        MethodAccessFlags::STATIC,
    );

    let mut class = Class::new(owner);
    let length = class.constants.get_method_ref(java.string_length).unwrap();
    let call_site = class
        .constants
        .get_invoke_dynamic(
            bootstrap,
            UnqualifiedName::from_string(String::from("run")).unwrap(),
            MethodDescriptor::parse("()Ljava/lang/Runnable;").unwrap(),
        )
        .unwrap();
    class.add_method(Method::with_code(
        plain,
        Code::new(1, vec![ALoad(0), Invoke(InvokeType::Virtual, length), IReturn]),
    ));
    class.add_method(Method::with_code(
        dynamic,
        Code::new(0, vec![InvokeDynamic(call_site), AReturn]),
    ));

    Analyzer::default().initialize(&class_graph);
    class.accept_members(&mut DynamicInvocationMarker::new()).unwrap();

    assert!(!plain.optimization_info().unwrap().invokes_dynamically());
    assert!(dynamic.optimization_info().unwrap().invokes_dynamically());
}

#[test]
fn class_merge_is_an_or() {
    let mut first = ClassOptimizationInfo::program();
    first.set_instantiated();
    first.set_caught();
    let mut second = ClassOptimizationInfo::program();
    second.set_dot_classed();
    second.set_side_effects();

    let mut forward = ClassOptimizationInfo::program();
    forward.merge(&first);
    forward.merge(&second);
    let mut backward = ClassOptimizationInfo::program();
    backward.merge(&second);
    backward.merge(&first);
    backward.merge(&first);

    assert_eq!(forward.facts(), backward.facts());
    assert!(forward.is_instantiated());
    assert!(forward.is_caught());
    assert!(forward.is_dot_classed());
    assert!(forward.has_side_effects());
    assert!(!forward.is_instanceofed());
    assert!(!forward.is_kept());
    assert!(forward.may_be_merged());
}

#[test]
fn no_side_effects_wins_in_either_order() {
    let mut first = MethodOptimizationInfo::program(2);
    first.set_parameter_modified(0);
    first.set_parameter_modified(1);
    first.set_modifies_anything();

    let mut second = first.clone();

    first.set_no_external_side_effects();
    assert_eq!(first.modified_parameters(), SlotMask::FIRST);
    assert!(!first.modifies_anything());
    first.set_no_side_effects();
    assert!(first.modified_parameters().is_empty());

    second.set_no_side_effects();
    second.set_no_external_side_effects();
    assert!(second.modified_parameters().is_empty());
    assert!(!second.modifies_anything());
    assert!(!second.has_side_effects());
}

#[test]
fn defaults_by_origin() {
    let library = MethodOptimizationInfo::library(4);
    assert_eq!(library.modified_parameters(), SlotMask::ALL);
    assert!(library.modifies_anything());
    assert!(library.has_side_effects());
    assert!(library.invokes_dynamically());

    let program = MethodOptimizationInfo::program(4);
    assert!(program.modified_parameters().is_empty());
    assert!(!program.modifies_anything());
    assert!(!program.has_side_effects());
}

#[test]
fn slots_past_capacity_are_conservative() {
    let mut info = MethodOptimizationInfo::program(80);
    for slot in 0..64 {
        assert!(!info.is_parameter_used(slot));
    }
    info.mark_parameter_used(70);
    assert!(info.used_parameters().is_empty());
    assert!(info.is_parameter_used(64));
    assert!(info.is_parameter_modified(79));
    assert!(info.is_parameter_escaping(100));

    info.mark_parameter_used(5);
    assert_eq!(info.used_parameters(), SlotMask::single(5));
}

#[test]
fn variable_usage_covers_wide_slots() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Locals");
    let wide = program_method(&class_graph, owner, "wide", "()V", MethodAccessFlags::STATIC);
    let narrow = program_method(&class_graph, owner, "narrow", "()V", MethodAccessFlags::STATIC);
    let class = Class::new(owner);

    let mut marker = VariableUsageMarker::new();
    let code = Code::new(6, vec![LConst0, LStore(2), Return]);
    code.accept(&class, wide, &mut marker).unwrap();
    let used: Vec<usize> = (0..6).filter(|i| marker.is_variable_used(*i)).collect();
    assert_eq!(used, vec![2, 3]);

    let code = Code::new(6, vec![IInc(4, 1), Return]);
    code.accept(&class, narrow, &mut marker).unwrap();
    let used: Vec<usize> = (0..6).filter(|i| marker.is_variable_used(*i)).collect();
    assert_eq!(used, vec![4]);
    assert!(!marker.is_variable_used(1000));

    // A later body with more locals than any before it
    let roomy = program_method(&class_graph, owner, "roomy", "()V", MethodAccessFlags::STATIC);
    let code = Code::new(12, vec![DConst1, DStore(9), ALoad(7), Pop, Return]);
    code.accept(&class, roomy, &mut marker).unwrap();
    let used: Vec<usize> = (0..12).filter(|i| marker.is_variable_used(*i)).collect();
    assert_eq!(used, vec![7, 9, 10]);
}

#[test]
fn monitorexit_never_throws() {
    assert!(!classify::may_throw_exceptions(&MonitorExit));
    assert!(classify::may_throw_exceptions(&MonitorEnter));
    assert!(classify::may_throw_exceptions(&ArrayLength));
    assert!(!classify::may_throw_exceptions(&IAdd));
}

#[test]
fn escape_through_fields_and_calls() {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Holder");
    let value = class_graph.add_field(FieldData::new(
        owner,
        UnqualifiedName::from_string(String::from("value")).unwrap(),
        FieldType::parse("Ljava/lang/Object;").unwrap(),
        FieldAccessFlags::PRIVATE,
    ));
    let shared = class_graph.add_field(FieldData::new(
        owner,
        UnqualifiedName::from_string(String::from("shared")).unwrap(),
        FieldType::int(),
        FieldAccessFlags::empty(),
    ));
    let set = program_method(
        &class_graph,
        owner,
        "set",
        "(Ljava/lang/Object;)V",
        MethodAccessFlags::PUBLIC,
    );
    let hash = program_method(
        &class_graph,
        owner,
        "hash",
        "(Ljava/lang/Object;)I",
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
    );

    let mut class = Class::new(owner);
    class.add_field(Field::new(value));
    let value_ref = class.constants.get_field_ref(value).unwrap();
    let hash_code = class.constants.get_method_ref(java.object_hash_code).unwrap();
    class.add_method(Method::with_code(
        set,
        Code::new(2, vec![ALoad(0), ALoad(1), PutField(value_ref), Return]),
    ));
    class.add_method(Method::with_code(
        hash,
        Code::new(
            1,
            vec![ALoad(0), Invoke(InvokeType::Virtual, hash_code), IReturn],
        ),
    ));

    Analyzer::default().analyze(&class_graph, &[class]).unwrap();
    assert!(!owner.optimization_info().unwrap().contains_package_visible_members());

    let mut with_shared = Class::new(owner);
    with_shared.add_field(Field::new(shared));
    Analyzer::default().analyze_class(&with_shared).unwrap();
    assert!(owner.optimization_info().unwrap().contains_package_visible_members());

    let set_info = set.optimization_info().unwrap();
    assert!(set_info.is_parameter_escaping(1));
    assert!(!set_info.is_parameter_escaping(0));
    assert!(set_info.is_parameter_modified(0));
    assert!(!set_info.is_parameter_modified(1));
    assert!(!set_info.modifies_anything());

    // `hashCode` is a library method, so it could do anything with its receiver
    let hash_info = hash.optimization_info().unwrap();
    assert!(hash_info.is_parameter_escaping(0));
    assert!(hash_info.is_parameter_modified(0));
    assert!(hash_info.modifies_anything());
    assert!(hash_info.has_side_effects());
}

#[test]
fn class_facts_from_code() {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "pkg/Owner");
    let target = program_class(&class_graph, java.object, "pkg/Target");
    let failure = program_class(&class_graph, java.exception, "pkg/Failure");
    let init = program_method(
        &class_graph,
        target,
        "<init>",
        "()V",
        MethodAccessFlags::empty(),
    );
    let run = program_method(
        &class_graph,
        owner,
        "run",
        "()V",
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
    );

    let mut class = Class::new(owner);
    let target_ref = class.constants.get_class(target).unwrap();
    let init_ref = class.constants.get_method_ref(init).unwrap();
    let exception_ref = class.constants.get_class(failure).unwrap();
    let code = Code::new(
        1,
        vec![
            New(target_ref),                       // 0
            Dup,                                   // 3
            Invoke(InvokeType::Special, init_ref), // 4
            AStore(0),                             // 7
            IConst1,                               // 8
            IConst0,                               // 9
            IDiv,                                  // 10
            Pop,                                   // 11
            Return,                                // 12
            Pop,                                   // 13
            Return,                                // 14
        ],
    )
    .with_exception_handler(ExceptionHandler {
        start: Offset(8),
        end: Offset(12),
        handler: Offset(13),
        catch_type: Some(exception_ref),
    });
    class.add_method(Method::with_code(run, code));

    let mut target_class = Class::new(target);
    target_class.add_method(Method::with_code(init, Code::new(1, vec![Return])));

    Analyzer::default()
        .analyze(&class_graph, &[class, target_class])
        .unwrap();

    let target_info = target.optimization_info().unwrap();
    assert!(target_info.is_instantiated());
    assert!(target_info.contains_constructors());
    assert!(target_info.contains_package_visible_members());
    assert!(!target_info.is_instanceofed());

    let owner_info = owner.optimization_info().unwrap();
    assert!(owner_info.invokes_package_visible_members());
    assert!(!owner_info.contains_package_visible_members());

    assert!(failure.optimization_info().unwrap().is_caught());
    assert!(!failure.optimization_info().unwrap().is_instantiated());

    let run_info = run.optimization_info().unwrap();
    assert!(run_info.catches_exceptions());
    assert_eq!(init.optimization_info().unwrap().invocation_count(), 1);
}

#[test]
fn filters_see_analysis_results() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Filtered");
    let first = program_method(&class_graph, owner, "first", "(II)I", MethodAccessFlags::STATIC);
    let both = program_method(&class_graph, owner, "both", "(II)I", MethodAccessFlags::STATIC);

    let mut class = Class::new(owner);
    class.add_method(Method::with_code(first, Code::new(2, vec![ILoad(0), IReturn])));
    class.add_method(Method::with_code(
        both,
        Code::new(2, vec![ILoad(0), ILoad(1), IAdd, IReturn]),
    ));
    Analyzer::default()
        .analyze(&class_graph, std::slice::from_ref(&class))
        .unwrap();

    let unused: Vec<(MethodId, ParameterSlot)> = vec![];
    let mut filter = UnusedParameterMethodFilter::new(AllParameterVisitor::new(
        UsedParameterFilter::with_unused(None, Some(unused)),
    ));
    class.accept_members(&mut filter).unwrap();

    let unused = filter.visitor.parameter_visitor.unused.unwrap();
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].0, first);
    assert_eq!(unused[0].1.slot, 1);
}

#[test]
fn synchronization_and_static_initializers() {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Counter");
    let count = class_graph.add_field(FieldData::new(
        owner,
        UnqualifiedName::from_string(String::from("count")).unwrap(),
        FieldType::int(),
        FieldAccessFlags::PRIVATE | FieldAccessFlags::STATIC,
    ));
    let clinit = program_method(&class_graph, owner, "<clinit>", "()V", MethodAccessFlags::STATIC);
    let locked = program_method(
        &class_graph,
        owner,
        "locked",
        "(Ljava/lang/Object;)V",
        MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
    );
    let flagged = program_method(
        &class_graph,
        owner,
        "flagged",
        "()V",
        MethodAccessFlags::PUBLIC | MethodAccessFlags::SYNCHRONIZED,
    );

    let mut class = Class::new(owner);
    let count_ref = class.constants.get_field_ref(count).unwrap();
    class.add_method(Method::with_code(
        clinit,
        Code::new(0, vec![IConst0, PutStatic(count_ref), Return]),
    ));
    class.add_method(Method::with_code(
        locked,
        Code::new(1, vec![ALoad(0), MonitorEnter, ALoad(0), MonitorExit, Return]),
    ));
    class.add_method(Method::with_code(flagged, Code::new(1, vec![Return])));

    Analyzer::default()
        .analyze(&class_graph, std::slice::from_ref(&class))
        .unwrap();

    assert!(clinit.optimization_info().unwrap().has_side_effects());
    assert!(owner.optimization_info().unwrap().has_side_effects());
    assert!(!clinit.optimization_info().unwrap().has_synchronized_block());
    assert!(locked.optimization_info().unwrap().has_synchronized_block());
    assert!(flagged.optimization_info().unwrap().has_synchronized_block());
    assert!(!flagged.optimization_info().unwrap().has_side_effects());
}

fn reader_has_side_effects(initializer: Vec<Instruction>, initializer_first: bool) -> bool {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let reader = program_class(&class_graph, java.object, "Reader");
    let holder = program_class(&class_graph, java.object, "Holder");
    let value = class_graph.add_field(FieldData::new(
        holder,
        UnqualifiedName::from_string(String::from("value")).unwrap(),
        FieldType::int(),
        FieldAccessFlags::STATIC,
    ));
    let read = program_method(&class_graph, reader, "read", "()I", MethodAccessFlags::STATIC);
    let clinit = program_method(&class_graph, holder, "<clinit>", "()V", MethodAccessFlags::STATIC);

    let mut reader_class = Class::new(reader);
    let value_ref = reader_class.constants.get_field_ref(value).unwrap();
    reader_class.add_method(Method::with_code(
        read,
        Code::new(0, vec![GetStatic(value_ref), IReturn]),
    ));

    let mut holder_class = Class::new(holder);
    let value_ref = holder_class.constants.get_field_ref(value).unwrap();
    let initializer = initializer
        .into_iter()
        .map(|instruction| match instruction {
            PutStatic(_) => PutStatic(value_ref),
            other => other,
        })
        .collect();
    holder_class.add_method(Method::with_code(clinit, Code::new(0, initializer)));

    let classes = if initializer_first {
        [holder_class, reader_class]
    } else {
        [reader_class, holder_class]
    };
    let settings = Settings {
        include_built_in_exceptions: false,
        ..Settings::new()
    };
    Analyzer::new(settings)
        .analyze(&class_graph, &classes)
        .unwrap();

    let has_side_effects = read.optimization_info().unwrap().has_side_effects();
    has_side_effects
}

#[test]
fn static_initializers_are_seen_in_any_order() {
    let writes = || vec![IConst1, PutStatic(ConstantIndex(0)), Return];
    assert!(reader_has_side_effects(writes(), true));
    assert!(reader_has_side_effects(writes(), false));

    let quiet = || vec![Return];
    assert!(!reader_has_side_effects(quiet(), true));
    assert!(!reader_has_side_effects(quiet(), false));
}

#[test]
fn unchecked_initializers_have_side_effects() {
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let base = program_class(&class_graph, java.object, "Base");
    let derived = program_class(&class_graph, base, "Derived");
    let clinit = program_method(&class_graph, base, "<clinit>", "()V", MethodAccessFlags::STATIC);
    let make = program_method(&class_graph, derived, "make", "()V", MethodAccessFlags::STATIC);

    let mut derived_class = Class::new(derived);
    let derived_ref = derived_class.constants.get_class(derived).unwrap();
    derived_class.add_method(Method::with_code(
        make,
        Code::new(0, vec![New(derived_ref), Pop, Return]),
    ));
    let mut base_class = Class::new(base);
    base_class.add_method(Method::with_code(clinit, Code::new(0, vec![Return])));

    // `Base` is never handed over, so its initializer stays unchecked
    let analyzer = Analyzer::default();
    analyzer
        .analyze(&class_graph, std::slice::from_ref(&derived_class))
        .unwrap();
    assert!(make.optimization_info().unwrap().has_side_effects());
    assert!(!base.optimization_info().unwrap().is_initializer_checked());

    analyzer
        .check_static_initializers(std::slice::from_ref(&base_class))
        .unwrap();
    assert!(base.optimization_info().unwrap().is_initializer_checked());
    assert!(!base.optimization_info().unwrap().has_side_effects());
}

#[derive(Default)]
struct EntryRecorder {
    entries: Vec<(Offset, ConstantIndex)>,
    offset: Option<Offset>,
}

impl EntryRecorder {
    fn record(&mut self, index: ConstantIndex) -> Result<(), Error> {
        let offset = self.offset.take().expect("entry visited outside of an instruction");
        self.entries.push((offset, index));
        Ok(())
    }
}

impl<'g> InstructionVisitor<'g> for EntryRecorder {
    fn visit_constant_instruction(
        &mut self,
        ctx: &InstructionContext<'_, 'g>,
        _instruction: &Instruction,
        constant: ConstantIndex,
    ) -> Result<(), Error> {
        self.offset = Some(ctx.offset);
        ctx.class.constants.visit_constant_pool_entry(constant, self)
    }
}

impl<'g> ConstantVisitor<'g> for EntryRecorder {
    fn visit_class_constant(&mut self, index: ConstantIndex, _: ClassId<'g>) -> Result<(), Error> {
        self.record(index)
    }

    fn visit_field_ref_constant(
        &mut self,
        index: ConstantIndex,
        _: FieldId<'g>,
    ) -> Result<(), Error> {
        self.record(index)
    }

    fn visit_method_ref_constant(
        &mut self,
        index: ConstantIndex,
        _: MethodId<'g>,
    ) -> Result<(), Error> {
        self.record(index)
    }

    fn visit_other_constant(
        &mut self,
        index: ConstantIndex,
        _: &Constant<'g>,
    ) -> Result<(), Error> {
        self.record(index)
    }
}

#[test]
fn one_constant_entry_per_instruction() {
    init_logging();
    let arenas = ClassGraphArenas::new();
    let class_graph = ClassGraph::new(&arenas);
    let java = class_graph.insert_java_library_types();
    let owner = program_class(&class_graph, java.object, "Entries");
    let name = class_graph.add_field(FieldData::new(
        owner,
        UnqualifiedName::from_string(String::from("name")).unwrap(),
        FieldType::parse("Ljava/lang/String;").unwrap(),
        FieldAccessFlags::PRIVATE,
    ));
    let describe = program_method(&class_graph, owner, "describe", "()V", MethodAccessFlags::PUBLIC);
    let run = program_method(&class_graph, owner, "run", "()V", MethodAccessFlags::PUBLIC);

    let mut class = Class::new(owner);
    let text_ref = class.constants.get_string("text").unwrap();
    let name_ref = class.constants.get_field_ref(name).unwrap();
    let owner_ref = class.constants.get_class(owner).unwrap();
    let describe_ref = class.constants.get_method_ref(describe).unwrap();
    let code = Code::new(
        1,
        vec![
            Ldc(text_ref),
            Pop,
            ALoad(0),
            GetField(name_ref),
            Pop,
            New(owner_ref),
            CheckCast(owner_ref),
            InstanceOf(owner_ref),
            Pop,
            ALoad(0),
            Invoke(InvokeType::Virtual, describe_ref),
            Return,
        ],
    );
    let constant_offsets: Vec<Offset> = code
        .instructions
        .iter()
        .filter(|(_, _, instruction)| {
            matches!(
                instruction,
                Ldc(_) | GetField(_) | New(_) | CheckCast(_) | InstanceOf(_) | Invoke(_, _)
            )
        })
        .map(|(offset, _, _)| offset)
        .collect();
    class.add_method(Method::with_code(run, code));
    Analyzer::default().initialize(&class_graph);

    let mut recorder = EntryRecorder::default();
    class.methods[0]
        .code_impl
        .as_ref()
        .unwrap()
        .accept(&class, run, &mut recorder)
        .unwrap();
    let indices = [text_ref, name_ref, owner_ref, owner_ref, owner_ref, describe_ref];
    let expected: Vec<(Offset, ConstantIndex)> = constant_offsets
        .into_iter()
        .zip(indices.iter().copied())
        .collect();
    assert_eq!(recorder.entries, expected);

    let mut marker = MethodInvocationMarker::new();
    class.accept_members(&mut marker).unwrap();
    assert_eq!(marker.entries_visited(), 6);
    assert_eq!(describe.optimization_info().unwrap().invocation_count(), 1);
    assert_eq!(run.optimization_info().unwrap().invocation_count(), 0);
}
