use crate::jvm::class_graph::MethodId;
use crate::jvm::code::{Code, Instruction, InvokeType};
use crate::jvm::model::{Class, MemberVisitor, Method};
use crate::jvm::{BinaryName, Constant, Error, FieldType, MethodDescriptor};
use crate::optimize::SlotMask;
use crate::util::{Offset, Width};
use log::{debug, trace, warn};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// What the parameters of a method may go through when it runs
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct EscapeSummary {
    /// Parameters (by slot) whose objects may be reachable after the method returns
    pub escaping: SlotMask,

    /// Parameters (by slot) whose objects may be written to
    pub modified: SlotMask,

    /// May the method write to an object that didn't come from a parameter or a fresh allocation?
    pub modifies_anything: bool,
}

impl EscapeSummary {
    /// Everything escapes and everything gets modified
    pub fn conservative() -> EscapeSummary {
        EscapeSummary {
            escaping: SlotMask::ALL,
            modified: SlotMask::ALL,
            modifies_anything: true,
        }
    }
}

/// Finds out which parameters escape or get modified
///
/// This is an abstract interpretation over one method body. Every operand stack entry and local
/// tracks which parameters it may alias and whether it may alias something external (a static
/// field, a field of some object, the result of a call). Then:
///
///   - storing a value into a field or an array, returning it, throwing it, or passing it to a
///     method that isn't side effect free makes the parameters it aliases escape
///   - writing into a field or array of a value modifies the parameters it aliases, and modifies
///     "anything" if the value may be external
///   - calling a method modifies its arguments unless it is known to be side effect free
///
/// The operand stack is tracked per instruction, with forward branches carrying their stack to
/// the target. Locals are tracked without regard for control flow: each one holds the union of
/// everything ever stored into it, and the body is walked again until that stabilizes. A backward
/// branch that doesn't have an empty stack gives up with the conservative answer.
pub struct ParameterEscapeMarker;

impl ParameterEscapeMarker {
    pub fn new() -> ParameterEscapeMarker {
        ParameterEscapeMarker
    }

    /// Analyze a method without storing the result
    ///
    /// Methods without code get the conservative answer.
    pub fn analyze<'g>(class: &Class<'g>, method: &Method<'g>) -> Result<EscapeSummary, Error> {
        let code = match &method.code_impl {
            Some(code) => code,
            None => return Ok(EscapeSummary::conservative()),
        };
        let mut interpreter = Interpreter::new(class, method.id, code);
        match interpreter.run(code) {
            Ok(()) => Ok(interpreter.summary),
            Err(Abort::Conservative(reason)) => {
                warn!(
                    "giving up on escape analysis of {:?} at offset {}: {}",
                    method.id, interpreter.offset.0, reason
                );
                Ok(EscapeSummary::conservative())
            }
            Err(Abort::Failed(error)) => Err(error),
        }
    }
}

impl Default for ParameterEscapeMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> MemberVisitor<'g> for ParameterEscapeMarker {
    fn visit_method(&mut self, class: &Class<'g>, method: &Method<'g>) -> Result<(), Error> {
        let summary = Self::analyze(class, method)?;
        debug!(
            "{:?}: escaping {:?}, modified {:?}, modifies anything: {}",
            method.id, summary.escaping, summary.modified, summary.modifies_anything
        );

        let mut info = method.id.optimization_info_mut()?;
        info.update_escaping_parameters(summary.escaping);
        info.update_modified_parameters(summary.modified);
        if summary.modifies_anything {
            info.set_modifies_anything();
        }
        Ok(())
    }
}

/// Abstract value of a stack entry or local
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct Value {
    /// Parameters (by slot) the value may alias
    params: SlotMask,

    /// May alias an object reachable from outside the method
    external: bool,

    /// `long` or `double`
    wide: bool,
}

impl Value {
    /// Primitive, `null`, or a freshly allocated object
    const NARROW: Value = Value {
        params: SlotMask::EMPTY,
        external: false,
        wide: false,
    };

    const WIDE: Value = Value {
        params: SlotMask::EMPTY,
        external: false,
        wide: true,
    };

    const EXTERNAL: Value = Value {
        params: SlotMask::EMPTY,
        external: true,
        wide: false,
    };

    fn parameter(slot: u16) -> Value {
        if slot < SlotMask::CAPACITY {
            Value {
                params: SlotMask::single(slot),
                ..Value::NARROW
            }
        } else {
            Value::EXTERNAL
        }
    }

    /// Value read out of something: it aliases whatever `params` alias, and may be external
    fn derived(params: SlotMask) -> Value {
        Value {
            params,
            external: true,
            wide: false,
        }
    }

    fn of_type(field_type: &FieldType<BinaryName>) -> Value {
        if field_type.is_reference() {
            Value::EXTERNAL
        } else if field_type.width() == 2 {
            Value::WIDE
        } else {
            Value::NARROW
        }
    }

    fn union(self, other: Value) -> Value {
        Value {
            params: self.params | other.params,
            external: self.external || other.external,
            wide: self.wide,
        }
    }

    fn size(self) -> usize {
        if self.wide {
            2
        } else {
            1
        }
    }
}

enum Abort {
    /// The analysis can't say anything precise
    Conservative(&'static str),

    /// The code is malformed
    Failed(Error),
}

impl From<Error> for Abort {
    fn from(error: Error) -> Abort {
        Abort::Failed(error)
    }
}

struct Interpreter<'a, 'g> {
    class: &'a Class<'g>,
    method: MethodId<'g>,
    locals: Vec<Value>,
    stack: Vec<Value>,
    offset: Offset,
    summary: EscapeSummary,
}

impl<'a, 'g> Interpreter<'a, 'g> {
    fn new(class: &'a Class<'g>, method: MethodId<'g>, code: &Code) -> Interpreter<'a, 'g> {
        let local_count = (code.max_locals as usize).max(method.parameter_size());
        let mut locals = vec![Value::NARROW; local_count];
        for parameter in method.descriptor.parameter_slots(!method.is_static()) {
            let slot = parameter.slot as usize;
            if parameter.is_reference {
                locals[slot] = Value::parameter(parameter.slot);
            } else if parameter.width == 2 {
                locals[slot] = Value::WIDE;
            }
        }
        Interpreter {
            class,
            method,
            locals,
            stack: vec![],
            offset: Offset(0),
            summary: EscapeSummary::default(),
        }
    }

    /// Walk the body until the locals stop changing
    fn run(&mut self, code: &Code) -> Result<(), Abort> {
        loop {
            let before = self.locals.clone();
            self.walk(code)?;
            if self.locals == before {
                return Ok(());
            }
            trace!("locals of {:?} changed, walking again", self.method);
        }
    }

    fn walk(&mut self, code: &Code) -> Result<(), Abort> {
        let handlers: HashSet<Offset> = code
            .exception_table
            .iter()
            .map(|handler| handler.handler)
            .collect();
        let mut pending: HashMap<Offset, Vec<Value>> = HashMap::new();
        let mut reachable = true;
        self.stack.clear();

        for (offset, _, instruction) in &code.instructions {
            self.offset = offset;
            let incoming = pending.remove(&offset);

            if handlers.contains(&offset) {
                let fallthrough = std::mem::replace(&mut self.stack, vec![Value::EXTERNAL]);
                if reachable {
                    self.merge(&fallthrough)?;
                }
                if let Some(incoming) = incoming {
                    self.merge(&incoming)?;
                }
            } else if !reachable {
                // Only reachable by a forward jump, a backward jump (empty stack), or not at all
                self.stack = incoming.unwrap_or_default();
            } else if let Some(incoming) = incoming {
                self.merge(&incoming)?;
            }

            trace!("{} {:?} with stack {:?}", offset.0, instruction, self.stack);
            self.step(instruction)?;

            for relative in instruction.jump_targets() {
                let target = Code::jump_target(offset, relative)
                    .ok_or(Abort::Conservative("jump before the start of the method"))?;
                if target > offset {
                    match pending.entry(target) {
                        Entry::Vacant(vacant) => {
                            vacant.insert(self.stack.clone());
                        }
                        Entry::Occupied(mut occupied) => {
                            Self::merge_into(occupied.get_mut(), &self.stack)?;
                        }
                    }
                } else if !self.stack.is_empty() {
                    return Err(Abort::Conservative("backward branch with a non-empty stack"));
                }
            }

            // The subroutine pops its return address before coming back
            if let Instruction::Jsr(_) | Instruction::JsrW(_) = instruction {
                self.pop()?;
            }
            reachable = instruction.falls_through();
        }
        Ok(())
    }

    fn merge(&mut self, other: &[Value]) -> Result<(), Abort> {
        Self::merge_into(&mut self.stack, other)
    }

    fn merge_into(stack: &mut [Value], other: &[Value]) -> Result<(), Abort> {
        if stack.len() != other.len() {
            return Err(Abort::Conservative("stack heights differ where control flow joins"));
        }
        for (value, other) in stack.iter_mut().zip(other) {
            *value = value.union(*other);
        }
        Ok(())
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Result<Value, Abort> {
        match self.stack.pop() {
            Some(value) => Ok(value),
            None => Err(Abort::Failed(Error::StackUnderflow {
                method: format!("{:?}", self.method.0),
                offset: self.offset.0,
            })),
        }
    }

    fn pop_n(&mut self, count: usize) -> Result<Vec<Value>, Abort> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.pop()?);
        }
        values.reverse();
        Ok(values)
    }

    /// Pop values covering exactly `slots` stack slots (in stack order)
    fn pop_slots(&mut self, slots: usize) -> Result<Vec<Value>, Abort> {
        let mut values = vec![];
        let mut covered = 0;
        while covered < slots {
            let value = self.pop()?;
            covered += value.size();
            values.push(value);
        }
        if covered != slots {
            return Err(Abort::Conservative("stack manipulation splits a long or double"));
        }
        values.reverse();
        Ok(values)
    }

    /// Duplicate the top `slots` slots, inserting the copy `below` slots further down
    fn dup(&mut self, slots: usize, below: usize) -> Result<(), Abort> {
        let top = self.pop_slots(slots)?;
        let under = self.pop_slots(below)?;
        self.stack.extend(top.iter().copied());
        self.stack.extend(under);
        self.stack.extend(top);
        Ok(())
    }

    fn local(&self, index: u16) -> Result<Value, Abort> {
        self.locals
            .get(index as usize)
            .copied()
            .ok_or(Abort::Conservative("local out of range"))
    }

    fn store_local(&mut self, index: u16, value: Value) -> Result<(), Abort> {
        let local = self
            .locals
            .get_mut(index as usize)
            .ok_or(Abort::Conservative("local out of range"))?;
        *local = local.union(value);
        Ok(())
    }

    fn escape(&mut self, value: Value) {
        if !value.params.is_empty() {
            trace!("parameters {:?} escape", value.params);
        }
        self.summary.escaping |= value.params;
    }

    fn write_through(&mut self, value: Value) {
        self.summary.modified |= value.params;
        if value.external {
            self.summary.modifies_anything = true;
        }
    }

    fn invoke(
        &mut self,
        descriptor: &MethodDescriptor<BinaryName>,
        has_this: bool,
        no_side_effects: bool,
        no_external_side_effects: bool,
    ) -> Result<(), Abort> {
        let parameters = descriptor.parameter_slots(has_this);
        let arguments = self.pop_n(parameters.len())?;

        let mut aliases = SlotMask::EMPTY;
        for (parameter, argument) in parameters.iter().zip(arguments) {
            aliases |= argument.params;
            if no_side_effects {
                continue;
            }
            self.escape(argument);
            if !no_external_side_effects || (has_this && parameter.slot == 0) {
                self.write_through(argument);
            }
        }
        if !no_side_effects && !no_external_side_effects {
            self.summary.modifies_anything = true;
        }

        match &descriptor.return_type {
            Some(return_type) if return_type.is_reference() => self.push(Value::derived(aliases)),
            Some(return_type) => self.push(Value::of_type(return_type)),
            None => (),
        }
        Ok(())
    }

    fn step(&mut self, instruction: &Instruction) -> Result<(), Abort> {
        use Instruction::*;
        let class = self.class;
        let constants = &class.constants;

        match instruction {
            Nop | IInc(_, _) | Goto(_) | GotoW(_) | Ret(_) | Return | CheckCast(_) => (),

            AConstNull | IConstM1 | IConst0 | IConst1 | IConst2 | IConst3 | IConst4 | IConst5
            | FConst0 | FConst1 | FConst2 | BiPush(_) | SiPush(_) | New(_) => {
                self.push(Value::NARROW)
            }
            LConst0 | LConst1 | DConst0 | DConst1 | Ldc2(_) => self.push(Value::WIDE),
            Ldc(index) => {
                let value = match constants.get(*index)? {
                    Constant::Integer(_) | Constant::Float(_) => Value::NARROW,
                    Constant::Long(_) | Constant::Double(_) => Value::WIDE,
                    _ => Value::EXTERNAL,
                };
                self.push(value);
            }

            ILoad(_) | FLoad(_) => self.push(Value::NARROW),
            LLoad(_) | DLoad(_) => self.push(Value::WIDE),
            ALoad(index) => {
                let value = self.local(*index)?;
                self.push(value);
            }
            IStore(_) | FStore(_) | LStore(_) | DStore(_) => {
                self.pop()?;
            }
            AStore(index) => {
                let value = self.pop()?;
                self.store_local(*index, value)?;
            }

            IALoad | BALoad | CALoad | SALoad | FALoad => {
                self.pop_n(2)?;
                self.push(Value::NARROW);
            }
            LALoad | DALoad => {
                self.pop_n(2)?;
                self.push(Value::WIDE);
            }
            AALoad => {
                self.pop()?;
                let array = self.pop()?;
                self.push(Value::derived(array.params));
            }
            IAStore | LAStore | FAStore | DAStore | BAStore | CAStore | SAStore => {
                let [_, _, array] = self.pop_three()?;
                self.write_through(array);
            }
            AAStore => {
                let [value, _, array] = self.pop_three()?;
                self.escape(value);
                self.write_through(array);
            }

            Pop => {
                self.pop_slots(1)?;
            }
            Pop2 => {
                self.pop_slots(2)?;
            }
            Dup => self.dup(1, 0)?,
            DupX1 => self.dup(1, 1)?,
            DupX2 => self.dup(1, 2)?,
            Dup2 => self.dup(2, 0)?,
            Dup2X1 => self.dup(2, 1)?,
            Dup2X2 => self.dup(2, 2)?,
            Swap => {
                let first = self.pop()?;
                let second = self.pop()?;
                self.push(first);
                self.push(second);
            }

            IAdd | ISub | IMul | IDiv | IRem | IAnd | IOr | IXor | ISh(_) | FAdd | FSub
            | FMul | FDiv | FRem | LCmp | FCmp(_) | DCmp(_) => {
                self.pop_n(2)?;
                self.push(Value::NARROW);
            }
            LAdd | LSub | LMul | LDiv | LRem | LAnd | LOr | LXor | LSh(_) | DAdd | DSub
            | DMul | DDiv | DRem => {
                self.pop_n(2)?;
                self.push(Value::WIDE);
            }
            INeg | FNeg | I2F | L2I | L2F | F2I | D2I | D2F | I2B | I2C | I2S
            | ArrayLength | InstanceOf(_) | NewArray(_) | ANewArray(_) => {
                self.pop()?;
                self.push(Value::NARROW);
            }
            LNeg | DNeg | I2L | I2D | L2D | F2L | F2D | D2L => {
                self.pop()?;
                self.push(Value::WIDE);
            }
            MultiANewArray(_, dimensions) => {
                self.pop_n(*dimensions as usize)?;
                self.push(Value::NARROW);
            }

            If(_, _) | IfNull(_, _) | TableSwitch { .. } | LookupSwitch { .. } => {
                self.pop()?;
            }
            IfICmp(_, _) | IfACmp(_, _) => {
                self.pop_n(2)?;
            }
            Jsr(_) | JsrW(_) => self.push(Value::NARROW),
            MonitorEnter | MonitorExit => {
                self.pop()?;
            }

            IReturn | LReturn | FReturn | DReturn => {
                self.pop()?;
            }
            AReturn | AThrow => {
                let value = self.pop()?;
                self.escape(value);
            }

            GetStatic(index) => {
                let field = constants.lookup_field_ref(*index)?;
                self.push(Value::of_type(&field.descriptor));
            }
            PutStatic(_) => {
                let value = self.pop()?;
                self.escape(value);
                self.summary.modifies_anything = true;
            }
            GetField(index) => {
                let field = constants.lookup_field_ref(*index)?;
                let object = self.pop()?;
                if field.descriptor.is_reference() {
                    self.push(Value::derived(object.params));
                } else {
                    self.push(Value::of_type(&field.descriptor));
                }
            }
            PutField(_) => {
                let value = self.pop()?;
                let object = self.pop()?;
                self.escape(value);
                self.write_through(object);
            }

            Invoke(invoke_type, index) => {
                let callee = constants.lookup_method_ref(*index)?;
                let (no_side_effects, no_external_side_effects) = {
                    let info = callee.optimization_info()?;
                    (info.has_no_side_effects(), info.has_no_external_side_effects())
                };
                let has_this = !matches!(invoke_type, InvokeType::Static);
                self.invoke(
                    &callee.descriptor,
                    has_this,
                    no_side_effects,
                    no_external_side_effects,
                )?;
            }
            InvokeDynamic(index) => {
                let descriptor = constants.lookup_invoke_dynamic(*index)?.clone();
                self.invoke(&descriptor, false, false, false)?;
            }
        }
        Ok(())
    }

    /// Pop `value`, `index`, `array` of an array store (in that order)
    fn pop_three(&mut self) -> Result<[Value; 3], Abort> {
        let value = self.pop()?;
        let index = self.pop()?;
        let array = self.pop()?;
        Ok([value, index, array])
    }
}
