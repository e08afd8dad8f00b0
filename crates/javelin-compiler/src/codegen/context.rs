//! Code Generator Context
//!
//! Per-method state: local slots, the label table and operand stack
//! depth tracking. Created at `FUNC_ENTRY`, consumed at `FUNC_EXIT`.

use crate::error::{CompileError, CompileResult};
use crate::ir::{Label, MangledName, Operand};
use crate::options::CompilerOptions;
use javelin_bytecode::{
    access, Code, FieldType, Instruction, LabelId, MethodDef, MethodDescriptor, MethodRef,
    ValueKind, CONSTRUCTOR_NAME,
};
use log::trace;
use rustc_hash::FxHashMap;

/// A local variable slot and the kind of value it currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Slot {
    pub index: u16,
    pub kind: ValueKind,
}

/// Operand stack depth bookkeeping
#[derive(Debug, Default)]
struct StackTracker {
    depth: u16,
    max: u16,
    /// False right after `goto` or a return, until the next label
    unreachable: bool,
    /// Depth expected on entry to each label
    at_label: FxHashMap<LabelId, u16>,
}

/// Context for compiling a single method
pub(super) struct MethodContext {
    /// Name as it appeared in the TAC stream
    source_name: MangledName,
    /// JVM method name
    name: String,
    descriptor: MethodDescriptor,
    access: u16,
    code: Code,
    /// Operand to local slot mapping
    slots: FxHashMap<Operand, Slot>,
    /// Next available local slot
    next_slot: u16,
    /// TAC label to code label mapping, filled lazily
    labels: FxHashMap<Label, LabelId>,
    /// TAC name of each code label; `None` for synthesised labels
    label_names: Vec<Option<Label>>,
    stack: StackTracker,
}

impl MethodContext {
    /// Start a method for `FUNC_ENTRY name descriptor`
    pub(super) fn open(
        name: &MangledName,
        descriptor: &MethodDescriptor,
        options: &CompilerOptions,
    ) -> CompileResult<Self> {
        let mut ctx = Self {
            source_name: name.clone(),
            name: name.member.clone(),
            descriptor: descriptor.clone(),
            access: access::PUBLIC,
            code: Code::new(),
            slots: FxHashMap::default(),
            next_slot: 0,
            labels: FxHashMap::default(),
            label_names: Vec::new(),
            stack: StackTracker::default(),
        };

        match &name.class {
            None if name.member == options.entry_point => {
                if *descriptor != MethodDescriptor::void() {
                    return Err(CompileError::UnsupportedFeature {
                        feature: format!("entry point `{}` with signature {}", name, descriptor),
                    });
                }
                ctx.access |= access::STATIC;
                ctx.descriptor = MethodDescriptor::main();
                ctx.alloc_slot(Operand::local("args"), ValueKind::Reference)?;
            }
            None => ctx.access |= access::STATIC,
            Some(_) if name.is_constructor() => {
                ctx.name = CONSTRUCTOR_NAME.to_string();
                // super() before the body; `this` is pinned to slot 0
                ctx.emit(Instruction::load(ValueKind::Reference, 0));
                ctx.emit(Instruction::InvokeSpecial(MethodRef::new(
                    options.super_class.clone(),
                    CONSTRUCTOR_NAME,
                    MethodDescriptor::void(),
                )));
            }
            Some(_) => {}
        }
        Ok(ctx)
    }

    pub(super) fn source_name(&self) -> &MangledName {
        &self.source_name
    }

    pub(super) fn member_name(&self) -> &str {
        &self.source_name.member
    }

    // ========================================================================
    // Slots
    // ========================================================================

    /// `PARAM_DECL`: parameters take consecutive slots, `this` takes 0
    pub(super) fn declare_param(&mut self, name: &str, ty: &FieldType) -> CompileResult<()> {
        let operand = Operand::local(name);
        if operand.is_this() && self.next_slot != 0 {
            return Err(CompileError::ThisNotFirst);
        }
        if self.slots.contains_key(&operand) {
            return Err(CompileError::DuplicateParameter {
                name: name.to_string(),
            });
        }
        self.alloc_slot(operand, ty.kind())?;
        Ok(())
    }

    /// `max_locals` is a u16, so the last usable index is `u16::MAX - 1`
    fn alloc_slot(&mut self, operand: Operand, kind: ValueKind) -> CompileResult<u16> {
        let index = self.next_slot;
        self.next_slot = index.checked_add(1).ok_or(CompileError::TooManyLocals {
            limit: u16::MAX as usize,
        })?;
        self.slots.insert(operand, Slot { index, kind });
        Ok(index)
    }

    /// Slot of an operand that must already be defined
    pub(super) fn slot(&self, operand: &Operand) -> CompileResult<Slot> {
        self.slots
            .get(operand)
            .copied()
            .ok_or_else(|| CompileError::UnknownLocal {
                name: operand.to_string(),
            })
    }

    /// Push an operand's value
    pub(super) fn load(&mut self, operand: &Operand) -> CompileResult<ValueKind> {
        let slot = self.slot(operand)?;
        self.emit(Instruction::load(slot.kind, slot.index));
        Ok(slot.kind)
    }

    /// Pop the top of stack into an operand, allocating its slot on first
    /// definition
    pub(super) fn store(&mut self, operand: &Operand, kind: ValueKind) -> CompileResult<()> {
        let index = match self.slots.get_mut(operand) {
            Some(slot) => {
                slot.kind = kind;
                slot.index
            }
            None => self.alloc_slot(operand.clone(), kind)?,
        };
        self.emit(Instruction::store(kind, index));
        Ok(())
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// Code label for a TAC label, created on first mention
    pub(super) fn label(&mut self, label: Label) -> LabelId {
        if let Some(&id) = self.labels.get(&label) {
            return id;
        }
        let id = self.code.new_label();
        self.label_names.push(Some(label));
        self.labels.insert(label, id);
        id
    }

    /// Fresh label with no TAC counterpart
    pub(super) fn fresh_label(&mut self) -> LabelId {
        self.label_names.push(None);
        self.code.new_label()
    }

    /// Bind a label at the current position. Returns `false` when it was
    /// already bound.
    pub(super) fn bind(&mut self, label: LabelId) -> bool {
        if !self.code.bind_label(label) {
            return false;
        }
        let stack = &mut self.stack;
        match stack.at_label.get(&label) {
            Some(&depth) if stack.unreachable => stack.depth = depth,
            Some(_) => {}
            None if stack.unreachable => stack.depth = 0,
            None => {}
        }
        stack.unreachable = false;
        stack.at_label.entry(label).or_insert(stack.depth);
        true
    }

    // ========================================================================
    // Emission
    // ========================================================================

    /// Append an instruction, tracking stack depth
    pub(super) fn emit(&mut self, instr: Instruction) {
        let stack = &mut self.stack;
        if stack.unreachable {
            stack.depth = 0;
            stack.unreachable = false;
        }

        let (pops, pushes) = instr.stack_effect();
        stack.depth = stack.depth.saturating_sub(pops) + pushes;
        stack.max = stack.max.max(stack.depth);

        if let Some(target) = instr.branch_target() {
            stack.at_label.entry(target).or_insert(stack.depth);
        }
        if instr.is_terminator() {
            stack.unreachable = true;
        }
        self.code.emit(instr);
    }

    /// Finish the method: add a fallback return if control can reach the
    /// end, check every label was bound, compute frame sizes.
    pub(super) fn finish(mut self) -> CompileResult<MethodDef> {
        let label_at_end = self.code.labels_at(self.code.len()).next().is_some();
        let ends_in_return = self.code.last().is_some_and(Instruction::is_return);
        if label_at_end || !ends_in_return {
            match self.descriptor.ret.as_ref().map(FieldType::kind) {
                None => self.emit(Instruction::Return(None)),
                Some(ValueKind::Primitive) => {
                    self.emit(Instruction::Iconst(0));
                    self.emit(Instruction::Return(Some(ValueKind::Primitive)));
                }
                Some(ValueKind::Reference) => {
                    self.emit(Instruction::AconstNull);
                    self.emit(Instruction::Return(Some(ValueKind::Reference)));
                }
            }
        }

        for (index, name) in self.label_names.iter().enumerate() {
            let id = LabelId::new(index as u32);
            if self.code.label_position(id).is_none() {
                return Err(CompileError::UnboundLabel {
                    label: match name {
                        Some(label) => label.to_string(),
                        None => id.to_string(),
                    },
                });
            }
        }

        trace!(
            "{}: {} slots, {} labels, max stack {}",
            self.source_name,
            self.next_slot,
            self.label_names.len(),
            self.stack.max
        );

        Ok(MethodDef {
            name: self.name,
            descriptor: self.descriptor,
            access: self.access,
            max_stack: self.stack.max,
            max_locals: self.next_slot,
            code: self.code,
        })
    }
}
