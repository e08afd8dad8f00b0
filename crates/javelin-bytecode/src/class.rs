//! Class output units
//!
//! A [`ClassFile`] is the finished form of one source class: its fields,
//! its methods with their code, and the constant pool the code refers to.

use crate::constants::ConstantPool;
use crate::descriptor::{FieldType, MethodDescriptor, OBJECT_CLASS};
use crate::opcode::{Instruction, LabelId};

/// Access flags
pub mod access {
    /// ACC_PUBLIC
    pub const PUBLIC: u16 = 0x0001;
    /// ACC_STATIC
    pub const STATIC: u16 = 0x0008;
}

/// Name of instance initialisers
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// A compiled class
#[derive(Debug, Clone)]
pub struct ClassFile {
    /// Internal class name
    pub name: String,
    /// Internal name of the super class
    pub super_name: String,
    /// Access flags
    pub access: u16,
    /// Field definitions
    pub fields: Vec<FieldDef>,
    /// Method definitions
    pub methods: Vec<MethodDef>,
    /// Constant pool
    pub constants: ConstantPool,
}

impl ClassFile {
    /// Create an empty public class extending `java/lang/Object`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: OBJECT_CLASS.to_string(),
            access: access::PUBLIC,
            fields: Vec::new(),
            methods: Vec::new(),
            constants: ConstantPool::new(),
        }
    }

    /// First method with the given name
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Method with the given name and descriptor
    pub fn find_method(&self, name: &str, descriptor: &MethodDescriptor) -> Option<&MethodDef> {
        self.methods
            .iter()
            .find(|m| m.name == name && &m.descriptor == descriptor)
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether any constructor is defined
    pub fn has_constructor(&self) -> bool {
        self.methods.iter().any(MethodDef::is_constructor)
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field descriptor
    pub descriptor: FieldType,
    /// Access flags
    pub access: u16,
}

impl FieldDef {
    /// Create a public field
    pub fn new(name: impl Into<String>, descriptor: FieldType) -> Self {
        Self {
            name: name.into(),
            descriptor,
            access: access::PUBLIC,
        }
    }
}

/// Method definition
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Simple name (`<init>` for constructors)
    pub name: String,
    /// Method descriptor
    pub descriptor: MethodDescriptor,
    /// Access flags
    pub access: u16,
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local slots
    pub max_locals: u16,
    /// Method body
    pub code: Code,
}

impl MethodDef {
    /// Whether this is an instance initialiser
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// Whether the method has the static flag
    pub fn is_static(&self) -> bool {
        self.access & access::STATIC != 0
    }
}

/// Method body: instructions plus the positions labels are bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    /// Instructions in emission order
    pub instructions: Vec<Instruction>,
    labels: Vec<Option<usize>>,
}

impl Code {
    /// Create empty code
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction
    pub fn emit(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Allocate an unbound label
    pub fn new_label(&mut self) -> LabelId {
        let id = LabelId::new(self.labels.len() as u32);
        self.labels.push(None);
        id
    }

    /// Bind `label` to the next emitted instruction. Returns `false` if
    /// the label was already bound or was never allocated.
    pub fn bind_label(&mut self, label: LabelId) -> bool {
        let position = self.instructions.len();
        match self.labels.get_mut(label.index()) {
            Some(slot @ None) => {
                *slot = Some(position);
                true
            }
            _ => false,
        }
    }

    /// Instruction index a label is bound to
    pub fn label_position(&self, label: LabelId) -> Option<usize> {
        self.labels.get(label.index()).copied().flatten()
    }

    /// Number of allocated labels
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Labels bound at instruction index `position`
    pub fn labels_at(&self, position: usize) -> impl Iterator<Item = LabelId> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, p)| **p == Some(position))
            .map(|(i, _)| LabelId::new(i as u32))
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether no instruction was emitted
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Last emitted instruction
    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Byte offset of every instruction, plus the total length as the
    /// final entry
    pub fn byte_offsets(&self) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(self.instructions.len() + 1);
        let mut offset = 0;
        for instr in &self.instructions {
            offsets.push(offset);
            offset += instr.size();
        }
        offsets.push(offset);
        offsets
    }

    /// Encoded code length in bytes
    pub fn byte_len(&self) -> u32 {
        self.instructions.iter().map(Instruction::size).sum()
    }

    /// Relative byte displacement of the branch at instruction `index`
    pub fn branch_offset(&self, index: usize) -> Option<i32> {
        let target = self.instructions.get(index)?.branch_target()?;
        let target_pos = self.label_position(target)?;
        let offsets = self.byte_offsets();
        Some(offsets[target_pos] as i32 - offsets[index] as i32)
    }
}
