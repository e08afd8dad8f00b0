//! Method signature table
//!
//! Built once per compilation unit from every class and function
//! declaration, before any body is lowered, so calls can refer to
//! methods declared later in the source.

use crate::ast::{FunctionDecl, Program};
use crate::error::{CompileError, CompileResult};
use javelin_bytecode::{FieldType, MethodDescriptor, ValueKind, CONSTRUCTOR_NAME};
use rustc_hash::{FxHashMap, FxHashSet};

/// class name -> member name -> descriptor
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    main_class: String,
    entry_point: String,
    classes: FxHashSet<String>,
    methods: FxHashMap<String, FxHashMap<String, MethodDescriptor>>,
}

impl SignatureTable {
    /// Scan all declarations of `program`. The top-level function named
    /// `entry_point` must be `void` with no parameters, since it is emitted
    /// as `main([Ljava/lang/String;)V`.
    pub fn build(program: &Program, main_class: &str, entry_point: &str) -> CompileResult<Self> {
        let mut table = Self {
            main_class: main_class.to_string(),
            entry_point: entry_point.to_string(),
            classes: program.classes().map(|c| c.name.clone()).collect(),
            methods: FxHashMap::default(),
        };

        for class in program.classes() {
            for method in &class.methods {
                let is_constructor = class.is_constructor(method);
                let descriptor = table
                    .describe(method, is_constructor)
                    .map_err(|e| e.in_method(&class.name, &method.name))?;
                table.insert(&class.name, &method.name, descriptor);
            }
        }

        for function in program.functions() {
            let descriptor = table
                .describe(function, false)
                .map_err(|e| e.in_method(main_class, &function.name))?;
            if function.name == entry_point && descriptor != MethodDescriptor::void() {
                return Err(CompileError::UnsupportedFeature {
                    feature: format!("entry point `{}` with signature {}", entry_point, descriptor),
                }
                .in_method(main_class, &function.name));
            }
            table.insert(main_class, &function.name, descriptor);
        }

        Ok(table)
    }

    fn insert(&mut self, owner: &str, member: &str, descriptor: MethodDescriptor) {
        self.methods
            .entry(owner.to_string())
            .or_default()
            .insert(member.to_string(), descriptor);
    }

    /// Descriptor of a declaration. Constructors always return `V`.
    pub fn describe(&self, function: &FunctionDecl, is_constructor: bool) -> CompileResult<MethodDescriptor> {
        let params = function
            .params
            .iter()
            .map(|p| self.field_type(&p.ty))
            .collect::<CompileResult<Vec<_>>>()?;
        let ret = if is_constructor {
            None
        } else {
            self.return_type(&function.return_type)?
        };
        Ok(MethodDescriptor::new(params, ret))
    }

    /// Class receiving top-level functions
    pub fn main_class(&self) -> &str {
        &self.main_class
    }

    /// Whether an unqualified call to `member` targets the entry point
    pub fn is_entry_point(&self, member: &str) -> bool {
        member == self.entry_point
    }

    /// Whether `name` is a declared class
    pub fn is_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Whether `owner` declares `member`
    pub fn has_method(&self, owner: &str, member: &str) -> bool {
        self.methods
            .get(owner)
            .is_some_and(|members| members.contains_key(member))
    }

    /// Descriptor of `owner.member`
    pub fn method(&self, owner: &str, member: &str) -> CompileResult<&MethodDescriptor> {
        self.methods
            .get(owner)
            .and_then(|members| members.get(member))
            .ok_or_else(|| CompileError::MissingDescriptor {
                owner: owner.to_string(),
                member: member.to_string(),
            })
    }

    /// Constructor descriptor of `class`; `()V` when the class declares
    /// no constructor
    pub fn constructor(&self, class: &str) -> CompileResult<MethodDescriptor> {
        if let Ok(descriptor) = self.method(class, class) {
            return Ok(descriptor.clone());
        }
        if self.is_class(class) {
            Ok(MethodDescriptor::void())
        } else {
            Err(CompileError::MissingDescriptor {
                owner: class.to_string(),
                member: CONSTRUCTOR_NAME.to_string(),
            })
        }
    }

    /// Descriptor of a source type used as a field, parameter or local
    pub fn field_type(&self, ty: &str) -> CompileResult<FieldType> {
        match ty {
            "int" => Ok(FieldType::Int),
            "boolean" => Ok(FieldType::Boolean),
            "String" => Ok(FieldType::string()),
            class if self.is_class(class) => Ok(FieldType::object(class)),
            other => Err(CompileError::UnsupportedType {
                name: other.to_string(),
            }),
        }
    }

    /// Descriptor of a return type; `None` for void
    pub fn return_type(&self, ty: &str) -> CompileResult<Option<FieldType>> {
        match ty {
            "void" => Ok(None),
            other => self.field_type(other).map(Some),
        }
    }

    /// Slot kind of values of a source type; the null type is a reference
    pub fn value_kind(&self, ty: &str) -> CompileResult<ValueKind> {
        match ty {
            "null" => Ok(ValueKind::Reference),
            other => Ok(self.field_type(other)?.kind()),
        }
    }
}
