// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Mutating construction surface for the program model. Front ends (the JSON
//! loader, tests) write through the builder; the solver only ever reads the
//! finished [`Program`].

use crate::model::method::{MethodData, MethodId, VarId, VariableData};
use crate::model::statement::{AllocSite, CallKind, CallSite, CallSiteId, Statement};
use crate::model::ty::{FieldData, FieldId, TypeData, TypeId, TypeKind};
use crate::model::Program;

pub struct ProgramBuilder {
    program: Program,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder {
            program: Program::empty(),
        }
    }

    pub fn finish(self) -> Program {
        self.program
    }

    /// Read access to the model under construction.
    pub fn program_ref(&self) -> &Program {
        &self.program
    }

    pub fn add_class(&mut self, name: &str, super_class: Option<TypeId>) -> TypeId {
        if let Some(sup) = super_class {
            assert!(self.program.types[sup].is_class(), "superclass must be a class");
        }
        self.program.types.push(TypeData {
            name: name.to_string(),
            kind: TypeKind::Class {
                super_class,
                initializer: None,
                methods: Default::default(),
            },
        })
    }

    /// Returns the (interned) array type over `element`.
    pub fn array_type(&mut self, element: TypeId) -> TypeId {
        if let Some(&existing) = self.program.array_types.get(&element) {
            return existing;
        }
        let name = format!("{}[]", self.program.types[element].name);
        let ty = self.program.types.push(TypeData {
            name,
            kind: TypeKind::Array { element },
        });
        self.program.array_types.insert(element, ty);
        ty
    }

    pub fn add_field(&mut self, class: TypeId, name: &str, ty: TypeId) -> FieldId {
        self.program.fields.push(FieldData {
            name: name.to_string(),
            class,
            ty,
            is_static: false,
        })
    }

    pub fn add_static_field(&mut self, class: TypeId, name: &str, ty: TypeId) -> FieldId {
        self.program.fields.push(FieldData {
            name: name.to_string(),
            class,
            ty,
            is_static: true,
        })
    }

    /// Adds an instance method; an implicit `this` variable is created.
    pub fn add_method(&mut self, class: TypeId, name: &str) -> MethodId {
        self.new_method(class, name, false)
    }

    pub fn add_static_method(&mut self, class: TypeId, name: &str) -> MethodId {
        self.new_method(class, name, true)
    }

    fn new_method(&mut self, class: TypeId, name: &str, is_static: bool) -> MethodId {
        let method = self.program.methods.push(MethodData {
            name: name.to_string(),
            class,
            is_static,
            this_var: None,
            params: Vec::new(),
            return_vars: Vec::new(),
            statements: Vec::new(),
        });
        if !is_static {
            let this_var = self
                .program
                .vars
                .push(VariableData::new("this".to_string(), method));
            self.program.methods[method].this_var = Some(this_var);
        }
        match &mut self.program.types[class].kind {
            TypeKind::Class { methods, .. } => {
                let prev = methods.insert(name.to_string(), method);
                assert!(prev.is_none(), "duplicate method signature {name}");
            }
            TypeKind::Array { .. } => panic!("methods can only be declared on classes"),
        }
        method
    }

    pub fn set_class_initializer(&mut self, class: TypeId, method: MethodId) {
        assert!(self.program.methods[method].is_static);
        match &mut self.program.types[class].kind {
            TypeKind::Class { initializer, .. } => *initializer = Some(method),
            TypeKind::Array { .. } => panic!("arrays have no initializer"),
        }
    }

    pub fn add_local(&mut self, method: MethodId, name: &str) -> VarId {
        self.program
            .vars
            .push(VariableData::new(name.to_string(), method))
    }

    pub fn add_param(&mut self, method: MethodId, name: &str) -> VarId {
        let var = self.add_local(method, name);
        self.program.methods[method].params.push(var);
        var
    }

    /// Marks an existing local as (one of) the method's return values.
    pub fn add_return(&mut self, method: MethodId, var: VarId) {
        assert_eq!(self.program.vars[var].method, method);
        self.program.methods[method].return_vars.push(var);
    }

    pub fn add_alloc(&mut self, method: MethodId, var: VarId, ty: TypeId) {
        let ordinal = self
            .program
            .allocations
            .iter()
            .filter(|site| site.method == method)
            .count();
        let site = self.program.allocations.push(AllocSite { method, ty, ordinal });
        self.push_statement(method, Statement::Alloc { var, site });
    }

    pub fn add_assign(&mut self, method: MethodId, from: VarId, to: VarId) {
        self.push_statement(method, Statement::Assign { from, to });
    }

    pub fn add_cast(&mut self, method: MethodId, from: VarId, to: VarId, ty: TypeId) {
        self.push_statement(method, Statement::Cast { from, to, ty });
    }

    pub fn add_instance_load(&mut self, method: MethodId, to: VarId, base: VarId, field: FieldId) {
        self.push_statement(method, Statement::InstanceLoad { to, base, field });
        self.program.vars[base].instance_loads.push((field, to));
    }

    pub fn add_instance_store(&mut self, method: MethodId, base: VarId, field: FieldId, from: VarId) {
        self.push_statement(method, Statement::InstanceStore { base, field, from });
        self.program.vars[base].instance_stores.push((field, from));
    }

    pub fn add_array_load(&mut self, method: MethodId, to: VarId, base: VarId) {
        self.push_statement(method, Statement::ArrayLoad { to, base });
        self.program.vars[base].array_loads.push(to);
    }

    pub fn add_array_store(&mut self, method: MethodId, base: VarId, from: VarId) {
        self.push_statement(method, Statement::ArrayStore { base, from });
        self.program.vars[base].array_stores.push(from);
    }

    pub fn add_static_load(&mut self, method: MethodId, to: VarId, field: FieldId) {
        assert!(self.program.fields[field].is_static);
        self.push_statement(method, Statement::StaticLoad { to, field });
    }

    pub fn add_static_store(&mut self, method: MethodId, field: FieldId, from: VarId) {
        assert!(self.program.fields[field].is_static);
        self.push_statement(method, Statement::StaticStore { field, from });
    }

    pub fn add_call(
        &mut self,
        method: MethodId,
        kind: CallKind,
        callee: MethodId,
        receiver: Option<VarId>,
        args: Vec<VarId>,
        result: Option<VarId>,
    ) -> CallSiteId {
        let call_site = self.program.call_sites.push(CallSite {
            kind,
            callee,
            receiver,
            args,
            result,
            container: method,
        });
        self.push_statement(method, Statement::Call(call_site));
        if let Some(recv) = receiver {
            self.program.vars[recv].receiver_calls.push(call_site);
        }
        call_site
    }

    pub fn add_static_call(
        &mut self,
        method: MethodId,
        callee: MethodId,
        args: Vec<VarId>,
        result: Option<VarId>,
    ) -> CallSiteId {
        self.add_call(method, CallKind::Static, callee, None, args, result)
    }

    pub fn add_virtual_call(
        &mut self,
        method: MethodId,
        receiver: VarId,
        callee: MethodId,
        args: Vec<VarId>,
        result: Option<VarId>,
    ) -> CallSiteId {
        self.add_call(method, CallKind::Virtual, callee, Some(receiver), args, result)
    }

    pub fn add_interface_call(
        &mut self,
        method: MethodId,
        receiver: VarId,
        callee: MethodId,
        args: Vec<VarId>,
        result: Option<VarId>,
    ) -> CallSiteId {
        self.add_call(method, CallKind::Interface, callee, Some(receiver), args, result)
    }

    pub fn add_special_call(
        &mut self,
        method: MethodId,
        receiver: VarId,
        callee: MethodId,
        args: Vec<VarId>,
        result: Option<VarId>,
    ) -> CallSiteId {
        self.add_call(method, CallKind::Special, callee, Some(receiver), args, result)
    }

    pub fn set_entry(&mut self, method: MethodId) {
        self.program.entry = Some(method);
    }

    pub fn add_implicit_entry(&mut self, method: MethodId) {
        self.program.implicit_entries.push(method);
    }

    fn push_statement(&mut self, method: MethodId, statement: Statement) {
        self.program.methods[method].statements.push(statement);
    }
}
