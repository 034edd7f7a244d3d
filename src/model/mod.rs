// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The abstract program model the analysis consumes: types, methods,
//! variables, fields, statements, call sites and allocation sites, all held
//! in arena tables owned by one [`Program`] value.
//!
//! The model also carries the two resolution services the solver relies on
//! but does not own: dispatch resolution and the assignability predicate.

use std::collections::HashMap;

use crate::util::index::IndexVec;

pub mod builder;
pub mod heap;
pub mod loader;
pub mod method;
pub mod statement;
pub mod ty;

pub use builder::ProgramBuilder;
pub use method::{MethodData, MethodId, VarId, VariableData};
pub use statement::{AllocId, AllocSite, CallKind, CallSite, CallSiteId, Statement};
pub use ty::{FieldData, FieldId, TypeData, TypeId, TypeKind};

pub struct Program {
    pub(crate) types: IndexVec<TypeId, TypeData>,
    pub(crate) methods: IndexVec<MethodId, MethodData>,
    pub(crate) vars: IndexVec<VarId, VariableData>,
    pub(crate) fields: IndexVec<FieldId, FieldData>,
    pub(crate) call_sites: IndexVec<CallSiteId, CallSite>,
    pub(crate) allocations: IndexVec<AllocId, AllocSite>,
    /// Interning map from element type to its array type.
    pub(crate) array_types: HashMap<TypeId, TypeId>,
    pub(crate) entry: Option<MethodId>,
    pub(crate) implicit_entries: Vec<MethodId>,
}

impl Program {
    pub(crate) fn empty() -> Self {
        Program {
            types: IndexVec::new(),
            methods: IndexVec::new(),
            vars: IndexVec::new(),
            fields: IndexVec::new(),
            call_sites: IndexVec::new(),
            allocations: IndexVec::new(),
            array_types: HashMap::new(),
            entry: None,
            implicit_entries: Vec::new(),
        }
    }

    #[inline]
    pub fn type_data(&self, ty: TypeId) -> &TypeData {
        &self.types[ty]
    }

    #[inline]
    pub fn method(&self, method: MethodId) -> &MethodData {
        &self.methods[method]
    }

    #[inline]
    pub fn variable(&self, var: VarId) -> &VariableData {
        &self.vars[var]
    }

    #[inline]
    pub fn field(&self, field: FieldId) -> &FieldData {
        &self.fields[field]
    }

    #[inline]
    pub fn call_site(&self, call_site: CallSiteId) -> &CallSite {
        &self.call_sites[call_site]
    }

    #[inline]
    pub fn alloc_site(&self, alloc: AllocId) -> &AllocSite {
        &self.allocations[alloc]
    }

    #[inline]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn methods_iter(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.methods.indices()
    }

    pub fn super_class(&self, ty: TypeId) -> Option<TypeId> {
        match self.types[ty].kind {
            TypeKind::Class { super_class, .. } => super_class,
            TypeKind::Array { .. } => None,
        }
    }

    pub fn class_initializer(&self, ty: TypeId) -> Option<MethodId> {
        match self.types[ty].kind {
            TypeKind::Class { initializer, .. } => initializer,
            TypeKind::Array { .. } => None,
        }
    }

    /// The element type of an array type.
    pub fn element_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.types[ty].kind {
            TypeKind::Array { element } => Some(element),
            TypeKind::Class { .. } => None,
        }
    }

    /// The innermost class type under an arbitrarily nested array type.
    pub fn array_base_class(&self, ty: TypeId) -> Option<TypeId> {
        let mut cur = ty;
        while let TypeKind::Array { element } = self.types[cur].kind {
            cur = element;
        }
        if self.types[cur].is_class() {
            Some(cur)
        } else {
            None
        }
    }

    /// The assignability predicate: can a value of type `from` be stored
    /// into a location of type `to`? Covers reflexivity, superclass
    /// widening, array covariance, and array-to-root-class widening.
    pub fn can_assign(&self, from: TypeId, to: TypeId) -> bool {
        if from == to {
            return true;
        }
        match (&self.types[from].kind, &self.types[to].kind) {
            (TypeKind::Class { .. }, TypeKind::Class { .. }) => self.is_subclass(from, to),
            (TypeKind::Array { element: e1 }, TypeKind::Array { element: e2 }) => {
                self.can_assign(*e1, *e2)
            }
            (TypeKind::Array { .. }, TypeKind::Class { .. }) => self.is_root_class(to),
            (TypeKind::Class { .. }, TypeKind::Array { .. }) => false,
        }
    }

    fn is_subclass(&self, sub: TypeId, sup: TypeId) -> bool {
        let mut cur = Some(sub);
        while let Some(t) = cur {
            if t == sup {
                return true;
            }
            cur = self.super_class(t);
        }
        false
    }

    fn is_root_class(&self, ty: TypeId) -> bool {
        self.types[ty].is_class() && self.super_class(ty).is_none()
    }

    /// Resolves a virtual or interface call against the runtime type of the
    /// receiver object: walk the superclass chain of `recv_ty` and return
    /// the first method matching the declared target's signature.
    pub fn resolve_virtual_call(&self, recv_ty: TypeId, declared: MethodId) -> Option<MethodId> {
        let sig = &self.methods[declared].name;
        // Array objects dispatch through the declared target's class chain.
        let mut cur = if self.types[recv_ty].is_array() {
            Some(self.methods[declared].class)
        } else {
            Some(recv_ty)
        };
        while let Some(t) = cur {
            if let TypeKind::Class { methods, super_class, .. } = &self.types[t].kind {
                if let Some(&m) = methods.get(sig) {
                    return Some(m);
                }
                cur = *super_class;
            } else {
                break;
            }
        }
        None
    }

    /// Resolves a special call: statically bound to the declared target.
    pub fn resolve_special_call(&self, call_site: CallSiteId) -> MethodId {
        self.call_sites[call_site].callee
    }

    /// Overrides the designated entry method.
    pub fn set_entry_point(&mut self, method: MethodId) {
        self.entry = Some(method);
    }

    /// The analysis entry methods: the designated entry, plus the implicit
    /// entries when requested.
    pub fn entry_points(&self, with_implicit: bool) -> Vec<MethodId> {
        let mut entries = Vec::new();
        if let Some(entry) = self.entry {
            entries.push(entry);
        }
        if with_implicit {
            entries.extend(self.implicit_entries.iter().copied());
        }
        entries
    }

    /// A printable `Class.method` name.
    pub fn method_name(&self, method: MethodId) -> String {
        let data = &self.methods[method];
        format!("{}.{}", self.types[data.class].name, data.name)
    }

    /// A printable `Class.method/var` name.
    pub fn var_name(&self, var: VarId) -> String {
        let data = &self.vars[var];
        format!("{}/{}", self.method_name(data.method), data.name)
    }

    /// Looks up a method by its `Class.method` name.
    pub fn find_method(&self, qualified: &str) -> Option<MethodId> {
        self.methods
            .indices()
            .find(|&m| self.method_name(m) == qualified)
    }
}
