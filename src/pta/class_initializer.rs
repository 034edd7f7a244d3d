// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Lazy static-initialization ordering.
//!
//! Initialization is two-phase: the whole superclass chain is *marked*
//! initialized first, then the collected initializer methods are processed
//! top-down. An initializer may transitively re-trigger initialization of
//! its own type; the mark set makes that a no-op instead of a recursion.

use std::collections::HashSet;

use crate::model::method::MethodId;
use crate::model::statement::{CallKind, Statement};
use crate::model::ty::TypeId;
use crate::model::Program;

pub struct ClassInitializer {
    /// Set of types that have been initialized.
    initialized: HashSet<TypeId>,
}

impl Default for ClassInitializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassInitializer {
    pub fn new() -> Self {
        ClassInitializer {
            initialized: HashSet::new(),
        }
    }

    #[inline]
    pub fn is_initialized(&self, ty: TypeId) -> bool {
        self.initialized.contains(&ty)
    }

    /// Marks `ty` and its superclass chain initialized, collecting into
    /// `pending` the initializer methods that still need processing, in
    /// superclass-first order. A type without an initializer is still
    /// marked.
    pub fn enqueue_initializers(
        &mut self,
        program: &Program,
        ty: TypeId,
        pending: &mut Vec<MethodId>,
    ) {
        if self.initialized.contains(&ty) {
            return;
        }
        if let Some(sup) = program.super_class(ty) {
            self.enqueue_initializers(program, sup, pending);
        }
        self.initialized.insert(ty);
        if let Some(clinit) = program.class_initializer(ty) {
            pending.push(clinit);
        }
    }
}

/// The type whose initialization a statement triggers, if any: allocations
/// (of a class, or of an array's base class), static calls, and static
/// field accesses.
pub fn initialization_trigger(program: &Program, stmt: &Statement) -> Option<TypeId> {
    match *stmt {
        Statement::Alloc { site, .. } => {
            let ty = program.alloc_site(site).ty;
            if program.type_data(ty).is_class() {
                Some(ty)
            } else {
                program.array_base_class(ty)
            }
        }
        Statement::Call(call_site) => {
            let cs = program.call_site(call_site);
            if cs.kind == CallKind::Static {
                Some(program.method(cs.callee).class)
            } else {
                None
            }
        }
        Statement::StaticLoad { field, .. } | Statement::StaticStore { field, .. } => {
            Some(program.field(field).class)
        }
        _ => None,
    }
}
