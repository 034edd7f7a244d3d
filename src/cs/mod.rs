// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Canonicalization of context-sensitive analysis entities.
//!
//! For a given (context, element) pair the manager returns the same index on
//! every lookup for the whole run. Propagated deltas therefore always update
//! a single shared points-to set instead of diverging copies.

pub mod manager;

pub use manager::CSManager;

use crate::model::heap::ObjId;
use crate::model::method::{MethodId, VarId};
use crate::model::statement::CallSiteId;
use crate::model::ty::FieldId;
use crate::pta::context::ContextId;
use crate::util::index::new_index_type;

new_index_type! {
    /// A canonicalized (context, object) pair.
    pub struct CSObjId;
}

new_index_type! {
    /// A canonicalized pointer; see [`Pointer`] for the variants.
    pub struct PointerId;
}

new_index_type! {
    /// A canonicalized (context, method) pair.
    pub struct CSMethodId;
}

/// One analysis-time "instance": an abstract object under a heap context.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CSObj {
    pub cid: ContextId,
    pub obj: ObjId,
}

/// A method analyzed under a calling context.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CSMethod {
    pub cid: ContextId,
    pub method: MethodId,
}

/// A call site occurring under the calling context of its container method.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CSCallSite {
    pub cid: ContextId,
    pub call_site: CallSiteId,
}

/// Everything that owns a points-to set.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Pointer {
    /// A local variable under a calling context.
    Var { cid: ContextId, var: VarId },
    /// An instance field of a specific abstract object.
    InstanceField { base: CSObjId, field: FieldId },
    /// The synthetic element location of a specific array object.
    ArrayIndex { base: CSObjId },
    /// A global static field.
    StaticField { field: FieldId },
}

impl Pointer {
    /// The (context, variable) pair if this is a variable pointer.
    #[inline]
    pub fn as_var(self) -> Option<(ContextId, VarId)> {
        match self {
            Pointer::Var { cid, var } => Some((cid, var)),
            _ => None,
        }
    }
}
