// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The closed set of statement kinds the solver interprets. The original
//! statement hierarchy is a visitor over classes; here it is a plain sum type
//! with exhaustive matching.

use crate::model::method::{MethodId, VarId};
use crate::model::ty::{FieldId, TypeId};
use crate::util::index::new_index_type;

new_index_type! {
    /// The unique identifier for each call site.
    pub struct CallSiteId;
}

new_index_type! {
    /// The unique identifier for each allocation site.
    pub struct AllocId;
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Statement {
    /// `var = new T`
    Alloc { var: VarId, site: AllocId },
    /// `to = from`
    Assign { from: VarId, to: VarId },
    /// `to = (T) from`
    Cast { from: VarId, to: VarId, ty: TypeId },
    /// `to = base.field`
    InstanceLoad { to: VarId, base: VarId, field: FieldId },
    /// `base.field = from`
    InstanceStore { base: VarId, field: FieldId, from: VarId },
    /// `to = base[*]`
    ArrayLoad { to: VarId, base: VarId },
    /// `base[*] = from`
    ArrayStore { base: VarId, from: VarId },
    /// `to = T.field`
    StaticLoad { to: VarId, field: FieldId },
    /// `T.field = from`
    StaticStore { field: FieldId, from: VarId },
    /// Any call; the payload lives in the call-site table.
    Call(CallSiteId),
}

/// How a call site selects its target.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CallKind {
    /// Resolved at statement-processing time, no receiver involved.
    Static,
    /// Dispatched on the runtime type of each receiver object.
    Virtual,
    /// Dispatched like a virtual call, through an interface-declared target.
    Interface,
    /// Statically bound to the declared target (constructors, private and
    /// super calls), but still receiver-seeded per call edge.
    Special,
}

pub struct CallSite {
    pub kind: CallKind,
    /// The declared target. For virtual/interface calls its signature is what
    /// dispatch resolves against; for static/special calls it is the callee.
    pub callee: MethodId,
    pub receiver: Option<VarId>,
    pub args: Vec<VarId>,
    /// The left-hand side receiving the return value, if any.
    pub result: Option<VarId>,
    /// The method containing this call site.
    pub container: MethodId,
}

/// An allocation site: `ordinal`-th allocation within `method`, creating a
/// value of type `ty`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct AllocSite {
    pub method: MethodId,
    pub ty: TypeId,
    pub ordinal: usize,
}
