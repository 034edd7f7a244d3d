// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use crate::model::statement::{CallSiteId, Statement};
use crate::model::ty::{FieldId, TypeId};
use crate::util::index::new_index_type;

new_index_type! {
    /// The unique identifier for each method.
    pub struct MethodId;
}

new_index_type! {
    /// The unique identifier for each local variable (including parameters,
    /// `this` and return-value variables).
    pub struct VarId;
}

pub struct MethodData {
    /// The signature the dispatch tables are keyed by, e.g. `m`.
    pub name: String,
    /// The declaring class.
    pub class: TypeId,
    pub is_static: bool,
    /// The implicit receiver variable of an instance method.
    pub this_var: Option<VarId>,
    pub params: Vec<VarId>,
    pub return_vars: Vec<VarId>,
    pub statements: Vec<Statement>,
}

/// A local variable together with the indexes of the statements whose effect
/// depends on what the variable points to. The receiver-dependent transfer
/// rules of the solver replay exactly these lists against each points-to
/// delta of the variable, which is what keeps them incremental.
pub struct VariableData {
    pub name: String,
    /// The declaring method.
    pub method: MethodId,
    /// Instance loads `to = self.field` with this variable as the base.
    pub instance_loads: Vec<(FieldId, VarId)>,
    /// Instance stores `self.field = from` with this variable as the base.
    pub instance_stores: Vec<(FieldId, VarId)>,
    /// Array loads `to = self[*]` with this variable as the base.
    pub array_loads: Vec<VarId>,
    /// Array stores `self[*] = from` with this variable as the base.
    pub array_stores: Vec<VarId>,
    /// Call sites with this variable as the receiver.
    pub receiver_calls: Vec<CallSiteId>,
}

impl VariableData {
    pub fn new(name: String, method: MethodId) -> Self {
        VariableData {
            name,
            method,
            instance_loads: Vec::new(),
            instance_stores: Vec::new(),
            array_loads: Vec::new(),
            array_stores: Vec::new(),
            receiver_calls: Vec::new(),
        }
    }
}
