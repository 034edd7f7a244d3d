// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::cs::{CSMethod, CSMethodId, CSObj, CSObjId, Pointer, PointerId};
use crate::model::heap::{Obj, ObjId};
use crate::model::method::{MethodId, VarId};
use crate::model::ty::FieldId;
use crate::pta::context::ContextId;
use crate::util::index::IndexVec;

/// The element manager: memoizing constructors for abstract objects,
/// context-sensitive objects, pointers and context-sensitive methods.
///
/// All lookups are idempotent; none can fail.
pub struct CSManager {
    objs: IndexVec<ObjId, Obj>,
    obj_map: HashMap<Obj, ObjId>,

    cs_objs: IndexVec<CSObjId, CSObj>,
    cs_obj_map: HashMap<CSObj, CSObjId>,

    pointers: IndexVec<PointerId, Pointer>,
    pointer_map: HashMap<Pointer, PointerId>,

    cs_methods: IndexVec<CSMethodId, CSMethod>,
    cs_method_map: HashMap<CSMethod, CSMethodId>,
}

impl Default for CSManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CSManager {
    pub fn new() -> Self {
        CSManager {
            objs: IndexVec::new(),
            obj_map: HashMap::new(),
            cs_objs: IndexVec::new(),
            cs_obj_map: HashMap::new(),
            pointers: IndexVec::new(),
            pointer_map: HashMap::new(),
            cs_methods: IndexVec::new(),
            cs_method_map: HashMap::new(),
        }
    }

    /// Interns an abstract object descriptor.
    pub fn get_obj(&mut self, obj: Obj) -> ObjId {
        match self.obj_map.entry(obj) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => *v.insert(self.objs.push(obj)),
        }
    }

    #[inline]
    pub fn obj(&self, id: ObjId) -> Obj {
        self.objs[id]
    }

    pub fn get_cs_obj(&mut self, cid: ContextId, obj: ObjId) -> CSObjId {
        let cs_obj = CSObj { cid, obj };
        match self.cs_obj_map.entry(cs_obj) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => *v.insert(self.cs_objs.push(cs_obj)),
        }
    }

    #[inline]
    pub fn cs_obj(&self, id: CSObjId) -> CSObj {
        self.cs_objs[id]
    }

    /// The runtime type of a context-sensitive object.
    #[inline]
    pub fn cs_obj_type(&self, id: CSObjId) -> crate::model::ty::TypeId {
        self.objs[self.cs_objs[id].obj].ty
    }

    pub fn get_var_pointer(&mut self, cid: ContextId, var: VarId) -> PointerId {
        self.get_pointer(Pointer::Var { cid, var })
    }

    pub fn get_instance_field_pointer(&mut self, base: CSObjId, field: FieldId) -> PointerId {
        self.get_pointer(Pointer::InstanceField { base, field })
    }

    pub fn get_array_index_pointer(&mut self, base: CSObjId) -> PointerId {
        self.get_pointer(Pointer::ArrayIndex { base })
    }

    pub fn get_static_field_pointer(&mut self, field: FieldId) -> PointerId {
        self.get_pointer(Pointer::StaticField { field })
    }

    fn get_pointer(&mut self, pointer: Pointer) -> PointerId {
        match self.pointer_map.entry(pointer) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => *v.insert(self.pointers.push(pointer)),
        }
    }

    #[inline]
    pub fn pointer(&self, id: PointerId) -> Pointer {
        self.pointers[id]
    }

    /// Non-interning lookup, for result queries after the solve.
    pub fn find_pointer(&self, pointer: Pointer) -> Option<PointerId> {
        self.pointer_map.get(&pointer).copied()
    }

    /// Non-interning lookup of a variable pointer.
    pub fn find_var_pointer(&self, cid: ContextId, var: VarId) -> Option<PointerId> {
        self.find_pointer(Pointer::Var { cid, var })
    }

    pub fn get_cs_method(&mut self, cid: ContextId, method: MethodId) -> CSMethodId {
        let cs_method = CSMethod { cid, method };
        match self.cs_method_map.entry(cs_method) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => *v.insert(self.cs_methods.push(cs_method)),
        }
    }

    #[inline]
    pub fn cs_method(&self, id: CSMethodId) -> CSMethod {
        self.cs_methods[id]
    }

    pub fn objs_iter(&self) -> impl Iterator<Item = (ObjId, &Obj)> {
        self.objs.iter_enumerated()
    }

    pub fn cs_objs_iter(&self) -> impl Iterator<Item = (CSObjId, &CSObj)> {
        self.cs_objs.iter_enumerated()
    }

    pub fn pointers_iter(&self) -> impl Iterator<Item = (PointerId, &Pointer)> {
        self.pointers.iter_enumerated()
    }

    pub fn cs_methods_iter(&self) -> impl Iterator<Item = (CSMethodId, &CSMethod)> {
        self.cs_methods.iter_enumerated()
    }

    #[inline]
    pub fn num_pointers(&self) -> usize {
        self.pointers.len()
    }

    #[inline]
    pub fn num_cs_objs(&self) -> usize {
        self.cs_objs.len()
    }
}
