// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::model::method::MethodId;
use crate::util::index::new_index_type;

new_index_type! {
    /// The unique identifier for each type in the program model.
    pub struct TypeId;
}

new_index_type! {
    /// The unique identifier for each field (instance or static).
    pub struct FieldId;
}

pub struct TypeData {
    pub name: String,
    pub kind: TypeKind,
}

pub enum TypeKind {
    Class {
        super_class: Option<TypeId>,
        /// The static-initialization method, if the class declares one.
        initializer: Option<MethodId>,
        /// Methods declared directly on this class, keyed by signature.
        /// Dispatch walks the superclass chain through these tables.
        methods: HashMap<String, MethodId>,
    },
    Array {
        element: TypeId,
    },
}

impl TypeData {
    #[inline]
    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class { .. })
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }
}

pub struct FieldData {
    pub name: String,
    /// The class declaring this field.
    pub class: TypeId,
    /// The declared type of the stored value.
    pub ty: TypeId,
    pub is_static: bool,
}
