// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::VecDeque;

use crate::cs::{CSCallSite, CSMethodId, PointerId};
use crate::model::statement::CallKind;
use crate::pta::PointsTo;

/// A resolved call awaiting processing.
#[derive(Copy, Clone, Debug)]
pub struct CallEdge {
    pub kind: CallKind,
    pub callsite: CSCallSite,
    pub callee: CSMethodId,
}

/// The fixpoint driver state: pending pointer propagations and pending call
/// edges. The solver is terminal exactly when both queues are empty.
pub struct WorkList {
    pointer_entries: VecDeque<(PointerId, PointsTo)>,
    call_edges: VecDeque<CallEdge>,
}

impl Default for WorkList {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkList {
    pub fn new() -> Self {
        WorkList {
            pointer_entries: VecDeque::new(),
            call_edges: VecDeque::new(),
        }
    }

    #[inline]
    pub fn add_pointer_entry(&mut self, pointer: PointerId, pts: PointsTo) {
        self.pointer_entries.push_back((pointer, pts));
    }

    #[inline]
    pub fn poll_pointer_entry(&mut self) -> Option<(PointerId, PointsTo)> {
        self.pointer_entries.pop_front()
    }

    #[inline]
    pub fn has_pointer_entries(&self) -> bool {
        !self.pointer_entries.is_empty()
    }

    #[inline]
    pub fn add_call_edge(&mut self, edge: CallEdge) {
        self.call_edges.push_back(edge);
    }

    #[inline]
    pub fn poll_call_edge(&mut self) -> Option<CallEdge> {
        self.call_edges.pop_front()
    }

    #[inline]
    pub fn has_call_edges(&self) -> bool {
        !self.call_edges.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pointer_entries.is_empty() && self.call_edges.is_empty()
    }
}
