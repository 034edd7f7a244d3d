// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Lifecycle hooks for observers of the analysis. Hooks are
//! notification-only: observers receive copies of ids and read-only views
//! and must not feed anything back into the solver.

use crate::cs::{CSMethod, Pointer};
use crate::model::method::MethodId;
use crate::pta::PointsTo;

#[allow(unused_variables)]
pub trait AnalysisMonitor {
    /// Fired once the entry points have been seeded.
    fn signal_initialization(&mut self) {}

    /// Fired when a method becomes reachable for the first time, in any
    /// context.
    fn signal_new_method(&mut self, method: MethodId) {}

    /// Fired when a (context, method) pair becomes reachable.
    fn signal_new_cs_method(&mut self, cs_method: CSMethod) {}

    /// Fired when a variable pointer's points-to set grows; `delta` holds
    /// exactly the newly added objects.
    fn signal_new_points_to(&mut self, pointer: Pointer, delta: &PointsTo) {}

    /// Fired when the fixpoint has been reached.
    fn signal_finish(&mut self) {}
}
