// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use crate::cs::{CSObjId, PointerId};
use crate::model::heap::AllocationSiteBased;
use crate::model::statement::{CallKind, CallSiteId};
use crate::model::ty::TypeId;
use crate::model::Program;
use crate::pts_set::points_to::HybridPointsToSet;
use crate::pts_set::pt_data::PTData;
use crate::util::options::AnalysisOptions;

use self::context_selector::{ContextInsensitive, KCallSiteSensitive, KObjectSensitive};
use self::context_sensitive::ContextSensitivePTA;

pub mod class_initializer;
pub mod context;
pub mod context_selector;
pub mod context_sensitive;
pub mod monitor;
pub mod worklist;

pub type PointsTo = HybridPointsToSet<CSObjId>;
pub type PTDataTy = PTData<PointerId, CSObjId, PointsTo>;

#[derive(Clone, Copy, Debug)]
pub enum PTAType {
    ContextInsensitive,
    CallSiteSensitive,
    ObjectSensitive,
}

pub trait PointerAnalysis {
    fn analyze(&mut self) -> Result<(), AnalysisError>;
}

/// The single failure class of the solver: a call site the program model
/// cannot resolve. This signals a malformed model and aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A receiver-dependent call site of a kind that cannot be dispatched.
    UnresolvableCallSite {
        call_site: CallSiteId,
        kind: CallKind,
    },
    /// Virtual dispatch found no target in the receiver type's hierarchy.
    UnresolvedDispatch {
        call_site: CallSiteId,
        recv_type: TypeId,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::UnresolvableCallSite { call_site, kind } => {
                write!(f, "unresolvable {kind:?} call at {call_site:?}")
            }
            AnalysisError::UnresolvedDispatch { call_site, recv_type } => {
                write!(
                    f,
                    "no dispatch target at {call_site:?} for receiver type {recv_type:?}"
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Runs the analysis selected by the options over a finished program model,
/// with the allocation-site heap abstraction.
pub fn run_analysis(program: &Program, options: &AnalysisOptions) -> Result<(), AnalysisError> {
    let k = options.context_depth as usize;
    let heap_k = options.heap_depth() as usize;
    match options.pta_type {
        PTAType::ContextInsensitive => {
            let mut pta = ContextSensitivePTA::new(
                program,
                options.clone(),
                AllocationSiteBased::new(),
                ContextInsensitive::new(),
            );
            pta.analyze()
        }
        PTAType::CallSiteSensitive => {
            let mut pta = ContextSensitivePTA::new(
                program,
                options.clone(),
                AllocationSiteBased::new(),
                KCallSiteSensitive::with_heap_depth(k, heap_k),
            );
            pta.analyze()
        }
        PTAType::ObjectSensitive => {
            let mut pta = ContextSensitivePTA::new(
                program,
                options.clone(),
                AllocationSiteBased::new(),
                KObjectSensitive::with_heap_depth(k, heap_k),
            );
            pta.analyze()
        }
    }
}
