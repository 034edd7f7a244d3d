// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Shared helpers for the solver integration tests.

#![allow(dead_code)]

use cspta::model::heap::AllocationSiteBased;
use cspta::model::Program;
use cspta::pta::context::ContextId;
use cspta::pta::context_selector::{ContextInsensitive, KCallSiteSensitive, KObjectSensitive};
use cspta::pta::context_sensitive::{
    CallSiteSensitivePTA, ContextInsensitivePTA, ContextSensitivePTA, ObjectSensitivePTA,
};
use cspta::pta::PointerAnalysis;
use cspta::util::options::AnalysisOptions;

pub fn run_ci(program: &Program) -> ContextInsensitivePTA<'_, AllocationSiteBased> {
    let mut pta = ContextSensitivePTA::new(
        program,
        AnalysisOptions::default(),
        AllocationSiteBased::new(),
        ContextInsensitive::new(),
    );
    pta.analyze().expect("analysis should reach a fixpoint");
    pta
}

pub fn run_callsite_sensitive(
    program: &Program,
    k: usize,
) -> CallSiteSensitivePTA<'_, AllocationSiteBased> {
    let mut pta = ContextSensitivePTA::new(
        program,
        AnalysisOptions::default(),
        AllocationSiteBased::new(),
        KCallSiteSensitive::new(k),
    );
    pta.analyze().expect("analysis should reach a fixpoint");
    pta
}

pub fn run_object_sensitive(
    program: &Program,
    k: usize,
) -> ObjectSensitivePTA<'_, AllocationSiteBased> {
    let mut pta = ContextSensitivePTA::new(
        program,
        AnalysisOptions::default(),
        AllocationSiteBased::new(),
        KObjectSensitive::new(k),
    );
    pta.analyze().expect("analysis should reach a fixpoint");
    pta
}

/// The context the entry method was analyzed under.
pub fn entry_context<H, S>(pta: &ContextSensitivePTA<'_, H, S>) -> ContextId
where
    H: cspta::model::heap::HeapModel,
    S: cspta::pta::context_selector::ContextSelector,
{
    let entry = pta.call_graph.entry_methods()[0];
    pta.cs_manager().cs_method(entry).cid
}
