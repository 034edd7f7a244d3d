// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The fixpoint solver: worklist-driven propagation over the pointer flow
//! graph, with on-the-fly call graph construction.

use std::collections::HashSet;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Instant;

use log::*;

use crate::cs::{CSCallSite, CSManager, CSMethod, CSMethodId, CSObj, Pointer, PointerId};
use crate::graph::call_graph::OnFlyCallGraph;
use crate::graph::pointer_flow::{PFGEdgeKind, PointerFlowGraph};
use crate::model::heap::{HeapModel, ObjId};
use crate::model::method::{MethodId, VarId};
use crate::model::statement::{CallKind, CallSiteId, Statement};
use crate::model::ty::TypeId;
use crate::model::Program;
use crate::pta::class_initializer::{initialization_trigger, ClassInitializer};
use crate::pta::context::ContextId;
use crate::pta::context_selector::{
    ContextInsensitive, ContextSelector, KCallSiteSensitive, KObjectSensitive,
};
use crate::pta::monitor::AnalysisMonitor;
use crate::pta::worklist::{CallEdge, WorkList};
use crate::pta::{AnalysisError, PTDataTy, PointerAnalysis, PointsTo};
use crate::pts_set::points_to::{HybridPointsToSet, PointsToSet};
use crate::util::options::AnalysisOptions;
use crate::util::{pta_statistics, results_dumper};

pub type ContextInsensitivePTA<'pta, H> = ContextSensitivePTA<'pta, H, ContextInsensitive>;
pub type CallSiteSensitivePTA<'pta, H> = ContextSensitivePTA<'pta, H, KCallSiteSensitive>;
pub type ObjectSensitivePTA<'pta, H> = ContextSensitivePTA<'pta, H, KObjectSensitive>;

pub struct ContextSensitivePTA<'pta, H: HeapModel, S: ContextSelector> {
    /// The program under analysis; read-only for the whole run.
    program: &'pta Program,
    options: AnalysisOptions,
    heap_model: H,
    ctx_selector: S,

    /// Canonical tables for context-sensitive entities.
    pub(crate) csm: CSManager,
    /// Pointer flow graph.
    pub(crate) pfg: PointerFlowGraph,
    /// Call graph.
    pub call_graph: OnFlyCallGraph,
    /// Points-to data.
    pub(crate) pt_data: PTDataTy,

    worklist: WorkList,

    /// Records the context-sensitive methods whose statements have been
    /// processed.
    processed_methods: HashSet<CSMethodId>,
    /// Records the methods already scanned for initialization triggers,
    /// regardless of context.
    reachable_methods: HashSet<MethodId>,

    class_initializer: ClassInitializer,

    monitors: Vec<Box<dyn AnalysisMonitor>>,
}

impl<'pta, H: HeapModel, S: ContextSelector> Debug for ContextSensitivePTA<'pta, H, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        "ContextSensitivePTA".fmt(f)
    }
}

/// Constructor
impl<'pta, H: HeapModel, S: ContextSelector> ContextSensitivePTA<'pta, H, S> {
    pub fn new(
        program: &'pta Program,
        options: AnalysisOptions,
        heap_model: H,
        ctx_selector: S,
    ) -> Self {
        ContextSensitivePTA {
            program,
            options,
            heap_model,
            ctx_selector,
            csm: CSManager::new(),
            pfg: PointerFlowGraph::new(),
            call_graph: OnFlyCallGraph::new(),
            pt_data: PTDataTy::new(),
            worklist: WorkList::new(),
            processed_methods: HashSet::new(),
            reachable_methods: HashSet::new(),
            class_initializer: ClassInitializer::new(),
            monitors: Vec::new(),
        }
    }

    pub fn add_monitor(&mut self, monitor: Box<dyn AnalysisMonitor>) {
        self.monitors.push(monitor);
    }

    /// Initialize the analysis: seed the entry points.
    pub fn initialize(&mut self) {
        if self.options.pre_build_model {
            info!("#methods: {}", self.program.method_count());
        }
        let default_ctx = self.ctx_selector.default_context();
        for entry in self
            .program
            .entry_points(self.options.analyze_implicit_entries)
        {
            let entry_class = self.program.method(entry).class;
            self.initialize_class(entry_class);
            let cs_entry = self.csm.get_cs_method(default_ctx, entry);
            self.call_graph.add_entry_method(cs_entry);
            self.process_new_cs_method(cs_entry);
        }
        for monitor in &mut self.monitors {
            monitor.signal_initialization();
        }
    }

    /// Processes worklist entries until the worklist is empty.
    pub fn solve(&mut self) -> Result<(), AnalysisError> {
        while !self.worklist.is_empty() {
            while let Some((pointer, pts)) = self.worklist.poll_pointer_entry() {
                let diff = self.propagate(pointer, &pts);
                if diff.is_empty() {
                    continue;
                }
                if let Some((cid, var)) = self.csm.pointer(pointer).as_var() {
                    self.process_instance_store(cid, var, &diff);
                    self.process_instance_load(cid, var, &diff);
                    self.process_array_store(cid, var, &diff);
                    self.process_array_load(cid, var, &diff);
                    self.process_call(cid, var, &diff)?;
                    let pointer = self.csm.pointer(pointer);
                    for monitor in &mut self.monitors {
                        monitor.signal_new_points_to(pointer, &diff);
                    }
                }
            }
            while let Some(edge) = self.worklist.poll_call_edge() {
                self.process_call_edge(edge);
            }
        }
        Ok(())
    }

    /// Propagates `pts` into pt(pointer) and onwards to the PFG successors;
    /// returns the subset of `pts` that was actually new.
    fn propagate(&mut self, pointer: PointerId, pts: &PointsTo) -> PointsTo {
        if self.options.verbose_propagation {
            debug!("Propagate {:?} to {:?}", pts, self.csm.pointer(pointer));
        }
        let mut diff = PointsTo::new();
        for obj in pts.iter() {
            if self.pt_data.add_pts(pointer, obj) {
                diff.insert(obj);
            }
        }
        if !diff.is_empty() {
            let out_edges: Vec<_> = self.pfg.out_edges_of(pointer).collect();
            for (to, _, filter) in out_edges {
                match filter {
                    // Only assignable objects may pass a filtered edge.
                    Some(ty) => {
                        let assignable = self.get_assignable_pts(&diff, ty);
                        if !assignable.is_empty() {
                            self.worklist.add_pointer_entry(to, assignable);
                        }
                    }
                    None => self.worklist.add_pointer_entry(to, diff.clone()),
                }
            }
        }
        diff
    }

    /// Given a points-to set and a type, returns the objects of the set
    /// whose type can be assigned to it.
    fn get_assignable_pts(&self, pts: &PointsTo, ty: TypeId) -> PointsTo {
        let mut result = PointsTo::new();
        for obj in pts.iter() {
            if self.program.can_assign(self.csm.cs_obj_type(obj), ty) {
                result.insert(obj);
            }
        }
        result
    }

    /// Adds an edge "from -> to" to the PFG. A newly inserted edge replays
    /// the source's existing points-to set (filtered if a filter is given);
    /// a duplicate edge has no effect.
    fn add_pfg_edge(
        &mut self,
        from: PointerId,
        to: PointerId,
        kind: PFGEdgeKind,
        filter: Option<TypeId>,
    ) {
        if self.pfg.add_edge(from, to, kind, filter) {
            let primed = match self.pt_data.get_pts(from) {
                Some(set) => match filter {
                    Some(ty) => self.get_assignable_pts(set, ty),
                    None => set.clone(),
                },
                None => return,
            };
            if !primed.is_empty() {
                self.worklist.add_pointer_entry(to, primed);
            }
        }
    }

    /// Processes a newly reachable context-sensitive method: its statements
    /// are visited exactly once per (context, method) pair.
    fn process_new_cs_method(&mut self, cs_method: CSMethodId) {
        if !self.processed_methods.insert(cs_method) {
            return;
        }
        self.call_graph.add_reachable_method(cs_method);
        let CSMethod { cid, method } = self.csm.cs_method(cs_method);
        info!(
            "Processing method {} under {:?}",
            self.program.method_name(method),
            cid
        );
        self.process_new_method(method);
        let num_statements = self.program.method(method).statements.len();
        for i in 0..num_statements {
            let stmt = self.program.method(method).statements[i];
            self.process_statement(cid, method, stmt);
        }
        for monitor in &mut self.monitors {
            monitor.signal_new_cs_method(CSMethod { cid, method });
        }
    }

    /// Context-insensitive part of method discovery: runs once per method,
    /// no matter how many contexts reach it.
    fn process_new_method(&mut self, method: MethodId) {
        if !self.reachable_methods.insert(method) {
            return;
        }
        for monitor in &mut self.monitors {
            monitor.signal_new_method(method);
        }
        let num_statements = self.program.method(method).statements.len();
        for i in 0..num_statements {
            let stmt = self.program.method(method).statements[i];
            if let Some(ty) = initialization_trigger(self.program, &stmt) {
                self.initialize_class(ty);
            }
        }
    }

    fn process_statement(&mut self, cid: ContextId, method: MethodId, stmt: Statement) {
        match stmt {
            Statement::Alloc { var, site } => {
                let obj = self.heap_model.obj(self.program, site);
                let obj_id = self.csm.get_obj(obj);
                let heap_cid = self
                    .ctx_selector
                    .select_heap_context(CSMethod { cid, method }, obj_id);
                let cs_obj = self.csm.get_cs_obj(heap_cid, obj_id);
                let var_ptr = self.csm.get_var_pointer(cid, var);
                self.worklist
                    .add_pointer_entry(var_ptr, HybridPointsToSet::singleton(cs_obj));
            }
            Statement::Assign { from, to } => {
                let from = self.csm.get_var_pointer(cid, from);
                let to = self.csm.get_var_pointer(cid, to);
                self.add_pfg_edge(from, to, PFGEdgeKind::LocalAssign, None);
            }
            Statement::Cast { from, to, ty } => {
                let from = self.csm.get_var_pointer(cid, from);
                let to = self.csm.get_var_pointer(cid, to);
                self.add_pfg_edge(from, to, PFGEdgeKind::Cast, Some(ty));
            }
            Statement::StaticLoad { to, field } => {
                let field_ptr = self.csm.get_static_field_pointer(field);
                let to = self.csm.get_var_pointer(cid, to);
                self.add_pfg_edge(field_ptr, to, PFGEdgeKind::StaticLoad, None);
            }
            Statement::StaticStore { field, from } => {
                let from = self.csm.get_var_pointer(cid, from);
                let field_ptr = self.csm.get_static_field_pointer(field);
                self.add_pfg_edge(from, field_ptr, PFGEdgeKind::StaticStore, None);
            }
            Statement::Call(call_site) => {
                // Only static calls can be resolved without a receiver; the
                // other kinds are handled per receiver-object delta.
                if self.program.call_site(call_site).kind == CallKind::Static {
                    let callee = self.program.call_site(call_site).callee;
                    let cs_callsite = CSCallSite { cid, call_site };
                    let callee_ctx = self.ctx_selector.select_context(cs_callsite, None, callee);
                    let cs_callee = self.csm.get_cs_method(callee_ctx, callee);
                    self.worklist.add_call_edge(CallEdge {
                        kind: CallKind::Static,
                        callsite: cs_callsite,
                        callee: cs_callee,
                    });
                }
            }
            // Receiver-dependent statements generate their edges lazily, as
            // the points-to set of their base variable grows.
            Statement::InstanceLoad { .. }
            | Statement::InstanceStore { .. }
            | Statement::ArrayLoad { .. }
            | Statement::ArrayStore { .. } => {}
        }
    }

    /// Processes instance stores when the points-to set of the base
    /// variable changes.
    fn process_instance_store(&mut self, cid: ContextId, var: VarId, pts: &PointsTo) {
        let program = self.program;
        for &(field, from) in &program.variable(var).instance_stores {
            let from_ptr = self.csm.get_var_pointer(cid, from);
            for base in pts.iter() {
                let field_ptr = self.csm.get_instance_field_pointer(base, field);
                self.add_pfg_edge(from_ptr, field_ptr, PFGEdgeKind::InstanceStore, None);
            }
        }
    }

    /// Processes instance loads when the points-to set of the base
    /// variable changes.
    fn process_instance_load(&mut self, cid: ContextId, var: VarId, pts: &PointsTo) {
        let program = self.program;
        for &(field, to) in &program.variable(var).instance_loads {
            let to_ptr = self.csm.get_var_pointer(cid, to);
            for base in pts.iter() {
                let field_ptr = self.csm.get_instance_field_pointer(base, field);
                self.add_pfg_edge(field_ptr, to_ptr, PFGEdgeKind::InstanceLoad, None);
            }
        }
    }

    /// Processes array stores when the points-to set of the array variable
    /// changes. Stores carry the element type of each array object as a
    /// filter: arrays are covariant, so loads need the guard for precision
    /// and soundness of downstream dispatch.
    fn process_array_store(&mut self, cid: ContextId, var: VarId, pts: &PointsTo) {
        let program = self.program;
        for &from in &program.variable(var).array_stores {
            let from_ptr = self.csm.get_var_pointer(cid, from);
            for base in pts.iter() {
                let elem_ty = program.element_type(self.csm.cs_obj_type(base));
                let index_ptr = self.csm.get_array_index_pointer(base);
                self.add_pfg_edge(from_ptr, index_ptr, PFGEdgeKind::ArrayStore, elem_ty);
            }
        }
    }

    /// Processes array loads when the points-to set of the array variable
    /// changes.
    fn process_array_load(&mut self, cid: ContextId, var: VarId, pts: &PointsTo) {
        let program = self.program;
        for &to in &program.variable(var).array_loads {
            let to_ptr = self.csm.get_var_pointer(cid, to);
            for base in pts.iter() {
                let index_ptr = self.csm.get_array_index_pointer(base);
                self.add_pfg_edge(index_ptr, to_ptr, PFGEdgeKind::ArrayLoad, None);
            }
        }
    }

    /// Processes instance calls when the points-to set of the receiver
    /// variable changes: resolve the callee per receiver object, select its
    /// context, enqueue the call edge, and seed `this`.
    fn process_call(
        &mut self,
        cid: ContextId,
        var: VarId,
        pts: &PointsTo,
    ) -> Result<(), AnalysisError> {
        let program = self.program;
        for &call_site in &program.variable(var).receiver_calls {
            let kind = program.call_site(call_site).kind;
            for recv_id in pts.iter() {
                let recv = self.csm.cs_obj(recv_id);
                let callee = self.resolve_callee(recv, call_site)?;
                let cs_callsite = CSCallSite { cid, call_site };
                let callee_ctx = self
                    .ctx_selector
                    .select_context(cs_callsite, Some(recv), callee);
                let cs_callee = self.csm.get_cs_method(callee_ctx, callee);
                self.worklist.add_call_edge(CallEdge {
                    kind,
                    callsite: cs_callsite,
                    callee: cs_callee,
                });
                // Pass the receiver object to the callee's `this` variable.
                // One-shot transfer: the callee context already pins down
                // which receiver is relevant, so no standing edge is built.
                if let Some(this_var) = program.method(callee).this_var {
                    let this_ptr = self.csm.get_var_pointer(callee_ctx, this_var);
                    self.worklist
                        .add_pointer_entry(this_ptr, HybridPointsToSet::singleton(recv_id));
                }
            }
        }
        Ok(())
    }

    /// Resolves the callee for a receiver object at a call site.
    fn resolve_callee(&self, recv: CSObj, call_site: CallSiteId) -> Result<MethodId, AnalysisError> {
        let cs = self.program.call_site(call_site);
        let recv_ty = self.csm.obj(recv.obj).ty;
        match cs.kind {
            CallKind::Virtual | CallKind::Interface => self
                .program
                .resolve_virtual_call(recv_ty, cs.callee)
                .ok_or(AnalysisError::UnresolvedDispatch {
                    call_site,
                    recv_type: recv_ty,
                }),
            CallKind::Special => Ok(self.program.resolve_special_call(call_site)),
            CallKind::Static => Err(AnalysisError::UnresolvableCallSite {
                call_site,
                kind: cs.kind,
            }),
        }
    }

    /// Processes a polled call edge: register it, make the callee
    /// reachable, and wire the per-edge argument and return flows.
    fn process_call_edge(&mut self, edge: CallEdge) {
        let caller_method = self.program.call_site(edge.callsite.call_site).container;
        let caller = self.csm.get_cs_method(edge.callsite.cid, caller_method);
        if !self
            .call_graph
            .add_edge(edge.kind, edge.callsite, caller, edge.callee)
        {
            return;
        }
        self.process_new_cs_method(edge.callee);

        let program = self.program;
        let callee = self.csm.cs_method(edge.callee);
        let call_site = program.call_site(edge.callsite.call_site);
        let caller_cid = edge.callsite.cid;

        // Pass arguments to parameters. These edges are per call edge, as
        // different edges may pair different caller/callee contexts.
        let params = &program.method(callee.method).params;
        for (&arg, &param) in call_site.args.iter().zip(params.iter()) {
            let arg_ptr = self.csm.get_var_pointer(caller_cid, arg);
            let param_ptr = self.csm.get_var_pointer(callee.cid, param);
            self.add_pfg_edge(arg_ptr, param_ptr, PFGEdgeKind::ParameterPassing, None);
        }
        // Pass the return values to the receiving variable.
        if let Some(result) = call_site.result {
            let result_ptr = self.csm.get_var_pointer(caller_cid, result);
            for &ret in &program.method(callee.method).return_vars {
                let ret_ptr = self.csm.get_var_pointer(callee.cid, ret);
                self.add_pfg_edge(ret_ptr, result_ptr, PFGEdgeKind::Return, None);
            }
        }
    }

    /// Triggers lazy initialization of a class: the superclass chain is
    /// marked first, then the collected initializers run under the default
    /// context.
    fn initialize_class(&mut self, ty: TypeId) {
        let mut pending = Vec::new();
        self.class_initializer
            .enqueue_initializers(self.program, ty, &mut pending);
        for clinit in pending {
            let default_ctx = self.ctx_selector.default_context();
            let cs_method = self.csm.get_cs_method(default_ctx, clinit);
            self.process_new_cs_method(cs_method);
        }
    }

    /// Finalize the analysis: dump the requested outputs.
    pub fn finalize(&self) {
        results_dumper::dump_results(
            self.program,
            &self.csm,
            &self.pt_data,
            &self.call_graph,
            &self.options,
        );
        if self.options.dump_stats {
            let stat = pta_statistics::PTAStat::new(
                self.program,
                &self.csm,
                &self.pt_data,
                &self.call_graph,
            );
            stat.dump_stats();
        }
    }

    #[inline]
    pub fn program(&self) -> &'pta Program {
        self.program
    }

    #[inline]
    pub fn cs_manager(&self) -> &CSManager {
        &self.csm
    }

    #[inline]
    pub fn get_pt_data(&self) -> &PTDataTy {
        &self.pt_data
    }

    #[inline]
    pub fn pointer_flow_graph(&self) -> &PointerFlowGraph {
        &self.pfg
    }

    /// The points-to set of a pointer; empty if the pointer never received
    /// any object.
    pub fn points_to(&self, pointer: Pointer) -> PointsTo {
        self.csm
            .find_pointer(pointer)
            .and_then(|id| self.pt_data.get_pts(id).cloned())
            .unwrap_or_else(PointsTo::new)
    }

    /// The abstract objects a variable may point to under a context, with
    /// heap contexts collapsed.
    pub fn var_points_to_objs(&self, cid: ContextId, var: VarId) -> HashSet<ObjId> {
        let mut objs = HashSet::new();
        if let Some(pointer) = self.csm.find_var_pointer(cid, var) {
            if let Some(pts) = self.pt_data.get_pts(pointer) {
                for cs_obj in pts.iter() {
                    objs.insert(self.csm.cs_obj(cs_obj).obj);
                }
            }
        }
        objs
    }
}

impl<'pta, H: HeapModel, S: ContextSelector> PointerAnalysis for ContextSensitivePTA<'pta, H, S> {
    /// Runs the pointer analysis algorithm.
    fn analyze(&mut self) -> Result<(), AnalysisError> {
        let now = Instant::now();

        // Initialization for the analysis.
        self.initialize();

        // Solve the worklist problem.
        self.solve()?;

        let elapsed = now.elapsed();
        info!("Context-sensitive PTA completed.");
        info!(
            "Analysis time: {}",
            humantime::format_duration(elapsed).to_string()
        );

        for monitor in &mut self.monitors {
            monitor.signal_finish();
        }

        // Finalize the analysis.
        self.finalize();
        Ok(())
    }
}
