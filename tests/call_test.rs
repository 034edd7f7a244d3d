// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.
//
// On-the-fly call graph construction: virtual dispatch per receiver type,
// receiver seeding, argument/return wiring, and the malformed-model error
// path.

mod common;

use cspta::model::statement::CallKind;
use cspta::model::ProgramBuilder;
use cspta::pta::context_sensitive::ContextSensitivePTA;
use cspta::pta::{AnalysisError, PointerAnalysis};
use cspta::util::options::AnalysisOptions;

#[test]
fn virtual_dispatch_per_receiver_type() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let base = b.add_class("Base", Some(object));
    let s1 = b.add_class("S1", Some(base));
    let s2 = b.add_class("S2", Some(base));

    let base_m = b.add_method(base, "m");
    let s1_m = b.add_method(s1, "m");
    // S2 inherits Base.m.

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, s1);
    b.add_alloc(main, v, s2);
    b.add_virtual_call(main, v, base_m, vec![], None);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_callsite_sensitive(&program, 1);

    // Two receiver types, two distinct call edges.
    assert_eq!(pta.call_graph.num_edges(), 2);
    let callees: std::collections::HashSet<_> = pta
        .call_graph
        .edges_iter()
        .map(|(_, _, callee)| pta.cs_manager().cs_method(callee).method)
        .collect();
    assert!(callees.contains(&s1_m));
    assert!(callees.contains(&base_m));

    // Each callee's `this` holds exactly its own receiver object.
    for (_, cs_method) in pta.cs_manager().cs_methods_iter() {
        let expected_ty = if cs_method.method == s1_m {
            s1
        } else if cs_method.method == base_m {
            s2
        } else {
            continue;
        };
        let this_var = program.method(cs_method.method).this_var.unwrap();
        let objs = pta.var_points_to_objs(cs_method.cid, this_var);
        assert_eq!(objs.len(), 1);
        let obj = *objs.iter().next().unwrap();
        assert_eq!(pta.cs_manager().obj(obj).ty, expected_ty);
    }
}

#[test]
fn static_call_passes_arguments_and_returns() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main_cls = b.add_class("Main", Some(object));

    let id = b.add_static_method(main_cls, "id");
    let p = b.add_param(id, "p");
    b.add_return(id, p);

    let main = b.add_static_method(main_cls, "main");
    let o = b.add_local(main, "o");
    let x = b.add_local(main, "x");
    b.add_alloc(main, o, a);
    b.add_static_call(main, id, vec![o], Some(x));
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    assert_eq!(pta.call_graph.num_edges(), 1);
    assert_eq!(pta.var_points_to_objs(ctx, x), pta.var_points_to_objs(ctx, o));
    assert_eq!(pta.var_points_to_objs(ctx, x).len(), 1);
}

#[test]
fn special_call_binds_statically_and_seeds_receiver() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let sub = b.add_class("Sub", Some(a));

    let ctor = b.add_method(a, "<init>");
    let f = b.add_field(a, "f", object);
    let arg_var = b.add_param(ctor, "v");
    // this.f = v
    let this_var = {
        let program = b.program_ref();
        program.method(ctor).this_var.unwrap()
    };
    b.add_instance_store(ctor, this_var, f, arg_var);

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let s = b.add_local(main, "s");
    let o = b.add_local(main, "o");
    let r = b.add_local(main, "r");
    b.add_alloc(main, s, sub);
    b.add_alloc(main, o, object);
    // The declared target is called even though the receiver type is Sub,
    // which does not override it.
    b.add_special_call(main, s, ctor, vec![o], None);
    b.add_instance_load(main, r, s, f);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_callsite_sensitive(&program, 1);
    let ctx = common::entry_context(&pta);

    let callees: Vec<_> = pta
        .call_graph
        .edges_iter()
        .map(|(_, _, callee)| pta.cs_manager().cs_method(callee).method)
        .collect();
    assert_eq!(callees, vec![ctor]);

    // The stored object flows through the constructor into Sub's field.
    let objs = pta.var_points_to_objs(ctx, r);
    assert_eq!(objs.len(), 1);
    let obj = *objs.iter().next().unwrap();
    assert_eq!(pta.cs_manager().obj(obj).ty, object);
}

#[test]
fn receiver_on_static_call_is_fatal() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let m = b.add_static_method(a, "m");

    let main = b.add_static_method(a, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, a);
    // A receiver-dependent call site with a static kind is a malformed
    // model; the solver must abort instead of guessing.
    b.add_call(main, CallKind::Static, m, Some(v), vec![], None);
    b.set_entry(main);
    let program = b.finish();

    let mut pta = ContextSensitivePTA::new(
        &program,
        AnalysisOptions::default(),
        cspta::model::heap::AllocationSiteBased::new(),
        cspta::pta::context_selector::ContextInsensitive::new(),
    );
    match pta.analyze() {
        Err(AnalysisError::UnresolvableCallSite { .. }) => {}
        other => panic!("expected an unresolvable-call-site error, got {other:?}"),
    }
}

#[test]
fn dispatch_without_target_is_fatal() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let unrelated = b.add_class("Unrelated", Some(object));
    let a_m = b.add_method(a, "m");

    let main = b.add_static_method(a, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, unrelated);
    b.add_virtual_call(main, v, a_m, vec![], None);
    b.set_entry(main);
    let program = b.finish();

    let mut pta = ContextSensitivePTA::new(
        &program,
        AnalysisOptions::default(),
        cspta::model::heap::AllocationSiteBased::new(),
        cspta::pta::context_selector::ContextInsensitive::new(),
    );
    match pta.analyze() {
        Err(AnalysisError::UnresolvedDispatch { recv_type, .. }) => {
            assert_eq!(recv_type, unrelated);
        }
        other => panic!("expected an unresolved-dispatch error, got {other:?}"),
    }
}

#[test]
fn recursion_terminates() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main_cls = b.add_class("Main", Some(object));

    // Mutually recursive static methods, each allocating.
    let f = b.add_static_method(main_cls, "f");
    let g = b.add_static_method(main_cls, "g");
    let fv = b.add_local(f, "v");
    b.add_alloc(f, fv, a);
    b.add_static_call(f, g, vec![], None);
    let gv = b.add_local(g, "v");
    b.add_alloc(g, gv, a);
    b.add_static_call(g, f, vec![], None);

    let main = b.add_static_method(main_cls, "main");
    b.add_static_call(main, f, vec![], None);
    b.set_entry(main);
    let program = b.finish();

    // Call-string contexts cycle through the recursion; k-limiting keeps
    // the context space finite and the solver reaches a fixpoint.
    let pta = common::run_callsite_sensitive(&program, 2);
    assert!(pta.call_graph.num_edges() >= 3);
}

#[test]
fn implicit_entries_are_optional() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main = b.add_static_method(a, "main");
    let extra = b.add_static_method(a, "implicit");
    let v = b.add_local(extra, "v");
    b.add_alloc(extra, v, a);
    b.set_entry(main);
    b.add_implicit_entry(extra);
    let program = b.finish();

    let without = common::run_ci(&program);
    assert_eq!(without.call_graph.num_reachable_methods(), 1);

    let mut options = AnalysisOptions::default();
    options.analyze_implicit_entries = true;
    let mut with = ContextSensitivePTA::new(
        &program,
        options,
        cspta::model::heap::AllocationSiteBased::new(),
        cspta::pta::context_selector::ContextInsensitive::new(),
    );
    with.analyze().expect("analysis should reach a fixpoint");
    assert_eq!(with.call_graph.num_reachable_methods(), 2);
    assert_eq!(with.call_graph.entry_methods().len(), 2);
}
