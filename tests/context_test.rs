// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.
//
// Validates the effectiveness of call-site and object sensitivity in
// computing points-to information, against the context-insensitive
// baseline.

mod common;

use cspta::model::{Program, ProgramBuilder, VarId};
use cspta::pta::run_analysis;
use cspta::util::options::AnalysisOptions;

/// main calls an identity method twice with differently-typed objects.
fn identity_program() -> (Program, VarId, VarId) {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let b_cls = b.add_class("B", Some(object));
    let main_cls = b.add_class("Main", Some(object));

    let id = b.add_static_method(main_cls, "id");
    let p = b.add_param(id, "p");
    b.add_return(id, p);

    let main = b.add_static_method(main_cls, "main");
    let o1 = b.add_local(main, "o1");
    let o2 = b.add_local(main, "o2");
    let x = b.add_local(main, "x");
    let y = b.add_local(main, "y");
    b.add_alloc(main, o1, a);
    b.add_alloc(main, o2, b_cls);
    b.add_static_call(main, id, vec![o1], Some(x));
    b.add_static_call(main, id, vec![o2], Some(y));
    b.set_entry(main);
    (b.finish(), x, y)
}

#[test]
fn callsite_sensitivity_separates_identity_calls() {
    let (program, x, y) = identity_program();

    let ci = common::run_ci(&program);
    let ci_ctx = common::entry_context(&ci);
    // Context-insensitively, both results conflate the two objects.
    assert_eq!(ci.var_points_to_objs(ci_ctx, x).len(), 2);
    assert_eq!(ci.var_points_to_objs(ci_ctx, y).len(), 2);

    let cs = common::run_callsite_sensitive(&program, 1);
    let cs_ctx = common::entry_context(&cs);
    // Under 1-call-site sensitivity each call keeps its own object.
    let x_objs = cs.var_points_to_objs(cs_ctx, x);
    let y_objs = cs.var_points_to_objs(cs_ctx, y);
    assert_eq!(x_objs.len(), 1);
    assert_eq!(y_objs.len(), 1);
    assert_ne!(x_objs, y_objs);
}

/// Two container objects, each receiving its own payload through the same
/// setter method.
fn container_program() -> (Program, VarId, VarId) {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let p1 = b.add_class("P1", Some(object));
    let p2 = b.add_class("P2", Some(object));
    let holder = b.add_class("Holder", Some(object));
    let f = b.add_field(holder, "f", object);

    let set = b.add_method(holder, "set");
    let this_var = b.program_ref().method(set).this_var.unwrap();
    let v = b.add_param(set, "v");
    b.add_instance_store(set, this_var, f, v);

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let h1 = b.add_local(main, "h1");
    let h2 = b.add_local(main, "h2");
    let b1 = b.add_local(main, "b1");
    let b2 = b.add_local(main, "b2");
    let x = b.add_local(main, "x");
    let y = b.add_local(main, "y");
    b.add_alloc(main, h1, holder);
    b.add_alloc(main, h2, holder);
    b.add_alloc(main, b1, p1);
    b.add_alloc(main, b2, p2);
    b.add_virtual_call(main, h1, set, vec![b1], None);
    b.add_virtual_call(main, h2, set, vec![b2], None);
    b.add_instance_load(main, x, h1, f);
    b.add_instance_load(main, y, h2, f);
    b.set_entry(main);
    (b.finish(), x, y)
}

#[test]
fn object_sensitivity_separates_containers() {
    let (program, x, y) = container_program();

    let ci = common::run_ci(&program);
    let ci_ctx = common::entry_context(&ci);
    // The context-insensitive setter conflates the two payloads.
    assert_eq!(ci.var_points_to_objs(ci_ctx, x).len(), 2);
    assert_eq!(ci.var_points_to_objs(ci_ctx, y).len(), 2);

    let os = common::run_object_sensitive(&program, 1);
    let os_ctx = common::entry_context(&os);
    let x_objs = os.var_points_to_objs(os_ctx, x);
    let y_objs = os.var_points_to_objs(os_ctx, y);
    assert_eq!(x_objs.len(), 1);
    assert_eq!(y_objs.len(), 1);
    assert_ne!(x_objs, y_objs);
}

#[test]
fn callsite_sensitivity_also_separates_containers() {
    let (program, x, y) = container_program();
    let cs = common::run_callsite_sensitive(&program, 1);
    let ctx = common::entry_context(&cs);
    assert_eq!(cs.var_points_to_objs(ctx, x).len(), 1);
    assert_eq!(cs.var_points_to_objs(ctx, y).len(), 1);
}

#[test]
fn run_analysis_covers_all_policies() {
    let (program, _, _) = identity_program();
    for pta_type in ["ci", "cs", "obj"] {
        let mut options = AnalysisOptions::default();
        options.parse_from_args(&["--pta-type".to_string(), pta_type.to_string()]);
        run_analysis(&program, &options).expect("analysis should reach a fixpoint");
    }
}
