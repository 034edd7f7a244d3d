// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.
//
// Allocation seeding and the basic fixpoint properties: a single
// allocation reaches exactly one variable, sets only grow, and re-solving
// a finished analysis changes nothing.

mod common;

use cspta::model::ProgramBuilder;
use cspta::pts_set::points_to::PointsToSet;

#[test]
fn single_allocation() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main = b.add_static_method(a, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, a);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_callsite_sensitive(&program, 1);
    let ctx = common::entry_context(&pta);

    let objs = pta.var_points_to_objs(ctx, v);
    assert_eq!(objs.len(), 1);
    let obj = *objs.iter().next().unwrap();
    assert_eq!(pta.cs_manager().obj(obj).ty, a);

    // Only the entry is reachable and no call edge exists.
    assert_eq!(pta.call_graph.num_reachable_methods(), 1);
    assert_eq!(pta.call_graph.num_edges(), 0);
}

#[test]
fn assignment_propagates() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main = b.add_static_method(a, "main");
    let v = b.add_local(main, "v");
    let w = b.add_local(main, "w");
    let x = b.add_local(main, "x");
    b.add_alloc(main, v, a);
    b.add_assign(main, v, w);
    b.add_assign(main, w, x);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    let expected = pta.var_points_to_objs(ctx, v);
    assert_eq!(expected.len(), 1);
    assert_eq!(pta.var_points_to_objs(ctx, w), expected);
    assert_eq!(pta.var_points_to_objs(ctx, x), expected);
}

#[test]
fn resolving_again_is_a_fixpoint() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main = b.add_static_method(a, "main");
    let v = b.add_local(main, "v");
    let w = b.add_local(main, "w");
    b.add_alloc(main, v, a);
    b.add_alloc(main, v, a);
    b.add_assign(main, v, w);
    b.set_entry(main);
    let program = b.finish();

    let mut pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    let before_v = pta.var_points_to_objs(ctx, v);
    let before_w = pta.var_points_to_objs(ctx, w);
    assert_eq!(before_v.len(), 2);

    // The worklist is drained; solving again must change nothing.
    pta.solve().expect("re-solve should succeed");
    assert_eq!(pta.var_points_to_objs(ctx, v), before_v);
    assert_eq!(pta.var_points_to_objs(ctx, w), before_w);
}

#[test]
fn distinct_sites_are_distinct_objects() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let a = b.add_class("A", Some(object));
    let main = b.add_static_method(a, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, a);
    b.add_alloc(main, v, a);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    // Allocation-site abstraction: two sites, two abstract objects.
    assert_eq!(pta.var_points_to_objs(ctx, v).len(), 2);

    let pointer = pta
        .cs_manager()
        .find_var_pointer(ctx, v)
        .expect("v should own a points-to set");
    assert_eq!(pta.get_pt_data().get_pts(pointer).unwrap().count(), 2);
}
