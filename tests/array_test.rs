// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.
//
// Array covariance guards and cast narrowing: only assignable objects may
// pass a filtered edge.

mod common;

use cspta::model::ProgramBuilder;

#[test]
fn array_store_filters_incompatible_elements() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let u = b.add_class("U", Some(object));
    let t = b.add_class("T", Some(u));
    let v_cls = b.add_class("V", Some(object));
    let u_array = b.array_type(u);

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let arr = b.add_local(main, "arr");
    let tv = b.add_local(main, "t");
    let vv = b.add_local(main, "v");
    let w = b.add_local(main, "w");
    b.add_alloc(main, arr, u_array);
    b.add_alloc(main, tv, t);
    b.add_alloc(main, vv, v_cls);
    // A T is a U, so it may be stored; a V is not.
    b.add_array_store(main, arr, tv);
    b.add_array_store(main, arr, vv);
    b.add_array_load(main, w, arr);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    let objs = pta.var_points_to_objs(ctx, w);
    assert_eq!(objs.len(), 1);
    let obj = *objs.iter().next().unwrap();
    assert_eq!(pta.cs_manager().obj(obj).ty, t);
}

#[test]
fn nested_arrays_are_covariant() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let u = b.add_class("U", Some(object));
    let t = b.add_class("T", Some(u));
    let t_array = b.array_type(t);
    let u_array = b.array_type(u);
    let u_array_array = b.array_type(u_array);

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let outer = b.add_local(main, "outer");
    let inner = b.add_local(main, "inner");
    let w = b.add_local(main, "w");
    b.add_alloc(main, outer, u_array_array);
    // T[] is assignable to U[] (array covariance).
    b.add_alloc(main, inner, t_array);
    b.add_array_store(main, outer, inner);
    b.add_array_load(main, w, outer);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    let objs = pta.var_points_to_objs(ctx, w);
    assert_eq!(objs.len(), 1);
    let obj = *objs.iter().next().unwrap();
    assert_eq!(pta.cs_manager().obj(obj).ty, t_array);
}

#[test]
fn cast_narrows_the_flow() {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let u = b.add_class("U", Some(object));
    let t = b.add_class("T", Some(u));
    let v_cls = b.add_class("V", Some(object));

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let x = b.add_local(main, "x");
    let up = b.add_local(main, "up");
    let down = b.add_local(main, "down");
    let wrong = b.add_local(main, "wrong");
    b.add_alloc(main, x, t);
    b.add_cast(main, x, up, u);
    b.add_cast(main, x, down, t);
    b.add_cast(main, x, wrong, v_cls);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    assert_eq!(pta.var_points_to_objs(ctx, up).len(), 1);
    assert_eq!(pta.var_points_to_objs(ctx, down).len(), 1);
    // A T object can never pass a cast to the unrelated V.
    assert!(pta.var_points_to_objs(ctx, wrong).is_empty());
}

#[test]
fn late_edges_replay_existing_objects() {
    // The store edge to the array cell is created only after the array
    // variable's set grows; objects already sitting in the source must
    // still flow (edge priming).
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let u = b.add_class("U", Some(object));
    let u_array = b.array_type(u);

    let main_cls = b.add_class("Main", Some(object));
    let main = b.add_static_method(main_cls, "main");
    let arr = b.add_local(main, "arr");
    let e = b.add_local(main, "e");
    let w = b.add_local(main, "w");
    // The element is allocated before the array exists.
    b.add_alloc(main, e, u);
    b.add_array_store(main, arr, e);
    b.add_array_load(main, w, arr);
    b.add_alloc(main, arr, u_array);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    let ctx = common::entry_context(&pta);

    let objs = pta.var_points_to_objs(ctx, w);
    assert_eq!(objs.len(), 1);
    let obj = *objs.iter().next().unwrap();
    assert_eq!(pta.cs_manager().obj(obj).ty, u);
}
