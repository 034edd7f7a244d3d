// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.
//
// Lazy class initialization: the superclass chain runs exactly once,
// top-down, before the triggering class's own initializer, and re-triggers
// are no-ops.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use cspta::model::heap::AllocationSiteBased;
use cspta::model::method::MethodId;
use cspta::model::ProgramBuilder;
use cspta::pta::context_selector::ContextInsensitive;
use cspta::pta::context_sensitive::ContextSensitivePTA;
use cspta::pta::monitor::AnalysisMonitor;
use cspta::pta::PointerAnalysis;
use cspta::util::options::AnalysisOptions;

struct MethodRecorder {
    events: Rc<RefCell<Vec<MethodId>>>,
}

impl AnalysisMonitor for MethodRecorder {
    fn signal_new_method(&mut self, method: MethodId) {
        self.events.borrow_mut().push(method);
    }
}

#[test]
fn superclass_chain_initializes_once_in_order() {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);
    let b_cls = b.add_class("B", Some(a));
    let c = b.add_class("C", Some(b_cls));

    let obj_field_ty = a;
    let sf1 = b.add_static_field(c, "S1", obj_field_ty);
    let sf2 = b.add_static_field(c, "S2", obj_field_ty);

    // Each initializer allocates into a static field of its own class.
    let clinit_of = |builder: &mut ProgramBuilder, cls, name: &str| {
        let clinit = builder.add_static_method(cls, name);
        let field = builder.add_static_field(cls, "INSTANCE", obj_field_ty);
        let v = builder.add_local(clinit, "v");
        builder.add_alloc(clinit, v, a);
        builder.add_static_store(clinit, field, v);
        builder.set_class_initializer(cls, clinit);
        clinit
    };
    let clinit_a = clinit_of(&mut b, a, "<clinit>");
    let clinit_b = clinit_of(&mut b, b_cls, "<clinit>");
    let clinit_c = clinit_of(&mut b, c, "<clinit>");

    let main_cls = b.add_class("Main", None);
    let main = b.add_static_method(main_cls, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, a);
    // Two static stores into C: the second must not re-run anything.
    b.add_static_store(main, sf1, v);
    b.add_static_store(main, sf2, v);
    b.set_entry(main);
    let program = b.finish();

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut pta = ContextSensitivePTA::new(
        &program,
        AnalysisOptions::default(),
        AllocationSiteBased::new(),
        ContextInsensitive::new(),
    );
    pta.add_monitor(Box::new(MethodRecorder {
        events: events.clone(),
    }));
    pta.analyze().expect("analysis should reach a fixpoint");

    // main is discovered first, then its trigger scan runs A, B, C
    // top-down; each initializer exactly once despite two triggers.
    assert_eq!(*events.borrow(), vec![main, clinit_a, clinit_b, clinit_c]);

    // The initializers really ran: their static fields are populated.
    assert_eq!(pta.call_graph.num_reachable_methods(), 4);
}

#[test]
fn allocation_triggers_array_base_class() {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);
    let clinit = b.add_static_method(a, "<clinit>");
    let w = b.add_local(clinit, "w");
    b.add_alloc(clinit, w, a);
    b.set_class_initializer(a, clinit);
    let a_array = b.array_type(a);

    let main_cls = b.add_class("Main", None);
    let main = b.add_static_method(main_cls, "main");
    let v = b.add_local(main, "v");
    b.add_alloc(main, v, a_array);
    b.set_entry(main);
    let program = b.finish();

    let events = Rc::new(RefCell::new(Vec::new()));
    let mut pta = ContextSensitivePTA::new(
        &program,
        AnalysisOptions::default(),
        AllocationSiteBased::new(),
        ContextInsensitive::new(),
    );
    pta.add_monitor(Box::new(MethodRecorder {
        events: events.clone(),
    }));
    pta.analyze().expect("analysis should reach a fixpoint");

    // Allocating A[] initializes A itself.
    assert!(events.borrow().contains(&clinit));
}

#[test]
fn static_call_triggers_callee_class() {
    let mut b = ProgramBuilder::new();
    let a = b.add_class("A", None);
    let clinit = b.add_static_method(a, "<clinit>");
    let w = b.add_local(clinit, "w");
    b.add_alloc(clinit, w, a);
    b.set_class_initializer(a, clinit);
    let helper = b.add_static_method(a, "helper");

    let main_cls = b.add_class("Main", None);
    let main = b.add_static_method(main_cls, "main");
    b.add_static_call(main, helper, vec![], None);
    b.set_entry(main);
    let program = b.finish();

    let pta = common::run_ci(&program);
    // main, helper and A.<clinit> are reachable.
    assert_eq!(pta.call_graph.num_reachable_methods(), 3);
}
