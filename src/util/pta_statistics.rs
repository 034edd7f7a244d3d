// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use log::*;
use std::collections::{HashMap, HashSet};
use std::io::{BufWriter, Write};

use crate::cs::{CSManager, Pointer};
use crate::graph::call_graph::OnFlyCallGraph;
use crate::model::heap::ObjId;
use crate::model::method::{MethodId, VarId};
use crate::model::ty::FieldId;
use crate::model::Program;
use crate::pta::PTDataTy;
use crate::pts_set::points_to::PointsToSet;

/// A pointer with its context stripped, for the context-insensitively
/// collapsed statistics.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
enum CIPointer {
    Var(VarId),
    InstanceField(ObjId, FieldId),
    ArrayIndex(ObjId),
    StaticField(FieldId),
}

pub struct PTAStat<'stat> {
    program: &'stat Program,
    csm: &'stat CSManager,
    pt_data: &'stat PTDataTy,
    call_graph: &'stat OnFlyCallGraph,
}

impl<'stat> PTAStat<'stat> {
    pub fn new(
        program: &'stat Program,
        csm: &'stat CSManager,
        pt_data: &'stat PTDataTy,
        call_graph: &'stat OnFlyCallGraph,
    ) -> Self {
        PTAStat {
            program,
            csm,
            pt_data,
            call_graph,
        }
    }

    pub fn dump_stats(&self) {
        let mut stat_writer = BufWriter::new(Box::new(std::io::stdout()) as Box<dyn Write>);

        info!("Dumping pta statistics...");
        stat_writer
            .write_all("##########################################################\n".as_bytes())
            .expect("Unable to write data");
        self.dump_call_graph_stat(&mut stat_writer);
        stat_writer
            .write_all("----------------------------------------------------------\n".as_bytes())
            .expect("Unable to write data");
        self.dump_pts_stat(&mut stat_writer);
        stat_writer
            .write_all("##########################################################\n".as_bytes())
            .expect("Unable to write data");
    }

    pub fn dump_call_graph_stat<W: Write>(&self, stat_writer: &mut BufWriter<W>) {
        let mut ci_reachable: HashSet<MethodId> = HashSet::new();
        let mut iter = self.call_graph.reach_methods_iter();
        while let Some(cs_method) = iter.next() {
            ci_reachable.insert(self.csm.cs_method(cs_method).method);
        }

        stat_writer
            .write_all("Call Graph Statistics: \n".as_bytes())
            .expect("Unable to write data");
        for &entry in self.call_graph.entry_methods() {
            let m = self.csm.cs_method(entry);
            stat_writer
                .write_all(format!("Entry: {}\n", self.program.method_name(m.method)).as_bytes())
                .expect("Unable to write data");
        }
        stat_writer
            .write_all(
                format!(
                    "#Reachable methods (CS): {}\n",
                    self.call_graph.num_reachable_methods()
                )
                .as_bytes(),
            )
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Reachable methods (CI): {}\n", ci_reachable.len()).as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Call graph edges: {}\n", self.call_graph.num_edges()).as_bytes())
            .expect("Unable to write data");
    }

    pub fn dump_pts_stat<W: Write>(&self, stat_writer: &mut BufWriter<W>) {
        let cs_pts_map = self.pt_data.get_pts_map();
        let mut ci_pts_map: HashMap<CIPointer, HashSet<ObjId>> = HashMap::new();
        let num_cs_pointers = cs_pts_map.len();
        let mut num_cs_pts_relations = 0;
        for (pointer_id, pts) in cs_pts_map {
            num_cs_pts_relations += pts.count();

            let ci_pointer = self.strip_context(self.csm.pointer(*pointer_id));
            let ci_pts = ci_pts_map.entry(ci_pointer).or_default();
            for pointee in pts.iter() {
                ci_pts.insert(self.csm.cs_obj(pointee).obj);
            }
        }
        let avg_cs_pts = num_cs_pts_relations as f64 / num_cs_pointers.max(1) as f64;

        let num_ci_pointers = ci_pts_map.len();
        let mut num_ci_pts_relations = 0;
        for (_pointer, pts) in ci_pts_map {
            num_ci_pts_relations += pts.len();
        }
        let avg_ci_pts = num_ci_pts_relations as f64 / num_ci_pointers.max(1) as f64;

        stat_writer
            .write_all("CS Points-to Statistics: \n".as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Pointers: {}\n", num_cs_pointers).as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Points-to relations: {}\n", num_cs_pts_relations).as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Avg points-to size: {}\n", avg_cs_pts).as_bytes())
            .expect("Unable to write data");

        stat_writer
            .write_all("CI Points-to Statistics: \n".as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Pointers: {}\n", num_ci_pointers).as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Points-to relations: {}\n", num_ci_pts_relations).as_bytes())
            .expect("Unable to write data");
        stat_writer
            .write_all(format!("#Avg points-to size: {}\n", avg_ci_pts).as_bytes())
            .expect("Unable to write data");
    }

    fn strip_context(&self, pointer: Pointer) -> CIPointer {
        match pointer {
            Pointer::Var { var, .. } => CIPointer::Var(var),
            Pointer::InstanceField { base, field } => {
                CIPointer::InstanceField(self.csm.cs_obj(base).obj, field)
            }
            Pointer::ArrayIndex { base } => CIPointer::ArrayIndex(self.csm.cs_obj(base).obj),
            Pointer::StaticField { field } => CIPointer::StaticField(field),
        }
    }
}
