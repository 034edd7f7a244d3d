// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use itertools::Itertools;
use log::*;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::cs::{CSManager, CSObjId, Pointer};
use crate::graph::call_graph::OnFlyCallGraph;
use crate::model::Program;
use crate::pta::PTDataTy;
use crate::pts_set::points_to::PointsToSet;
use crate::util::bit_vec::Idx;
use crate::util::options::AnalysisOptions;

pub fn dump_results(
    program: &Program,
    csm: &CSManager,
    pt_data: &PTDataTy,
    call_graph: &OnFlyCallGraph,
    options: &AnalysisOptions,
) {
    // dump points-to results
    if let Some(pts_output) = &options.pts_output {
        info!("Dumping points-to results...");
        dump_pts(program, csm, pt_data, pts_output);
    }

    // dump call graph
    if let Some(cg_output) = &options.call_graph_output {
        info!("Dumping call graph...");
        dump_call_graph(program, csm, call_graph, cg_output);
    }
}

fn make_writer(path: &str) -> BufWriter<Box<dyn Write>> {
    BufWriter::new(match path {
        "stdout" => Box::new(std::io::stdout()) as Box<dyn Write>,
        _ => Box::new(File::create(path).expect("Unable to create file")) as Box<dyn Write>,
    })
}

pub fn dump_pts(program: &Program, csm: &CSManager, pt_data: &PTDataTy, pts_path: &str) {
    let mut pts_writer = make_writer(pts_path);
    for (pointer_id, pts) in pt_data
        .get_pts_map()
        .iter()
        .sorted_by_key(|(pointer_id, _)| **pointer_id)
    {
        if pts.is_empty() {
            continue;
        }
        let pointer = csm.pointer(*pointer_id);
        pts_writer
            .write_all(format!("{} ==> {{ ", format_pointer(program, csm, pointer)).as_bytes())
            .expect("Unable to write data");
        for pointee in pts.iter() {
            pts_writer
                .write_all(format!("{} ", format_cs_obj(program, csm, pointee)).as_bytes())
                .expect("Unable to write data");
        }
        pts_writer
            .write_all("}\n".as_bytes())
            .expect("Unable to write data");
    }
}

pub fn dump_call_graph(
    program: &Program,
    csm: &CSManager,
    call_graph: &OnFlyCallGraph,
    cg_path: &str,
) {
    let mut cg_writer = make_writer(cg_path);
    call_graph
        .write_dot(&mut cg_writer, program, csm)
        .expect("Unable to write call graph");
}

pub fn format_pointer(program: &Program, csm: &CSManager, pointer: Pointer) -> String {
    match pointer {
        Pointer::Var { cid, var } => {
            format!("{}@{}", program.var_name(var), cid.index())
        }
        Pointer::InstanceField { base, field } => {
            format!(
                "{}.{}",
                format_cs_obj(program, csm, base),
                program.field(field).name
            )
        }
        Pointer::ArrayIndex { base } => {
            format!("{}[*]", format_cs_obj(program, csm, base))
        }
        Pointer::StaticField { field } => {
            let data = program.field(field);
            format!("{}.{}", program.type_data(data.class).name, data.name)
        }
    }
}

pub fn format_cs_obj(program: &Program, csm: &CSManager, cs_obj: CSObjId) -> String {
    let cs = csm.cs_obj(cs_obj);
    let obj = csm.obj(cs.obj);
    let site = program.alloc_site(obj.alloc);
    format!(
        "new<{}>{}#{}@{}",
        program.type_data(obj.ty).name,
        program.method_name(site.method),
        site.ordinal,
        cs.cid.index()
    )
}
