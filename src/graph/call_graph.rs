// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use petgraph::graph::{DefaultIx, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Graph;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use crate::cs::{CSCallSite, CSManager, CSMethodId};
use crate::model::statement::CallKind;
use crate::model::Program;
use crate::util::bit_vec::Idx;
use crate::util::chunked_queue::{self, ChunkedQueue};

/// Unique identifiers for call graph nodes.
pub type CGNodeId = NodeIndex<DefaultIx>;
/// Unique identifiers for call graph edges.
pub type CGEdgeId = EdgeIndex<DefaultIx>;

#[derive(Debug)]
pub struct CallGraphNode {
    pub(crate) cs_method: CSMethodId,
}

#[derive(Debug)]
pub struct CallGraphEdge {
    pub kind: CallKind,
    pub callsite: CSCallSite,
}

/// The on-the-fly call graph: grows as the solver discovers reachable
/// context-sensitive methods and resolved call edges.
pub struct OnFlyCallGraph {
    /// The graph structure capturing call relationships.
    pub graph: Graph<CallGraphNode, CallGraphEdge>,
    /// A map from methods to their corresponding call graph nodes.
    method_nodes: HashMap<CSMethodId, CGNodeId>,
    /// A map from call sites to call graph edges.
    callsite_to_edges: HashMap<CSCallSite, HashSet<CGEdgeId>>,
    /// A queue of reachable methods, in discovery order.
    reach_methods: ChunkedQueue<CSMethodId>,
    /// The analysis entry methods.
    entries: Vec<CSMethodId>,
}

impl Default for OnFlyCallGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl OnFlyCallGraph {
    pub fn new() -> Self {
        OnFlyCallGraph {
            graph: Graph::new(),
            method_nodes: HashMap::new(),
            callsite_to_edges: HashMap::new(),
            reach_methods: ChunkedQueue::new(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry_method(&mut self, cs_method: CSMethodId) {
        self.entries.push(cs_method);
        self.add_reachable_method(cs_method);
    }

    /// Records a method as reachable. Returns true when the method was not
    /// reachable before.
    pub fn add_reachable_method(&mut self, cs_method: CSMethodId) -> bool {
        match self.method_nodes.entry(cs_method) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                let node_id = self.graph.add_node(CallGraphNode { cs_method });
                v.insert(node_id);
                self.reach_methods.push(cs_method);
                true
            }
        }
    }

    #[inline]
    pub fn contains_method(&self, cs_method: CSMethodId) -> bool {
        self.method_nodes.contains_key(&cs_method)
    }

    /// All callees already recorded for a call site.
    pub fn get_callees(&self, callsite: &CSCallSite) -> HashSet<CSMethodId> {
        if let Some(edges) = self.callsite_to_edges.get(callsite) {
            edges
                .iter()
                .filter_map(|edge_id| match self.graph.edge_endpoints(*edge_id) {
                    Some((_, target)) => Some(self.graph[target].cs_method),
                    None => None,
                })
                .collect::<HashSet<_>>()
        } else {
            HashSet::new()
        }
    }

    /// Returns true if an edge to the callee already exists for the callsite.
    pub fn has_edge(&self, callsite: &CSCallSite, callee: CSMethodId) -> bool {
        self.get_callees(callsite).contains(&callee)
    }

    /// Adds a call edge from `caller` to `callee` at `callsite`.
    /// Returns false if the edge already existed, and true otherwise.
    pub fn add_edge(
        &mut self,
        kind: CallKind,
        callsite: CSCallSite,
        caller: CSMethodId,
        callee: CSMethodId,
    ) -> bool {
        if self.has_edge(&callsite, callee) {
            return false;
        }
        self.add_reachable_method(caller);
        self.add_reachable_method(callee);
        let caller_node = self.method_nodes[&caller];
        let callee_node = self.method_nodes[&callee];
        let edge_id = self
            .graph
            .add_edge(caller_node, callee_node, CallGraphEdge { kind, callsite });
        self.callsite_to_edges
            .entry(callsite)
            .or_default()
            .insert(edge_id);
        true
    }

    /// An iterator over the reachable methods that keeps yielding methods
    /// discovered after its creation.
    pub fn reach_methods_iter(&self) -> chunked_queue::IterCopied<CSMethodId> {
        self.reach_methods.iter_copied()
    }

    pub fn entry_methods(&self) -> &[CSMethodId] {
        &self.entries
    }

    #[inline]
    pub fn num_reachable_methods(&self) -> usize {
        self.method_nodes.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edges_iter(&self) -> impl Iterator<Item = (CSMethodId, &CallGraphEdge, CSMethodId)> {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].cs_method,
                e.weight(),
                self.graph[e.target()].cs_method,
            )
        })
    }

    /// Writes a Graphviz rendering of the call graph.
    pub fn write_dot<W: Write>(
        &self,
        w: &mut W,
        program: &Program,
        csm: &CSManager,
    ) -> io::Result<()> {
        writeln!(w, "digraph call_graph {{")?;
        for (&cs_method, &node) in &self.method_nodes {
            let m = csm.cs_method(cs_method);
            writeln!(
                w,
                "    n{} [label=\"{} @{}\"];",
                node.index(),
                program.method_name(m.method),
                m.cid.index(),
            )?;
        }
        for e in self.graph.edge_references() {
            writeln!(
                w,
                "    n{} -> n{} [label=\"{:?}\"];",
                e.source().index(),
                e.target().index(),
                e.weight().kind,
            )?;
        }
        writeln!(w, "}}")
    }
}
