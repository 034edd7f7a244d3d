// Copyright (c) 2026 The cspta developers.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The pointer flow graph: the edges points-to deltas are propagated along.

use petgraph::graph::{DefaultIx, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Graph;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::cs::PointerId;
use crate::model::ty::TypeId;

// Unique identifiers for graph nodes and edges.
pub type PFGNodeId = NodeIndex<DefaultIx>;
pub type PFGEdgeId = EdgeIndex<DefaultIx>;

/// What kind of statement an edge stands for. An edge is deduplicated on
/// (from, to, kind); the optional type filter is carried alongside.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PFGEdgeKind {
    LocalAssign,
    Cast,
    InstanceLoad,
    InstanceStore,
    ArrayLoad,
    ArrayStore,
    StaticLoad,
    StaticStore,
    ParameterPassing,
    Return,
}

#[derive(Clone, Debug)]
pub struct PFGEdge {
    pub kind: PFGEdgeKind,
    /// Only objects whose type is assignable to the filter may flow along
    /// the edge (cast narrowing, array-store covariance guard).
    pub filter: Option<TypeId>,
}

pub struct PointerFlowGraph {
    /// The graph structure capturing flow relations between pointers.
    graph: Graph<PointerId, PFGEdge>,
    /// A map from pointers to node ids.
    nodes: HashMap<PointerId, PFGNodeId>,
}

impl Default for PointerFlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        PointerFlowGraph {
            graph: Graph::new(),
            nodes: HashMap::new(),
        }
    }

    /// Helper function to get a node or insert a new node if it does not
    /// exist in the map.
    fn get_or_insert_node(&mut self, pointer: PointerId) -> PFGNodeId {
        match self.nodes.entry(pointer) {
            Entry::Occupied(o) => o.get().to_owned(),
            Entry::Vacant(v) => {
                let node_id = self.graph.add_node(pointer);
                *v.insert(node_id)
            }
        }
    }

    /// Returns true if an edge from `from` to `to` of the given kind exists.
    pub fn has_edge(&self, from: PointerId, to: PointerId, kind: PFGEdgeKind) -> bool {
        match (self.nodes.get(&from), self.nodes.get(&to)) {
            (Some(src), Some(dst)) => self
                .graph
                .edges_connecting(*src, *dst)
                .any(|e| e.weight().kind == kind),
            _ => false,
        }
    }

    /// Adds an edge to the graph. Returns false if an edge with the same
    /// endpoints and kind already existed, so the caller can avoid
    /// re-priming it.
    pub fn add_edge(
        &mut self,
        from: PointerId,
        to: PointerId,
        kind: PFGEdgeKind,
        filter: Option<TypeId>,
    ) -> bool {
        if self.has_edge(from, to, kind) {
            return false;
        }
        let src = self.get_or_insert_node(from);
        let dst = self.get_or_insert_node(to);
        self.graph.add_edge(src, dst, PFGEdge { kind, filter });
        true
    }

    /// Yields the outgoing edges of a pointer as (target, kind, filter).
    pub fn out_edges_of(
        &self,
        pointer: PointerId,
    ) -> impl Iterator<Item = (PointerId, PFGEdgeKind, Option<TypeId>)> + '_ {
        self.nodes.get(&pointer).into_iter().flat_map(move |node| {
            self.graph.edges(*node).map(|e| {
                let target = self.graph[e.target()];
                (target, e.weight().kind, e.weight().filter)
            })
        })
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }
}
