//! The capacity-weighted directed graph: construction, introspection and
//! the low-level capacity arithmetic the router and allocator build on.
use crate::error::{Result, RouterError};
use crate::graph::{Edge, VertexId};
use crate::weight_source::WeightSource;
use std::collections::HashMap;

/// Capacity comparisons use this epsilon to avoid livelock when a residual
/// capacity approaches zero through repeated subtraction (spec.md §9).
pub const EPSILON: f64 = 1e-12;

/// A directed graph whose edges carry an entanglement-generation capacity
/// (EPR pairs/second) and whose instance holds a single measurement
/// probability μ used to translate net end-to-end rate into gross per-edge
/// capacity.
///
/// Mirrors the teacher's `DirectedGraph`: each edge is indexed at both of
/// its endpoints so in/out-bound lookups are O(degree), with the capacity
/// itself tracked in a side map keyed by `Edge` -- the same shape
/// `algorithm::max_flow` already uses for its flow/capacity bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    edge_map: HashMap<VertexId, Vec<Edge>>,
    capacity: HashMap<Edge, f64>,
    mu: f64,
}

impl Network {
    fn empty() -> Network {
        Network {
            edge_map: HashMap::new(),
            capacity: HashMap::new(),
            mu: 1.0,
        }
    }

    /// Constructor A: draws a weight from `weight_source` once per input
    /// pair. When `make_bidirectional` is set, both (u,v) and (v,u) share
    /// that single draw. Unseen node identifiers up to the maximum seen are
    /// materialized as isolated vertices.
    pub fn new<W: WeightSource>(
        edges: &[(u64, u64)],
        weight_source: &mut W,
        make_bidirectional: bool,
    ) -> Network {
        let mut g = Network::empty();
        g.materialize_vertices(edges.iter().flat_map(|(u, v)| vec![*u, *v]));
        for (u, v) in edges {
            let w = weight_source.next_weight();
            let (u, v) = (VertexId(*u), VertexId(*v));
            g.set_edge(Edge(u, v), w);
            if make_bidirectional {
                g.set_edge(Edge(v, u), w);
            }
        }
        g
    }

    /// Constructor B: every triple becomes a single directed edge carrying
    /// an explicit weight. Fails with `InvalidArgument` on a negative weight.
    pub fn from_weighted_edges(edges: &[(u64, u64, f64)]) -> Result<Network> {
        for (_, _, w) in edges {
            if *w < 0.0 {
                return Err(RouterError::InvalidArgument(format!(
                    "edge weight must be >= 0, got {}",
                    w
                )));
            }
        }
        let mut g = Network::empty();
        g.materialize_vertices(edges.iter().flat_map(|(u, v, _)| vec![*u, *v]));
        for (u, v, w) in edges {
            g.set_edge(Edge(VertexId(*u), VertexId(*v)), *w);
        }
        Ok(g)
    }

    fn materialize_vertices(&mut self, ids: impl Iterator<Item = u64>) {
        let max_id = ids.max();
        if let Some(max_id) = max_id {
            for id in 0..=max_id {
                self.add_vertex(VertexId(id));
            }
        }
    }

    pub fn measurement_probability(&mut self, mu: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&mu) {
            return Err(RouterError::InvalidArgument(format!(
                "measurement probability must be in [0, 1], got {}",
                mu
            )));
        }
        self.mu = mu;
        Ok(())
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn num_nodes(&self) -> usize {
        self.edge_map.len()
    }

    pub fn num_edges(&self) -> usize {
        self.capacity.len()
    }

    pub fn total_capacity(&self) -> f64 {
        self.capacity.values().sum()
    }

    /// (min, max) out-degree over all nodes. `(0, 0)` on an empty graph.
    pub fn out_degree_range(&self) -> (usize, usize) {
        degree_range(self.vertices().map(|v| self.degree_out(*v)))
    }

    /// (min, max) in-degree over all nodes. `(0, 0)` on an empty graph.
    pub fn in_degree_range(&self) -> (usize, usize) {
        degree_range(self.vertices().map(|v| self.degree_in(*v)))
    }

    /// Current `(u, v, w)` triples, stably ordered by `(src, dst)` so that
    /// constructing a fresh network from this output reproduces an
    /// identical `weights()` (spec.md §8 round-trip property). The
    /// teacher's `HashMap`-backed `edges()` iterator gives no such
    /// guarantee, so this sorts explicitly rather than reusing it as-is.
    pub fn weights(&self) -> Vec<(u64, u64, f64)> {
        let mut out: Vec<(u64, u64, f64)> = self
            .edges()
            .map(|e| (e.src().0, e.dst().0, *self.capacity.get(e).unwrap_or(&0.0)))
            .collect();
        out.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        out
    }

    pub fn capacity_of(&self, edge: &Edge) -> Option<f64> {
        self.capacity.get(edge).copied()
    }

    /// Subtracts `amount` from the capacity of `edge`. Clamps to zero
    /// rather than going negative on floating-point overshoot within
    /// `EPSILON`, preserving invariant 1 (every edge capacity >= 0).
    pub(crate) fn reserve(&mut self, edge: &Edge, amount: f64) {
        if let Some(cap) = self.capacity.get_mut(edge) {
            *cap -= amount;
            if *cap < 0.0 && *cap > -EPSILON {
                *cap = 0.0;
            }
        }
    }

    pub fn contains_vertex(&self, vertex_id: VertexId) -> bool {
        self.edge_map.contains_key(&vertex_id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &VertexId> {
        self.edge_map.keys()
    }

    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.capacity.contains_key(&edge)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_map
            .iter()
            .flat_map(|(vertex_id, edges)| edges.iter().filter(move |Edge(from, _)| *vertex_id == *from))
    }

    pub fn outbound_edges(&self, vertex_id: VertexId) -> impl Iterator<Item = &Edge> {
        self.edge_map
            .get(&vertex_id)
            .into_iter()
            .flat_map(|edges| edges.iter())
            .filter(move |e| e.0 == vertex_id)
    }

    pub fn inbound_edges(&self, vertex_id: VertexId) -> impl Iterator<Item = &Edge> {
        self.edge_map
            .get(&vertex_id)
            .into_iter()
            .flat_map(|edges| edges.iter())
            .filter(move |e| e.1 == vertex_id)
    }

    pub fn degree_out(&self, vertex_id: VertexId) -> usize {
        self.outbound_edges(vertex_id).count()
    }

    pub fn degree_in(&self, vertex_id: VertexId) -> usize {
        self.inbound_edges(vertex_id).count()
    }

    pub fn add_vertex(&mut self, vertex_id: VertexId) -> bool {
        let mut already_present = true;
        self.edge_map.entry(vertex_id).or_insert_with(|| {
            already_present = false;
            vec![]
        });
        already_present
    }

    fn set_edge(&mut self, edge: Edge, weight: f64) {
        let Edge(v1, v2) = edge;
        self.add_vertex(v1);
        self.add_vertex(v2);
        if !self.capacity.contains_key(&edge) {
            self.edge_map.get_mut(&v1).unwrap().push(edge);
            if edge.0 != edge.1 {
                self.edge_map.get_mut(&v2).unwrap().push(edge);
            }
        }
        self.capacity.insert(edge, weight);
    }

    /// Logically removes an edge from this (ephemeral) graph. Used by the
    /// flow router's working copy during bottleneck pruning -- the
    /// persisted network's topology never shrinks this way.
    pub fn remove_edge(&mut self, edge: Edge) {
        let Edge(src, dst) = edge;
        if let Some(edges) = self.edge_map.get_mut(&src) {
            edges.retain(|e| *e != edge);
        }
        if let Some(edges) = self.edge_map.get_mut(&dst) {
            edges.retain(|e| *e != edge);
        }
        self.capacity.remove(&edge);
    }
}

fn degree_range(degrees: impl Iterator<Item = usize>) -> (usize, usize) {
    degrees.fold(None, |acc: Option<(usize, usize)>, d| match acc {
        None => Some((d, d)),
        Some((min, max)) => Some((min.min(d), max.max(d))),
    })
    .unwrap_or((0, 0))
}
