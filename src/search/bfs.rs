//! Hop-count shortest path search.
//!
//! spec.md §9(b) standardizes shortest-path search on hop-count
//! minimization rather than the stored capacity weight, since fewer hops
//! maximize the delivered fidelity μ^(h-1). A breadth-first search with
//! parent pointers gives the minimum-hop path directly, in the same style
//! the teacher's `iter::iter_breadth` traverses a graph (FIFO queue,
//! visited set) but reconstructing a single path instead of yielding every
//! reachable path.
use crate::graph::{Edge, VertexId};
use crate::iter::iter_datastructure::{Queue, SearchQueue};
use crate::network::Network;
use crate::path::Path;
use std::collections::{HashMap, HashSet};

/// Finds a minimum-hop path from `start` to `end`, or `None` if `end` is
/// unreachable.
pub fn shortest_hop_path(graph: &Network, start: VertexId, end: VertexId) -> Option<Path> {
    shortest_hop_path_avoiding(graph, start, end, &HashSet::new(), &HashSet::new())
}

/// As `shortest_hop_path`, but treats `avoid_vertices` and `avoid_edges` as
/// absent from the graph for the duration of the search. Used by Yen's
/// algorithm to compute spur paths without mutating or cloning the graph.
pub fn shortest_hop_path_avoiding(
    graph: &Network,
    start: VertexId,
    end: VertexId,
    avoid_vertices: &HashSet<VertexId>,
    avoid_edges: &HashSet<Edge>,
) -> Option<Path> {
    if avoid_vertices.contains(&start) || avoid_vertices.contains(&end) {
        return None;
    }
    if start == end {
        return Some(Path::of(start));
    }

    let mut visited: HashSet<VertexId> = HashSet::new();
    visited.insert(start);
    let mut parent: HashMap<VertexId, VertexId> = HashMap::new();
    let mut queue: Queue<VertexId> = Queue::new();
    queue.push(start);

    while let Some(current) = queue.pop() {
        for edge in graph.outbound_edges(current) {
            if avoid_edges.contains(edge) {
                continue;
            }
            let next = edge.dst();
            if avoid_vertices.contains(&next) || visited.contains(&next) {
                continue;
            }
            visited.insert(next);
            parent.insert(next, current);
            if next == end {
                return Some(reconstruct(&parent, start, end));
            }
            queue.push(next);
        }
    }
    None
}

fn reconstruct(parent: &HashMap<VertexId, VertexId>, start: VertexId, end: VertexId) -> Path {
    let mut vertices = vec![end];
    let mut current = end;
    while current != start {
        current = *parent.get(&current).expect("BFS parent chain must reach start");
        vertices.push(current);
    }
    vertices.reverse();
    Path::from(&vertices)
}
