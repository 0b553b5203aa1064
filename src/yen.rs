//! Yen's algorithm: up to `k` loopless shortest (by hop count) paths
//! between a host and a peer, cached by the app allocator (spec.md §4.3).
//!
//! Each spur search reuses `search::bfs::shortest_hop_path_avoiding`
//! instead of cloning/mutating the graph the way the flow router's
//! bottleneck-prune loop does -- Yen's algorithm only ever needs to treat a
//! handful of vertices/edges as temporarily absent, which the BFS helper
//! already supports directly.
use crate::graph::{Edge, VertexId};
use crate::iter::iter_datastructure::{MinPriorityQueue, SearchQueue};
use crate::network::Network;
use crate::path::{Path, ScoredPath};
use crate::search::bfs;
use std::collections::HashSet;

/// Returns up to `k` loopless paths from `start` to `end`, ordered
/// shortest-first by hop count. Fewer than `k` paths are returned if fewer
/// exist; an empty vector means `end` is unreachable from `start`.
pub fn k_shortest_paths(graph: &Network, start: VertexId, end: VertexId, k: usize) -> Vec<Path> {
    if k == 0 || start == end {
        return vec![];
    }
    let first = match bfs::shortest_hop_path(graph, start, end) {
        Some(p) => p,
        None => return vec![],
    };

    let mut found: Vec<Path> = vec![first];
    let mut candidates: MinPriorityQueue<ScoredPath> = MinPriorityQueue::new();
    let mut candidates_seen: HashSet<Vec<VertexId>> = HashSet::new();

    while found.len() < k {
        let previous = found.last().unwrap().vertices.clone();
        for i in 0..previous.len().saturating_sub(1) {
            let spur_node = previous[i];
            let root_prefix = previous[0..i].to_vec();

            let avoid_edges: HashSet<Edge> = found
                .iter()
                .filter(|p| p.vertices.len() > i && p.vertices[0..i] == root_prefix[..])
                .filter_map(|p| {
                    if p.vertices.len() > i + 1 {
                        Some(Edge(p.vertices[i], p.vertices[i + 1]))
                    } else {
                        None
                    }
                })
                .collect();
            let avoid_vertices: HashSet<VertexId> = root_prefix.iter().cloned().collect();

            if let Some(spur_path) =
                bfs::shortest_hop_path_avoiding(graph, spur_node, end, &avoid_vertices, &avoid_edges)
            {
                let mut total_vertices = root_prefix.clone();
                total_vertices.extend(spur_path.vertices.iter().cloned());
                let total = Path::from(&total_vertices);
                if !found.contains(&total) && !candidates_seen.contains(&total.vertices) {
                    candidates_seen.insert(total.vertices.clone());
                    candidates.push(ScoredPath {
                        score: total.hop_count() as i64,
                        path: total,
                    });
                }
            }
        }

        match candidates.pop() {
            Some(scored) => found.push(scored.path),
            None => break,
        }
    }

    found
}
