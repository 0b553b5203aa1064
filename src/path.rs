///! Graph path implementation
use crate::graph::{Edge, VertexId};
use core::cmp::Ordering;

/// A simple path, represented as the full ordered vertex sequence including
/// the starting vertex. `Flow`/`App` descriptors store the spec's
/// src-excluded hop sequence instead (see `Path::hops`).
#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct Path {
    // FIXME used immutable Linked list here for cheap append + structural sharing
    pub vertices: Vec<VertexId>,
}

impl Path {
    pub fn empty() -> Path {
        Path { vertices: vec![] }
    }

    pub fn of(start: VertexId) -> Path {
        Path {
            vertices: vec![start],
        }
    }

    pub fn from(vertices: &Vec<VertexId>) -> Path {
        Path {
            vertices: vertices.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }

    /// Number of hops (edges) in the path.
    pub fn hop_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<&VertexId> {
        self.vertices.first()
    }

    pub fn last(&self) -> Option<&VertexId> {
        self.vertices.last()
    }

    pub fn contains_vertex(&self, vertex: &VertexId) -> bool {
        self.vertices.contains(vertex)
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.to_edge_list().find(|e| e == edge).is_some()
    }

    pub fn to_vertex_list(&self) -> impl Iterator<Item = &VertexId> + '_ {
        self.vertices.iter()
    }

    pub fn to_edge_list(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices
            .windows(2)
            .map(|slice| Edge(slice[0], slice[1]))
    }

    /// The hop sequence as stored on a `Flow`/`App` descriptor: excludes the
    /// source vertex, includes the destination.
    pub fn hops(&self) -> Vec<VertexId> {
        if self.vertices.is_empty() {
            vec![]
        } else {
            self.vertices[1..].to_vec()
        }
    }

    /// Indicates if this path contains a cycle
    pub fn contains_cycle(&self) -> bool {
        let mut set = std::collections::HashSet::<&VertexId>::new();
        for vid in &self.vertices {
            if set.contains(vid) {
                return true;
            }
            set.insert(vid);
        }
        return false;
    }

    /// Append a vertex to a path
    pub fn append(&self, vertex: VertexId) -> Path {
        // FIXME use a data structure with structural sharing to avoid the clone
        let mut new_path = Path {
            vertices: self.vertices.clone(),
        };
        new_path.vertices.push(vertex);
        new_path
    }
}

/// Scored path - understand as a weighted path

#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct ScoredPath {
    pub path: Path,
    pub score: i64,
}

impl PartialOrd for ScoredPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.cmp(&other.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u64) -> VertexId {
        VertexId(id)
    }

    #[test]
    fn hop_count_excludes_the_source() {
        let p = Path::from(&vec![v(0), v(1), v(2)]);
        assert_eq!(p.hop_count(), 2);
    }

    #[test]
    fn hops_excludes_source_includes_destination() {
        let p = Path::from(&vec![v(0), v(1), v(2)]);
        assert_eq!(p.hops(), vec![v(1), v(2)]);
    }

    #[test]
    fn single_vertex_path_has_no_hops() {
        let p = Path::of(v(0));
        assert_eq!(p.hops(), Vec::<VertexId>::new());
        assert_eq!(p.hop_count(), 0);
    }

    #[test]
    fn contains_cycle_detects_a_repeated_vertex() {
        let acyclic = Path::from(&vec![v(0), v(1), v(2)]);
        let cyclic = Path::from(&vec![v(0), v(1), v(0)]);
        assert!(!acyclic.contains_cycle());
        assert!(cyclic.contains_cycle());
    }
}
