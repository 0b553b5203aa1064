//! Core identifiers shared by every module: node handles and directed edges.
use std::fmt;

/// Identifies a node. Node identifiers used by clients correspond one-to-one
/// with internal vertex handles; no payload is attached.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Debug)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge (src, dst). Capacity is not carried on the edge itself;
/// it lives in the owning `Network`'s weight map, keyed by `Edge`.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug)]
pub struct Edge(pub VertexId, pub VertexId);

impl Edge {
    pub fn src(&self) -> VertexId {
        self.0
    }

    pub fn dst(&self) -> VertexId {
        self.1
    }

    /// The edge travelling the opposite direction between the same two vertices.
    pub fn reverse(&self) -> Edge {
        Edge(self.1, self.0)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.0, self.1)
    }
}
