//! Capacity-aware routing core for a quantum repeater network.
//!
//! Two independent admission strategies sit on top of a shared capacity
//! graph (`network`): the flow router (`flow`) admits fixed-rate
//! point-to-point demands one at a time, and the app allocator (`app`)
//! spreads elastic multi-peer demand across cached k-shortest paths
//! (`yen`) under a priority-weighted round-robin.
pub mod app;
pub mod dot;
pub mod error;
pub mod flow;
pub mod graph;
pub mod iter;
pub mod network;
pub mod path;
pub mod policy;
pub mod search;
pub mod weight_source;
pub mod yen;

pub use app::{Allocation, AllocatorConfig, App};
pub use error::{Result, RouterError};
pub use flow::Flow;
pub use graph::{Edge, VertexId};
pub use network::Network;
pub use policy::Policy;
pub use weight_source::{ConstantWeightSource, UniformWeightSource, WeightSource};
