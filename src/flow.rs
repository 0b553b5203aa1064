//! The Flow Router (spec.md §4.2): admits fixed-rate point-to-point demands
//! one at a time, searching for a hop-count-shortest path, verifying
//! residual capacity, and pruning the bottleneck edge on infeasibility.
use crate::error::{Result, RouterError};
use crate::graph::{Edge, VertexId};
use crate::network::{Network, EPSILON};
use crate::search::bfs;
use log::{debug, trace, warn};

/// A fixed-rate point-to-point demand. `path` and `gross_rate` are the
/// router's output; an empty `path` after `route` means the flow was
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub src: VertexId,
    pub dst: VertexId,
    pub net_rate: f64,
    /// Hop sequence excluding `src`, including `dst`. Empty until admitted.
    pub path: Vec<VertexId>,
    pub gross_rate: f64,
    pub dijkstra_count: u64,
}

impl Flow {
    pub fn new(src: VertexId, dst: VertexId, net_rate: f64) -> Flow {
        Flow {
            src,
            dst,
            net_rate,
            path: vec![],
            gross_rate: 0.0,
            dijkstra_count: 0,
        }
    }

    pub fn is_admitted(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Admits `flows` against `network` in input order, with no veto function.
pub fn route(network: &mut Network, flows: &mut [Flow]) -> Result<()> {
    route_with_check(network, flows, |_| true)
}

/// As `route`, but each tentatively-feasible flow must also pass
/// `check_fn` before it is committed. `check_fn` sees the flow with its
/// tentative `path`/`gross_rate` already populated.
pub fn route_with_check<F>(network: &mut Network, flows: &mut [Flow], check_fn: F) -> Result<()>
where
    F: Fn(&Flow) -> bool,
{
    validate_batch(network, flows)?;
    for flow in flows.iter_mut() {
        admit(network, flow, &check_fn);
    }
    Ok(())
}

fn validate_batch(network: &Network, flows: &[Flow]) -> Result<()> {
    for f in flows {
        if f.src == f.dst {
            return Err(RouterError::InvalidFlow(format!(
                "src and dst must differ, got {}",
                f.src
            )));
        }
        if !network.contains_vertex(f.src) {
            return Err(RouterError::InvalidFlow(format!("unknown src node {}", f.src)));
        }
        if !network.contains_vertex(f.dst) {
            return Err(RouterError::InvalidFlow(format!("unknown dst node {}", f.dst)));
        }
        if f.net_rate <= 0.0 {
            return Err(RouterError::InvalidFlow(format!(
                "net_rate must be > 0, got {}",
                f.net_rate
            )));
        }
    }
    Ok(())
}

fn admit<F: Fn(&Flow) -> bool>(network: &mut Network, flow: &mut Flow, check_fn: &F) {
    let mut working = network.clone();
    let prune_budget = network.num_edges() + 1;

    for _ in 0..=prune_budget {
        flow.dijkstra_count += 1;
        debug!(
            "flow {}->{}: dijkstra invocation #{}",
            flow.src, flow.dst, flow.dijkstra_count
        );
        let path = match bfs::shortest_hop_path(&working, flow.src, flow.dst) {
            Some(p) => p,
            None => {
                warn!("flow {}->{} rejected: unreachable", flow.src, flow.dst);
                return;
            }
        };

        let hops = path.hop_count();
        let gross = match gross_rate(flow.net_rate, network.mu(), hops) {
            Some(g) => g,
            None => {
                warn!(
                    "flow {}->{} rejected: infeasible at mu=0 over {} hops",
                    flow.src, flow.dst, hops
                );
                return;
            }
        };

        let edges: Vec<Edge> = path.to_edge_list().collect();
        let feasible = edges
            .iter()
            .all(|e| network.capacity_of(e).unwrap_or(0.0) >= gross - EPSILON);

        if feasible {
            let mut tentative = flow.clone();
            tentative.path = path.hops();
            tentative.gross_rate = gross;
            if !check_fn(&tentative) {
                warn!("flow {}->{} rejected by check_fn", flow.src, flow.dst);
                return;
            }
            for e in &edges {
                network.reserve(e, gross);
            }
            flow.path = path.hops();
            flow.gross_rate = gross;
            return;
        }

        if let Some(bottleneck) = first_occurrence_min_capacity(&working, &edges) {
            trace!(
                "flow {}->{}: pruning bottleneck edge {}",
                flow.src, flow.dst, bottleneck
            );
            working.remove_edge(bottleneck);
        } else {
            // Path had no edges to prune (only possible if src == dst, excluded upfront).
            break;
        }
    }
    warn!(
        "flow {}->{} rejected: exhausted bottleneck-prune budget",
        flow.src, flow.dst
    );
}

/// Returns the smallest-capacity edge along `path_edges` as measured on
/// `graph`, ties broken by first occurrence (spec.md §9(a)).
fn first_occurrence_min_capacity(graph: &Network, path_edges: &[Edge]) -> Option<Edge> {
    path_edges
        .iter()
        .map(|e| (*e, graph.capacity_of(e).unwrap_or(0.0)))
        .fold(None, |acc: Option<(Edge, f64)>, (edge, cap)| match acc {
            None => Some((edge, cap)),
            Some((_, acc_cap)) if cap < acc_cap => Some((edge, cap)),
            kept => kept,
        })
        .map(|(edge, _)| edge)
}

/// `gross = net_rate / μ^(h-1)`. `None` signals the μ=0, multi-hop
/// infeasible case (spec.md §3).
fn gross_rate(net_rate: f64, mu: f64, hops: usize) -> Option<f64> {
    if mu == 0.0 {
        return if hops > 1 { None } else { Some(net_rate) };
    }
    Some(net_rate / mu.powi(hops as i32 - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    fn v(id: u64) -> VertexId {
        VertexId(id)
    }

    // Seed scenario 1: two-node direct link
    #[test]
    fn two_node_direct_link_is_admitted_at_mu_one() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 10.0)]).unwrap();
        let mut flows = vec![Flow::new(v(0), v(1), 3.0)];
        route(&mut g, &mut flows).unwrap();
        let f = &flows[0];
        assert_eq!(f.path, vec![v(1)]);
        assert_eq!(f.gross_rate, 3.0);
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(7.0));
        assert!(f.dijkstra_count >= 1);
    }

    // Seed scenario 2: three-node chain with swap loss
    #[test]
    fn three_node_chain_accounts_for_measurement_loss() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 10.0), (1, 2, 10.0)]).unwrap();
        g.measurement_probability(0.5).unwrap();
        let mut flows = vec![Flow::new(v(0), v(2), 2.0)];
        route(&mut g, &mut flows).unwrap();
        let f = &flows[0];
        assert_eq!(f.path, vec![v(1), v(2)]);
        assert_eq!(f.gross_rate, 4.0);
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(6.0));
        assert_eq!(g.capacity_of(&Edge(v(1), v(2))), Some(6.0));
    }

    // Seed scenario 3: bottleneck reroute
    #[test]
    fn bottleneck_edge_triggers_reroute() {
        let mut g = Network::from_weighted_edges(&[
            (0, 1, 1.0),
            (1, 3, 10.0),
            (0, 2, 10.0),
            (2, 3, 10.0),
        ])
        .unwrap();
        let mut flows = vec![Flow::new(v(0), v(3), 5.0)];
        route(&mut g, &mut flows).unwrap();
        let f = &flows[0];
        assert_eq!(f.path, vec![v(2), v(3)]);
        assert_eq!(f.gross_rate, 5.0);
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(1.0));
        assert_eq!(g.capacity_of(&Edge(v(0), v(2))), Some(5.0));
        assert_eq!(g.capacity_of(&Edge(v(2), v(3))), Some(5.0));
        assert!(f.dijkstra_count >= 2);
    }

    // Seed scenario 4: unreachable destination
    #[test]
    fn unreachable_destination_is_rejected() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0), (2, 3, 5.0)]).unwrap();
        let mut flows = vec![Flow::new(v(0), v(3), 1.0)];
        route(&mut g, &mut flows).unwrap();
        assert!(!flows[0].is_admitted());
        assert_eq!(flows[0].path, Vec::<VertexId>::new());
    }

    // Seed scenario 6: check_fn veto
    #[test]
    fn check_fn_veto_rejects_and_leaves_capacity_untouched() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 10.0)]).unwrap();
        let mut flows = vec![Flow::new(v(0), v(1), 3.0)];
        route_with_check(&mut g, &mut flows, |_| false).unwrap();
        assert!(!flows[0].is_admitted());
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(10.0));
    }

    #[test]
    fn mu_zero_rejects_multi_hop_but_admits_single_hop() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 10.0), (1, 2, 10.0)]).unwrap();
        g.measurement_probability(0.0).unwrap();
        let mut flows = vec![Flow::new(v(0), v(2), 2.0), Flow::new(v(0), v(1), 2.0)];
        route(&mut g, &mut flows).unwrap();
        assert!(!flows[0].is_admitted());
        assert!(flows[1].is_admitted());
        assert_eq!(flows[1].gross_rate, 2.0);
    }

    #[test]
    fn net_rate_above_total_capacity_is_rejected() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut flows = vec![Flow::new(v(0), v(1), 10.0)];
        route(&mut g, &mut flows).unwrap();
        assert!(!flows[0].is_admitted());
    }

    #[test]
    fn invalid_flow_batch_is_rejected_before_any_mutation() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut flows = vec![Flow::new(v(0), v(1), 1.0), Flow::new(v(0), v(0), 1.0)];
        let err = route(&mut g, &mut flows).unwrap_err();
        assert!(matches!(err, RouterError::InvalidFlow(_)));
        // Nothing committed: even the valid flow in the batch is untouched.
        assert_eq!(flows[0].path, Vec::<VertexId>::new());
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(5.0));
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut flows: Vec<Flow> = vec![];
        route(&mut g, &mut flows).unwrap();
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(5.0));
    }

    #[test]
    fn sequential_flows_see_each_others_residual_capacity() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut flows = vec![Flow::new(v(0), v(1), 3.0), Flow::new(v(0), v(1), 3.0)];
        route(&mut g, &mut flows).unwrap();
        assert!(flows[0].is_admitted());
        assert!(!flows[1].is_admitted());
    }

    use proptest::prelude::*;

    proptest! {
        // spec.md §3: gross_rate * mu^(h-1) reproduces the requested net_rate,
        // over arbitrary chain lengths and measurement probabilities.
        #[test]
        fn gross_rate_conserves_net_rate_across_a_chain(
            hops in 1usize..6,
            net_rate in 0.1f64..10.0,
            mu in 0.3f64..1.0,
        ) {
            let edges: Vec<(u64, u64, f64)> = (0..hops as u64).map(|i| (i, i + 1, 1e9)).collect();
            let mut g = Network::from_weighted_edges(&edges).unwrap();
            g.measurement_probability(mu).unwrap();
            let mut flows = vec![Flow::new(v(0), v(hops as u64), net_rate)];
            route(&mut g, &mut flows).unwrap();
            prop_assert!(flows[0].is_admitted());
            let delivered = flows[0].gross_rate * mu.powi(hops as i32 - 1);
            prop_assert!((delivered - net_rate).abs() < 1e-6);
        }
    }
}
