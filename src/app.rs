//! The App Allocator (spec.md §4.3): iteratively assigns multiple paths to
//! elastic multi-peer demands under priority weights and a deficit-counter
//! round-robin scheme.
use crate::error::{Result, RouterError};
use crate::graph::{Edge, VertexId};
use crate::network::Network;
use crate::path::Path;
use crate::policy::Policy;
use crate::yen;
use log::{debug, trace};
use rand::Rng;

/// Minimum residual capacity, on every edge of a path, for that path to be
/// considered feasible during allocation (spec.md §4.3's "quantum ε").
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// One allocated path for an app: the net rate it delivers end-to-end, the
/// gross rate reserved on every edge, and the hop sequence (excluding the
/// app's host, including the terminating peer).
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub net_rate: f64,
    pub gross_rate: f64,
    pub path: Vec<VertexId>,
}

/// An elastic multi-peer demand hosted at one node, served by one or more
/// peers, with a priority weight.
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub host: VertexId,
    pub peers: Vec<VertexId>,
    pub priority: f64,
    pub paths: Vec<Allocation>,
    pub yen_count: u64,
    /// Deficit counter, in gross EPR/s, accumulated across rounds and
    /// retained in the descriptor once allocation terminates.
    pub delta: f64,
}

impl App {
    pub fn new(host: VertexId, peers: Vec<VertexId>, priority: f64) -> App {
        App {
            host,
            peers,
            priority,
            paths: vec![],
            yen_count: 0,
            delta: 0.0,
        }
    }

    pub fn is_served(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// Tunable knobs for `allocate`, in place of a file-based configuration
/// layer -- this is a library, so configuration is just constructor
/// parameters, same posture as the teacher's CLI-flag-driven tools.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorConfig {
    /// Maximum simple paths per (host, peer) pair to pre-compute via Yen's
    /// algorithm.
    pub k: usize,
    pub policy: Policy,
    pub epsilon: f64,
    /// Caps the number of rounds even if apps keep making progress.
    pub max_rounds: Option<usize>,
}

impl AllocatorConfig {
    pub fn new(k: usize, policy: Policy) -> AllocatorConfig {
        AllocatorConfig {
            k,
            policy,
            epsilon: DEFAULT_EPSILON,
            max_rounds: None,
        }
    }
}

struct PeerCache {
    peer: VertexId,
    paths: Vec<Path>,
    reinvoked: bool,
}

/// Admits `apps` against `network` under `config`, mutating each app's
/// `paths`, `yen_count` and `delta` in place.
pub fn allocate(network: &mut Network, apps: &mut [App], config: &AllocatorConfig) -> Result<()> {
    validate_batch(network, apps)?;
    if apps.is_empty() {
        return Ok(());
    }

    let mut caches: Vec<Vec<PeerCache>> = apps
        .iter_mut()
        .map(|app| setup_peer_cache(network, app, config.k))
        .collect();

    let total_priority: f64 = apps.iter().map(|a| a.priority).sum();
    let mut round = 0usize;

    loop {
        if let Some(cap) = config.max_rounds {
            if round >= cap {
                debug!("allocation stopped: reached the {}-round cap", cap);
                break;
            }
        }

        let mut any_admission = false;
        for (app, cache) in apps.iter_mut().zip(caches.iter_mut()) {
            let share = app.priority / total_priority;
            app.delta += share;

            if app.delta < config.epsilon {
                continue;
            }

            refresh_exhausted_peers(network, app, cache, config);

            let chosen = select_path(network, config.policy, cache, config.epsilon);
            let chosen = match chosen {
                Some(p) => p,
                None => continue,
            };

            let hops = chosen.hop_count();
            let edges: Vec<Edge> = chosen.to_edge_list().collect();
            let bottleneck = edges
                .iter()
                .map(|e| network.capacity_of(e).unwrap_or(0.0))
                .fold(f64::INFINITY, f64::min);
            let amount = app.delta.min(bottleneck);
            if amount < config.epsilon {
                continue;
            }

            for e in &edges {
                network.reserve(e, amount);
            }
            let net_delivered = amount * network.mu().powi(hops as i32 - 1);
            merge_allocation(&mut app.paths, chosen.hops(), net_delivered, amount);
            app.delta -= amount;
            any_admission = true;
            trace!(
                "app@{} admitted {:.6} gross EPR/s over {} hops",
                app.host, amount, hops
            );
        }

        round += 1;
        if !any_admission {
            debug!("allocation converged after {} rounds", round);
            break;
        }
    }

    Ok(())
}

fn validate_batch(network: &Network, apps: &[App]) -> Result<()> {
    for app in apps {
        if !network.contains_vertex(app.host) {
            return Err(RouterError::InvalidApp(format!("unknown host {}", app.host)));
        }
        if app.peers.is_empty() {
            return Err(RouterError::InvalidApp(format!(
                "app hosted at {} has no peers",
                app.host
            )));
        }
        if app.priority <= 0.0 {
            return Err(RouterError::InvalidApp(format!(
                "priority must be > 0, got {}",
                app.priority
            )));
        }
    }
    Ok(())
}

fn setup_peer_cache(network: &Network, app: &mut App, k: usize) -> Vec<PeerCache> {
    app.peers
        .iter()
        .map(|&peer| {
            app.yen_count += 1;
            PeerCache {
                peer,
                paths: yen::k_shortest_paths(network, app.host, peer, k),
                reinvoked: false,
            }
        })
        .collect()
}

fn is_feasible(network: &Network, path: &Path, epsilon: f64) -> bool {
    path.to_edge_list()
        .all(|e| network.capacity_of(&e).unwrap_or(0.0) >= epsilon)
}

/// If every cached path to a peer has become infeasible, try once to widen
/// the search and discover an alternative (spec.md §4.3's "possibly
/// re-invoked if cached paths are exhausted").
fn refresh_exhausted_peers(
    network: &Network,
    app: &mut App,
    cache: &mut [PeerCache],
    config: &AllocatorConfig,
) {
    for entry in cache.iter_mut() {
        let all_infeasible = !entry.paths.is_empty()
            && entry
                .paths
                .iter()
                .all(|p| !is_feasible(network, p, config.epsilon));
        if all_infeasible && !entry.reinvoked {
            entry.reinvoked = true;
            app.yen_count += 1;
            let widened = yen::k_shortest_paths(network, app.host, entry.peer, config.k + 1);
            if widened.len() > entry.paths.len() {
                entry.paths = widened;
            }
        }
    }
}

fn select_path(
    network: &Network,
    policy: Policy,
    cache: &[PeerCache],
    epsilon: f64,
) -> Option<Path> {
    let feasible: Vec<&Path> = cache
        .iter()
        .flat_map(|entry| entry.paths.iter())
        .filter(|p| is_feasible(network, p, epsilon))
        .collect();
    if feasible.is_empty() {
        return None;
    }

    use crate::policy::Policy::*;
    match policy.base() {
        Random => {
            let idx = rand::thread_rng().gen_range(0, feasible.len());
            Some(feasible[idx].clone())
        }
        ShortestPath => feasible
            .into_iter()
            .min_by(|a, b| a.hop_count().cmp(&b.hop_count()).then_with(|| a.vertices.cmp(&b.vertices)))
            .cloned(),
        LoadBalancing => feasible
            .into_iter()
            .max_by(|a, b| {
                bottleneck_capacity(network, a)
                    .partial_cmp(&bottleneck_capacity(network, b))
                    .unwrap()
            })
            .cloned(),
        RandomFeas | SpfFeas | BestfitFeas => unreachable!("base() never returns a *Feas variant"),
    }
}

fn bottleneck_capacity(network: &Network, path: &Path) -> f64 {
    path.to_edge_list()
        .map(|e| network.capacity_of(&e).unwrap_or(0.0))
        .fold(f64::INFINITY, f64::min)
}

fn merge_allocation(paths: &mut Vec<Allocation>, hops: Vec<VertexId>, net_rate: f64, gross_rate: f64) {
    if let Some(existing) = paths.iter_mut().find(|a| a.path == hops) {
        existing.net_rate += net_rate;
        existing.gross_rate += gross_rate;
    } else {
        paths.push(Allocation {
            net_rate,
            gross_rate,
            path: hops,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    fn v(id: u64) -> VertexId {
        VertexId(id)
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut apps: Vec<App> = vec![];
        let config = AllocatorConfig::new(3, Policy::ShortestPath);
        allocate(&mut g, &mut apps, &config).unwrap();
        assert_eq!(g.capacity_of(&Edge(v(0), v(1))), Some(5.0));
    }

    #[test]
    fn invalid_app_batch_is_rejected_before_any_mutation() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut apps = vec![App::new(v(0), vec![], 1.0)];
        let config = AllocatorConfig::new(3, Policy::ShortestPath);
        let err = allocate(&mut g, &mut apps, &config).unwrap_err();
        assert!(matches!(err, RouterError::InvalidApp(_)));
    }

    #[test]
    fn unknown_host_is_rejected() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut apps = vec![App::new(v(99), vec![v(1)], 1.0)];
        let config = AllocatorConfig::new(3, Policy::ShortestPath);
        assert!(allocate(&mut g, &mut apps, &config).is_err());
    }

    #[test]
    fn non_positive_priority_is_rejected() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0)]).unwrap();
        let mut apps = vec![App::new(v(0), vec![v(1)], 0.0)];
        let config = AllocatorConfig::new(3, Policy::ShortestPath);
        assert!(allocate(&mut g, &mut apps, &config).is_err());
    }

    #[test]
    fn unreachable_peer_is_simply_unserved_not_an_error() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 5.0), (2, 3, 5.0)]).unwrap();
        let mut apps = vec![App::new(v(0), vec![v(3)], 1.0)];
        let config = AllocatorConfig::new(3, Policy::ShortestPath);
        allocate(&mut g, &mut apps, &config).unwrap();
        assert!(!apps[0].is_served());
    }

    // Seed scenario 5: load-balancing splits aggregate admission ~evenly
    #[test]
    fn load_balancing_splits_residual_across_two_disjoint_equal_paths() {
        let mut g = Network::from_weighted_edges(&[
            (0, 1, 5.0),
            (1, 2, 5.0),
            (0, 3, 5.0),
            (3, 2, 5.0),
        ])
        .unwrap();
        let mut apps = vec![App::new(v(0), vec![v(2)], 1.0), App::new(v(0), vec![v(2)], 1.0)];
        let config = AllocatorConfig {
            k: 4,
            policy: Policy::LoadBalancing,
            epsilon: 1e-6,
            max_rounds: Some(2000),
        };
        allocate(&mut g, &mut apps, &config).unwrap();

        let r1 = g.capacity_of(&Edge(v(0), v(1))).unwrap();
        let r2 = g.capacity_of(&Edge(v(0), v(3))).unwrap();
        // LoadBalancing always routes the next quantum onto whichever path
        // currently has more residual, so the two paths can never drift
        // apart by more than one round's worth of share (priority/total = 0.5
        // gross EPR/s here) before the next pick closes the gap again.
        let quantum = 0.5;
        assert!((r1 - r2).abs() <= quantum + 1e-9);
        assert!(r1 < 5.0 && r2 < 5.0);
    }

    #[test]
    fn shortest_path_policy_prefers_fewer_hops() {
        let mut g =
            Network::from_weighted_edges(&[(0, 1, 10.0), (0, 2, 10.0), (2, 3, 10.0), (1, 3, 10.0)])
                .unwrap();
        // 0->1->3 is not direct (2 hops); give a direct 1-hop alternative too.
        g.remove_edge(Edge(v(1), v(3)));
        let mut apps = vec![App::new(v(0), vec![v(1), v(3)], 1.0)];
        let config = AllocatorConfig {
            k: 3,
            policy: Policy::ShortestPath,
            epsilon: 1e-6,
            max_rounds: Some(500),
        };
        allocate(&mut g, &mut apps, &config).unwrap();
        assert!(apps[0].is_served());
        // The 1-hop path to peer 1 should have been favored at least once.
        assert!(apps[0].paths.iter().any(|a| a.path == vec![v(1)]));
    }

    #[test]
    fn terminal_delta_is_retained_on_the_descriptor() {
        let mut g = Network::from_weighted_edges(&[(0, 1, 0.0)]).unwrap();
        let mut apps = vec![App::new(v(0), vec![v(1)], 1.0)];
        let config = AllocatorConfig {
            k: 1,
            policy: Policy::ShortestPath,
            epsilon: 1e-6,
            max_rounds: Some(3),
        };
        allocate(&mut g, &mut apps, &config).unwrap();
        assert!(!apps[0].is_served());
        assert!(apps[0].delta > 0.0);
    }
}
