use log::{debug, info, trace};

use crate::algorithms::{all_simple_paths, path_cost};
use crate::error::{Result, RouteError};
use crate::network::TopologyGraph;
use crate::protocol::{Admission, Route};
use crate::router::{Router, RouterDirectory};
use crate::NetworkId;

/// Counters collected over one derivation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationSummary {
    pub candidates: usize,
    pub appended: usize,
    pub replaced: usize,
    pub rejected: usize,
}

impl DerivationSummary {
    fn record(&mut self, outcome: &Admission) {
        self.candidates += 1;
        match outcome {
            Admission::Appended { .. } => self.appended += 1,
            Admission::ReplacedSameGateway { .. } | Admission::ReplacedBetterMetric { .. } => {
                self.replaced += 1
            }
            Admission::Rejected => self.rejected += 1,
        }
    }

    fn merge(&mut self, other: DerivationSummary) {
        self.candidates += other.candidates;
        self.appended += other.appended;
        self.replaced += other.replaced;
        self.rejected += other.rejected;
    }
}

/// Fills every router's routing table from the frozen topology.
///
/// Routers are visited in directory order and networks in discovery order.
/// For each pair every simple path is turned into one candidate, in
/// enumeration order, and offered to the router's table. Directly attached
/// networks (single-edge paths) never produce a candidate.
pub fn derive_routes(
    graph: &TopologyGraph,
    routers: &mut RouterDirectory,
    networks: &[NetworkId],
) -> Result<DerivationSummary> {
    let mut summary = DerivationSummary::default();

    for router in routers.iter_mut() {
        let router_summary = derive_router_routes(graph, router, networks)?;
        info!(
            "{}: {} routes from {} candidates",
            router.name,
            router.routing_table.len(),
            router_summary.candidates
        );
        summary.merge(router_summary);
    }

    Ok(summary)
}

/// Derives the routes of a single router. Only `router` is mutated.
pub fn derive_router_routes(
    graph: &TopologyGraph,
    router: &mut Router,
    networks: &[NetworkId],
) -> Result<DerivationSummary> {
    let mut summary = DerivationSummary::default();

    for network in networks {
        for path in all_simple_paths(graph, &router.name, network) {
            trace!("{} -> {}: path {:?}", router.name, network, path);

            if path.len() <= 2 {
                continue;
            }

            let candidate = candidate_route(graph, router, network, &path)?;
            let outcome = router.routing_table.admit(candidate.clone());

            match &outcome {
                Admission::Appended { .. } => {
                    debug!("{}: adding route {}", router.name, candidate)
                }
                Admission::ReplacedSameGateway { previous, .. }
                | Admission::ReplacedBetterMetric { previous, .. } => {
                    debug!("{}: route {} replaces {}", router.name, candidate, previous)
                }
                Admission::Rejected => {
                    debug!("{}: dropping redundant route {}", router.name, candidate)
                }
            }

            summary.record(&outcome);
        }
    }

    Ok(summary)
}

fn candidate_route(
    graph: &TopologyGraph,
    router: &Router,
    network: &str,
    path: &[String],
) -> Result<Route> {
    let next_hop = &path[1];
    let via = router
        .gateway_to(next_hop)
        .ok_or_else(|| RouteError::UnknownGateway {
            router: router.name.clone(),
            peer: next_hop.clone(),
        })?;
    let metric = path_cost(graph, path)?;

    Ok(Route::new(network, via, metric))
}
