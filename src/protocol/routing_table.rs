use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::NetworkId;

/// One routing table entry: reach `destination` through `via` at `metric`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub destination: NetworkId,
    pub via: IpAddr,
    pub metric: u32,
}

impl Route {
    pub fn new(destination: impl Into<NetworkId>, via: IpAddr, metric: u32) -> Self {
        Self {
            destination: destination.into(),
            via,
            metric,
        }
    }

    /// Same destination, same gateway, strictly lower metric.
    pub fn can_replace(&self, existing: &Route) -> bool {
        self.destination == existing.destination
            && self.via == existing.via
            && self.metric < existing.metric
    }

    /// Same destination, strictly lower metric, whatever the gateway.
    pub fn is_better_than(&self, existing: &Route) -> bool {
        self.destination == existing.destination && self.metric < existing.metric
    }

    /// Same destination and gateway as `existing` but strictly worse.
    pub fn is_redundant_with(&self, existing: &Route) -> bool {
        self.destination == existing.destination
            && self.via == existing.via
            && self.metric > existing.metric
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {} metric {}", self.destination, self.via, self.metric)
    }
}

/// Outcome of [`RoutingTable::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// An entry with the same destination and gateway was overwritten.
    ReplacedSameGateway { position: usize, previous: Route },
    /// An entry with the same destination and a higher metric was
    /// overwritten, regardless of its gateway.
    ReplacedBetterMetric { position: usize, previous: Route },
    /// A known gateway already reaches the destination more cheaply.
    Rejected,
    Appended { position: usize },
}

/// Ordered routing table of a single router.
///
/// Entries only change through [`RoutingTable::admit`], which applies a
/// first-match, in-place policy. The result depends on the order in which
/// candidates arrive: a worse route admitted before the optimum can survive
/// next to it. This is not a per-destination minimum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers `candidate` to the table.
    ///
    /// Entries are scanned from first to last; at each position the
    /// candidate overwrites the entry if it can replace it (same gateway,
    /// lower metric) or is better than it (lower metric, any gateway), and
    /// scanning stops at the first overwrite. With no overwrite, a candidate
    /// that is strictly worse than an entry with the same destination and
    /// gateway is dropped; anything else is appended.
    ///
    /// The gateway-agnostic overwrite can discard an entry through another
    /// gateway that the same-gateway rule alone would have kept. That
    /// behaviour is kept as is.
    pub fn admit(&mut self, candidate: Route) -> Admission {
        for position in 0..self.routes.len() {
            let existing = &self.routes[position];

            if candidate.can_replace(existing) {
                let previous = std::mem::replace(&mut self.routes[position], candidate);
                return Admission::ReplacedSameGateway { position, previous };
            }

            if candidate.is_better_than(existing) {
                let previous = std::mem::replace(&mut self.routes[position], candidate);
                return Admission::ReplacedBetterMetric { position, previous };
            }
        }

        if self.routes.iter().any(|e| candidate.is_redundant_with(e)) {
            return Admission::Rejected;
        }

        self.routes.push(candidate);
        Admission::Appended {
            position: self.routes.len() - 1,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn routes_to<'a>(&'a self, destination: &'a str) -> impl Iterator<Item = &'a Route> {
        self.routes.iter().filter(move |r| r.destination == destination)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
