pub mod algorithms;
pub mod config;
pub mod error;
pub mod network;
pub mod protocol;
pub mod report;
pub mod router;

pub use error::{Result, RouteError};

use network::TopologyGraph;
use protocol::DerivationSummary;
use router::RouterDirectory;

pub type RouterId = String;
pub type NetworkId = String;

/// Frozen view of a loaded topology: the weighted graph, the routers in
/// first-seen order and the attached networks in discovery order.
///
/// Routes are the only state mutated after loading, through
/// [`TopologyContext::derive_routes`].
#[derive(Debug, Clone, Default)]
pub struct TopologyContext {
    pub graph: TopologyGraph,
    pub routers: RouterDirectory,
    /// May contain duplicates when a network is attached more than once.
    pub networks: Vec<NetworkId>,
}

impl TopologyContext {
    pub fn derive_routes(&mut self) -> Result<DerivationSummary> {
        protocol::derive_routes(&self.graph, &mut self.routers, &self.networks)
    }
}
