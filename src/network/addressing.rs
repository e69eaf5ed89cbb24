use std::net::IpAddr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// Host addresses assigned to the two ends of a point-to-point link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAddresses {
    pub first: IpAddr,
    pub second: IpAddr,
}

/// Numbers a point-to-point link: the first usable host goes to the first
/// router, the second usable host to the second router.
///
/// A /31 (or /127) link uses both of its addresses; a single-address network
/// cannot number a link.
pub fn allocate_link_addresses(network: &IpNet) -> Result<LinkAddresses> {
    let mut hosts = network.hosts();

    match (hosts.next(), hosts.next()) {
        (Some(first), Some(second)) => Ok(LinkAddresses { first, second }),
        _ => Err(RouteError::AddressExhausted {
            network: network.to_string(),
        }),
    }
}
