use std::collections::HashMap;
use std::net::IpAddr;

use ipnet::IpNet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::protocol::RoutingTable;
use crate::{NetworkId, RouterId};

/// A directly connected router and the address used to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    pub router: RouterId,
    pub gateway: IpAddr,
    /// Our own address on the shared link.
    pub local_address: IpAddr,
    pub link: IpNet,
    pub metric: u32,
}

/// A network attached directly to a router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedNetwork {
    pub network: NetworkId,
    pub address: IpNet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Router {
    pub name: RouterId,
    pub peers: Vec<Peer>,
    pub attached: Vec<AttachedNetwork>,
    pub routing_table: RoutingTable,
}

impl Router {
    pub fn new(name: impl Into<RouterId>) -> Self {
        Self {
            name: name.into(),
            peers: Vec::new(),
            attached: Vec::new(),
            routing_table: RoutingTable::new(),
        }
    }

    pub fn add_peer(&mut self, peer: Peer) {
        debug!("{}: peer {} reachable via {}", self.name, peer.router, peer.gateway);
        self.peers.push(peer);
    }

    pub fn attach(&mut self, network: AttachedNetwork) {
        self.attached.push(network);
    }

    /// Address of the first recorded link towards `peer`.
    pub fn gateway_to(&self, peer: &str) -> Option<IpAddr> {
        self.peers
            .iter()
            .find(|p| p.router == peer)
            .map(|p| p.gateway)
    }

    pub fn is_attached_to(&self, network: &str) -> bool {
        self.attached.iter().any(|a| a.network == network)
    }
}

/// Routers by name, iterated in the order they were first referenced.
#[derive(Debug, Clone, Default)]
pub struct RouterDirectory {
    routers: Vec<Router>,
    index: HashMap<RouterId, usize>,
}

impl RouterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the router called `name`, registering it on first reference.
    pub fn get_or_create(&mut self, name: &str) -> &mut Router {
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                debug!("Registering router {}", name);
                self.routers.push(Router::new(name));
                self.index.insert(name.to_string(), self.routers.len() - 1);
                self.routers.len() - 1
            }
        };

        &mut self.routers[position]
    }

    pub fn get(&self, name: &str) -> Option<&Router> {
        self.index.get(name).map(|&i| &self.routers[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Router> {
        self.index.get(name).map(|&i| &mut self.routers[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Router> {
        self.routers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Router> {
        self.routers.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routers.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}
