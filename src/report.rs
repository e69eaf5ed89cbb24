use std::fmt::Write;
use std::net::IpAddr;

use petgraph::dot::Dot;
use serde::Serialize;

use crate::error::Result;
use crate::network::TopologyGraph;
use crate::protocol::Route;
use crate::router::{AttachedNetwork, RouterDirectory};

#[derive(Debug, Clone, Serialize)]
pub struct PeerReport {
    pub router: String,
    pub gateway: IpAddr,
    pub local_address: IpAddr,
    pub metric: u32,
}

/// Read-only view of one router, as exported to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RouterReport {
    pub name: String,
    pub attached: Vec<AttachedNetwork>,
    pub peers: Vec<PeerReport>,
    pub routes: Vec<Route>,
}

pub fn router_reports(routers: &RouterDirectory) -> Vec<RouterReport> {
    routers
        .iter()
        .map(|router| RouterReport {
            name: router.name.clone(),
            attached: router.attached.clone(),
            peers: router
                .peers
                .iter()
                .map(|p| PeerReport {
                    router: p.router.clone(),
                    gateway: p.gateway,
                    local_address: p.local_address,
                    metric: p.metric,
                })
                .collect(),
            routes: router.routing_table.routes().to_vec(),
        })
        .collect()
}

/// Plain-text tables: attached networks, peers and routes of every router.
pub fn render_text(routers: &RouterDirectory) -> String {
    let mut out = String::new();

    for router in routers.iter() {
        writeln!(out, "Router {}", router.name).unwrap();

        writeln!(out, "  Attached networks:").unwrap();
        if router.attached.is_empty() {
            writeln!(out, "    (none)").unwrap();
        }
        for attached in &router.attached {
            writeln!(out, "    {:<20} {}", attached.network, attached.address).unwrap();
        }

        writeln!(out, "  Peers:").unwrap();
        if router.peers.is_empty() {
            writeln!(out, "    (none)").unwrap();
        }
        for peer in &router.peers {
            writeln!(
                out,
                "    {:<20} {:<18} metric {}",
                peer.router, peer.gateway, peer.metric
            )
            .unwrap();
        }

        writeln!(out, "  Routes:").unwrap();
        if router.routing_table.is_empty() {
            writeln!(out, "    (none)").unwrap();
        } else {
            writeln!(out, "    {:<20} {:<18} {}", "Destination", "Gateway", "Metric").unwrap();
        }
        for route in router.routing_table.iter() {
            writeln!(
                out,
                "    {:<20} {:<18} {}",
                route.destination, route.via, route.metric
            )
            .unwrap();
        }

        out.push('\n');
    }

    out
}

pub fn render_json(routers: &RouterDirectory) -> Result<String> {
    Ok(serde_json::to_string_pretty(&router_reports(routers))?)
}

/// Graphviz description of the topology, edges labelled with their metric.
pub fn render_dot(graph: &TopologyGraph) -> String {
    format!("{}", Dot::with_config(graph.as_petgraph(), &[]))
}
