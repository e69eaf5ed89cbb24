use std::fmt;
use std::path::Path;

use ini::{Ini, Properties};
use ipnet::IpNet;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::{Result, RouteError};
use crate::network::allocate_link_addresses;
use crate::router::{AttachedNetwork, Peer};
use crate::{NetworkId, RouterId, TopologyContext};

/// Section name that is never interpreted as a topology fact.
pub const DEFAULT_SECTION: &str = "DEFAULT";

const DEFAULT_LINK_METRIC: u32 = 1;

/// Keys a topology section may carry. Which of them are present decides
/// whether the section is an attachment or a link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSection {
    pub network_address: Option<String>,
    pub network_name: Option<String>,
    pub router_name: Option<String>,
    pub router_1_name: Option<String>,
    pub router_2_name: Option<String>,
    pub metric: Option<i64>,
}

impl RawSection {
    /// Reads an INI section, where every value is text.
    pub fn from_properties(section: &str, properties: &Properties) -> Result<Self> {
        let text = |key: &str| properties.get(key).map(|v| v.trim().to_string());

        let metric = match properties.get("metric") {
            Some(m) => Some(m.trim().parse::<i64>().map_err(|_| {
                RouteError::MalformedTopologyFact {
                    section: section.to_string(),
                    reason: format!("invalid metric {}", m),
                }
            })?),
            None => None,
        };

        Ok(Self {
            network_address: text("network_address"),
            network_name: text("network_name"),
            router_name: text("router_name"),
            router_1_name: text("router_1_name"),
            router_2_name: text("router_2_name"),
            metric,
        })
    }
}

/// A validated topology statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyFact {
    /// A network directly attached to a router.
    Attachment {
        network_address: IpNet,
        network_name: NetworkId,
        router_name: RouterId,
    },
    /// A point-to-point link between two routers.
    Link {
        network_address: IpNet,
        router_1_name: RouterId,
        router_2_name: RouterId,
        metric: u32,
    },
}

impl TopologyFact {
    /// Classifies a section. The attachment shape is tried first.
    pub fn from_section(section: &str, raw: RawSection) -> Result<Self> {
        let malformed = |reason: &str| RouteError::MalformedTopologyFact {
            section: section.to_string(),
            reason: reason.to_string(),
        };

        let address_text = raw
            .network_address
            .ok_or_else(|| malformed("missing network_address"))?;
        let network_address: IpNet = address_text
            .trim()
            .parse()
            .map_err(|_| malformed(&format!("invalid network_address {}", address_text)))?;

        if let Some(router_name) = raw.router_name {
            let network_name = raw
                .network_name
                .unwrap_or_else(|| network_address.to_string());
            return Ok(TopologyFact::Attachment {
                network_address,
                network_name,
                router_name,
            });
        }

        match (raw.router_1_name, raw.router_2_name) {
            (Some(router_1_name), Some(router_2_name)) => {
                let metric = match raw.metric {
                    None => DEFAULT_LINK_METRIC,
                    Some(m) if (1..=u32::MAX as i64).contains(&m) => m as u32,
                    Some(m) => return Err(malformed(&format!("invalid metric {}", m))),
                };
                if router_1_name == router_2_name {
                    return Err(malformed("link connects a router to itself"));
                }
                Ok(TopologyFact::Link {
                    network_address,
                    router_1_name,
                    router_2_name,
                    metric,
                })
            }
            _ => Err(malformed(
                "expected router_name, or router_1_name and router_2_name",
            )),
        }
    }
}

/// Accumulates facts into a [`TopologyContext`].
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    context: TopologyContext,
    skipped: usize,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a fact. On error nothing has been changed.
    pub fn apply(&mut self, section: &str, fact: TopologyFact) -> Result<()> {
        match fact {
            TopologyFact::Attachment {
                network_address,
                network_name,
                router_name,
            } => {
                self.check_router_name(section, &router_name)?;
                if network_name == router_name || self.context.routers.contains(&network_name) {
                    return Err(collision(section, &network_name));
                }
                if let Some(owner) = self.owner_of(&network_name) {
                    if owner != router_name {
                        return Err(RouteError::MalformedTopologyFact {
                            section: section.to_string(),
                            reason: format!(
                                "network {} is already attached to router {}",
                                network_name, owner
                            ),
                        });
                    }
                }

                let ctx = &mut self.context;
                ctx.graph.add_link(&network_name, &router_name, 0);
                ctx.networks.push(network_name.clone());
                let router = ctx.routers.get_or_create(&router_name);
                if !router.is_attached_to(&network_name) {
                    router.attach(AttachedNetwork {
                        network: network_name.clone(),
                        address: network_address,
                    });
                }
                debug!("[{}] {} attached to {}", section, network_name, router_name);
            }
            TopologyFact::Link {
                network_address,
                router_1_name,
                router_2_name,
                metric,
            } => {
                self.check_router_name(section, &router_1_name)?;
                self.check_router_name(section, &router_2_name)?;
                let addresses = allocate_link_addresses(&network_address)?;

                let ctx = &mut self.context;
                ctx.graph.add_link(&router_1_name, &router_2_name, metric);
                ctx.routers.get_or_create(&router_1_name).add_peer(Peer {
                    router: router_2_name.clone(),
                    gateway: addresses.second,
                    local_address: addresses.first,
                    link: network_address,
                    metric,
                });
                ctx.routers.get_or_create(&router_2_name).add_peer(Peer {
                    router: router_1_name.clone(),
                    gateway: addresses.first,
                    local_address: addresses.second,
                    link: network_address,
                    metric,
                });
                debug!(
                    "[{}] {} <-> {} over {} metric {}",
                    section, router_1_name, router_2_name, network_address, metric
                );
            }
        }

        Ok(())
    }

    /// Classifies and applies one section, logging and skipping it if it is
    /// not a usable fact.
    pub fn apply_section(&mut self, section: &str, raw: RawSection) {
        let outcome =
            TopologyFact::from_section(section, raw).and_then(|fact| self.apply(section, fact));

        if let Err(e) = outcome {
            self.skip(section, e);
        }
    }

    fn skip(&mut self, section: &str, reason: impl fmt::Display) {
        warn!("Skipping section {}: {}", section, reason);
        self.skipped += 1;
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> TopologyContext {
        info!(
            "Topology loaded: {} routers, {} networks, {} links ({} sections skipped)",
            self.context.routers.len(),
            self.context.networks.len(),
            self.context.graph.edge_count(),
            self.skipped
        );
        self.context
    }

    /// Router a network is attached to. Each network has at most one.
    fn owner_of(&self, network: &str) -> Option<&str> {
        self.context
            .routers
            .iter()
            .find(|r| r.is_attached_to(network))
            .map(|r| r.name.as_str())
    }

    fn check_router_name(&self, section: &str, name: &str) -> Result<()> {
        if self.context.networks.iter().any(|n| n == name) {
            return Err(collision(section, name));
        }
        Ok(())
    }
}

fn collision(section: &str, name: &str) -> RouteError {
    RouteError::MalformedTopologyFact {
        section: section.to_string(),
        reason: format!("{} is used both as a router and as a network", name),
    }
}

/// Splits a sectioned document into chunks that each start at a `[header]`
/// line, so that a syntax error only costs the section it occurs in. Text
/// before the first header forms its own chunk.
fn section_chunks(content: &str) -> Vec<&str> {
    let mut starts = vec![0];
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        if offset > 0 && line.trim_start().starts_with('[') {
            starts.push(offset);
        }
        offset += line.len();
    }
    starts.push(content.len());

    starts
        .windows(2)
        .map(|w| &content[w[0]..w[1]])
        .filter(|chunk| !chunk.trim().is_empty())
        .collect()
}

fn chunk_label(chunk: &str) -> &str {
    chunk
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with('['))
        .unwrap_or("<preamble>")
}

/// Parses an INI topology document, the format of the original `[A]` /
/// `[AS2]` section files: unquoted `key=value` pairs, one fact per section.
/// A `DEFAULT` section and keys outside any section are ignored.
pub fn from_ini_str(content: &str) -> Result<TopologyContext> {
    let mut builder = TopologyBuilder::new();

    for chunk in section_chunks(content) {
        let document = match Ini::load_from_str(chunk) {
            Ok(document) => document,
            Err(e) => {
                builder.skip(chunk_label(chunk), e);
                continue;
            }
        };

        for (section, properties) in document.iter() {
            let Some(section) = section else {
                if properties.iter().next().is_some() {
                    warn!("Ignoring keys outside of any section");
                }
                continue;
            };
            if section == DEFAULT_SECTION {
                continue;
            }
            match RawSection::from_properties(section, properties) {
                Ok(raw) => builder.apply_section(section, raw),
                Err(e) => builder.skip(section, e),
            }
        }
    }

    Ok(builder.finish())
}

/// Parses a TOML topology document. Top-level tables are processed in
/// document order; a section that fails to parse is skipped.
pub fn from_toml_str(content: &str) -> Result<TopologyContext> {
    let mut builder = TopologyBuilder::new();

    for chunk in section_chunks(content) {
        let document: toml::Table = match toml::from_str(chunk) {
            Ok(document) => document,
            Err(e) => {
                builder.skip(chunk_label(chunk), e.message());
                continue;
            }
        };

        for (section, value) in document {
            if section == DEFAULT_SECTION {
                continue;
            }
            match value.try_into::<RawSection>() {
                Ok(raw) => builder.apply_section(&section, raw),
                Err(e) => builder.skip(&section, e.message()),
            }
        }
    }

    Ok(builder.finish())
}

/// Parses a JSON topology document: an object of section objects. Unlike the
/// sectioned text formats, a JSON syntax error rejects the whole document.
pub fn from_json_str(content: &str) -> Result<TopologyContext> {
    let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
    let mut builder = TopologyBuilder::new();

    for (section, value) in document {
        if section == DEFAULT_SECTION {
            continue;
        }
        match serde_json::from_value::<RawSection>(value) {
            Ok(raw) => builder.apply_section(&section, raw),
            Err(e) => builder.skip(&section, e),
        }
    }

    Ok(builder.finish())
}

/// Loads a topology file by extension: `.json` as JSON, `.toml` as TOML and
/// anything else as INI.
pub fn load(path: impl AsRef<Path>) -> Result<TopologyContext> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    info!("Loading topology from {}", path.display());

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json_str(&content),
        Some("toml") => from_toml_str(&content),
        _ => from_ini_str(&content),
    }
}
