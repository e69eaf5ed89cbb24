pub mod addressing;
pub mod topology;

pub use addressing::{allocate_link_addresses, LinkAddresses};
pub use topology::TopologyGraph;
