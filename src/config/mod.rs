pub mod topology_file;

pub use topology_file::{
    from_ini_str, from_json_str, from_toml_str, load, RawSection, TopologyBuilder, TopologyFact,
};
