pub mod engine;
pub mod routing_table;

pub use engine::*;
pub use routing_table::*;
