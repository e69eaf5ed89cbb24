pub mod simple_paths;

pub use simple_paths::{all_simple_paths, path_cost, SimplePaths};
