pub mod cli;
pub mod load_config;
pub mod progress;

pub use cli::{run, Cli, Commands};
