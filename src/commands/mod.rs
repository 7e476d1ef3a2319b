//! CLI command implementations.
//!
//! - **compute**: run the statistics pipeline over a request document
//! - **init**: write a default `.survey-stats.toml`

pub mod compute;
pub mod init;

pub use compute::{handle_compute, ComputeConfig};
pub use init::{init_config, init_config_in};
