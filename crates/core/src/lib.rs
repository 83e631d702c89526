pub mod config;
pub mod error;
pub mod workload;

pub use config::Config;
pub use error::*;
pub use workload::*;
