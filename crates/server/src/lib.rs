//! HTTP surface for the WinOptima simulation.

pub mod api;
pub mod cli;
pub mod router;
pub mod state;

pub use router::{build_router, cors_layer};
pub use state::AppState;
