//! Entrada Client - HTTP client for the ticketing backend
//!
//! Typed access to the layout endpoints plus the persistence protocol:
//! full-replace save with renumbering and progress reporting, reload after
//! save, and the lock/unlock workflow.

pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use store::{HttpLayoutStore, LayoutStore, SaveProgress, SaveReport, SaveStep};

// Re-export shared types for convenience
pub use shared::response::ApiResponse;
