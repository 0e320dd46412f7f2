//! # chainboard
//!
//! A client for an option-chain tracking backend: keep a watch-list of
//! symbols, fetch their option chains in one batch, and lay them out as a
//! single comparison table with highest-open-interest highlighting and
//! per-symbol totals, refreshed on demand or on a timer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use chainboard::{ChainClient, Dashboard};
//!
//! #[tokio::main]
//! async fn main() -> chainboard::Result<()> {
//!     let mut dashboard = Dashboard::new(ChainClient::new());
//!     dashboard.load_stocks().await?;
//!     dashboard.fetch().await;
//!
//!     let view = dashboard.view();
//!     println!("{}", view.status);
//!     if let Some(table) = view.table {
//!         println!("{table}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod types;

/// Re-export the main client type at crate root for convenience.
pub use client::ChainClient;
/// Re-export the error type and Result alias.
pub use error::{ChainError, Result};
/// Re-export the dashboard session.
pub use session::Dashboard;
