//! REST API endpoint implementations.
//!
//! Each sub-module adds high-level `async` methods to
//! [`ChainClient`](crate::client::ChainClient) via `impl` blocks. All methods
//! handle JSON serialization, HTTP transport, and error mapping automatically.
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`stocks`] | 4 | Watch-list listing, search, add, remove |
//! | [`option_chain`] | 3 | Expiry info, batch fetch, CSV download link |

pub mod option_chain;
pub mod stocks;
