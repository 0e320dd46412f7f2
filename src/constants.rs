//! Constants for the option-chain dashboard.
//!
//! Contains the default backend URL and the limits the dashboard enforces
//! on refresh rate and batch size. These are used internally by
//! [`ChainClient`](crate::client::ChainClient) and the pipeline stages, but
//! are also exported for advanced usage.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Default base URL of the option-chain backend REST API.
pub const API_BASE_URL: &str = "http://localhost:8000/api";

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// Auto-refresh limits.
pub mod refresh {
    /// Smallest accepted auto-refresh interval (in seconds).
    pub const MIN_INTERVAL_SECS: u64 = 10;
    /// Interval used when none is supplied (in seconds).
    pub const DEFAULT_INTERVAL_SECS: u64 = 60;
}

// ---------------------------------------------------------------------------
// Batch & watch-list
// ---------------------------------------------------------------------------

/// Batch endpoint constraints.
pub mod batch {
    /// Maximum symbols per batch request (the backend rejects more).
    pub const MAX_SYMBOLS: usize = 60;
}

/// Number of watch-list symbols selected automatically when the selection
/// would otherwise be empty after loading the list.
pub const AUTO_SELECT_COUNT: usize = 6;
