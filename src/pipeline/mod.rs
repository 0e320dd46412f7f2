//! The fetch → aggregate → assemble pipeline and the scheduler driving it.
//!
//! ```text
//!   user action / timer
//!           │
//!   RefreshScheduler ──► snapshot of SymbolRegistry
//!           │
//!   fetcher::fetch_batch   (one network call, per-symbol Failure as data)
//!           │
//!   aggregator::aggregate  (per symbol, pure)
//!           │
//!   assembler::assemble    (pure, deterministic)
//!           │
//!   watch::Sender<DashboardView>  ──► UI layer
//! ```
//!
//! Only the fetch suspends; aggregation and assembly are synchronous.

pub mod aggregator;
pub mod assembler;
pub mod fetcher;
pub mod registry;
pub mod scheduler;

pub use aggregator::aggregate;
pub use assembler::assemble;
pub use fetcher::{ChainSource, fetch_batch};
pub use registry::{Selection, SymbolRegistry};
pub use scheduler::{DashboardView, RefreshScheduler, RunOutcome, Status};
