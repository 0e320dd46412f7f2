//! Refresh scheduling for the fetch → aggregate → assemble pipeline.
//!
//! [`RefreshScheduler`] runs the pipeline on demand and, optionally, on a
//! fixed interval. Each run publishes its outcome as a [`DashboardView`] on a
//! `tokio::sync::watch` channel; the UI layer renders whatever it last saw.
//!
//! # Concurrency
//!
//! Timer runs never overlap each other: the timer task awaits each run
//! before waiting for its next tick. A manual run may race a timer run. Both
//! read their own selection snapshot and the later-completing run's table is
//! the one left visible. Nothing is queued or locked beyond that.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chainboard::ChainClient;
//! use chainboard::pipeline::{RefreshScheduler, SymbolRegistry};
//! use tokio::sync::RwLock;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = Arc::new(RwLock::new(SymbolRegistry::new()));
//! registry.write().await.select(["RELIANCE", "TCS"]);
//!
//! let mut scheduler = RefreshScheduler::new(ChainClient::new(), registry);
//! let mut views = scheduler.subscribe();
//! scheduler.run_once().await;
//! scheduler.set_auto_refresh(true, 30);
//!
//! while views.changed().await.is_ok() {
//!     println!("{}", views.borrow().status);
//! }
//! # }
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::constants::refresh::MIN_INTERVAL_SECS;
use crate::pipeline::assembler::assemble;
use crate::pipeline::fetcher::{ChainSource, fetch_batch};
use crate::pipeline::registry::SymbolRegistry;
use crate::types::table::ChainTable;

// ---------------------------------------------------------------------------
// Status & view
// ---------------------------------------------------------------------------

/// User-visible status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Ready,
    Fetching,
    /// A run completed with this many symbol groups.
    Fetched(usize),
    SelectionEmpty,
    /// A symbol was added to the watch-list.
    Added(String),
    /// Adding a symbol failed below the backend's own validation.
    AddFailed,
    /// Any other failure, with its message.
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::Fetching => f.write_str("Fetching..."),
            Self::Fetched(n) => write!(f, "Fetched {n} symbols"),
            Self::SelectionEmpty => f.write_str("Select at least one stock."),
            Self::Added(symbol) => write!(f, "Added {symbol}"),
            Self::AddFailed => f.write_str("Error adding stock"),
            Self::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// What the UI layer renders: the latest status and the latest table.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub status: Status,
    /// Most recently completed table; kept across failed runs.
    pub table: Option<Arc<ChainTable>>,
    /// When `table` was produced.
    pub updated_at: Option<DateTime<Utc>>,
}

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A new table was published.
    Rendered { symbols: usize },
    /// Nothing was selected; no request was made.
    SelectionEmpty,
    /// The batch call failed; the previous table stays visible.
    Failed(String),
}

/// Effective auto-refresh period for a requested interval in seconds.
pub fn clamp_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.max(MIN_INTERVAL_SECS))
}

// ---------------------------------------------------------------------------
// Shared run state
// ---------------------------------------------------------------------------

struct Shared<S> {
    source: S,
    registry: Arc<RwLock<SymbolRegistry>>,
    view: watch::Sender<DashboardView>,
    in_flight: AtomicUsize,
    completed: AtomicU64,
}

/// Marks a run as in flight for as long as it lives, including when the run
/// is dropped mid-fetch by an aborted timer task.
struct RunGuard<'a>(&'a AtomicUsize);

impl<'a> RunGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S: ChainSource> Shared<S> {
    fn publish_status(&self, status: Status) {
        self.view.send_modify(|v| v.status = status);
    }

    async fn run_once(&self) -> RunOutcome {
        let selection = self.registry.read().await.snapshot();
        if selection.is_empty() {
            self.publish_status(Status::SelectionEmpty);
            return RunOutcome::SelectionEmpty;
        }

        let _guard = RunGuard::enter(&self.in_flight);
        self.publish_status(Status::Fetching);

        let outcome = match fetch_batch(
            &self.source,
            &selection.symbols,
            selection.expiry.as_deref(),
        )
        .await
        {
            Ok(set) => {
                let table = assemble(&set);
                let symbols = table.len();
                self.view.send_modify(|v| {
                    v.status = Status::Fetched(symbols);
                    v.table = Some(Arc::new(table));
                    v.updated_at = Some(Utc::now());
                });
                tracing::info!(symbols, expiry = ?selection.expiry, "option chains refreshed");
                RunOutcome::Rendered { symbols }
            }
            Err(err) => {
                let msg = err.to_string();
                tracing::warn!(error = %msg, "batch fetch failed; keeping previous table");
                self.publish_status(Status::Error(msg.clone()));
                RunOutcome::Failed(msg)
            }
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}

// ---------------------------------------------------------------------------
// RefreshScheduler
// ---------------------------------------------------------------------------

/// A running timer. Sending on (or dropping) `stop` ends the ticker loop
/// between runs; a run already under way finishes and publishes.
struct AutoRefresh {
    period: Duration,
    stop: oneshot::Sender<()>,
}

/// Runs the pipeline on demand and on an optional timer.
///
/// The timer is owned exclusively by the scheduler: only
/// [`set_auto_refresh`](Self::set_auto_refresh) creates or cancels it, and
/// dropping the scheduler cancels it.
pub struct RefreshScheduler<S: ChainSource> {
    shared: Arc<Shared<S>>,
    auto: Option<AutoRefresh>,
}

impl<S: ChainSource> RefreshScheduler<S> {
    /// Create a scheduler reading selections from `registry`.
    pub fn new(source: S, registry: Arc<RwLock<SymbolRegistry>>) -> Self {
        let (view, _) = watch::channel(DashboardView::default());
        Self {
            shared: Arc::new(Shared {
                source,
                registry,
                view,
                in_flight: AtomicUsize::new(0),
                completed: AtomicU64::new(0),
            }),
            auto: None,
        }
    }

    /// The source runs fetch from.
    pub fn source(&self) -> &S {
        &self.shared.source
    }

    /// Receive every published view.
    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.shared.view.subscribe()
    }

    /// Snapshot of the current view.
    pub fn view(&self) -> DashboardView {
        self.shared.view.borrow().clone()
    }

    /// Replace the status line without touching the table.
    pub fn publish_status(&self, status: Status) {
        self.shared.publish_status(status);
    }

    /// Run the pipeline once and wait for it.
    pub async fn run_once(&self) -> RunOutcome {
        self.shared.run_once().await
    }

    /// Start a run in the background. It is not serialized against other
    /// runs in flight.
    pub fn spawn_run(&self) -> JoinHandle<RunOutcome> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.run_once().await })
    }

    /// Enable or disable the periodic refresh.
    ///
    /// `interval_secs` is clamped to at least
    /// [`MIN_INTERVAL_SECS`](crate::constants::refresh::MIN_INTERVAL_SECS).
    /// Enabling replaces any running timer; disabling is idempotent. The
    /// first timed run happens one period after enabling. Returns the
    /// effective period when enabled.
    ///
    /// Must be called from within a Tokio runtime when enabling.
    pub fn set_auto_refresh(&mut self, enabled: bool, interval_secs: u64) -> Option<Duration> {
        self.cancel_timer();
        if !enabled {
            return None;
        }

        let period = clamp_interval(interval_secs);
        let shared = Arc::clone(&self.shared);
        let (stop, mut stopped) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {}
                }
                shared.run_once().await;
            }
        });
        tracing::info!(period_secs = period.as_secs(), "auto-refresh enabled");
        self.auto = Some(AutoRefresh { period, stop });
        Some(period)
    }

    /// Stop the periodic refresh. A no-op when it is already off. A timed run
    /// already fetching is not cancelled.
    pub fn disable_auto_refresh(&mut self) {
        self.set_auto_refresh(false, 0);
    }

    /// Effective period of the running timer, if any.
    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        self.auto.as_ref().map(|a| a.period)
    }

    pub fn is_auto_refresh_enabled(&self) -> bool {
        self.auto.is_some()
    }

    /// Whether any run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.shared.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Number of runs that reached the network and finished.
    pub fn completed_runs(&self) -> u64 {
        self.shared.completed.load(Ordering::SeqCst)
    }

    fn cancel_timer(&mut self) {
        if let Some(auto) = self.auto.take() {
            // The loop may already be inside a run; it sees the signal when
            // that run returns.
            let _ = auto.stop.send(());
            tracing::info!("auto-refresh disabled");
        }
    }
}

impl<S: ChainSource> Drop for RefreshScheduler<S> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
