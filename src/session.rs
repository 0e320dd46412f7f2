//! The dashboard session: one explicit owner for all mutable dashboard state.
//!
//! A [`Dashboard`] is created when the dashboard starts and torn down when it
//! closes. It owns the backend client, the shared [`SymbolRegistry`] and the
//! [`RefreshScheduler`], and translates user intents (load, search, add,
//! remove, pick expiry, fetch, toggle auto-refresh) into calls on them.
//! Every failure ends as a status line; none of these methods panic or abort
//! a run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use url::Url;

use crate::client::ChainClient;
use crate::config::DashboardConfig;
use crate::error::{ChainError, Result};
use crate::pipeline::registry::{SymbolRegistry, normalize_symbol};
use crate::pipeline::scheduler::{DashboardView, RefreshScheduler, RunOutcome, Status};

/// Owner of the watch-list, the selection and the refresh timer.
pub struct Dashboard {
    client: ChainClient,
    registry: Arc<RwLock<SymbolRegistry>>,
    scheduler: RefreshScheduler<ChainClient>,
    expiries: Vec<String>,
    meta: Option<String>,
}

impl Dashboard {
    pub fn new(client: ChainClient) -> Self {
        let registry = Arc::new(RwLock::new(SymbolRegistry::new()));
        let scheduler = RefreshScheduler::new(client.clone(), Arc::clone(&registry));
        Self {
            client,
            registry,
            scheduler,
            expiries: Vec::new(),
            meta: None,
        }
    }

    /// Build a dashboard from configuration, applying its initial selection
    /// and expiry filter. Auto-refresh is left to the caller.
    pub async fn from_config(config: &DashboardConfig) -> Self {
        let dashboard = Self::new(ChainClient::with_base_url(&config.api_url));
        {
            let mut reg = dashboard.registry.write().await;
            reg.select(&config.symbols);
            reg.set_expiry(config.expiry.as_deref());
        }
        dashboard
    }

    pub fn client(&self) -> &ChainClient {
        &self.client
    }

    /// Shared handle to the registry, for UI adapters that edit selection.
    pub fn registry(&self) -> Arc<RwLock<SymbolRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn scheduler(&self) -> &RefreshScheduler<ChainClient> {
        &self.scheduler
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.scheduler.subscribe()
    }

    pub fn view(&self) -> DashboardView {
        self.scheduler.view()
    }

    /// Expiries offered for the first selected symbol.
    pub fn expiries(&self) -> &[String] {
        &self.expiries
    }

    /// Meta line describing the first selected symbol's underlying.
    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    // -----------------------------------------------------------------------
    // Watch-list
    // -----------------------------------------------------------------------

    /// Reload the watch-list from the backend, then refresh the expiries.
    pub async fn load_stocks(&mut self) -> Result<Vec<String>> {
        let list = match self.client.list_stocks().await {
            Ok(list) => list,
            Err(err) => {
                self.scheduler.publish_status(Status::Error(err.to_string()));
                return Err(err);
            }
        };
        let symbols = {
            let mut reg = self.registry.write().await;
            for symbol in reg.set_watch_list(list.symbols) {
                tracing::warn!(%symbol, "selected symbol is not on the watch-list; deselected");
            }
            reg.watch_list().to_vec()
        };
        self.load_expiries().await;
        Ok(symbols)
    }

    /// Search the backend for symbols. Failures are logged and yield nothing.
    pub async fn search(&self, query: &str) -> Vec<String> {
        match self.client.search_stocks(query).await {
            Ok(results) => results.matches,
            Err(err) => {
                tracing::warn!(query, %err, "stock search failed");
                Vec::new()
            }
        }
    }

    /// Add a symbol typed by the user. Blank input does nothing and returns
    /// `None`; otherwise the published status is returned.
    pub async fn add_stock(&mut self, input: &str) -> Option<Status> {
        let symbol = normalize_symbol(input)?;
        let status = match self.client.add_stock(&symbol).await {
            Ok(()) => {
                if let Err(err) = self.load_stocks().await {
                    tracing::warn!(%err, "watch-list reload after add failed");
                }
                Status::Added(symbol)
            }
            Err(ChainError::AddStock(msg)) => Status::Error(msg),
            Err(err) => {
                tracing::warn!(symbol, %err, "add-stock request failed");
                Status::AddFailed
            }
        };
        self.scheduler.publish_status(status.clone());
        Some(status)
    }

    /// Remove every selected symbol from the watch-list, one request each.
    ///
    /// Individual failures are logged and skipped; the list is reloaded
    /// afterwards either way.
    pub async fn remove_selected(&mut self) -> Result<Vec<String>> {
        let selected = self.registry.read().await.selected().to_vec();
        for stock in &selected {
            if let Err(err) = self.client.remove_stock(stock).await {
                tracing::warn!(stock, %err, "remove-stock request failed");
            }
        }
        self.load_stocks().await
    }

    // -----------------------------------------------------------------------
    // Selection & expiry
    // -----------------------------------------------------------------------

    /// Replace the selection and refresh the expiry list for it.
    pub async fn select<I, T>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.registry.write().await.select(symbols);
        self.load_expiries().await;
    }

    /// Pick an expiry filter; `None` or blank means all expiries.
    pub async fn set_expiry(&self, expiry: Option<&str>) {
        self.registry.write().await.set_expiry(expiry);
    }

    /// Refresh the expiry list and meta line from the first selected symbol.
    ///
    /// Resets the expiry filter to "all", since the offered expiries change.
    pub async fn load_expiries(&mut self) {
        let first = self.registry.read().await.selected().first().cloned();
        let Some(first) = first else {
            return;
        };

        match self.client.get_chain_info(&first).await {
            Ok(info) => {
                self.meta = Some(format!(
                    "Underlying ({first}): {}",
                    info.underlying.as_deref().unwrap_or("N/A")
                ));
                self.expiries = info.expiry_dates;
                self.registry.write().await.set_expiry(None);
            }
            Err(err) => {
                tracing::warn!(symbol = %first, %err, "could not load expiries");
                self.meta = Some(format!("Error loading expiries: {err}"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    /// Run the pipeline now.
    pub async fn fetch(&self) -> RunOutcome {
        self.scheduler.run_once().await
    }

    /// Turn the periodic refresh on or off; see
    /// [`RefreshScheduler::set_auto_refresh`].
    pub fn set_auto_refresh(&mut self, enabled: bool, interval_secs: u64) -> Option<Duration> {
        self.scheduler.set_auto_refresh(enabled, interval_secs)
    }

    /// CSV export link for the first selected symbol under the current
    /// expiry filter, or `None` when nothing is selected.
    pub async fn download_url(&self) -> Result<Option<Url>> {
        let selection = self.registry.read().await.snapshot();
        selection
            .symbols
            .first()
            .map(|s| self.client.download_url(s, selection.expiry.as_deref()))
            .transpose()
    }

    /// Tear the session down: stop the refresh timer.
    pub fn shutdown(&mut self) {
        self.scheduler.disable_auto_refresh();
    }
}
