//! Watch-list endpoints: list, search, add, remove.

use crate::client::ChainClient;
use crate::error::{ChainError, Result};
use crate::types::stocks::*;

impl ChainClient {
    /// Retrieve the watch-list, in backend order.
    ///
    /// **Endpoint:** `GET /stocks`
    pub async fn list_stocks(&self) -> Result<StockList> {
        self.get(self.endpoint(&["stocks"], &[])?).await
    }

    /// Search for symbols matching `query`.
    ///
    /// A blank query short-circuits to an empty result without a request.
    ///
    /// **Endpoint:** `GET /search/{query}`
    pub async fn search_stocks(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults { matches: Vec::new() });
        }
        self.get(self.endpoint(&["search", query], &[])?).await
    }

    /// Add a symbol to the watch-list.
    ///
    /// A `{"success": false}` reply is mapped to [`ChainError::AddStock`]
    /// carrying the backend's message.
    ///
    /// **Endpoint:** `POST /add-stock`
    pub async fn add_stock(&self, stock: &str) -> Result<()> {
        let resp: AddStockResponse = self
            .post(self.endpoint(&["add-stock"], &[])?, &StockRequest::new(stock))
            .await?;
        if resp.success {
            Ok(())
        } else {
            Err(ChainError::AddStock(
                resp.error.unwrap_or_else(|| format!("could not add {stock}")),
            ))
        }
    }

    /// Remove a symbol from the watch-list. The reply body is ignored.
    ///
    /// **Endpoint:** `POST /remove-stock`
    pub async fn remove_stock(&self, stock: &str) -> Result<()> {
        self.post_no_content(self.endpoint(&["remove-stock"], &[])?, &StockRequest::new(stock))
            .await
    }
}
