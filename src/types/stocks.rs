#![allow(missing_docs)]
//! Watch-list types: stock list, search, add/remove.

use serde::{Deserialize, Serialize};

/// Response from `GET /stocks`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockList {
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Response from `GET /search/{query}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub matches: Vec<String>,
}

/// Request body for `POST /add-stock` and `POST /remove-stock`.
#[derive(Debug, Clone, Serialize)]
pub struct StockRequest {
    pub stock: String,
}

impl StockRequest {
    pub fn new(stock: impl Into<String>) -> Self {
        Self { stock: stock.into() }
    }
}

/// Response from `POST /add-stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddStockResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
