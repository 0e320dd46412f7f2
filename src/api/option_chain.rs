//! Option Chain endpoints: per-symbol expiry info, batch fetch, CSV export.

use url::Url;

use crate::client::ChainClient;
use crate::error::Result;
use crate::types::option_chain::*;

impl ChainClient {
    /// Retrieve the available expiries and underlying value for one symbol.
    ///
    /// **Endpoint:** `GET /option-chain/{symbol}`
    pub async fn get_chain_info(&self, symbol: &str) -> Result<ChainInfo> {
        self.get(self.endpoint(&["option-chain", symbol], &[])?).await
    }

    /// Fetch many symbols in one call.
    ///
    /// The reply maps each symbol (upper-cased by the backend) to
    /// `{ok, data?, error?}`. Per-symbol failures are part of the reply;
    /// only a failure of the call itself is an `Err`.
    ///
    /// **Endpoint:** `POST /batch?expiry={expiry}`
    pub async fn get_batch(&self, symbols: &[String], expiry: Option<&str>) -> Result<BatchResponse> {
        self.post(self.endpoint(&["batch"], &[("expiry", expiry)])?, symbols)
            .await
    }

    /// URL of the side-by-side CSV export for one symbol.
    ///
    /// Meant for direct navigation or a download manager; no request is made.
    ///
    /// **Endpoint:** `GET /download/{symbol}?expiry={expiry}`
    pub fn download_url(&self, symbol: &str, expiry: Option<&str>) -> Result<Url> {
        self.endpoint(&["download", symbol], &[("expiry", expiry)])
    }
}
