//! One batched fetch for the whole selection.
//!
//! [`ChainSource`] is the seam between the pipeline and the network:
//! [`ChainClient`] implements it against the real backend, tests substitute
//! an in-memory source.

use std::future::Future;

use serde::Deserialize;

use crate::client::ChainClient;
use crate::constants::batch::MAX_SYMBOLS;
use crate::error::{ChainError, Result};
use crate::pipeline::aggregator::aggregate;
use crate::types::option_chain::{AggregatedSet, BatchEntry, BatchResponse, RawChain, SymbolResult};

/// Anything that can answer a batch option-chain request.
pub trait ChainSource: Send + Sync + 'static {
    /// Issue one batch call for `symbols`, optionally filtered by expiry.
    ///
    /// Only a failure of the call as a whole is an `Err`.
    fn fetch_batch_raw(
        &self,
        symbols: &[String],
        expiry: Option<&str>,
    ) -> impl Future<Output = Result<BatchResponse>> + Send;
}

impl ChainSource for ChainClient {
    fn fetch_batch_raw(
        &self,
        symbols: &[String],
        expiry: Option<&str>,
    ) -> impl Future<Output = Result<BatchResponse>> + Send {
        self.get_batch(symbols, expiry)
    }
}

/// Find a symbol's entry; the backend upper-cases its keys.
fn lookup<'a>(resp: &'a BatchResponse, symbol: &str) -> Option<&'a serde_json::Value> {
    resp.get(symbol)
        .or_else(|| resp.get(&symbol.to_uppercase()))
}

fn to_result(symbol: &str, entry: Option<&serde_json::Value>) -> SymbolResult {
    let Some(entry) = entry else {
        tracing::warn!(symbol, "symbol missing from batch response");
        return SymbolResult::Failure;
    };
    let entry = match BatchEntry::deserialize(entry) {
        Ok(entry) => entry,
        Err(err) => {
            tracing::warn!(symbol, %err, "unusable batch entry");
            return SymbolResult::Failure;
        }
    };
    if !entry.ok {
        tracing::warn!(
            symbol,
            error = entry.error.as_deref().unwrap_or("unknown"),
            "backend could not fetch symbol"
        );
        return SymbolResult::Failure;
    }
    let Some(data) = &entry.data else {
        tracing::warn!(symbol, "batch entry marked ok without data");
        return SymbolResult::Failure;
    };
    match RawChain::deserialize(data) {
        Ok(raw) => SymbolResult::Success(aggregate(&raw)),
        Err(err) => {
            tracing::warn!(symbol, %err, "unusable chain payload");
            SymbolResult::Failure
        }
    }
}

/// Fetch and aggregate every requested symbol in one network call.
///
/// The returned set has exactly one entry per requested symbol, in request
/// order. Symbols the backend failed or omitted become
/// [`SymbolResult::Failure`]. If the call itself fails the whole operation
/// fails and no partial set is produced.
pub async fn fetch_batch<S: ChainSource>(
    source: &S,
    symbols: &[String],
    expiry: Option<&str>,
) -> Result<AggregatedSet> {
    if symbols.is_empty() {
        return Err(ChainError::EmptySelection);
    }
    if symbols.len() > MAX_SYMBOLS {
        return Err(ChainError::InvalidArgument(format!(
            "at most {MAX_SYMBOLS} symbols per batch, got {}",
            symbols.len()
        )));
    }

    let resp = source.fetch_batch_raw(symbols, expiry).await?;

    let mut set = AggregatedSet::with_capacity(symbols.len());
    for symbol in symbols {
        set.push(symbol.clone(), to_result(symbol, lookup(&resp, symbol)));
    }
    Ok(set)
}
