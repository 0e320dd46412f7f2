//! Option Chain types: raw backend payloads and their normalized forms.
//!
//! The backend is loosely typed: `underlying` shows up as a number or a
//! string, open interest occasionally as a float, and optional fields may be
//! `null` or missing entirely. The raw types here absorb all of that through
//! lenient field deserializers, so a payload that is an object always parses
//! and the aggregator only ever has to substitute defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Per-symbol chain info
// ---------------------------------------------------------------------------

/// Response from `GET /option-chain/{symbol}`, the parts the dashboard reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainInfo {
    /// Expiries available for the symbol, in backend order.
    #[serde(rename = "expiryDates", default, deserialize_with = "lenient::strings")]
    pub expiry_dates: Vec<String>,
    /// Underlying value, rendered as text.
    #[serde(default, deserialize_with = "lenient::text")]
    pub underlying: Option<String>,
}

// ---------------------------------------------------------------------------
// Batch response
// ---------------------------------------------------------------------------

/// One symbol's entry in the batch response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchEntry {
    /// Whether the backend managed to fetch this symbol.
    #[serde(default)]
    pub ok: bool,
    /// Raw chain payload; only meaningful when `ok` is true.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Backend-side failure description, if any.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `POST /batch`: symbol → entry. Key order is not meaningful.
///
/// Entries stay untyped here so that one malformed entry only fails its own
/// symbol; the fetcher reads each one as a [`BatchEntry`].
pub type BatchResponse = HashMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Raw chain payload
// ---------------------------------------------------------------------------

/// One call or put as delivered by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLeg {
    #[serde(default, deserialize_with = "lenient::number")]
    pub strike: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub oi: Option<u64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ltp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub volume: Option<u64>,
}

/// A symbol's chain payload (`data` of a successful batch entry).
///
/// The backend also sends a precomputed `summary`. It is ignored and the
/// aggregator recomputes totals from the legs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChain {
    #[serde(default, deserialize_with = "lenient::text")]
    pub underlying: Option<String>,
    #[serde(default, deserialize_with = "lenient::legs")]
    pub calls: Vec<RawLeg>,
    #[serde(default, deserialize_with = "lenient::legs")]
    pub puts: Vec<RawLeg>,
}

// ---------------------------------------------------------------------------
// Normalized shapes
// ---------------------------------------------------------------------------

/// One side (call or put) of one strike, with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionLeg {
    pub strike: Option<f64>,
    pub open_interest: u64,
    /// Absent means "no trade data"; zero is a legitimate traded price.
    pub last_traded_price: Option<f64>,
    pub volume: u64,
}

/// Per-symbol open-interest statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainSummary {
    pub total_call_open_interest: u64,
    pub total_put_open_interest: u64,
    /// First call leg carrying the maximal open interest.
    pub highest_call: Option<OptionLeg>,
    /// First put leg carrying the maximal open interest.
    pub highest_put: Option<OptionLeg>,
}

impl ChainSummary {
    /// Highest call open interest, or 0 for an empty call side.
    pub fn highest_call_open_interest(&self) -> u64 {
        self.highest_call.as_ref().map_or(0, |l| l.open_interest)
    }

    /// Highest put open interest, or 0 for an empty put side.
    pub fn highest_put_open_interest(&self) -> u64 {
        self.highest_put.as_ref().map_or(0, |l| l.open_interest)
    }
}

/// A successfully fetched and normalized chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymbolChain {
    pub underlying: Option<String>,
    pub calls: Vec<OptionLeg>,
    pub puts: Vec<OptionLeg>,
    pub summary: ChainSummary,
}

/// Outcome of fetching one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SymbolResult {
    Success(SymbolChain),
    /// The backend could not deliver this symbol. Carries no payload.
    Failure,
}

impl SymbolResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The chain, if this is a success.
    pub fn chain(&self) -> Option<&SymbolChain> {
        match self {
            Self::Success(chain) => Some(chain),
            Self::Failure => None,
        }
    }
}

/// Symbol → result, in the order the symbols were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedSet {
    entries: Vec<(String, SymbolResult)>,
}

impl AggregatedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Append a symbol's result; insertion order is iteration order.
    pub fn push(&mut self, symbol: impl Into<String>, result: SymbolResult) {
        self.entries.push((symbol.into(), result));
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolResult> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolResult)> {
        self.entries.iter().map(|(s, r)| (s.as_str(), r))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::RawLeg;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|v: &f64| v.is_finite()))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v.round() as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn legs<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RawLeg>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn raw_chain_tolerates_loose_fields() {
        let raw: RawChain = serde_json::from_value(json!({
            "underlying": 2456.35,
            "calls": [
                {"strike": 100, "oi": 12.0, "ltp": null, "volume": "7"},
                null,
                {"strike": "105", "oi": -3, "ltp": 0.0}
            ],
            "puts": null,
            "summary": {"total_calls_oi": 999}
        }))
        .unwrap();

        assert_eq!(raw.underlying.as_deref(), Some("2456.35"));
        assert_eq!(raw.calls.len(), 3);
        assert_eq!(raw.calls[0].oi, Some(12));
        assert_eq!(raw.calls[0].ltp, None);
        assert_eq!(raw.calls[0].volume, Some(7));
        assert_eq!(raw.calls[1].strike, None);
        assert_eq!(raw.calls[2].strike, Some(105.0));
        assert_eq!(raw.calls[2].oi, None);
        assert_eq!(raw.calls[2].ltp, Some(0.0));
        assert!(raw.puts.is_empty());
    }

    #[test]
    fn batch_entry_without_data() {
        let resp: BatchResponse = serde_json::from_value(json!({
            "TSLA": {"ok": false, "error": "Failed to fetch TSLA after retries"}
        }))
        .unwrap();
        let entry = BatchEntry::deserialize(&resp["TSLA"]).unwrap();
        assert!(!entry.ok);
        assert!(entry.data.is_none());
        assert_eq!(entry.error.as_deref(), Some("Failed to fetch TSLA after retries"));
    }

    #[test]
    fn chain_info_reads_expiries() {
        let info: ChainInfo = serde_json::from_value(json!({
            "expiryDates": ["25-Nov-2025", "30-Dec-2025"],
            "underlying": null,
            "calls": []
        }))
        .unwrap();
        assert_eq!(info.expiry_dates, vec!["25-Nov-2025", "30-Dec-2025"]);
        assert!(info.underlying.is_none());
    }

    #[test]
    fn aggregated_set_keeps_insertion_order() {
        let mut set = AggregatedSet::new();
        set.push("TSLA", SymbolResult::Failure);
        set.push("AAPL", SymbolResult::Success(SymbolChain::default()));
        assert_eq!(set.symbols().collect::<Vec<_>>(), vec!["TSLA", "AAPL"]);
        assert!(set.get("AAPL").is_some_and(SymbolResult::is_success));
        assert!(set.get("MSFT").is_none());
    }
}
