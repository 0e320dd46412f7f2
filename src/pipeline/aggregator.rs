//! Normalization of one symbol's raw chain into legs plus summary statistics.

use crate::types::option_chain::{ChainSummary, OptionLeg, RawChain, RawLeg, SymbolChain};

fn normalize(raw: &RawLeg) -> OptionLeg {
    OptionLeg {
        strike: raw.strike,
        open_interest: raw.oi.unwrap_or(0),
        last_traded_price: raw.ltp,
        volume: raw.volume.unwrap_or(0),
    }
}

/// Total open interest and the first leg reaching the maximum.
fn side_stats(legs: &[OptionLeg]) -> (u64, Option<OptionLeg>) {
    let mut total = 0u64;
    let mut highest: Option<&OptionLeg> = None;
    for leg in legs {
        total = total.saturating_add(leg.open_interest);
        if highest.is_none_or(|h| leg.open_interest > h.open_interest) {
            highest = Some(leg);
        }
    }
    (total, highest.cloned())
}

/// Turn a raw chain payload into a normalized [`SymbolChain`].
///
/// Never fails: absent open interest and volume become 0, an absent traded
/// price stays absent, and missing `calls`/`puts` are empty sides.
pub fn aggregate(raw: &RawChain) -> SymbolChain {
    let calls: Vec<OptionLeg> = raw.calls.iter().map(normalize).collect();
    let puts: Vec<OptionLeg> = raw.puts.iter().map(normalize).collect();

    let (total_call_open_interest, highest_call) = side_stats(&calls);
    let (total_put_open_interest, highest_put) = side_stats(&puts);

    SymbolChain {
        underlying: raw.underlying.clone(),
        calls,
        puts,
        summary: ChainSummary {
            total_call_open_interest,
            total_put_open_interest,
            highest_call,
            highest_put,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawChain {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn highest_is_first_seen_on_ties() {
        let chain = aggregate(&raw(json!({
            "calls": [
                {"strike": 100, "oi": 50},
                {"strike": 105, "oi": 80},
                {"strike": 110, "oi": 80}
            ]
        })));
        let highest = chain.summary.highest_call.as_ref().unwrap();
        assert_eq!(highest.open_interest, 80);
        assert_eq!(highest.strike, Some(105.0));
        assert_eq!(chain.summary.total_call_open_interest, 210);
        assert_eq!(chain.summary.highest_put, None);
        assert_eq!(chain.summary.highest_put_open_interest(), 0);
    }

    #[test]
    fn missing_fields_default_without_error() {
        let chain = aggregate(&raw(json!({"calls": [{"strike": 100}]})));
        assert_eq!(
            chain.calls,
            vec![OptionLeg {
                strike: Some(100.0),
                open_interest: 0,
                last_traded_price: None,
                volume: 0,
            }]
        );
        assert_eq!(chain.summary.total_call_open_interest, 0);
        assert!(chain.puts.is_empty());
        assert_eq!(chain.underlying, None);
    }

    #[test]
    fn zero_traded_price_is_kept() {
        let chain = aggregate(&raw(json!({
            "underlying": "AAPL",
            "puts": [{"strike": 150, "oi": 10, "ltp": 0, "volume": 4}]
        })));
        assert_eq!(chain.puts[0].last_traded_price, Some(0.0));
        assert_eq!(chain.puts[0].volume, 4);
        assert_eq!(chain.summary.total_put_open_interest, 10);
        assert_eq!(chain.underlying.as_deref(), Some("AAPL"));
    }

    #[test]
    fn empty_payload_is_an_empty_chain() {
        let chain = aggregate(&RawChain::default());
        assert!(chain.calls.is_empty() && chain.puts.is_empty());
        assert_eq!(chain.summary, ChainSummary::default());
    }
}
