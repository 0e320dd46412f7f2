//! Assembly of the composite multi-symbol table.
//!
//! Calls and puts are paired by position, not by strike: row `i` shows
//! `calls[i]` next to `puts[i]`. A backend returning misaligned sides will
//! render mismatched strikes; that pairing is part of the table's contract.

use crate::types::option_chain::{AggregatedSet, OptionLeg, SymbolChain, SymbolResult};
use crate::types::table::{ChainTable, GroupTotals, RenderRow, SymbolGroup};

fn highlighted(leg: Option<&OptionLeg>, highest: u64) -> bool {
    leg.is_some_and(|l| l.open_interest == highest && highest > 0)
}

fn rows(symbol: &str, chain: &SymbolChain) -> Vec<RenderRow> {
    let highest_call = chain.summary.highest_call_open_interest();
    let highest_put = chain.summary.highest_put_open_interest();
    let len = chain.calls.len().max(chain.puts.len());

    (0..len)
        .map(|i| {
            let call = chain.calls.get(i);
            let put = chain.puts.get(i);
            RenderRow {
                symbol: symbol.to_owned(),
                strike: call.and_then(|c| c.strike).or_else(|| put.and_then(|p| p.strike)),
                call_oi: call.map(|c| c.open_interest),
                call_ltp: call.and_then(|c| c.last_traded_price),
                call_volume: call.map(|c| c.volume),
                put_oi: put.map(|p| p.open_interest),
                put_ltp: put.and_then(|p| p.last_traded_price),
                put_volume: put.map(|p| p.volume),
                call_highlighted: highlighted(call, highest_call),
                put_highlighted: highlighted(put, highest_put),
            }
        })
        .collect()
}

fn group(symbol: &str, result: &SymbolResult) -> SymbolGroup {
    match result {
        SymbolResult::Success(chain) => SymbolGroup {
            symbol: symbol.to_owned(),
            underlying: chain.underlying.clone(),
            failed: false,
            rows: rows(symbol, chain),
            totals: GroupTotals {
                call_open_interest: chain.summary.total_call_open_interest,
                put_open_interest: chain.summary.total_put_open_interest,
            },
        },
        SymbolResult::Failure => SymbolGroup {
            symbol: symbol.to_owned(),
            underlying: None,
            failed: true,
            rows: Vec::new(),
            totals: GroupTotals::default(),
        },
    }
}

/// Build the composite table, one group per symbol in the set's order.
///
/// Pure and deterministic: the same set always yields an equal table.
pub fn assemble(aggregated: &AggregatedSet) -> ChainTable {
    ChainTable {
        groups: aggregated
            .iter()
            .map(|(symbol, result)| group(symbol, result))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pipeline::aggregator::aggregate;

    fn success(value: serde_json::Value) -> SymbolResult {
        SymbolResult::Success(aggregate(&serde_json::from_value(value).unwrap()))
    }

    #[test]
    fn equal_open_interest_highlights_every_matching_row() {
        let mut set = AggregatedSet::new();
        set.push(
            "X",
            success(json!({"calls": [
                {"strike": 100, "oi": 50},
                {"strike": 105, "oi": 80},
                {"strike": 110, "oi": 80}
            ]})),
        );
        let table = assemble(&set);
        let flags: Vec<bool> = table.groups[0].rows.iter().map(|r| r.call_highlighted).collect();
        assert_eq!(flags, vec![false, true, true]);
        assert!(table.groups[0].rows.iter().all(|r| !r.put_highlighted));
    }

    #[test]
    fn all_zero_chain_highlights_nothing() {
        let mut set = AggregatedSet::new();
        set.push(
            "Z",
            success(json!({
                "calls": [{"strike": 1}, {"strike": 2, "oi": 0}],
                "puts": [{"strike": 1, "oi": 0}]
            })),
        );
        assert_eq!(assemble(&set).groups[0].highlighted_cells(), 0);
    }

    #[test]
    fn shorter_side_pads_with_absent_cells() {
        let mut set = AggregatedSet::new();
        set.push(
            "P",
            success(json!({
                "calls": [
                    {"strike": 10, "oi": 1}, {"strike": 20, "oi": 2}, {"strike": 30, "oi": 3}
                ],
                "puts": [
                    {"strike": 10}, {"strike": 20}, {"strike": 30},
                    {"strike": 40, "oi": 9, "ltp": 1.5}, {"strike": 50}
                ]
            })),
        );
        let table = assemble(&set);
        let rows = &table.groups[0].rows;
        assert_eq!(rows.len(), 5);
        for row in &rows[3..] {
            assert_eq!(row.call_oi, None);
            assert_eq!(row.call_ltp, None);
            assert_eq!(row.call_volume, None);
            assert!(!row.call_highlighted);
        }
        assert_eq!(rows[3].strike, Some(40.0));
        assert!(rows[3].put_highlighted);
        assert_eq!(rows[4].put_oi, Some(0));
    }

    #[test]
    fn strike_falls_back_to_put_then_absent() {
        let mut set = AggregatedSet::new();
        set.push(
            "S",
            success(json!({
                "calls": [{"oi": 1}, {"oi": 2}],
                "puts": [{"strike": 7}]
            })),
        );
        let rows = &assemble(&set).groups[0].rows;
        assert_eq!(rows[0].strike, Some(7.0));
        assert_eq!(rows[1].strike, None);
    }

    #[test]
    fn failure_group_is_empty_with_zero_totals() {
        let mut set = AggregatedSet::new();
        set.push("BAD", SymbolResult::Failure);
        let table = assemble(&set);
        let g = &table.groups[0];
        assert!(g.failed);
        assert!(g.rows.is_empty());
        assert_eq!(g.totals, GroupTotals::default());
    }

    #[test]
    fn assembly_is_deterministic() {
        let mut set = AggregatedSet::new();
        set.push("B", success(json!({"calls": [{"strike": 1, "oi": 4, "ltp": 2.25}]})));
        set.push("A", SymbolResult::Failure);
        let first = assemble(&set);
        let second = assemble(&set);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(
            first.groups.iter().map(|g| g.symbol.as_str()).collect::<Vec<_>>(),
            vec!["B", "A"]
        );
    }

    #[test]
    fn renders_highlights_and_placeholders() {
        let mut set = AggregatedSet::new();
        set.push(
            "AAPL",
            success(json!({
                "underlying": "AAPL",
                "calls": [{"strike": 150, "oi": 200}],
                "puts": [{"strike": 150, "oi": 150}]
            })),
        );
        set.push("TSLA", SymbolResult::Failure);
        let text = assemble(&set).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("== AAPL - underlying: AAPL - total Call OI: 200"));
        assert!(lines[2].contains("200*"));
        assert!(lines[2].contains("150*"));
        assert!(lines[3].starts_with("AAPL Totals"));
        assert!(lines[4].ends_with("(unavailable)"));
        assert!(lines[5].starts_with("TSLA Totals"));
    }
}
