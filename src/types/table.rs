//! The composite comparison table handed to the UI layer.
//!
//! A [`ChainTable`] is a sequence of [`SymbolGroup`]s in selection order;
//! each group holds its strike rows and a totals footer. `Display` renders
//! the whole table as fixed-width text, marking highlighted cells with `*`.

use std::fmt;

use serde::Serialize;

/// One row of the composite table. Call and put fields are `None` when that
/// side has no leg at the row's index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRow {
    pub symbol: String,
    pub strike: Option<f64>,
    pub call_oi: Option<u64>,
    pub call_ltp: Option<f64>,
    pub call_volume: Option<u64>,
    pub put_oi: Option<u64>,
    pub put_ltp: Option<f64>,
    pub put_volume: Option<u64>,
    pub call_highlighted: bool,
    pub put_highlighted: bool,
}

/// Per-symbol open-interest totals shown in a group's footer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    pub call_open_interest: u64,
    pub put_open_interest: u64,
}

/// All rows for one symbol, plus its header and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolGroup {
    pub symbol: String,
    pub underlying: Option<String>,
    /// The backend failed this symbol; the group is empty with zero totals.
    pub failed: bool,
    pub rows: Vec<RenderRow>,
    pub totals: GroupTotals,
}

impl SymbolGroup {
    /// Number of highlighted cells (call and put counted separately).
    pub fn highlighted_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|r| usize::from(r.call_highlighted) + usize::from(r.put_highlighted))
            .sum()
    }
}

/// The multi-symbol table produced by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainTable {
    pub groups: Vec<SymbolGroup>,
}

impl ChainTable {
    pub fn group(&self, symbol: &str) -> Option<&SymbolGroup> {
        self.groups.iter().find(|g| g.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

const HEADERS: [&str; 8] = [
    "Symbol", "Strike", "Call OI", "Call LTP", "Call Vol", "Put OI", "Put LTP", "Put Vol",
];

fn cell<T: fmt::Display>(value: Option<T>, highlighted: bool) -> String {
    match value {
        Some(v) if highlighted => format!("{v}*"),
        Some(v) => v.to_string(),
        None => "-".to_owned(),
    }
}

fn line(f: &mut fmt::Formatter<'_>, cols: [&str; 8]) -> fmt::Result {
    writeln!(
        f,
        "{:<12} {:>10} {:>10} {:>10} {:>10} | {:>10} {:>10} {:>10}",
        cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7]
    )
}

impl fmt::Display for ChainTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        line(f, HEADERS)?;
        for group in &self.groups {
            write!(
                f,
                "== {} - underlying: {} - total Call OI: {} | total Put OI: {}",
                group.symbol,
                group.underlying.as_deref().unwrap_or("-"),
                group.totals.call_open_interest,
                group.totals.put_open_interest,
            )?;
            if group.failed {
                f.write_str(" (unavailable)")?;
            }
            writeln!(f)?;

            for row in &group.rows {
                let cells = [
                    row.symbol.clone(),
                    cell(row.strike, false),
                    cell(row.call_oi, row.call_highlighted),
                    cell(row.call_ltp, row.call_highlighted),
                    cell(row.call_volume, row.call_highlighted),
                    cell(row.put_oi, row.put_highlighted),
                    cell(row.put_ltp, row.put_highlighted),
                    cell(row.put_volume, row.put_highlighted),
                ];
                line(f, cells.each_ref().map(String::as_str))?;
            }

            let totals_label = format!("{} Totals", group.symbol);
            let call_total = group.totals.call_open_interest.to_string();
            let put_total = group.totals.put_open_interest.to_string();
            line(
                f,
                [
                    totals_label.as_str(),
                    "",
                    call_total.as_str(),
                    "",
                    "",
                    put_total.as_str(),
                    "",
                    "",
                ],
            )?;
        }
        Ok(())
    }
}
