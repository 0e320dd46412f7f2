//! Watch-list and selection state.
//!
//! Pure state, no I/O. The dashboard mutates it in response to user actions;
//! pipeline runs only ever read a [`Selection`] snapshot taken at run start.

use crate::constants::AUTO_SELECT_COUNT;

/// What one pipeline run fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected symbols, in the order the user picked them.
    pub symbols: Vec<String>,
    /// Optional expiry filter, e.g. `25-Nov-2025`.
    pub expiry: Option<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The watch-list, the current selection, and the expiry filter.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    watch_list: Vec<String>,
    selected: Vec<String>,
    expiry: Option<String>,
}

/// Trim and upper-case a user-supplied symbol; `None` if blank.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let s = raw.trim();
    (!s.is_empty()).then(|| s.to_uppercase())
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the watch-list with a freshly loaded one.
    ///
    /// Selected symbols that disappeared from the list are dropped and
    /// returned. If that leaves nothing selected, the first few symbols are
    /// selected.
    pub fn set_watch_list(&mut self, symbols: impl IntoIterator<Item = String>) -> Vec<String> {
        self.watch_list.clear();
        for s in symbols.into_iter().filter_map(|s| normalize_symbol(&s)) {
            if !self.watch_list.contains(&s) {
                self.watch_list.push(s);
            }
        }

        let watch_list = &self.watch_list;
        let (kept, dropped): (Vec<String>, Vec<String>) = std::mem::take(&mut self.selected)
            .into_iter()
            .partition(|s| watch_list.contains(s));
        self.selected = kept;
        if self.selected.is_empty() {
            self.selected = self
                .watch_list
                .iter()
                .take(AUTO_SELECT_COUNT)
                .cloned()
                .collect();
        }
        dropped
    }

    pub fn watch_list(&self) -> &[String] {
        &self.watch_list
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, symbol: &str) -> bool {
        self.selected.iter().any(|s| s == symbol)
    }

    /// Replace the selection. Duplicates collapse to their first occurrence.
    pub fn select(&mut self, symbols: impl IntoIterator<Item = impl AsRef<str>>) {
        self.selected.clear();
        for s in symbols {
            self.add_to_selection(s.as_ref());
        }
    }

    /// Append one symbol to the selection. Returns `false` if it was blank or
    /// already selected.
    pub fn add_to_selection(&mut self, symbol: &str) -> bool {
        match normalize_symbol(symbol) {
            Some(s) if !self.is_selected(&s) => {
                self.selected.push(s);
                true
            }
            _ => false,
        }
    }

    /// Remove one symbol from the selection. Returns `true` if it was selected.
    pub fn deselect(&mut self, symbol: &str) -> bool {
        let Some(s) = normalize_symbol(symbol) else {
            return false;
        };
        let before = self.selected.len();
        self.selected.retain(|x| *x != s);
        self.selected.len() != before
    }

    /// Toggle one symbol; returns whether it is selected afterwards.
    pub fn toggle(&mut self, symbol: &str) -> bool {
        if self.deselect(symbol) {
            false
        } else {
            self.add_to_selection(symbol)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn expiry(&self) -> Option<&str> {
        self.expiry.as_deref()
    }

    /// Set the expiry filter; a blank value means "all expiries".
    pub fn set_expiry(&mut self, expiry: Option<&str>) {
        self.expiry = expiry
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_owned);
    }

    /// Copy of what the next run should fetch.
    pub fn snapshot(&self) -> Selection {
        Selection {
            symbols: self.selected.clone(),
            expiry: self.expiry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn loading_watch_list_auto_selects_first_six() {
        let mut reg = SymbolRegistry::new();
        reg.set_watch_list(list(&[
            "ABB", "RELIANCE", "TCS", "INFY", "HDFCBANK", "SBIN", "LT", "ITC",
        ]));
        assert_eq!(
            reg.selected(),
            list(&["ABB", "RELIANCE", "TCS", "INFY", "HDFCBANK", "SBIN"])
        );
    }

    #[test]
    fn reload_keeps_surviving_selection() {
        let mut reg = SymbolRegistry::new();
        reg.set_watch_list(list(&["ABB", "TCS", "INFY"]));
        reg.select(["infy", "tcs"]);
        let dropped = reg.set_watch_list(list(&["ABB", "INFY", "ITC"]));
        assert_eq!(dropped, list(&["TCS"]));
        assert_eq!(reg.selected(), list(&["INFY"]));

        let dropped = reg.set_watch_list(list(&["ITC"]));
        assert_eq!(dropped, list(&["INFY"]));
        assert_eq!(reg.selected(), list(&["ITC"]));
    }

    #[test]
    fn selection_preserves_user_order_and_dedups() {
        let mut reg = SymbolRegistry::new();
        reg.select(["TSLA", " aapl ", "TSLA", ""]);
        assert_eq!(reg.selected(), list(&["TSLA", "AAPL"]));

        assert!(!reg.toggle("tsla"));
        assert!(reg.toggle("MSFT"));
        assert_eq!(reg.selected(), list(&["AAPL", "MSFT"]));

        assert!(!reg.deselect("GOOG"));
        reg.clear_selection();
        assert!(reg.snapshot().is_empty());
    }

    #[test]
    fn blank_expiry_means_all() {
        let mut reg = SymbolRegistry::new();
        reg.set_expiry(Some("25-Nov-2025"));
        assert_eq!(reg.expiry(), Some("25-Nov-2025"));
        reg.set_expiry(Some("  "));
        assert_eq!(reg.expiry(), None);

        reg.select(["AAPL"]);
        reg.set_expiry(Some("30-Dec-2025"));
        assert_eq!(
            reg.snapshot(),
            Selection {
                symbols: list(&["AAPL"]),
                expiry: Some("30-Dec-2025".into()),
            }
        );
    }
}
