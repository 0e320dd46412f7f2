//! Request, response and table types for the option-chain dashboard.
//!
//! ## Organization
//!
//! - [`stocks`]: Watch-list, search and add/remove payloads
//! - [`option_chain`]: Raw chain payloads from the backend plus the
//!   normalized [`OptionLeg`](option_chain::OptionLeg) /
//!   [`SymbolResult`](option_chain::SymbolResult) shapes the pipeline works on
//! - [`table`]: The composite multi-symbol comparison table

pub mod option_chain;
pub mod stocks;
pub mod table;
