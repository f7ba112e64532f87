//! Market data: the scalar market context and maturity-grouped option quotes.

pub mod loader;
#[allow(clippy::module_inception)]
pub mod market;
pub mod quotes;

pub use loader::{load_quotes_csv, read_quotes};
pub use market::{MarketContext, MarketContextBuilder};
pub use quotes::{MarketQuote, MaturityGroup, QuoteBook};
