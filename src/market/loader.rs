//! Module `market::loader`.
//!
//! CSV ingestion for option quotes. Columns are `maturity,strike,implied_vol,forward`, with
//! `maturity` in ISO `YYYY-MM-DD` form and an optional (possibly empty) `forward` column.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::{PricingError, Result};
use crate::market::MarketQuote;

/// Loads quotes from a CSV file.
///
/// # Errors
/// Returns [`PricingError::MarketDataMissing`] when the file does not exist and
/// [`PricingError::Csv`] on malformed rows.
pub fn load_quotes_csv<P: AsRef<Path>>(path: P) -> Result<Vec<MarketQuote>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PricingError::MarketDataMissing(format!(
            "quote file not found: {}",
            path.display()
        )));
    }

    let file = std::fs::File::open(path)?;
    let quotes = read_quotes(file)?;
    debug!(path = %path.display(), count = quotes.len(), "loaded quotes");
    Ok(quotes)
}

/// Parses quotes from any CSV reader with a header row.
pub fn read_quotes<R: Read>(reader: R) -> Result<Vec<MarketQuote>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut quotes = Vec::new();
    for row in reader.deserialize::<MarketQuote>() {
        quotes.push(row?);
    }
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_optional_forward_column() {
        let data = "maturity,strike,implied_vol,forward\n\
                    2025-03-21,440,0.17,\n\
                    2025-03-21, 450 ,0.16,449.42\n";
        let quotes = read_quotes(data.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].maturity, NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
        assert_eq!(quotes[0].forward, None);
        assert_eq!(quotes[1].strike, 450.0);
        assert_eq!(quotes[1].forward, Some(449.42));
    }

    #[test]
    fn forward_column_may_be_absent() {
        let data = "maturity,strike,implied_vol\n2025-06-20,460,0.15\n";
        let quotes = read_quotes(data.as_bytes()).unwrap();
        assert_eq!(quotes[0].forward, None);
    }

    #[test]
    fn malformed_row_is_an_error() {
        let data = "maturity,strike,implied_vol,forward\nnot-a-date,440,0.17,\n";
        assert!(matches!(read_quotes(data.as_bytes()), Err(PricingError::Csv(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_quotes_csv("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, PricingError::MarketDataMissing(_)));
    }
}
