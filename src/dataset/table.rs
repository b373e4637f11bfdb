//! Return table structures and instrument indexing

use super::DatasetError;
use crate::simulation::round15;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Instruments tracked per historical month
///
/// The first six are columns of the returns file; the fixed CD and money
/// market columns are appended per run from the configured annual rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instrument {
    /// 10 year Treasury bonds
    TreasuryBond,
    /// US corporate bond index
    CorporateBond,
    /// Large cap US equities (S&P 500)
    LargeCap,
    /// Small/midcap US equities (Russell 2000)
    SmallMidCap,
    /// International equities (MSCI EAFE)
    International,
    /// 1 year Treasury bills
    TreasuryBill,
    /// Fixed rate CD at the configured annual rate
    FixedCd,
    /// Fixed rate money market fund at the configured annual rate
    FixedMmf,
}

impl Instrument {
    pub const COUNT: usize = 8;

    pub fn index(self) -> usize {
        match self {
            Instrument::TreasuryBond => 0,
            Instrument::CorporateBond => 1,
            Instrument::LargeCap => 2,
            Instrument::SmallMidCap => 3,
            Instrument::International => 4,
            Instrument::TreasuryBill => 5,
            Instrument::FixedCd => 6,
            Instrument::FixedMmf => 7,
        }
    }
}

/// One historical month of per-instrument returns
#[derive(Debug, Clone)]
pub struct ReturnRow {
    /// Date label as it appears in the returns file
    pub label: String,

    /// Parsed month, when the label is a recognizable date
    pub date: Option<NaiveDate>,

    returns: [f64; Instrument::COUNT],
}

impl ReturnRow {
    /// Build a row from the six file columns; fixed-rate columns start at 0
    pub fn new(
        label: impl Into<String>,
        treasury_bond: f64,
        corporate_bond: f64,
        large_cap: f64,
        small_mid: f64,
        international: f64,
        treasury_bill: f64,
    ) -> Self {
        let label = label.into();
        let date = parse_month_label(&label);
        Self {
            label,
            date,
            returns: [
                treasury_bond,
                corporate_bond,
                large_cap,
                small_mid,
                international,
                treasury_bill,
                0.0,
                0.0,
            ],
        }
    }

    /// Monthly decimal return for the given instrument
    pub fn monthly_return(&self, instrument: Instrument) -> f64 {
        self.returns[instrument.index()]
    }

    fn set_fixed_rates(&mut self, cd_monthly: f64, mmf_monthly: f64) {
        self.returns[Instrument::FixedCd.index()] = cd_monthly;
        self.returns[Instrument::FixedMmf.index()] = mmf_monthly;
    }
}

/// Ordered table of historical monthly returns
///
/// Loaded once before a run and read-only afterwards; the simulator indexes
/// rows through the bootstrap matrix.
#[derive(Debug, Clone)]
pub struct HistoricalDataset {
    rows: Vec<ReturnRow>,
}

impl HistoricalDataset {
    pub fn new(rows: Vec<ReturnRow>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> &ReturnRow {
        &self.rows[index]
    }

    /// Fill the fixed CD and money market columns from annual percentage
    /// rates, converting each to a monthly rate (annual% / 1200)
    pub fn apply_fixed_rates(&mut self, cd_annual_pct: f64, mmf_annual_pct: f64) {
        let cd_monthly = round15(cd_annual_pct / 1200.0);
        let mmf_monthly = round15(mmf_annual_pct / 1200.0);
        for row in &mut self.rows {
            row.set_fixed_rates(cd_monthly, mmf_monthly);
        }
    }

    /// First and last parsed month in the table, when labels carry dates
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?.date?;
        let last = self.rows.last()?.date?;
        Some((first, last))
    }
}

/// Parse a date label such as `1970-01`, `1970-01-31`, or `Jan-70`
pub(super) fn parse_month_label(label: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("01-{label}"), "%d-%b-%y") {
        return Some(date);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_row(r: f64) -> ReturnRow {
        ReturnRow::new("1970-01", r, r, r, r, r, r)
    }

    #[test]
    fn test_instrument_lookup() {
        let row = ReturnRow::new("1970-01", 0.001, 0.002, 0.03, 0.04, 0.05, 0.0004);
        assert_eq!(row.monthly_return(Instrument::TreasuryBond), 0.001);
        assert_eq!(row.monthly_return(Instrument::CorporateBond), 0.002);
        assert_eq!(row.monthly_return(Instrument::LargeCap), 0.03);
        assert_eq!(row.monthly_return(Instrument::SmallMidCap), 0.04);
        assert_eq!(row.monthly_return(Instrument::International), 0.05);
        assert_eq!(row.monthly_return(Instrument::TreasuryBill), 0.0004);
        assert_eq!(row.monthly_return(Instrument::FixedCd), 0.0);
        assert_eq!(row.monthly_return(Instrument::FixedMmf), 0.0);
    }

    #[test]
    fn test_fixed_rates_are_monthly() {
        let mut dataset = HistoricalDataset::new(vec![flat_row(0.0), flat_row(0.0)]).unwrap();
        dataset.apply_fixed_rates(12.0, 6.0);
        assert_relative_eq!(
            dataset.row(0).monthly_return(Instrument::FixedCd),
            0.01,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            dataset.row(1).monthly_return(Instrument::FixedMmf),
            0.005,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(matches!(
            HistoricalDataset::new(Vec::new()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn test_month_label_formats() {
        assert_eq!(
            parse_month_label("1970-01"),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            parse_month_label("2013-12-31"),
            NaiveDate::from_ymd_opt(2013, 12, 31)
        );
        assert_eq!(
            parse_month_label("Jan-70"),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(parse_month_label("row-17"), None);
    }

    #[test]
    fn test_span() {
        let dataset = HistoricalDataset::new(vec![
            ReturnRow::new("1970-01", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
            ReturnRow::new("1970-02", 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        ])
        .unwrap();
        let (first, last) = dataset.span().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(1970, 2, 1).unwrap());
    }
}
