//! Flat-file loader for the monthly returns table
//!
//! The feed is whitespace- or tab-delimited with 8 columns per data row:
//! row number, date label, then monthly decimal returns for Treasury bonds,
//! the corporate bond index, large cap, small/midcap, international
//! equities, and 1 year Treasury bills. Blank lines are ignored; any other
//! malformed line aborts the load.

use super::table::ReturnRow;
use super::{DatasetError, HistoricalDataset};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load the historical returns table from a delimited text file
pub fn load_returns(path: &Path) -> Result<HistoricalDataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut numbered: Vec<(usize, ReturnRow)> = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line.map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 8 {
            return Err(DatasetError::ColumnCount {
                line: line_no,
                got: fields.len(),
            });
        }

        let row_number = parse_field::<usize>(fields[0], "row number", line_no)?;
        let label = fields[1];
        let mut returns = [0.0_f64; 6];
        for (slot, field) in returns.iter_mut().zip(&fields[2..]) {
            *slot = parse_field::<f64>(field, "return", line_no)?;
        }

        numbered.push((
            row_number,
            ReturnRow::new(
                label, returns[0], returns[1], returns[2], returns[3], returns[4], returns[5],
            ),
        ));
    }

    // The row-number column is authoritative for ordering; require a
    // contiguous 1..=n sequence so bootstrap indices always hit real data.
    numbered.sort_by_key(|(n, _)| *n);
    for (position, (row_number, _)) in numbered.iter().enumerate() {
        if *row_number != position + 1 {
            return Err(DatasetError::MissingRow { row: position + 1 });
        }
    }

    HistoricalDataset::new(numbered.into_iter().map(|(_, row)| row).collect())
}

fn parse_field<T: std::str::FromStr>(
    field: &str,
    what: &str,
    line: usize,
) -> Result<T, DatasetError> {
    field.parse().map_err(|_| DatasetError::Parse {
        line,
        message: format!("invalid {what} '{field}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Instrument;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_tab_delimited() {
        let path = write_temp(
            "nestegg_loader_tabs.txt",
            "1\t1970-01\t-0.0079\t0.0012\t-0.0744\t-0.0733\t-0.0381\t0.0066\n\
             2\t1970-02\t0.0587\t0.0041\t0.0562\t0.0303\t-0.0131\t0.0065\n",
        );
        let dataset = load_returns(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.row(0).label, "1970-01");
        assert_eq!(dataset.row(1).monthly_return(Instrument::TreasuryBond), 0.0587);
        assert_eq!(dataset.row(0).monthly_return(Instrument::LargeCap), -0.0744);
    }

    #[test]
    fn test_load_out_of_order_rows() {
        let path = write_temp(
            "nestegg_loader_order.txt",
            "2 1970-02 0.01 0.01 0.01 0.01 0.01 0.01\n\
             1 1970-01 0.02 0.02 0.02 0.02 0.02 0.02\n",
        );
        let dataset = load_returns(&path).unwrap();
        assert_eq!(dataset.row(0).label, "1970-01");
        assert_eq!(dataset.row(1).label, "1970-02");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let path = write_temp(
            "nestegg_loader_blank.txt",
            "\n1 1970-01 0.0 0.0 0.0 0.0 0.0 0.0\n\n",
        );
        assert_eq!(load_returns(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let path = write_temp(
            "nestegg_loader_bad.txt",
            "1 1970-01 0.0 0.0 0.0\n",
        );
        assert!(matches!(
            load_returns(&path),
            Err(DatasetError::ColumnCount { line: 1, got: 5 })
        ));
    }

    #[test]
    fn test_gap_in_row_numbers_is_fatal() {
        let path = write_temp(
            "nestegg_loader_gap.txt",
            "1 1970-01 0.0 0.0 0.0 0.0 0.0 0.0\n\
             3 1970-03 0.0 0.0 0.0 0.0 0.0 0.0\n",
        );
        assert!(matches!(
            load_returns(&path),
            Err(DatasetError::MissingRow { row: 2 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_returns(Path::new("/nonexistent/returns.txt"));
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }
}
