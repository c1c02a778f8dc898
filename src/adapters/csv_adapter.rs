//! CSV file sales data adapter.
//!
//! Expected layout: a header row (always skipped) followed by
//! `date,sku,unit_price,quantity` rows. Bad rows are logged and skipped.

use crate::domain::error::{RowError, SalesError};
use crate::domain::sale_record::SaleRecord;
use crate::domain::snapshot::LoadedSales;
use crate::ports::sales_data_port::SalesDataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

const DATE_FORMAT: &str = "%Y-%m-%d";
const FIELD_COUNT: usize = 4;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SalesDataPort for CsvAdapter {
    fn load_sales(&self) -> Result<LoadedSales, SalesError> {
        if !self.path.exists() {
            return Err(SalesError::SourceMissing {
                path: self.path.display().to_string(),
            });
        }

        let content = fs::read(&self.path).map_err(|e| SalesError::SourceRead {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        if content.is_empty() {
            log::warn!("Sales data file is empty: {}", self.path.display());
            return Ok(LoadedSales::default());
        }

        let loaded = parse_sales(content.as_slice());
        log::info!(
            "Loaded {} sales records from {} ({} skipped)",
            loaded.records.len(),
            self.path.display(),
            loaded.skipped
        );
        Ok(loaded)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parses every data row of `reader`, skipping the first line as a header.
///
/// Each physical line is one row and fields are split on bare commas; quote
/// characters have no special meaning. Records come back in source order.
/// Rejected rows, blank lines included, are logged at warn level with their
/// line number and raw text.
pub fn parse_sales<R: Read>(reader: R) -> LoadedSales {
    let mut reader = BufReader::new(reader);
    let mut loaded = LoadedSales::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line_no += 1,
            Err(e) => {
                log::warn!(
                    "Stopped reading after line {line_no}: {}",
                    RowError::Unreadable {
                        reason: e.to_string()
                    }
                );
                loaded.skipped += 1;
                break;
            }
        }
        if line_no == 1 {
            continue;
        }

        let raw = trim_line_ending(&buf);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                log::warn!(
                    "Skipping invalid row at line {line_no} '{}': {}",
                    String::from_utf8_lossy(raw),
                    RowError::Unreadable {
                        reason: e.to_string()
                    }
                );
                loaded.skipped += 1;
                continue;
            }
        };

        match split_row(line).and_then(|row| parse_row(&row)) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                log::warn!("Skipping invalid row at line {line_no} '{line}': {e}");
                loaded.skipped += 1;
            }
        }
    }

    loaded
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn split_row(line: &str) -> Result<StringRecord, RowError> {
    if line.is_empty() {
        return Err(RowError::MissingFields { found: 0 });
    }
    Ok(line.split(',').collect())
}

/// Converts one `date,sku,unit_price,quantity` row into a record.
pub fn parse_row(row: &StringRecord) -> Result<SaleRecord, RowError> {
    if row.len() < FIELD_COUNT {
        return Err(RowError::MissingFields { found: row.len() });
    }

    let date = parse_date(&row[0])?;
    let unit_price = parse_price(&row[2])?;
    let quantity = parse_quantity(&row[3])?;

    SaleRecord::new(date, row[1].trim(), unit_price, quantity)
}

/// Strict `YYYY-MM-DD`: zero-padded, no surrounding whitespace.
fn parse_date(value: &str) -> Result<NaiveDate, RowError> {
    let invalid = || RowError::InvalidDate {
        value: value.to_string(),
    };
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Period-separated decimal. No exponent, grouping separators or underscores.
fn parse_price(value: &str) -> Result<Decimal, RowError> {
    let trimmed = value.trim();
    let invalid = || RowError::InvalidPrice {
        value: value.to_string(),
    };

    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");
    let plain = (!whole.is_empty() || !frac.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit());
    if !plain {
        return Err(invalid());
    }

    let price = Decimal::from_str_exact(trimmed.trim_start_matches('+')).map_err(|_| invalid())?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(RowError::NegativePrice {
            value: trimmed.to_string(),
        });
    }
    Ok(price)
}

fn parse_quantity(value: &str) -> Result<u32, RowError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| RowError::InvalidQuantity {
            value: value.to_string(),
        })
}
