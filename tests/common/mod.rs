#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use salesagg::domain::error::SalesError;
pub use salesagg::domain::sale_record::SaleRecord;
use salesagg::domain::snapshot::LoadedSales;
use salesagg::ports::sales_data_port::SalesDataPort;
use std::io::Write;
use std::str::FromStr;

pub const HEADER: &str = "Date,SKU,Unit Price,Quantity\n";

pub struct MockSalesDataPort {
    pub records: Vec<SaleRecord>,
    pub skipped: usize,
    pub error: Option<String>,
}

impl MockSalesDataPort {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            error: None,
        }
    }

    pub fn with_records(mut self, records: Vec<SaleRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl SalesDataPort for MockSalesDataPort {
    fn load_sales(&self) -> Result<LoadedSales, SalesError> {
        if let Some(reason) = &self.error {
            return Err(SalesError::SourceRead {
                path: "mock".into(),
                reason: reason.clone(),
            });
        }
        Ok(LoadedSales {
            records: self.records.clone(),
            skipped: self.skipped,
        })
    }

    fn describe(&self) -> String {
        "mock".into()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn make_record(date_str: &str, sku: &str, price: &str, quantity: u32) -> SaleRecord {
    SaleRecord::new(
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        sku,
        dec(price),
        quantity,
    )
    .unwrap()
}

/// A small dataset spanning Jan-Apr 2024 with no sales in March.
pub fn sample_records() -> Vec<SaleRecord> {
    vec![
        make_record("2024-01-03", "WIDGET", "2.50", 4),
        make_record("2024-01-10", "GADGET", "20.00", 1),
        make_record("2024-01-15", "WIDGET", "2.50", 6),
        make_record("2024-01-28", "GIZMO", "5.00", 10),
        make_record("2024-02-02", "GADGET", "20.00", 3),
        make_record("2024-02-14", "WIDGET", "2.50", 3),
        make_record("2024-04-01", "GIZMO", "5.00", 2),
    ]
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
