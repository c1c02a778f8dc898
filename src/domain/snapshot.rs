//! Immutable record snapshot built once by the loader.

use crate::domain::sale_record::SaleRecord;
use crate::ports::sales_data_port::SalesDataPort;

/// Output of a single pass over a sales source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSales {
    /// Valid records in source row order.
    pub records: Vec<SaleRecord>,
    /// Data rows rejected by the parser (header excluded).
    pub skipped: usize,
}

/// The record collection queried by the aggregation engine.
///
/// Never mutated after construction. Reloading builds a new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesSnapshot {
    records: Vec<SaleRecord>,
    skipped: usize,
    load_fault: Option<String>,
}

impl SalesSnapshot {
    pub fn new(records: Vec<SaleRecord>) -> Self {
        Self {
            records,
            skipped: 0,
            load_fault: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads from `port`. A source-level fault is logged and yields an empty
    /// snapshot that remembers the fault.
    pub fn load(port: &dyn SalesDataPort) -> Self {
        match port.load_sales() {
            Ok(loaded) => loaded.into(),
            Err(e) => {
                log::error!("{e}");
                Self {
                    records: Vec::new(),
                    skipped: 0,
                    load_fault: Some(e.to_string()),
                }
            }
        }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn load_fault(&self) -> Option<&str> {
        self.load_fault.as_deref()
    }
}

impl From<LoadedSales> for SalesSnapshot {
    fn from(loaded: LoadedSales) -> Self {
        Self {
            records: loaded.records,
            skipped: loaded.skipped,
            load_fault: None,
        }
    }
}
