//! Point-of-sale record and the month grouping key.

use crate::domain::error::RowError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// One transaction line. `total_price` is always `unit_price * quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRecord {
    date: NaiveDate,
    sku: String,
    unit_price: Decimal,
    quantity: u32,
    total_price: Decimal,
}

impl SaleRecord {
    pub fn new(
        date: NaiveDate,
        sku: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, RowError> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(RowError::EmptySku);
        }
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(RowError::NegativePrice {
                value: unit_price.to_string(),
            });
        }
        let total_price = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| RowError::TotalOverflow {
                unit_price: unit_price.to_string(),
                quantity,
            })?;

        Ok(Self {
            date,
            sku,
            unit_price,
            quantity,
            total_price,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }
}

/// Calendar month used as the group-by key. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
