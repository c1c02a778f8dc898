//! The five sales aggregations.
//!
//! Every function here is a pure scan over a record slice. Month-scoped
//! results are ordered chronologically. When several SKUs share the maximum
//! for a month, the SKU seen first in the input wins: candidates are scanned
//! in insertion order and only a strictly greater value replaces the
//! incumbent.

use crate::domain::error::SalesError;
use crate::domain::sale_record::{SaleRecord, YearMonth};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u32,
    pub total_sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularItem {
    pub year: i32,
    pub month: u32,
    pub sku: String,
    pub total_quantity_sold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopRevenueItem {
    pub year: i32,
    pub month: u32,
    pub sku: String,
    pub total_revenue: Decimal,
}

/// Order-size statistics for a month's most popular SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonthItemStats {
    Sales {
        year: i32,
        month: u32,
        sku: String,
        min_orders: u32,
        max_orders: u32,
        avg_orders: Decimal,
        order_count: u64,
    },
    NoSalesData {
        year: i32,
        month: u32,
    },
}

impl MonthItemStats {
    pub fn year_month(&self) -> YearMonth {
        match self {
            MonthItemStats::Sales { year, month, .. }
            | MonthItemStats::NoSalesData { year, month } => YearMonth::new(*year, *month),
        }
    }
}

pub const TOTAL_SALES: &str = "total sales";
pub const MONTHLY_SALES: &str = "monthly sales";
pub const MOST_POPULAR_ITEM: &str = "most popular item";
pub const TOP_REVENUE_ITEM: &str = "top revenue item";
pub const POPULAR_ITEM_STATS: &str = "popular item stats";

/// Sum of `total_price` over all records. Zero for an empty slice.
pub fn total_sales(records: &[SaleRecord]) -> Result<Decimal, SalesError> {
    records.iter().try_fold(Decimal::ZERO, |acc, r| {
        acc.checked_add(r.total_price())
            .ok_or_else(|| SalesError::overflow(TOTAL_SALES, "revenue sum"))
    })
}

/// Revenue per `(year, month)`. Months without records are absent.
pub fn monthly_sales(records: &[SaleRecord]) -> Result<Vec<MonthlySales>, SalesError> {
    let mut months: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    for record in records {
        let total = months.entry(record.year_month()).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(record.total_price())
            .ok_or_else(|| SalesError::overflow(MONTHLY_SALES, "monthly revenue"))?;
    }

    Ok(months
        .into_iter()
        .map(|(ym, total_sales)| MonthlySales {
            year: ym.year,
            month: ym.month,
            total_sales,
        })
        .collect())
}

/// The SKU with the highest summed quantity in each month.
pub fn most_popular_item_each_month(
    records: &[SaleRecord],
) -> Result<Vec<PopularItem>, SalesError> {
    let months = tally_by_month(records, MOST_POPULAR_ITEM)?;

    Ok(months
        .iter()
        .filter_map(|(ym, tally)| {
            tally.most_popular().map(|item| PopularItem {
                year: ym.year,
                month: ym.month,
                sku: item.sku.clone(),
                total_quantity_sold: item.quantity,
            })
        })
        .collect())
}

/// The SKU with the highest summed revenue in each month.
pub fn top_revenue_items_each_month(
    records: &[SaleRecord],
) -> Result<Vec<TopRevenueItem>, SalesError> {
    let months = tally_by_month(records, TOP_REVENUE_ITEM)?;

    Ok(months
        .iter()
        .filter_map(|(ym, tally)| {
            first_max_by_key(&tally.items, |item| item.revenue).map(|item| TopRevenueItem {
                year: ym.year,
                month: ym.month,
                sku: item.sku.clone(),
                total_revenue: item.revenue,
            })
        })
        .collect())
}

/// Min, max and average order quantity of each month's most popular SKU.
///
/// Covers every calendar month from the earliest to the latest month in
/// `records`; a month inside that span without records is reported as
/// [`MonthItemStats::NoSalesData`].
pub fn popular_item_stats(records: &[SaleRecord]) -> Result<Vec<MonthItemStats>, SalesError> {
    let months = tally_by_month(records, POPULAR_ITEM_STATS)?;
    let (Some(first), Some(last)) = (months.keys().next(), months.keys().next_back()) else {
        return Ok(Vec::new());
    };

    let mut stats = Vec::new();
    let mut ym = *first;
    while ym <= *last {
        let entry = match months.get(&ym).and_then(MonthTally::most_popular) {
            Some(item) => {
                let avg_orders = Decimal::from(item.quantity)
                    .checked_div(Decimal::from(item.orders))
                    .ok_or_else(|| SalesError::overflow(POPULAR_ITEM_STATS, "average order size"))?;
                MonthItemStats::Sales {
                    year: ym.year,
                    month: ym.month,
                    sku: item.sku.clone(),
                    min_orders: item.min_orders,
                    max_orders: item.max_orders,
                    avg_orders,
                    order_count: item.orders,
                }
            }
            None => MonthItemStats::NoSalesData {
                year: ym.year,
                month: ym.month,
            },
        };
        stats.push(entry);
        ym = ym.succ();
    }

    Ok(stats)
}

/// Running totals for one SKU within one month.
#[derive(Debug)]
struct SkuTally {
    sku: String,
    quantity: u64,
    revenue: Decimal,
    min_orders: u32,
    max_orders: u32,
    orders: u64,
}

/// SKU tallies for one month, kept in first-seen order.
#[derive(Debug, Default)]
struct MonthTally {
    items: Vec<SkuTally>,
    index: HashMap<String, usize>,
}

impl MonthTally {
    fn add(&mut self, record: &SaleRecord, query: &str) -> Result<(), SalesError> {
        let idx = match self.index.get(record.sku()) {
            Some(&i) => i,
            None => {
                self.items.push(SkuTally {
                    sku: record.sku().to_string(),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                    min_orders: record.quantity(),
                    max_orders: record.quantity(),
                    orders: 0,
                });
                self.index.insert(record.sku().to_string(), self.items.len() - 1);
                self.items.len() - 1
            }
        };

        let item = &mut self.items[idx];
        item.quantity = item
            .quantity
            .checked_add(u64::from(record.quantity()))
            .ok_or_else(|| SalesError::overflow(query, "quantity sum"))?;
        item.revenue = item
            .revenue
            .checked_add(record.total_price())
            .ok_or_else(|| SalesError::overflow(query, "revenue sum"))?;
        item.min_orders = item.min_orders.min(record.quantity());
        item.max_orders = item.max_orders.max(record.quantity());
        item.orders += 1;
        Ok(())
    }

    fn most_popular(&self) -> Option<&SkuTally> {
        first_max_by_key(&self.items, |item| item.quantity)
    }
}

fn tally_by_month(
    records: &[SaleRecord],
    query: &str,
) -> Result<BTreeMap<YearMonth, MonthTally>, SalesError> {
    let mut months: BTreeMap<YearMonth, MonthTally> = BTreeMap::new();
    for record in records {
        months
            .entry(record.year_month())
            .or_default()
            .add(record, query)?;
    }
    Ok(months)
}

/// First element holding the maximum key. Ties keep the earlier element.
fn first_max_by_key<T, K: PartialOrd>(items: &[T], key: impl Fn(&T) -> K) -> Option<&T> {
    let mut iter = items.iter();
    let mut best = iter.next()?;
    let mut best_key = key(best);
    for item in iter {
        let k = key(item);
        if k > best_key {
            best = item;
            best_key = k;
        }
    }
    Some(best)
}
