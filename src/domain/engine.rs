//! Query facade over the current sales snapshot.

use crate::domain::aggregate_result::{AggregateResult, RecordCount};
use crate::domain::aggregation::{
    self, MonthItemStats, MonthlySales, PopularItem, TopRevenueItem,
};
use crate::domain::error::SalesError;
use crate::domain::sale_record::SaleRecord;
use crate::domain::snapshot::SalesSnapshot;
use chrono::Local;
use rust_decimal::Decimal;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

pub const TOTAL_SALES_MESSAGE: &str = "Total Sales Retrieved";
pub const MONTHLY_SALES_MESSAGE: &str = "Monthly Sales Retrieved";
pub const MOST_POPULAR_ITEM_MESSAGE: &str = "Most Popular Item Each Month Retrieved";
pub const TOP_REVENUE_ITEMS_MESSAGE: &str = "Top Revenue Items Each Month Retrieved";
pub const POPULAR_ITEM_STATS_MESSAGE: &str = "Popular Item Stats Retrieved";

/// Answers the five sales queries against an owned snapshot.
///
/// Queries clone the current `Arc` and compute without holding the lock, so
/// a concurrent [`SalesEngine::reload`] never exposes a partial snapshot.
#[derive(Debug)]
pub struct SalesEngine {
    snapshot: RwLock<Arc<SalesSnapshot>>,
}

impl SalesEngine {
    pub fn new(snapshot: SalesSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Arc<SalesSnapshot> {
        // The guarded value is a single Arc, so a poisoned lock still holds a
        // complete snapshot.
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in `snapshot` and returns the one it replaced.
    pub fn reload(&self, snapshot: SalesSnapshot) -> Arc<SalesSnapshot> {
        let fresh = Arc::new(snapshot);
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, fresh);
        log::info!(
            "Reloaded sales snapshot: {} records (was {})",
            guard.len(),
            previous.len()
        );
        previous
    }

    pub fn total_sales(&self) -> AggregateResult<Decimal> {
        self.run(TOTAL_SALES_MESSAGE, aggregation::total_sales)
    }

    pub fn monthly_sales(&self) -> AggregateResult<Vec<MonthlySales>> {
        self.run(MONTHLY_SALES_MESSAGE, aggregation::monthly_sales)
    }

    pub fn most_popular_item_each_month(&self) -> AggregateResult<Vec<PopularItem>> {
        self.run(
            MOST_POPULAR_ITEM_MESSAGE,
            aggregation::most_popular_item_each_month,
        )
    }

    pub fn top_revenue_items_each_month(&self) -> AggregateResult<Vec<TopRevenueItem>> {
        self.run(
            TOP_REVENUE_ITEMS_MESSAGE,
            aggregation::top_revenue_items_each_month,
        )
    }

    pub fn popular_item_stats(&self) -> AggregateResult<Vec<MonthItemStats>> {
        self.run(POPULAR_ITEM_STATS_MESSAGE, aggregation::popular_item_stats)
    }

    fn run<T, F>(&self, message: &str, query: F) -> AggregateResult<T>
    where
        T: RecordCount,
        F: FnOnce(&[SaleRecord]) -> Result<T, SalesError>,
    {
        let request_time = Local::now();
        let started = Instant::now();
        let snapshot = self.snapshot();
        log::debug!("{message}: scanning {} records", snapshot.len());
        AggregateResult::respond(request_time, started, message, query(snapshot.records()))
    }
}

impl Default for SalesEngine {
    fn default() -> Self {
        Self::new(SalesSnapshot::empty())
    }
}
