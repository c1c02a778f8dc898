//! Sales data source port trait.

use crate::domain::error::SalesError;
use crate::domain::snapshot::LoadedSales;

/// A source of point-of-sale records.
///
/// Row-level faults are recovered inside the implementation and reported via
/// [`LoadedSales::skipped`]. An `Err` means the source as a whole could not
/// be read; [`crate::domain::snapshot::SalesSnapshot::load`] turns that into
/// an empty snapshot.
pub trait SalesDataPort {
    fn load_sales(&self) -> Result<LoadedSales, SalesError>;

    /// Human-readable description of the source, used in log lines.
    fn describe(&self) -> String;
}
