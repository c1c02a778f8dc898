//! Domain error types.

/// Why a single data row was rejected by the loader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("expected at least 4 fields, found {found}")]
    MissingFields { found: usize },

    #[error("invalid date {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("empty sku")]
    EmptySku,

    #[error("invalid unit price {value:?}")]
    InvalidPrice { value: String },

    #[error("negative unit price {value}")]
    NegativePrice { value: String },

    #[error("invalid quantity {value:?}")]
    InvalidQuantity { value: String },

    #[error("total price overflows for {unit_price} x {quantity}")]
    TotalOverflow { unit_price: String, quantity: u32 },

    #[error("unreadable row: {reason}")]
    Unreadable { reason: String },
}

/// Top-level error type for salesagg.
#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    #[error("sales data file not found at: {path}")]
    SourceMissing { path: String },

    #[error("failed to read sales data {path}: {reason}")]
    SourceRead { path: String, reason: String },

    #[error("aggregation failed in {query}: {reason}")]
    Aggregation { query: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SalesError {
    pub(crate) fn overflow(query: &str, what: &str) -> Self {
        SalesError::Aggregation {
            query: query.to_string(),
            reason: format!("{what} overflowed"),
        }
    }
}

impl From<&SalesError> for std::process::ExitCode {
    fn from(err: &SalesError) -> Self {
        let code: u8 = match err {
            SalesError::Io(_) | SalesError::Json(_) => 1,
            SalesError::ConfigParse { .. } | SalesError::ConfigInvalid { .. } => 2,
            SalesError::Aggregation { .. } => 3,
            SalesError::SourceMissing { .. } | SalesError::SourceRead { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
