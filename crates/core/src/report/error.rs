//! Report validation error taxonomy.
//!
//! Every variant names the offending field or value; validation never
//! silently drops or coerces a bad clause.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("Unknown data source: '{0}'")]
    UnknownDataSource(String),

    #[error("Selected column '{field}' does not exist on this data source")]
    UnknownColumn { field: String },

    #[error("Report must select at least one column")]
    EmptyColumnSelection,

    #[error("Filter references unknown field '{field}'")]
    InvalidFilterField { field: String },

    #[error("Operator '{operator}' is not valid for field '{field}': {reason}")]
    InvalidFilterOperator {
        field: String,
        operator: &'static str,
        reason: &'static str,
    },

    #[error("Invalid filter value for field '{field}': {reason}")]
    InvalidFilterValue { field: String, reason: String },

    #[error("Aggregation '{function}' cannot use field '{field}': {reason}")]
    InvalidAggregationField {
        field: String,
        function: &'static str,
        reason: &'static str,
    },

    #[error("Sort references unknown field '{field}'")]
    InvalidSortField { field: String },
}

impl ReportError {
    /// Stable machine-readable error code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownDataSource(_) => "UNKNOWN_DATA_SOURCE",
            Self::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            Self::EmptyColumnSelection => "EMPTY_COLUMN_SELECTION",
            Self::InvalidFilterField { .. } => "INVALID_FILTER_FIELD",
            Self::InvalidFilterOperator { .. } => "INVALID_FILTER_OPERATOR",
            Self::InvalidFilterValue { .. } => "INVALID_FILTER_VALUE",
            Self::InvalidAggregationField { .. } => "INVALID_AGGREGATION_FIELD",
            Self::InvalidSortField { .. } => "INVALID_SORT_FIELD",
        }
    }
}
