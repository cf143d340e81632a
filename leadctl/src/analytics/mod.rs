//! Lead analytics: date windows and the in-memory aggregation engine behind
//! the dashboard.

pub mod aggregate;
pub mod window;

pub use aggregate::{
    AggregateReport, CategoryCount, CreativeCount, Trend, aggregate, calculate_trend, group_counts, rank_top,
};
pub use window::DateWindow;
