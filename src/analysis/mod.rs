//! Derived views used by the chart tabs: group rankings, year trends,
//! correlations and regression.

pub mod correlation;
pub mod ranking;
pub mod regression;
pub mod trend;

pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use ranking::{rank_groups, GroupMean, Grouping};
pub use regression::{fit_ols, OlsFit, RegressionError};
pub use trend::{country_history, mean_by_year, TrendSeries};
