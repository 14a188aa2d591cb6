//! Pure statistics over trade lists: dashboard metrics, equity curve,
//! grouped breakdowns and best-session / best-setup selection.
//!
//! Nothing here performs I/O or reads the clock; "today" is always passed in.

pub mod aggregate;
pub mod breakdown;
pub mod patterns;

pub use aggregate::{
    compute_equity_curve, compute_stats, recent_trades, result_distribution,
    trades_in_last_n_days, DerivedStats, ProfitFactor, ResultDistribution,
};
pub use breakdown::{group_by, Bucket, BucketKey, ContractSize, Dimension, GroupedBreakdown, MonthKey};
pub use patterns::{
    select_best_session, select_best_setup, summarize_patterns, PatternSummary, SelectionPolicy,
    SessionPick, SetupPick,
};
