pub mod aggregation;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod period;
pub mod records;
pub mod types;
pub mod validation;

#[cfg(feature = "sheets")]
pub mod sheet;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::FormatConfig;
pub use error::FunnelAnalyticsError;
pub use period::{Period, PeriodPreset, PeriodSelection};
pub use types::*;

/// Standard result type for all funnel-analytics operations
pub type FunnelAnalyticsResult<T> = Result<T, FunnelAnalyticsError>;
