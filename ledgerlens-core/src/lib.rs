//! ledgerlens-core: typed purchase records and the customer analytics engine

pub mod analytics;
pub mod birthdays;
pub mod period;
pub mod record;
pub mod time;

pub use analytics::{
    compute_analytics, AnalyticsResult, InactivityEntry, MonthlyBucket, RankingEntry,
    RecurrenceBucket, SpendBand, SpendBandCount, INACTIVITY_THRESHOLD_DAYS, RECURRENCE_CAP,
};
pub use birthdays::{next_anniversary, resolve_birthdays, BirthdayEntry, BIRTHDAY_WINDOW_DAYS};
pub use period::filter_by_period;
pub use record::{BirthdayRow, PurchaseRecord};
pub use time::{default_period, today_in};
