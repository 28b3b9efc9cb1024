//! Query orchestrator: one fan-out of both sheet fetches, then the purely
//! synchronous normalize / filter / aggregate / birthdays pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ledgerlens_core::{
    compute_analytics, filter_by_period, resolve_birthdays, AnalyticsResult, BirthdayEntry,
};
use ledgerlens_ingest::{normalize_purchase_rows, parse_birthday_rows, RawRow};

use crate::error::{AnalyticsError, FetchError};
use crate::source::SheetSource;

/// Which tabular sources hold the purchase ledger and the birthday registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIds {
    pub purchases: String,
    pub birthdays: String,
}

impl SourceIds {
    pub fn new(purchases: impl Into<String>, birthdays: impl Into<String>) -> Self {
        Self {
            purchases: purchases.into(),
            birthdays: birthdays.into(),
        }
    }
}

async fn fetch_labeled(
    source: &dyn SheetSource,
    label: &'static str,
    source_id: &str,
) -> Result<Vec<RawRow>, AnalyticsError> {
    source
        .fetch_rows(source_id)
        .await
        .map_err(|error: FetchError| AnalyticsError::Fetch {
            label,
            source_id: source_id.to_string(),
            error,
        })
}

/// Raw rows to the composite result. Pure: same inputs, same output.
pub fn build_analytics(
    purchase_rows: &[RawRow],
    birthday_rows: &[RawRow],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> AnalyticsResult {
    let all = normalize_purchase_rows(purchase_rows);
    if all.is_empty() {
        return AnalyticsResult::default();
    }

    let period = filter_by_period(&all, start, end);
    let mut result = compute_analytics(&all, &period, today);
    result.birthdays = resolve_birthdays(&parse_birthday_rows(birthday_rows), today);
    result
}

/// Fetch both sheets concurrently and compute every dashboard view for
/// `[start, end]`. Either fetch failing fails the whole query.
pub async fn get_customer_analytics(
    source: &dyn SheetSource,
    ids: &SourceIds,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<AnalyticsResult, AnalyticsError> {
    let (purchase_rows, birthday_rows) = tokio::try_join!(
        fetch_labeled(source, "purchases", &ids.purchases),
        fetch_labeled(source, "birthdays", &ids.birthdays),
    )?;

    let result = build_analytics(&purchase_rows, &birthday_rows, start, end, today);
    log::info!(
        "analytics {start}..{end}: {} customers, total {}, {} inactive, {} birthdays",
        result.distinct_customers_in_period,
        result.total_spent_in_period,
        result.inactive_customers.len(),
        result.birthdays.len()
    );
    Ok(result)
}

/// Birthday registry only.
pub async fn get_upcoming_birthdays(
    source: &dyn SheetSource,
    ids: &SourceIds,
    today: NaiveDate,
) -> Result<Vec<BirthdayEntry>, AnalyticsError> {
    let rows = fetch_labeled(source, "birthdays", &ids.birthdays).await?;
    Ok(resolve_birthdays(&parse_birthday_rows(&rows), today))
}
