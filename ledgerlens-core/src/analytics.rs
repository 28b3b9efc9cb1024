//! Customer analytics engine.
//!
//! Turns the full purchase history plus its period-filtered subset into the
//! derived views the dashboard renders. Ranking, spend bands, recurrence and
//! totals are period-scoped; inactivity and last-purchase lookups use the
//! whole history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::birthdays::BirthdayEntry;
use crate::record::PurchaseRecord;
use crate::time::{days_between, format_dmy, month_key};

/// Customers whose last purchase is older than this many days are inactive.
pub const INACTIVITY_THRESHOLD_DAYS: i64 = 60;
/// Purchase counts at or above this collapse into one recurrence bucket.
pub const RECURRENCE_CAP: u32 = 10;
/// Shown when a ranked customer has no known last purchase.
pub const NO_DATE_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub customer_name: String,
    pub purchase_count: u32,
    pub total_spent: Decimal,
    pub average_ticket: Decimal,
    /// `DD/MM/YYYY` across the whole history
    pub last_purchase_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InactivityEntry {
    pub customer_name: String,
    pub purchase_count: u32,
    pub total_spent: Decimal,
    pub average_ticket: Decimal,
    pub last_purchase_date: String,
    pub days_since_last_purchase: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    /// `MM/YYYY`
    pub month: String,
    pub total_spent: Decimal,
    pub distinct_customers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpendBandCount {
    pub band: String,
    pub customer_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceBucket {
    /// 1..=9, or 10 meaning "10 or more"
    pub purchase_count: u32,
    pub purchase_count_label: String,
    pub customer_count: usize,
}

/// Composite result of one analytics query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub ranking: Vec<RankingEntry>,
    pub inactive_customers: Vec<InactivityEntry>,
    pub monthly_evolution: Vec<MonthlyBucket>,
    pub spend_bands: Vec<SpendBandCount>,
    pub recurrence_histogram: Vec<RecurrenceBucket>,
    pub birthdays: Vec<BirthdayEntry>,
    pub distinct_customers_in_period: usize,
    pub total_spent_in_period: Decimal,
    pub average_spend_per_customer: Decimal,
}

impl AnalyticsResult {
    /// Keep ranking and inactivity rows whose name contains `query`
    /// (case-insensitive). An empty query keeps everything.
    pub fn filter_by_name(&self, query: &str) -> Self {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        let matches = |name: &str| name.to_lowercase().contains(&needle);
        Self {
            ranking: self
                .ranking
                .iter()
                .filter(|r| matches(&r.customer_name))
                .cloned()
                .collect(),
            inactive_customers: self
                .inactive_customers
                .iter()
                .filter(|r| matches(&r.customer_name))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// The `n` biggest spenders of the period.
    pub fn top_spenders(&self, n: usize) -> &[RankingEntry] {
        &self.ranking[..n.min(self.ranking.len())]
    }
}

/// Fixed spend bands over a customer's period total, in currency units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SpendBand {
    UpTo200,
    From201To500,
    From501To1000,
    From1001To5000,
    Above5000,
}

impl SpendBand {
    pub const ALL: [SpendBand; 5] = [
        SpendBand::UpTo200,
        SpendBand::From201To500,
        SpendBand::From501To1000,
        SpendBand::From1001To5000,
        SpendBand::Above5000,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SpendBand::UpTo200 => "Ate R$200",
            SpendBand::From201To500 => "R$201-R$500",
            SpendBand::From501To1000 => "R$501-R$1.000",
            SpendBand::From1001To5000 => "R$1.001-R$5.000",
            SpendBand::Above5000 => "Acima R$5.000",
        }
    }

    /// Bands are upper-inclusive and contiguous, so every total (negative
    /// refunds included) lands in exactly one of them.
    pub fn for_total(total: Decimal) -> SpendBand {
        if total <= Decimal::from(200) {
            SpendBand::UpTo200
        } else if total <= Decimal::from(500) {
            SpendBand::From201To500
        } else if total <= Decimal::from(1000) {
            SpendBand::From501To1000
        } else if total <= Decimal::from(5000) {
            SpendBand::From1001To5000
        } else {
            SpendBand::Above5000
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CustomerHistory {
    purchase_count: u32,
    total_spent: Decimal,
    last_purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PeriodAggregate {
    purchase_count: u32,
    total_spent: Decimal,
}

fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Group records per customer name, keeping first-encounter order.
fn group_in_order<V: Default>(
    records: &[PurchaseRecord],
    mut fold: impl FnMut(&mut V, &PurchaseRecord),
) -> Vec<(&str, V)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, V)> = Vec::new();

    for r in records {
        let name = r.customer_name.as_str();
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name, V::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, r);
    }

    groups
}

fn build_history(all: &[PurchaseRecord]) -> Vec<(&str, CustomerHistory)> {
    group_in_order(all, |h: &mut CustomerHistory, r| {
        h.purchase_count += 1;
        h.total_spent += r.amount;
        if h.last_purchase_date.is_none_or(|last| r.date > last) {
            h.last_purchase_date = Some(r.date);
        }
    })
}

fn build_period(period: &[PurchaseRecord]) -> Vec<(&str, PeriodAggregate)> {
    group_in_order(period, |p: &mut PeriodAggregate, r| {
        p.purchase_count += 1;
        p.total_spent += r.amount;
    })
}

fn ranking(
    aggregates: &[(&str, PeriodAggregate)],
    history: &HashMap<&str, &CustomerHistory>,
) -> Vec<RankingEntry> {
    let mut sorted: Vec<_> = aggregates.iter().collect();
    // stable: equal totals keep encounter order
    sorted.sort_by_key(|(_, a)| Reverse(a.total_spent));

    sorted
        .into_iter()
        .map(|(name, agg)| RankingEntry {
            customer_name: name.to_string(),
            purchase_count: agg.purchase_count,
            total_spent: agg.total_spent,
            average_ticket: average(agg.total_spent, agg.purchase_count),
            last_purchase_date: history
                .get(*name)
                .and_then(|h| h.last_purchase_date)
                .map(format_dmy)
                .unwrap_or_else(|| NO_DATE_PLACEHOLDER.to_string()),
        })
        .collect()
}

fn inactive_customers(
    history: &[(&str, CustomerHistory)],
    today: NaiveDate,
) -> Vec<InactivityEntry> {
    let mut stale: Vec<(&str, &CustomerHistory, NaiveDate)> = history
        .iter()
        .filter_map(|(name, h)| {
            let last = h.last_purchase_date?;
            (days_between(last, today) > INACTIVITY_THRESHOLD_DAYS).then_some((*name, h, last))
        })
        .collect();
    stale.sort_by_key(|(_, _, last)| *last);

    stale
        .into_iter()
        .map(|(name, h, last)| InactivityEntry {
            customer_name: name.to_string(),
            purchase_count: h.purchase_count,
            total_spent: h.total_spent,
            average_ticket: average(h.total_spent, h.purchase_count),
            last_purchase_date: format_dmy(last),
            days_since_last_purchase: days_between(last, today),
        })
        .collect()
}

/// Buckets are ordered by (year, month), so December precedes the following
/// January.
fn monthly_evolution(period: &[PurchaseRecord]) -> Vec<MonthlyBucket> {
    use chrono::Datelike;

    let mut buckets: BTreeMap<(i32, u32), (String, Decimal, HashSet<&str>)> = BTreeMap::new();
    for r in period {
        let entry = buckets
            .entry((r.date.year(), r.date.month()))
            .or_insert_with(|| (month_key(r.date), Decimal::ZERO, HashSet::new()));
        entry.1 += r.amount;
        entry.2.insert(r.customer_name.as_str());
    }

    buckets
        .into_values()
        .map(|(month, total_spent, customers)| MonthlyBucket {
            month,
            total_spent,
            distinct_customers: customers.len(),
        })
        .collect()
}

fn spend_bands(aggregates: &[(&str, PeriodAggregate)]) -> Vec<SpendBandCount> {
    let mut counts: HashMap<SpendBand, usize> = HashMap::new();
    for (_, agg) in aggregates {
        *counts.entry(SpendBand::for_total(agg.total_spent)).or_insert(0) += 1;
    }

    SpendBand::ALL
        .iter()
        .filter_map(|band| {
            let count = counts.get(band).copied().unwrap_or(0);
            (count > 0).then(|| SpendBandCount {
                band: band.label().to_string(),
                customer_count: count,
            })
        })
        .collect()
}

fn recurrence_histogram(aggregates: &[(&str, PeriodAggregate)]) -> Vec<RecurrenceBucket> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for (_, agg) in aggregates {
        *counts.entry(agg.purchase_count.min(RECURRENCE_CAP)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(n, customers)| RecurrenceBucket {
            purchase_count: n,
            purchase_count_label: if n == RECURRENCE_CAP {
                format!("{RECURRENCE_CAP}+x")
            } else {
                format!("{n}x")
            },
            customer_count: customers,
        })
        .collect()
}

/// Compute every purchase-derived view. `birthdays` is left empty; the
/// caller resolves it from the birthday registry.
///
/// `today` only affects inactivity.
pub fn compute_analytics(
    all: &[PurchaseRecord],
    period: &[PurchaseRecord],
    today: NaiveDate,
) -> AnalyticsResult {
    if all.is_empty() {
        return AnalyticsResult::default();
    }

    let history = build_history(all);
    let history_by_name: HashMap<&str, &CustomerHistory> =
        history.iter().map(|(name, h)| (*name, h)).collect();
    let aggregates = build_period(period);

    let total_spent_in_period: Decimal = aggregates.iter().map(|(_, a)| a.total_spent).sum();
    let distinct_customers_in_period = aggregates.len();
    let average_spend_per_customer = if distinct_customers_in_period > 0 {
        total_spent_in_period / Decimal::from(distinct_customers_in_period)
    } else {
        Decimal::ZERO
    };

    AnalyticsResult {
        ranking: ranking(&aggregates, &history_by_name),
        inactive_customers: inactive_customers(&history, today),
        monthly_evolution: monthly_evolution(period),
        spend_bands: spend_bands(&aggregates),
        recurrence_histogram: recurrence_histogram(&aggregates),
        birthdays: Vec::new(),
        distinct_customers_in_period,
        total_spent_in_period,
        average_spend_per_customer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::filter_by_period;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rec(name: &str, date: NaiveDate, amount: &str) -> PurchaseRecord {
        PurchaseRecord::new(name, "Balcao", date, money(amount))
    }

    fn sample() -> Vec<PurchaseRecord> {
        vec![
            rec("Ana", d(2024, 3, 2), "120.00"),
            rec("Bruno", d(2024, 3, 5), "450.50"),
            rec("Ana", d(2024, 3, 20), "80.00"),
            rec("Carla", d(2024, 1, 15), "999.99"),
            rec("Bruno", d(2024, 4, 1), "10.00"),
            rec("Diego", d(2023, 11, 3), "7000.00"),
        ]
    }

    fn march_result(today: NaiveDate) -> AnalyticsResult {
        let all = sample();
        let period = filter_by_period(&all, d(2024, 3, 1), d(2024, 3, 31));
        compute_analytics(&all, &period, today)
    }

    #[test]
    fn test_empty_history_short_circuits() {
        let result = compute_analytics(&[], &[], d(2024, 3, 31));
        assert_eq!(result, AnalyticsResult::default());
        assert_eq!(result.total_spent_in_period, Decimal::ZERO);
        assert_eq!(result.average_spend_per_customer, Decimal::ZERO);
    }

    #[test]
    fn test_ranking_sorted_by_total_with_history_last_date() {
        let result = march_result(d(2024, 4, 10));
        let names: Vec<_> = result.ranking.iter().map(|r| r.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Ana"]);

        let bruno = &result.ranking[0];
        assert_eq!(bruno.purchase_count, 1);
        assert_eq!(bruno.total_spent, money("450.50"));
        // last purchase comes from the whole history, not the period
        assert_eq!(bruno.last_purchase_date, "01/04/2024");

        let ana = &result.ranking[1];
        assert_eq!(ana.purchase_count, 2);
        assert_eq!(ana.total_spent, money("200.00"));
        assert_eq!(ana.average_ticket, money("100"));

        for w in result.ranking.windows(2) {
            assert!(w[0].total_spent >= w[1].total_spent);
        }
    }

    #[test]
    fn test_ranking_ties_keep_encounter_order() {
        let all = vec![
            rec("Zeca", d(2024, 3, 1), "50"),
            rec("Alice", d(2024, 3, 2), "50"),
            rec("Maria", d(2024, 3, 3), "50"),
        ];
        let result = compute_analytics(&all, &all, d(2024, 3, 3));
        let names: Vec<_> = result.ranking.iter().map(|r| r.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Zeca", "Alice", "Maria"]);
    }

    #[test]
    fn test_reconciliation_and_band_partition() {
        let result = march_result(d(2024, 4, 10));
        let ranked: Decimal = result.ranking.iter().map(|r| r.total_spent).sum();
        assert_eq!(ranked, result.total_spent_in_period);
        assert_eq!(result.total_spent_in_period, money("650.50"));
        assert_eq!(result.distinct_customers_in_period, 2);
        assert_eq!(result.average_spend_per_customer, money("325.25"));

        let banded: usize = result.spend_bands.iter().map(|b| b.customer_count).sum();
        assert_eq!(banded, result.distinct_customers_in_period);
    }

    #[test]
    fn test_inactivity_uses_history_and_sorts_oldest_first() {
        let result = march_result(d(2024, 4, 10));
        let names: Vec<_> = result
            .inactive_customers
            .iter()
            .map(|r| r.customer_name.as_str())
            .collect();
        // Carla and Diego bought nothing in March but are stale in history
        assert_eq!(names, vec!["Diego", "Carla"]);

        let carla = &result.inactive_customers[1];
        assert_eq!(carla.last_purchase_date, "15/01/2024");
        assert_eq!(carla.days_since_last_purchase, 86);
        assert_eq!(carla.purchase_count, 1);

        assert!(result.ranking.iter().all(|r| r.customer_name != "Carla"));
    }

    #[test]
    fn test_inactivity_threshold_is_strict() {
        let all = vec![
            rec("Exato", d(2024, 1, 1), "10"),
            rec("Passou", d(2023, 12, 31), "10"),
        ];
        // 2024-03-01 is exactly 60 days after 2024-01-01
        let result = compute_analytics(&all, &[], d(2024, 3, 1));
        let names: Vec<_> = result
            .inactive_customers
            .iter()
            .map(|r| r.customer_name.as_str())
            .collect();
        assert_eq!(names, vec!["Passou"]);
        assert_eq!(result.inactive_customers[0].days_since_last_purchase, 61);
    }

    #[test]
    fn test_monthly_evolution_counts_distinct_customers() {
        let all = sample();
        let result = compute_analytics(&all, &all, d(2024, 4, 10));
        let months: Vec<_> = result.monthly_evolution.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["11/2023", "01/2024", "03/2024", "04/2024"]);

        let march = &result.monthly_evolution[2];
        assert_eq!(march.total_spent, money("650.50"));
        assert_eq!(march.distinct_customers, 2);
    }

    #[test]
    fn test_monthly_evolution_is_chronological_across_years() {
        let all = vec![
            rec("A", d(2024, 1, 10), "10"),
            rec("B", d(2023, 12, 10), "20"),
        ];
        let result = compute_analytics(&all, &all, d(2024, 1, 31));
        let months: Vec<_> = result.monthly_evolution.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["12/2023", "01/2024"]);
    }

    #[test]
    fn test_spend_band_edges() {
        assert_eq!(SpendBand::for_total(money("-15")), SpendBand::UpTo200);
        assert_eq!(SpendBand::for_total(money("200")), SpendBand::UpTo200);
        assert_eq!(SpendBand::for_total(money("200.01")), SpendBand::From201To500);
        assert_eq!(SpendBand::for_total(money("500")), SpendBand::From201To500);
        assert_eq!(SpendBand::for_total(money("1000")), SpendBand::From501To1000);
        assert_eq!(SpendBand::for_total(money("5000")), SpendBand::From1001To5000);
        assert_eq!(SpendBand::for_total(money("5000.01")), SpendBand::Above5000);
    }

    #[test]
    fn test_spend_bands_omit_empty_and_keep_fixed_order() {
        let all = sample();
        let result = compute_analytics(&all, &all, d(2024, 4, 10));
        let bands: Vec<_> = result
            .spend_bands
            .iter()
            .map(|b| (b.band.as_str(), b.customer_count))
            .collect();
        assert_eq!(
            bands,
            vec![("Ate R$200", 1), ("R$201-R$500", 1), ("R$501-R$1.000", 1), ("Acima R$5.000", 1)]
        );
    }

    #[test]
    fn test_recurrence_caps_at_ten() {
        let mut all = Vec::new();
        for day in 1..=12 {
            all.push(rec("Frequente", d(2024, 5, day), "5"));
        }
        for day in 1..=10 {
            all.push(rec("Dez", d(2024, 5, day), "5"));
        }
        all.push(rec("Uma", d(2024, 5, 1), "5"));
        all.push(rec("Duas", d(2024, 5, 1), "5"));
        all.push(rec("Duas", d(2024, 5, 2), "5"));

        let result = compute_analytics(&all, &all, d(2024, 5, 31));
        let hist: Vec<_> = result
            .recurrence_histogram
            .iter()
            .map(|b| (b.purchase_count_label.as_str(), b.customer_count))
            .collect();
        assert_eq!(hist, vec![("1x", 1), ("2x", 1), ("10+x", 2)]);
        for w in result.recurrence_histogram.windows(2) {
            assert!(w[0].purchase_count < w[1].purchase_count);
        }
    }

    #[test]
    fn test_period_without_purchases_keeps_inactivity() {
        let all = sample();
        let period = filter_by_period(&all, d(2030, 1, 1), d(2030, 1, 31));
        let result = compute_analytics(&all, &period, d(2024, 8, 1));
        assert!(result.ranking.is_empty());
        assert!(result.spend_bands.is_empty());
        assert!(result.recurrence_histogram.is_empty());
        assert_eq!(result.distinct_customers_in_period, 0);
        assert_eq!(result.average_spend_per_customer, Decimal::ZERO);
        assert_eq!(result.inactive_customers.len(), 4);
    }

    #[test]
    fn test_filter_by_name_and_top_spenders() {
        let result = march_result(d(2024, 4, 10));
        let filtered = result.filter_by_name("  bru ");
        assert_eq!(filtered.ranking.len(), 1);
        assert!(filtered.inactive_customers.is_empty());
        assert_eq!(filtered.total_spent_in_period, result.total_spent_in_period);

        assert_eq!(result.filter_by_name(""), result);
        assert_eq!(result.top_spenders(1)[0].customer_name, "Bruno");
        assert_eq!(result.top_spenders(10).len(), 2);
    }

    #[test]
    fn test_result_is_deterministic() {
        let a = march_result(d(2024, 4, 10));
        let b = march_result(d(2024, 4, 10));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
