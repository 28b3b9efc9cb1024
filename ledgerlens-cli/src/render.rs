//! Plain-text rendering of the analytics result.

use ledgerlens_core::{AnalyticsResult, BirthdayEntry, BIRTHDAY_WINDOW_DAYS};
use rust_decimal::Decimal;
use std::fmt::{self, Write};

pub fn money(v: Decimal) -> String {
    format!("R$ {:.2}", v.round_dp(2))
}

pub fn birthdays(out: &mut impl Write, entries: &[BirthdayEntry]) -> fmt::Result {
    if entries.is_empty() {
        return writeln!(out, "(no birthdays in the next {BIRTHDAY_WINDOW_DAYS} days)");
    }
    for b in entries {
        let when = if b.is_today {
            "today".to_string()
        } else {
            format!("in {} day(s)", b.days_until)
        };
        writeln!(out, "- {} | {} | {}", b.date_label, b.name, when)?;
    }
    Ok(())
}

fn kpis(out: &mut impl Write, result: &AnalyticsResult) -> fmt::Result {
    writeln!(out, "## KPIs\n")?;
    writeln!(out, "Unique customers:       {}", result.distinct_customers_in_period)?;
    writeln!(out, "Total purchases:        {}", money(result.total_spent_in_period))?;
    writeln!(out, "Avg spend per customer: {}", money(result.average_spend_per_customer))?;
    writeln!(out, "Inactive 60+ days:      {}", result.inactive_customers.len())
}

pub fn dashboard(out: &mut impl Write, result: &AnalyticsResult, limit: usize) -> fmt::Result {
    kpis(out, result)?;

    writeln!(out, "\n## Top {limit} customers\n")?;
    for (i, r) in result.top_spenders(limit).iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {} | purchases={} | total={} | ticket={} | last={}",
            i + 1,
            r.customer_name,
            r.purchase_count,
            money(r.total_spent),
            money(r.average_ticket),
            r.last_purchase_date
        )?;
    }

    writeln!(out, "\n## Inactive customers\n")?;
    for r in result.inactive_customers.iter().take(limit) {
        writeln!(
            out,
            "- {} | {} days | last={} | purchases={} | total={}",
            r.customer_name,
            r.days_since_last_purchase,
            r.last_purchase_date,
            r.purchase_count,
            money(r.total_spent)
        )?;
    }

    writeln!(out, "\n## Monthly evolution\n")?;
    for m in &result.monthly_evolution {
        let total = money(m.total_spent);
        writeln!(out, "- {} | {} | customers={}", m.month, total, m.distinct_customers)?;
    }

    writeln!(out, "\n## Spend bands\n")?;
    for b in &result.spend_bands {
        writeln!(out, "- {}: {}", b.band, b.customer_count)?;
    }

    writeln!(out, "\n## Recurrence\n")?;
    for b in &result.recurrence_histogram {
        writeln!(out, "- {}: {}", b.purchase_count_label, b.customer_count)?;
    }

    writeln!(out, "\n## Birthdays\n")?;
    birthdays(out, &result.birthdays)
}
