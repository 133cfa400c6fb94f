use crate::models::{Metric, PERIODS, YearlySummary};
use crate::series::PeriodSeriesBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Totals of one fiscal year over its first `period_count` periods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearTotals {
    pub year: i32,
    pub period_count: usize,
    pub sales: f64,
    pub gross_profit: f64,
    pub operating_profit: f64,
    /// Distinct in-range periods that carried a record.
    pub months_with_data: usize,
    /// Gross profit as percent of sales; `None` unless sales are positive.
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
}

/// Sum each metric over periods `1..=period_count` (clamped to 12).
pub fn year_totals(summary: &YearlySummary, period_count: usize) -> YearTotals {
    let period_count = period_count.min(PERIODS);
    let sum = |metric: Metric| -> f64 {
        PeriodSeriesBuilder::densify(&summary.records, metric)[..period_count]
            .iter()
            .sum()
    };
    let sales = sum(Metric::Sales);
    let gross_profit = sum(Metric::GrossProfit);
    let operating_profit = sum(Metric::OperatingProfit);
    let months_with_data = summary
        .records
        .iter()
        .filter_map(|r| r.slot())
        .collect::<BTreeSet<_>>()
        .len();
    let margin = |v: f64| {
        if sales > 0.0 {
            Some(v / sales * 100.0)
        } else {
            None
        }
    };
    YearTotals {
        year: summary.year,
        period_count,
        sales,
        gross_profit,
        operating_profit,
        months_with_data,
        gross_margin: margin(gross_profit),
        operating_margin: margin(operating_profit),
    }
}

/// Newest year (full year) against the previous year limited to the same number of periods
/// the newest year has data for. Input is oldest-first; needs at least two years.
pub fn same_period_comparison(normalized: &[YearlySummary]) -> Option<(YearTotals, YearTotals)> {
    let [.., previous, latest] = normalized else {
        return None;
    };
    let current = year_totals(latest, PERIODS);
    let prior = year_totals(previous, current.months_with_data);
    Some((current, prior))
}
