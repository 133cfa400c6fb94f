//! Budget (forecast) overlay for the current year.
//!
//! The overlay is all-or-nothing: if any metric has a positive budget value, every metric
//! list gets one budget dataset appended.

use crate::dataset::{ChartDataset, DatasetKind, MetricDatasets};
use crate::models::{BudgetSeries, DenseSeries, Metric, YearlySummary};
use crate::style::metric_color;
use log::{debug, warn};

pub const BUDGET_BORDER_ALPHA: f64 = 0.5;
pub const BUDGET_FILL_ALPHA: f64 = 0.1;
pub const BUDGET_DASH: [u32; 2] = [5, 5];
pub const BUDGET_BORDER_WIDTH: u32 = 2;

/// Year the overlay is labeled with: the explicit hint if given, otherwise the year of the
/// first entry of the oldest-first list. Zero years count as unresolved.
pub fn resolve_target_year(latest_year_hint: Option<i32>, normalized: &[YearlySummary]) -> Option<i32> {
    latest_year_hint
        .filter(|y| *y != 0)
        .or_else(|| normalized.first().map(|s| s.year).filter(|y| *y != 0))
}

/// Budget dataset for one metric, always drawn as a dashed line.
pub fn budget_dataset(metric: Metric, year: i32, data: DenseSeries) -> ChartDataset {
    let color = metric_color(metric);
    ChartDataset {
        label: format!("{} {} (budget)", year, metric.display_name()),
        data,
        border_color: color.with_alpha(BUDGET_BORDER_ALPHA),
        background_color: Some(color.with_alpha(BUDGET_FILL_ALPHA)),
        border_dash: Some(BUDGET_DASH.to_vec()),
        border_width: BUDGET_BORDER_WIDTH,
        fill: false,
        kind: Some(DatasetKind::Line),
        metric,
        year,
        is_budget: true,
    }
}

pub struct BudgetOverlayInjector;

impl BudgetOverlayInjector {
    /// Whether a budget overlay should be shown at all.
    pub fn is_eligible(budget: Option<&BudgetSeries>) -> bool {
        budget.is_some_and(BudgetSeries::has_positive_value)
    }

    /// Append the budget dataset for `metric` to one list.
    pub fn inject(list: &mut Vec<ChartDataset>, metric: Metric, budget: &BudgetSeries, target_year: i32) {
        list.push(budget_dataset(metric, target_year, budget.dense(metric)));
    }

    /// Check eligibility once across all metrics and, if it passes, append an overlay to
    /// every list. Returns whether anything was appended.
    pub fn inject_all(
        lists: &mut MetricDatasets,
        budget: Option<&BudgetSeries>,
        target_year: Option<i32>,
    ) -> bool {
        let Some(budget) = budget.filter(|b| b.has_positive_value()) else {
            debug!("budget overlay skipped: no positive budget value");
            return false;
        };
        let Some(year) = target_year else {
            warn!("budget overlay skipped: target year could not be resolved");
            return false;
        };
        for metric in Metric::ALL {
            Self::inject(lists.get_mut(metric), metric, budget, year);
        }
        debug!("budget overlay appended for {year}");
        true
    }
}
