//! Dataset composition and the chart state object.
//!
//! [`FiscalChart`] owns the per-metric base lists (built once from the input, budget overlay
//! included) and the current [`ToggleState`]. Every recompute styles fresh copies of the base
//! lists, so nothing handed to a sink is ever mutated afterwards.

use crate::budget::{BudgetOverlayInjector, resolve_target_year};
use crate::dataset::{ChartDataset, DatasetKind, MetricDatasets};
use crate::format::resolve_month_labels;
use crate::models::{ChartInput, ToggleState};
use crate::series::{MetricSeries, PeriodSeriesBuilder, normalize};
use crate::sink::{ChartOptions, ChartSink};
use crate::style::style_series;
use anyhow::Result;
use log::debug;

/// Sales always, then gross profit and operating profit as line overlays when toggled on.
pub fn compose(
    sales: &[ChartDataset],
    gross_profit: &[ChartDataset],
    operating_profit: &[ChartDataset],
    toggles: ToggleState,
) -> Vec<ChartDataset> {
    let mut out = style_series(sales);
    if toggles.show_gross_profit {
        out.extend(as_line_overlay(gross_profit));
    }
    if toggles.show_operating_profit {
        out.extend(as_line_overlay(operating_profit));
    }
    out
}

fn as_line_overlay(datasets: &[ChartDataset]) -> Vec<ChartDataset> {
    let mut styled = style_series(datasets);
    for ds in &mut styled {
        ds.kind = Some(DatasetKind::Line);
    }
    styled
}

/// User interaction that triggers a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEvent {
    /// Initial render.
    Mount,
    GrossProfit(bool),
    OperatingProfit(bool),
}

impl ToggleState {
    /// State after `event`. The two switches are independent.
    pub fn apply(self, event: ToggleEvent) -> Self {
        match event {
            ToggleEvent::Mount => self,
            ToggleEvent::GrossProfit(on) => Self {
                show_gross_profit: on,
                ..self
            },
            ToggleEvent::OperatingProfit(on) => Self {
                show_operating_profit: on,
                ..self
            },
        }
    }
}

/// Chart component state: base dataset lists, axis labels, options and toggles.
#[derive(Debug, Clone)]
pub struct FiscalChart {
    labels: Vec<String>,
    series: MetricSeries,
    base: MetricDatasets,
    budget_overlay: bool,
    toggles: ToggleState,
    options: ChartOptions,
}

impl FiscalChart {
    /// Build the chart state from the page payload. Summaries are expected newest-first.
    pub fn new(input: &ChartInput, options: ChartOptions) -> Self {
        let normalized = normalize(&input.monthly_summaries);
        let series = PeriodSeriesBuilder::build(&normalized);
        let mut base = series.to_datasets();
        let target_year = resolve_target_year(input.latest_year, &normalized);
        let budget_overlay =
            BudgetOverlayInjector::inject_all(&mut base, input.budget.as_ref(), target_year);
        let labels = resolve_month_labels(input.months_label.as_deref(), input.fiscal_month);

        Self {
            labels,
            series,
            base,
            budget_overlay,
            toggles: ToggleState::default(),
            options,
        }
    }

    pub fn with_toggles(mut self, toggles: ToggleState) -> Self {
        self.toggles = toggles;
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Dense series per metric, oldest year first.
    pub fn series(&self) -> &MetricSeries {
        &self.series
    }

    /// Unstyled per-metric lists, budget overlay included.
    pub fn base(&self) -> &MetricDatasets {
        &self.base
    }

    pub fn has_budget_overlay(&self) -> bool {
        self.budget_overlay
    }

    pub fn toggles(&self) -> ToggleState {
        self.toggles
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Dataset list for `toggles`, freshly built on every call.
    pub fn recompute(&self, toggles: ToggleState) -> Vec<ChartDataset> {
        let datasets = compose(
            &self.base.sales,
            &self.base.gross_profit,
            &self.base.operating_profit,
            toggles,
        );
        debug!("recomputed {} dataset(s) for {:?}", datasets.len(), toggles);
        datasets
    }

    /// Single entry point for mount and toggle changes: update state, recompute, render.
    pub fn handle<S: ChartSink + ?Sized>(
        &mut self,
        event: ToggleEvent,
        sink: &mut S,
    ) -> Result<Vec<ChartDataset>> {
        self.toggles = self.toggles.apply(event);
        let datasets = self.recompute(self.toggles);
        sink.render(&self.labels, &datasets, &self.options)?;
        Ok(datasets)
    }

    /// Initial render with the current toggles.
    pub fn mount<S: ChartSink + ?Sized>(&mut self, sink: &mut S) -> Result<Vec<ChartDataset>> {
        self.handle(ToggleEvent::Mount, sink)
    }
}
