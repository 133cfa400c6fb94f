//! fiscal_chart
//!
//! Turns per-year monthly fiscal summaries (sales, gross profit, operating profit) and an
//! optional budget into the dataset list of a bar/line combination chart. Pairs with the
//! `fiscal-chart` CLI.
//!
//! ### Features
//! - Sparse monthly records → dense 12-slot series per metric and year
//! - Relative-position styling: oldest year dashed, previous year gray-tinted, newest year bold
//! - Budget overlay appended to every metric list as a dashed line
//! - Toggleable gross/operating profit overlays, recomputed from immutable base lists
//! - Output as Chart.js config JSON, SVG/PNG via plotters, or CSV of the dense series
//!
//! ### Example
//! ```
//! use fiscal_chart::{ChartOptions, FiscalChart, MemorySink, ToggleEvent};
//! use fiscal_chart::storage::parse_input;
//!
//! let input = parse_input(r#"{
//!     "monthly_summaries": [
//!         {"year": 2024, "data": [{"period": 12, "sales": 500}]},
//!         {"year": 2023, "data": []}
//!     ],
//!     "budget": {"sales": [0,0,0,0,0,0,0,0,0,0,0,1000]},
//!     "latest_year": 2024
//! }"#)?;
//!
//! let mut chart = FiscalChart::new(&input, ChartOptions::default());
//! let mut sink = MemorySink::new();
//! chart.mount(&mut sink)?;
//! let datasets = chart.handle(ToggleEvent::GrossProfit(true), &mut sink)?;
//! assert_eq!(datasets[1].label, "2024 sales");
//! assert_eq!(datasets[2].label, "2024 sales (budget)");
//! assert_eq!(sink.frames.len(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod budget;
pub mod compose;
pub mod dataset;
pub mod format;
pub mod models;
pub mod series;
pub mod sink;
pub mod stats;
pub mod storage;
pub mod style;
pub mod viz;

pub use budget::BudgetOverlayInjector;
pub use compose::{FiscalChart, ToggleEvent, compose};
pub use dataset::{ChartDataset, DatasetKind, MetricDatasets};
pub use models::{
    BudgetSeries, ChartInput, DenseSeries, Metric, MonthRecord, ToggleState, YearlySummary,
};
pub use series::{MetricSeries, PeriodSeriesBuilder, normalize};
pub use sink::{ChartOptions, ChartSink, JsonConfigSink, MemorySink};
pub use style::{Rgba, style_series};
pub use viz::PlottersSink;
