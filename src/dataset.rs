//! Chart datasets in the shape the charting front end expects.
//!
//! Serialized field names follow Chart.js (`borderColor`, `borderDash`, `type`, ...), so a
//! dataset list can be dropped straight into a chart config.

use crate::models::{DenseSeries, Metric};
use crate::style::{Rgba, metric_color};
use serde::{Deserialize, Serialize};

/// How a dataset is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Bar,
    Line,
}

/// One drawable series: a metric for one year, or a budget overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: DenseSeries,
    pub border_color: Rgba,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<Vec<u32>>,
    pub border_width: u32,
    pub fill: bool,
    /// Explicit chart type. `None` inherits the chart's base type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DatasetKind>,
    #[serde(skip)]
    pub metric: Metric,
    #[serde(skip)]
    pub year: i32,
    #[serde(skip)]
    pub is_budget: bool,
}

impl ChartDataset {
    /// Unstyled dataset for one year of one metric, labeled e.g. `"2024 sales"`.
    pub fn for_year(metric: Metric, year: i32, data: DenseSeries) -> Self {
        Self {
            label: format!("{} {}", year, metric.display_name()),
            data,
            border_color: metric_color(metric),
            background_color: None,
            border_dash: None,
            border_width: 0,
            fill: false,
            kind: None,
            metric,
            year,
            is_budget: false,
        }
    }

    /// Type this dataset is drawn with on a chart whose base type is `base`.
    pub fn kind_or(&self, base: DatasetKind) -> DatasetKind {
        self.kind.unwrap_or(base)
    }

    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Per-metric dataset lists, each ordered oldest year first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricDatasets {
    pub sales: Vec<ChartDataset>,
    pub gross_profit: Vec<ChartDataset>,
    pub operating_profit: Vec<ChartDataset>,
}

impl MetricDatasets {
    pub fn get(&self, metric: Metric) -> &[ChartDataset] {
        match metric {
            Metric::Sales => &self.sales,
            Metric::GrossProfit => &self.gross_profit,
            Metric::OperatingProfit => &self.operating_profit,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut Vec<ChartDataset> {
        match metric {
            Metric::Sales => &mut self.sales,
            Metric::GrossProfit => &mut self.gross_profit,
            Metric::OperatingProfit => &mut self.operating_profit,
        }
    }
}
