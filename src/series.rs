//! Sparse monthly records → dense 12-slot series per metric and year.

use crate::dataset::{ChartDataset, MetricDatasets};
use crate::models::{DenseSeries, Metric, MonthRecord, PERIODS, YearlySummary};
use log::debug;

/// Dense series of one metric for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    pub year: i32,
    pub values: DenseSeries,
}

/// Output of [`PeriodSeriesBuilder::build`]: one list per metric, aligned by index to the
/// oldest-first input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub sales: Vec<YearSeries>,
    pub gross_profit: Vec<YearSeries>,
    pub operating_profit: Vec<YearSeries>,
}

impl MetricSeries {
    pub fn get(&self, metric: Metric) -> &[YearSeries] {
        match metric {
            Metric::Sales => &self.sales,
            Metric::GrossProfit => &self.gross_profit,
            Metric::OperatingProfit => &self.operating_profit,
        }
    }

    fn get_mut(&mut self, metric: Metric) -> &mut Vec<YearSeries> {
        match metric {
            Metric::Sales => &mut self.sales,
            Metric::GrossProfit => &mut self.gross_profit,
            Metric::OperatingProfit => &mut self.operating_profit,
        }
    }

    /// Years in processing order (oldest first).
    pub fn years(&self) -> Vec<i32> {
        self.sales.iter().map(|s| s.year).collect()
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Unstyled datasets for every metric. Each dataset owns its own copy of the data.
    pub fn to_datasets(&self) -> MetricDatasets {
        let mut out = MetricDatasets::default();
        for metric in Metric::ALL {
            *out.get_mut(metric) = self
                .get(metric)
                .iter()
                .map(|s| ChartDataset::for_year(metric, s.year, s.values))
                .collect();
        }
        out
    }
}

/// Put summaries delivered newest-first into processing order (oldest first).
pub fn normalize(delivered: &[YearlySummary]) -> Vec<YearlySummary> {
    delivered.iter().rev().cloned().collect()
}

pub struct PeriodSeriesBuilder;

impl PeriodSeriesBuilder {
    /// Build dense series for already normalized (oldest-first) summaries.
    pub fn build(summaries: &[YearlySummary]) -> MetricSeries {
        let mut out = MetricSeries::default();
        for summary in summaries {
            for metric in Metric::ALL {
                out.get_mut(metric).push(YearSeries {
                    year: summary.year,
                    values: Self::densify(&summary.records, metric),
                });
            }
        }
        debug!(
            "built dense series for {} year(s): {:?}",
            out.len(),
            out.years()
        );
        out
    }

    /// Dense series of one metric. Records without an in-range period are skipped; when two
    /// records share a period, the later one wins.
    pub fn densify(records: &[MonthRecord], metric: Metric) -> DenseSeries {
        let mut values = [0.0; PERIODS];
        for record in records {
            match record.slot() {
                Some(slot) => values[slot] = record.value(metric),
                None => debug!("skipping record without usable period: {:?}", record.period),
            }
        }
        values
    }
}
