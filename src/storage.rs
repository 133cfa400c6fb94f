use crate::dataset::ChartDataset;
use crate::models::{ChartInput, Metric};
use crate::series::MetricSeries;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Read the page payload from a JSON file.
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<ChartInput> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading input {}", path.display()))?;
    parse_input(&text).with_context(|| format!("parsing input {}", path.display()))
}

pub fn parse_input(text: &str) -> Result<ChartInput> {
    Ok(serde_json::from_str(text)?)
}

/// Save a composed dataset list as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(datasets: &[ChartDataset], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(datasets)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save dense series as CSV with header `year,metric,period,value` (one row per slot).
pub fn save_series_csv<P: AsRef<Path>>(series: &MetricSeries, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("year", "metric", "period", "value"))?;
    let mut rows = 0usize;
    for metric in Metric::ALL {
        for s in series.get(metric) {
            for (i, v) in s.values.iter().enumerate() {
                wtr.serialize((s.year, metric.key(), i + 1, v))?;
                rows += 1;
            }
        }
    }
    wtr.flush()?;
    info!("saved {rows} series rows to {}", path.display());
    Ok(())
}
