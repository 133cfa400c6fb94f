//! Output side of the pipeline: the [`ChartSink`] trait and its in-crate implementations.
//!
//! A sink receives the x-axis labels, the composed dataset list and the chart options every
//! time the chart is (re)computed. The plotters-backed image sink lives in [`crate::viz`].

use crate::dataset::{ChartDataset, DatasetKind};
use crate::format::{DEFAULT_LOCALE, DEFAULT_UNIT};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::Write;
use std::path::PathBuf;

/// Presentation options passed through to every sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Locale tag for thousands separators (`"ja"`, `"en"`, `"de"`, ...).
    pub locale: String,
    /// Currency unit appended to tooltip values.
    pub unit: String,
    pub title: String,
    /// Chart type for datasets that do not override it.
    pub base_kind: DatasetKind,
    pub width: u32,
    pub height: u32,
    /// TrueType font used for text in image output. Without it only geometry is drawn.
    pub font: Option<PathBuf>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            unit: DEFAULT_UNIT.to_string(),
            title: String::new(),
            base_kind: DatasetKind::Bar,
            width: 1000,
            height: 600,
            font: None,
        }
    }
}

/// Anything that can display a composed dataset list.
pub trait ChartSink {
    fn render(
        &mut self,
        labels: &[String],
        datasets: &[ChartDataset],
        options: &ChartOptions,
    ) -> Result<()>;
}

impl<S: ChartSink + ?Sized> ChartSink for &mut S {
    fn render(
        &mut self,
        labels: &[String],
        datasets: &[ChartDataset],
        options: &ChartOptions,
    ) -> Result<()> {
        (**self).render(labels, datasets, options)
    }
}

/// Full Chart.js config for a bar chart with line overlays.
///
/// Value formatting is not executable in JSON, so locale and unit are carried under
/// `options.plugins.valueFormat` for the page script to apply to ticks and tooltips.
pub fn chartjs_config(labels: &[String], datasets: &[ChartDataset], options: &ChartOptions) -> Value {
    let show_title = !options.title.is_empty();
    json!({
        "type": options.base_kind,
        "data": {
            "labels": labels,
            "datasets": datasets,
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "title": {
                    "display": show_title,
                    "text": options.title,
                },
                "legend": { "display": true, "position": "top" },
                "valueFormat": {
                    "locale": options.locale,
                    "unit": options.unit,
                },
            },
            "scales": {
                "y": { "beginAtZero": true },
                "x": { "grid": { "display": false } },
            },
        },
    })
}

/// Writes one pretty-printed Chart.js config per render.
pub struct JsonConfigSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonConfigSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChartSink for JsonConfigSink<W> {
    fn render(
        &mut self,
        labels: &[String],
        datasets: &[ChartDataset],
        options: &ChartOptions,
    ) -> Result<()> {
        let config = chartjs_config(labels, datasets, options);
        serde_json::to_writer_pretty(&mut self.writer, &config)
            .context("serializing chart config")?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        info!("wrote chart config with {} dataset(s)", datasets.len());
        Ok(())
    }
}

/// One captured render.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Keeps every render in memory. Handy for previews and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<Frame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl ChartSink for MemorySink {
    fn render(
        &mut self,
        labels: &[String],
        datasets: &[ChartDataset],
        _options: &ChartOptions,
    ) -> Result<()> {
        self.frames.push(Frame {
            labels: labels.to_vec(),
            datasets: datasets.to_vec(),
        });
        Ok(())
    }
}
