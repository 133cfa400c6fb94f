//! Image output: render a composed dataset list to **SVG** or **PNG** with plotters.
//!
//! - Bar datasets are drawn as grouped bars per month, line datasets as polylines with markers
//! - Border width, dash pattern and fill come straight from the styled datasets
//! - Locale-aware tick labels (`30,000` vs `30.000`) and a legend band on top
//!
//! Text needs a TrueType font (`ChartOptions::font`) because the `ab_glyph` path does not
//! discover OS fonts. Without one, only geometry (bars, lines, markers, grid) is drawn.

pub mod text;
pub mod util;

use crate::dataset::{ChartDataset, DatasetKind};
use crate::format::format_tick;
use crate::sink::{ChartOptions, ChartSink};
use anyhow::{Context, Result, anyhow, bail};
use log::info;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontStyle};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use text::{SWATCH_PX, estimate_text_width_px, layout_legend};
use util::{
    bar_datasets, bar_extent, bar_fill, dash_polyline, line_datasets, slot_center, to_plotters,
    value_range,
};

const MARGIN: i32 = 16;
const FONT_PX: u32 = 12;
const GRID_LINES: usize = 8;
const GRID_COLOR: RGBColor = RGBColor(224, 224, 224);
const MARKER_RADIUS: i32 = 3;

/// Font currently registered as "sans-serif".
static REGISTERED_FONT: Mutex<Option<PathBuf>> = Mutex::new(None);

fn register_font_file(path: &Path) -> Result<()> {
    let mut current = REGISTERED_FONT
        .lock()
        .map_err(|_| anyhow!("font registry lock poisoned"))?;
    if current.as_deref() == Some(path) {
        return Ok(());
    }
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    // plotters keeps a reference for the lifetime of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("invalid font {}", path.display()))?;
    *current = Some(path.to_path_buf());
    Ok(())
}

fn plot_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// Sink that redraws an image file on every render. The format follows the extension:
/// `.svg` for SVG, anything else goes through the bitmap backend.
#[derive(Debug, Clone)]
pub struct PlottersSink {
    path: PathBuf,
}

impl PlottersSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSink for PlottersSink {
    fn render(
        &mut self,
        labels: &[String],
        datasets: &[ChartDataset],
        options: &ChartOptions,
    ) -> Result<()> {
        render_chart(labels, datasets, options, &self.path)
    }
}

/// Render one frame to `out_path`.
pub fn render_chart<P: AsRef<Path>>(
    labels: &[String],
    datasets: &[ChartDataset],
    options: &ChartOptions,
    out_path: P,
) -> Result<()> {
    if options.width == 0 || options.height == 0 {
        bail!("chart size must be non-zero, got {}x{}", options.width, options.height);
    }
    let with_text = match options.font.as_deref() {
        Some(font) => {
            register_font_file(font)?;
            true
        }
        None => false,
    };

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (options.width, options.height);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(root, labels, datasets, options, with_text)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(root, labels, datasets, options, with_text)?;
    }
    info!("rendered {} dataset(s) to {}", datasets.len(), out_path.display());
    Ok(())
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    labels: &[String],
    datasets: &[ChartDataset],
    options: &ChartOptions,
    with_text: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(plot_err)?;
    let (root_w, _root_h) = root.dim_in_pixel();

    // ----------------------------
    // 1) Legend band (text only)
    // ----------------------------
    let legend_texts: Vec<String> = datasets.iter().map(|d| d.label.clone()).collect();
    let (slots, legend_h) = if with_text {
        layout_legend(&legend_texts, FONT_PX, MARGIN, root_w as i32 - MARGIN)
    } else {
        (Vec::new(), 0)
    };
    let (legend_area, plot_area) = root.split_vertically(legend_h);

    // ----------------------------
    // 2) Coordinate system: 12 month slots of width 1
    // ----------------------------
    let (y_min, y_max) = value_range(datasets);
    let mut builder = ChartBuilder::on(&plot_area);
    builder.margin(MARGIN as u32);
    if with_text {
        builder
            .set_label_area_size(LabelAreaPosition::Left, 72)
            .set_label_area_size(LabelAreaPosition::Bottom, 28);
        if !options.title.trim().is_empty() {
            builder.caption(options.title.trim(), (FontFamily::SansSerif, 20));
        }
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..12f64, y_min..y_max)
        .map_err(plot_err)?;

    if with_text {
        let locale = options.locale.clone();
        let y_label_fmt = |v: &f64| format_tick(*v, &locale);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_x_axis()
            .y_labels(GRID_LINES)
            .y_label_formatter(&y_label_fmt)
            .light_line_style(WHITE)
            .bold_line_style(GRID_COLOR)
            .label_style((FontFamily::SansSerif, 12))
            .draw()
            .map_err(plot_err)?;
    } else {
        for k in 0..=GRID_LINES {
            let y = y_min + (y_max - y_min) * k as f64 / GRID_LINES as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, y), (12.0, y)],
                    GRID_COLOR.stroke_width(1),
                )))
                .map_err(plot_err)?;
        }
    }
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (12.0, 0.0)],
            BLACK.stroke_width(1),
        )))
        .map_err(plot_err)?;

    // ----------------------------
    // 3) Bars, grouped per month in list order
    // ----------------------------
    let bars = bar_datasets(datasets, options.base_kind);
    let n_bars = bars.len();
    for (idx, ds) in bars.iter().enumerate() {
        let fill = to_plotters(bar_fill(ds));
        chart
            .draw_series(ds.data.iter().enumerate().map(|(m, v)| {
                let (x0, x1) = bar_extent(m, idx, n_bars);
                Rectangle::new([(x0, 0f64.min(*v)), (x1, 0f64.max(*v))], fill.filled())
            }))
            .map_err(plot_err)?;
        if ds.border_width > 0 {
            let border = to_plotters(ds.border_color).stroke_width(ds.border_width);
            chart
                .draw_series(ds.data.iter().enumerate().map(|(m, v)| {
                    let (x0, x1) = bar_extent(m, idx, n_bars);
                    Rectangle::new([(x0, 0f64.min(*v)), (x1, 0f64.max(*v))], border)
                }))
                .map_err(plot_err)?;
        }
    }

    // ----------------------------
    // 4) Lines on top, dashed where the dataset asks for it
    // ----------------------------
    for ds in line_datasets(datasets, options.base_kind) {
        let color = to_plotters(ds.border_color);
        let points: Vec<(f64, f64)> = ds
            .data
            .iter()
            .enumerate()
            .map(|(m, v)| (slot_center(m), *v))
            .collect();

        if ds.border_width > 0 {
            let stroke = color.stroke_width(ds.border_width);
            match ds.border_dash.as_deref() {
                Some(pattern) if pattern.iter().any(|p| *p > 0) => {
                    let px: Vec<(i32, i32)> = points.iter().map(|p| chart.backend_coord(p)).collect();
                    for piece in dash_polyline(&px, pattern) {
                        root.draw(&PathElement::new(piece, stroke))
                            .map_err(plot_err)?;
                    }
                }
                _ => {
                    chart
                        .draw_series(LineSeries::new(points.clone(), stroke))
                        .map_err(plot_err)?;
                }
            }
        }
        chart
            .draw_series(
                points
                    .iter()
                    .map(|p| Circle::new(*p, MARKER_RADIUS, color.filled())),
            )
            .map_err(plot_err)?;
    }

    // ----------------------------
    // 5) Month labels and legend
    // ----------------------------
    if with_text {
        for (m, label) in labels.iter().enumerate().take(12) {
            let (px, py) = chart.backend_coord(&(slot_center(m), y_min));
            let half = estimate_text_width_px(label, FONT_PX) as i32 / 2;
            root.draw(&Text::new(
                label.clone(),
                (px - half, py + 8),
                (FontFamily::SansSerif, 12),
            ))
            .map_err(plot_err)?;
        }

        for (slot, ds) in slots.iter().zip(datasets) {
            let swatch = match ds.kind_or(options.base_kind) {
                DatasetKind::Bar => bar_fill(ds),
                DatasetKind::Line => ds.border_color,
            };
            legend_area
                .draw(&Rectangle::new(
                    [(slot.x, slot.y + 1), (slot.x + 12, slot.y + 13)],
                    to_plotters(swatch).filled(),
                ))
                .map_err(plot_err)?;
            legend_area
                .draw(&Text::new(
                    ds.label.clone(),
                    (slot.x + SWATCH_PX, slot.y),
                    (FontFamily::SansSerif, 12),
                ))
                .map_err(plot_err)?;
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}
