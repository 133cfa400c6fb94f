//! Utility functions for visualization: colors, value ranges, bar geometry, dash patterns.

use crate::dataset::{ChartDataset, DatasetKind};
use crate::style::Rgba;
use plotters::prelude::*;

/// Convert a dataset color to a plotters color.
#[inline]
pub fn to_plotters(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

/// Alpha used for bars that carry no explicit fill.
pub const DEFAULT_BAR_FILL_ALPHA: f64 = 0.2;

/// Fill for a bar dataset.
pub fn bar_fill(ds: &ChartDataset) -> Rgba {
    ds.background_color
        .unwrap_or_else(|| ds.border_color.with_alpha(DEFAULT_BAR_FILL_ALPHA))
}

/// Y range that always includes zero, with 10% headroom. Never empty.
pub fn value_range(datasets: &[ChartDataset]) -> (f64, f64) {
    let (lo, hi) = datasets
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (0.0, 1.0);
    }
    let lo = if lo < 0.0 { lo - span * 0.1 } else { 0.0 };
    (lo, hi + span * 0.1)
}

/// Horizontal extent `[x0, x1]` of bar `idx` of `n` in month slot `month` (slots are 1 wide).
pub fn bar_extent(month: usize, idx: usize, n: usize) -> (f64, f64) {
    const GROUP_WIDTH: f64 = 0.8;
    let bar_w = GROUP_WIDTH / n.max(1) as f64;
    let x0 = month as f64 + (1.0 - GROUP_WIDTH) / 2.0 + idx as f64 * bar_w;
    (x0, x0 + bar_w)
}

/// Center of month slot `month`.
pub fn slot_center(month: usize) -> f64 {
    month as f64 + 0.5
}

/// Datasets drawn as bars; untyped datasets follow `base`.
pub fn bar_datasets(datasets: &[ChartDataset], base: DatasetKind) -> Vec<&ChartDataset> {
    datasets
        .iter()
        .filter(|d| d.kind_or(base) == DatasetKind::Bar)
        .collect()
}

pub fn line_datasets(datasets: &[ChartDataset], base: DatasetKind) -> Vec<&ChartDataset> {
    datasets
        .iter()
        .filter(|d| d.kind_or(base) == DatasetKind::Line)
        .collect()
}

/// Split a pixel polyline into the "on" pieces of a `[on, off]` dash pattern.
/// The pattern continues across vertices and an odd-length pattern is repeated once, as canvas
/// `setLineDash` does. An empty or all-zero pattern yields the whole line.
pub fn dash_polyline(points: &[(i32, i32)], pattern: &[u32]) -> Vec<Vec<(i32, i32)>> {
    let mut pattern: Vec<f64> = pattern.iter().map(|p| *p as f64).collect();
    if pattern.len() % 2 == 1 {
        pattern.extend_from_within(..);
    }
    let cycle: f64 = pattern.iter().sum();
    if points.len() < 2 || cycle <= 0.0 {
        return vec![points.to_vec()];
    }

    let mut out: Vec<Vec<(i32, i32)>> = Vec::new();
    let mut current: Vec<(i32, i32)> = Vec::new();
    let (mut seg_idx, mut left) = (0usize, pattern[0]);

    for w in points.windows(2) {
        let (ax, ay) = (w[0].0 as f64, w[0].1 as f64);
        let (bx, by) = (w[1].0 as f64, w[1].1 as f64);
        let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        let mut pos = 0.0;
        while pos < len {
            let step = left.min(len - pos);
            let on = seg_idx % 2 == 0;
            let p0 = lerp((ax, ay), (bx, by), pos / len);
            let p1 = lerp((ax, ay), (bx, by), (pos + step) / len);
            if on {
                if current.is_empty() {
                    current.push(p0);
                }
                current.push(p1);
            }
            pos += step;
            left -= step;
            if left <= 0.0 {
                if on && !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                seg_idx = (seg_idx + 1) % pattern.len();
                left = pattern[seg_idx];
                // zero-length entries would loop forever on the same point
                while left <= 0.0 {
                    seg_idx = (seg_idx + 1) % pattern.len();
                    left = pattern[seg_idx];
                }
            }
        }
    }
    if current.len() > 1 {
        out.push(current);
    }
    out
}

fn lerp(a: (f64, f64), b: (f64, f64), t: f64) -> (i32, i32) {
    (
        (a.0 + (b.0 - a.0) * t).round() as i32,
        (a.1 + (b.1 - a.1) * t).round() as i32,
    )
}
