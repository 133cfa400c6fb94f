use fiscal_chart::storage::parse_input;
use fiscal_chart::viz::render_chart;
use fiscal_chart::viz::util::{bar_datasets, line_datasets};
use fiscal_chart::{
    ChartOptions, ChartSink, DatasetKind, FiscalChart, PlottersSink, ToggleEvent,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const INPUT: &str = r#"{
    "monthly_summaries": [
        {"year": 2024, "data": [
            {"period": 1, "sales": 1200, "gross_profit": 500, "operating_profit": 80},
            {"period": 12, "sales": 500, "gross_profit": 200, "operating_profit": -40}
        ]},
        {"year": 2023, "data": [{"period": 6, "sales": 900, "gross_profit": 300, "operating_profit": 20}]},
        {"year": 2022, "data": [{"period": 3, "sales": 700, "gross_profit": 250, "operating_profit": 10}]}
    ],
    "budget": {"sales": [100, 200, 300, 400, 500, 600, 700, 800, 900, 1000, 1100, 1200]},
    "latest_year": 2024
}"#;

fn assert_svg(path: &Path) {
    let meta = fs::metadata(path).expect("file created");
    assert!(meta.len() > 0, "svg has content");
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("<svg"));
}

#[test]
fn all_overlays_render_to_svg() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    let input = parse_input(INPUT).unwrap();
    let mut chart = FiscalChart::new(&input, ChartOptions::default());
    let mut sink = PlottersSink::new(&path);

    chart.handle(ToggleEvent::GrossProfit(true), &mut sink).unwrap();
    chart
        .handle(ToggleEvent::OperatingProfit(true), &mut sink)
        .unwrap();
    assert_svg(&path);
}

#[test]
fn empty_dataset_list_still_renders() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    let labels: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
    render_chart(&labels, &[], &ChartOptions::default(), &path).unwrap();
    assert_svg(&path);
}

#[test]
fn png_output_via_bitmap_backend() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.png");
    let input = parse_input(INPUT).unwrap();
    let chart = FiscalChart::new(&input, ChartOptions::default());
    let datasets = chart.recompute(chart.toggles());
    let options = ChartOptions {
        width: 320,
        height: 200,
        ..ChartOptions::default()
    };
    let mut sink = PlottersSink::new(&path);
    sink.render(chart.labels(), &datasets, &options).unwrap();
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn zero_size_is_rejected() {
    let dir = tempdir().unwrap();
    let options = ChartOptions {
        width: 0,
        ..ChartOptions::default()
    };
    assert!(render_chart(&[], &[], &options, dir.path().join("x.svg")).is_err());
}

#[test]
fn missing_font_file_is_an_error() {
    let dir = tempdir().unwrap();
    let options = ChartOptions {
        font: Some(dir.path().join("missing.ttf")),
        ..ChartOptions::default()
    };
    let err = render_chart(&[], &[], &options, dir.path().join("x.svg")).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.ttf"));
}

#[test]
fn file_that_is_not_a_font_is_rejected() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.ttf");
    fs::write(&bogus, b"definitely not a font").unwrap();
    let options = ChartOptions {
        font: Some(bogus),
        ..ChartOptions::default()
    };
    let err = render_chart(&[], &[], &options, dir.path().join("x.svg")).unwrap_err();
    assert!(err.to_string().contains("invalid font"));
}

#[test]
fn line_base_kind_draws_year_datasets_as_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lines.svg");
    let input = parse_input(INPUT).unwrap();
    let options = ChartOptions {
        base_kind: DatasetKind::Line,
        ..ChartOptions::default()
    };
    let chart = FiscalChart::new(&input, options.clone());
    let datasets = chart.recompute(chart.toggles());
    assert!(bar_datasets(&datasets, options.base_kind).is_empty());
    assert_eq!(line_datasets(&datasets, options.base_kind).len(), datasets.len());

    render_chart(chart.labels(), &datasets, &options, &path).unwrap();
    assert_svg(&path);
}
