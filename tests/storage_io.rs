use fiscal_chart::models::ToggleState;
use fiscal_chart::{ChartOptions, FiscalChart, storage};
use std::fs;
use tempfile::tempdir;

const INPUT: &str = r#"{
    "monthly_summaries": [
        {"year": "2024", "data": [
            {"period": "12", "sales": "1,500", "gross_profit": 600, "operating_profit": null}
        ]},
        {"year": 2023, "records": [
            {"period": 1, "sales": 100, "gross_profit": 40, "operating_profit": 10},
            {"period": null, "sales": 999}
        ]}
    ],
    "months_label": [4, 5, 6, 7, 8, 9, 10, 11, 12, 1, 2, 3]
}"#;

#[test]
fn load_lenient_input_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.json");
    fs::write(&path, INPUT).unwrap();

    let input = storage::load_input(&path).unwrap();
    assert_eq!(input.monthly_summaries.len(), 2);
    assert_eq!(input.monthly_summaries[0].year, 2024);
    assert_eq!(input.monthly_summaries[0].records[0].sales, 1500.0);
    assert_eq!(input.monthly_summaries[0].records[0].operating_profit, 0.0);
    assert_eq!(input.monthly_summaries[1].records[1].period, None);
    assert_eq!(input.months_label.as_ref().unwrap()[0], "4");
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = storage::load_input(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.json"));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(storage::parse_input("{ not json").is_err());
}

#[test]
fn save_series_csv_and_datasets_json() {
    let dir = tempdir().unwrap();
    let input = storage::parse_input(INPUT).unwrap();
    let chart = FiscalChart::new(&input, ChartOptions::default());

    let csv_path = dir.path().join("series.csv");
    storage::save_series_csv(chart.series(), &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv_txt.lines();
    assert_eq!(lines.next(), Some("year,metric,period,value"));
    // 2 years × 3 metrics × 12 periods
    assert_eq!(lines.count(), 72);
    assert!(csv_txt.contains("2024,sales,12,1500.0"));
    assert!(csv_txt.contains("2023,gross_profit,1,40.0"));

    let json_path = dir.path().join("datasets.json");
    let datasets = chart.recompute(ToggleState::new(true, false));
    storage::save_json(&datasets, &json_path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr[0]["label"], "2023 sales");
    assert_eq!(arr[0]["borderDash"], serde_json::json!([2, 3]));
    assert_eq!(arr[1]["backgroundColor"], "rgba(90, 90, 90, 0.6)");
    assert_eq!(arr[2]["type"], "line");
    assert!(arr[0].get("metric").is_none());
}
