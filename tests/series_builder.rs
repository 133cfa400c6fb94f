use fiscal_chart::models::{Metric, MonthRecord, YearlySummary};
use fiscal_chart::series::{PeriodSeriesBuilder, normalize};

fn summary(year: i32, records: Vec<MonthRecord>) -> YearlySummary {
    YearlySummary::new(year, records)
}

#[test]
fn every_series_has_twelve_slots() {
    let input = vec![
        summary(2022, vec![]),
        summary(2023, vec![MonthRecord::new(5, 10.0, 4.0, 1.0)]),
    ];
    let series = PeriodSeriesBuilder::build(&input);
    for metric in Metric::ALL {
        let per_metric = series.get(metric);
        assert_eq!(per_metric.len(), 2);
        assert!(per_metric.iter().all(|s| s.values.len() == 12));
    }
    assert_eq!(series.sales[0].values, [0.0; 12]);
    assert_eq!(series.gross_profit[1].values[4], 4.0);
    assert_eq!(series.operating_profit[1].values[4], 1.0);
}

#[test]
fn records_land_in_their_period_slot_only() {
    let records = vec![
        MonthRecord::new(1, 100.0, 0.0, 0.0),
        MonthRecord::new(12, 500.0, 0.0, 0.0),
    ];
    let dense = PeriodSeriesBuilder::densify(&records, Metric::Sales);
    assert_eq!(dense[0], 100.0);
    assert_eq!(dense[11], 500.0);
    assert_eq!(dense[1..11].iter().sum::<f64>(), 0.0);
}

#[test]
fn records_without_usable_period_are_skipped() {
    let mut no_period = MonthRecord::new(1, 99.0, 0.0, 0.0);
    no_period.period = None;
    let records = vec![
        no_period,
        MonthRecord::new(0, 1.0, 0.0, 0.0),
        MonthRecord::new(13, 2.0, 0.0, 0.0),
        MonthRecord::new(3, 7.0, 0.0, 0.0),
    ];
    let dense = PeriodSeriesBuilder::densify(&records, Metric::Sales);
    let mut expected = [0.0; 12];
    expected[2] = 7.0;
    assert_eq!(dense, expected);
}

#[test]
fn duplicate_period_keeps_the_later_record() {
    let records = vec![
        MonthRecord::new(4, 10.0, 0.0, 0.0),
        MonthRecord::new(4, 30.0, 0.0, 0.0),
    ];
    assert_eq!(PeriodSeriesBuilder::densify(&records, Metric::Sales)[3], 30.0);
}

#[test]
fn normalize_reverses_newest_first_delivery() {
    let delivered = vec![summary(2024, vec![]), summary(2023, vec![]), summary(2022, vec![])];
    let years: Vec<i32> = normalize(&delivered).iter().map(|s| s.year).collect();
    assert_eq!(years, vec![2022, 2023, 2024]);

    let series = PeriodSeriesBuilder::build(&normalize(&delivered));
    assert_eq!(series.years(), vec![2022, 2023, 2024]);
}

#[test]
fn empty_input_builds_empty_series() {
    let series = PeriodSeriesBuilder::build(&[]);
    assert!(series.is_empty());
    assert!(series.to_datasets().sales.is_empty());
}

#[test]
fn datasets_carry_year_labels_and_metric_colors() {
    let records = vec![MonthRecord::new(2, 1.0, 2.0, 3.0)];
    let series = PeriodSeriesBuilder::build(&[summary(2024, records)]);
    let ds = series.to_datasets();
    assert_eq!(ds.sales[0].label, "2024 sales");
    assert_eq!(ds.gross_profit[0].label, "2024 gross profit");
    assert_eq!(ds.operating_profit[0].label, "2024 operating profit");
    assert_eq!(ds.sales[0].border_color.to_string(), "rgba(75, 192, 192, 1)");
    assert_eq!(ds.gross_profit[0].data[1], 2.0);
}

#[test]
fn contributed_slots_match_records_with_period() {
    let mut records: Vec<MonthRecord> = (1..=7)
        .map(|p| MonthRecord::new(p, 1.0, 1.0, 1.0))
        .collect();
    let mut null_period = MonthRecord::new(9, 1.0, 1.0, 1.0);
    null_period.period = None;
    records.push(null_period);

    let input = vec![summary(2024, records)];
    let first = PeriodSeriesBuilder::build(&input);
    let contributed = first.sales[0].values.iter().filter(|v| **v != 0.0).count();
    assert_eq!(contributed, 7);
    assert_eq!(PeriodSeriesBuilder::build(&input), first);
}
