use fiscal_chart::format::{
    DEFAULT_UNIT, fiscal_month_labels, format_amount, format_tick, resolve_month_labels,
};

#[test]
fn amounts_group_thousands_and_append_unit() {
    assert_eq!(format_amount(1_234_567.0, "ja", DEFAULT_UNIT), "1,234,567 千円");
    assert_eq!(format_amount(1_234_567.0, "de", "EUR"), "1.234.567 EUR");
    assert_eq!(format_amount(-2500.4, "en", ""), "-2,500");
}

#[test]
fn ticks_round_and_ignore_non_finite() {
    assert_eq!(format_tick(999.6, "ja"), "1,000");
    assert_eq!(format_tick(f64::NAN, "ja"), "0");
    assert_eq!(format_tick(30_000.0, "unknown"), "30,000");
}

#[test]
fn december_close_starts_in_january() {
    let labels = fiscal_month_labels(12);
    let expected: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
    assert_eq!(labels, expected);
}

#[test]
fn march_close_starts_in_april() {
    let labels = fiscal_month_labels(3);
    assert_eq!(labels[..3], ["4", "5", "6"]);
    assert_eq!(labels[9..], ["1", "2", "3"]);
}

#[test]
fn explicit_labels_win_and_are_padded() {
    let explicit = vec!["Apr".to_string(), "May".to_string()];
    let labels = resolve_month_labels(Some(explicit.as_slice()), Some(3));
    assert_eq!(labels.len(), 12);
    assert_eq!(labels[0], "Apr");
    assert_eq!(labels[2], "3");

    assert_eq!(resolve_month_labels(None, Some(13))[0], "1");
    assert_eq!(resolve_month_labels(Some(&[][..]), Some(6))[0], "7");
}
