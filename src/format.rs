//! Number and label formatting shared by the chart sinks.
//!
//! Amounts are rounded to whole numbers and grouped with the locale's thousands separator
//! (`1,234,567` vs `1.234.567`), then suffixed with the currency unit (`1,234,567 千円`).

use num_format::{Locale, ToFormattedString};

use crate::models::PERIODS;

/// Default currency unit: thousand yen.
pub const DEFAULT_UNIT: &str = "千円";
pub const DEFAULT_LOCALE: &str = "ja";

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `ja`, `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "ja" | "ja_jp" | "ja-jp" | "japanese" => (&Locale::ja, '.'),
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Tick label: rounded, thousands-separated, no unit.
pub fn format_tick(value: f64, locale_tag: &str) -> String {
    let (locale, _) = map_locale(locale_tag);
    let n = if value.is_finite() { value.round() as i64 } else { 0 };
    n.to_formatted_string(locale)
}

/// Tooltip/summary text: thousands-separated value followed by the unit, e.g. `"1,200 千円"`.
pub fn format_amount(value: f64, locale_tag: &str, unit: &str) -> String {
    let n = format_tick(value, locale_tag);
    if unit.is_empty() { n } else { format!("{n} {unit}") }
}

/// Period labels for a fiscal year closing in `fiscal_month`: period 1 is the month after the
/// closing month, period 12 the closing month itself.
pub fn fiscal_month_labels(fiscal_month: u32) -> Vec<String> {
    let fm = fiscal_month % 12;
    (1..=PERIODS as u32)
        .map(|i| {
            let m = match (fm + i) % 12 {
                0 => 12,
                m => m,
            };
            m.to_string()
        })
        .collect()
}

/// Pick the x-axis labels: explicit labels win, then labels derived from the closing month,
/// then plain `1..=12`. The result always has exactly 12 entries.
pub fn resolve_month_labels(explicit: Option<&[String]>, fiscal_month: Option<u32>) -> Vec<String> {
    let mut labels: Vec<String> = match (explicit, fiscal_month) {
        (Some(l), _) if !l.is_empty() => l.to_vec(),
        (_, Some(fm)) if (1..=12).contains(&fm) => fiscal_month_labels(fm),
        _ => (1..=PERIODS).map(|i| i.to_string()).collect(),
    };
    labels.truncate(PERIODS);
    while labels.len() < PERIODS {
        labels.push((labels.len() + 1).to_string());
    }
    labels
}
