use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use log::debug;
use std::fmt;

/// Number of fiscal periods (months) in one fiscal year.
pub const PERIODS: usize = 12;

/// One metric across all periods of one fiscal year. Slot `i` holds period `i + 1`.
pub type DenseSeries = [f64; PERIODS];

/// The three financial metrics shown in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Sales,
    GrossProfit,
    OperatingProfit,
}

impl Metric {
    /// All metrics in chart order (sales first).
    pub const ALL: [Metric; 3] = [Metric::Sales, Metric::GrossProfit, Metric::OperatingProfit];

    /// Display name used in dataset labels, e.g. `"2024 gross profit"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::GrossProfit => "gross profit",
            Metric::OperatingProfit => "operating profit",
        }
    }

    /// Field name used in input documents and CSV exports.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::GrossProfit => "gross_profit",
            Metric::OperatingProfit => "operating_profit",
        }
    }
}

/// One month of an already-aggregated fiscal summary.
///
/// Every numeric field is parsed leniently: numbers, numeric strings and `null`
/// are accepted, anything else becomes `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    /// 1-indexed fiscal month. `None` when the record carries no period.
    #[serde(default, deserialize_with = "de_period")]
    pub period: Option<u32>,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub sales: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub gross_profit: f64,
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub operating_profit: f64,
}

impl MonthRecord {
    pub fn new(period: u32, sales: f64, gross_profit: f64, operating_profit: f64) -> Self {
        Self {
            period: Some(period),
            sales,
            gross_profit,
            operating_profit,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sales => self.sales,
            Metric::GrossProfit => self.gross_profit,
            Metric::OperatingProfit => self.operating_profit,
        }
    }

    /// Zero-based slot for this record, or `None` when the period is absent or outside 1..=12.
    pub fn slot(&self) -> Option<usize> {
        match self.period {
            Some(p) if (1..=PERIODS as u32).contains(&p) => Some(p as usize - 1),
            _ => None,
        }
    }
}

/// Monthly records of one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    #[serde(deserialize_with = "de_i32_from_string_or_number")]
    pub year: i32,
    #[serde(default, rename = "data", alias = "records")]
    pub records: Vec<MonthRecord>,
}

impl YearlySummary {
    pub fn new(year: i32, records: Vec<MonthRecord>) -> Self {
        Self { year, records }
    }
}

/// Optional budget figures for the current year, one 12-slot array per metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSeries {
    #[serde(default, deserialize_with = "de_lenient_vec")]
    pub sales: Vec<f64>,
    #[serde(default, deserialize_with = "de_lenient_vec")]
    pub gross_profit: Vec<f64>,
    #[serde(default, deserialize_with = "de_lenient_vec")]
    pub operating_profit: Vec<f64>,
}

impl BudgetSeries {
    pub fn values(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Sales => &self.sales,
            Metric::GrossProfit => &self.gross_profit,
            Metric::OperatingProfit => &self.operating_profit,
        }
    }

    /// Budget for `metric` as a dense series: short arrays are zero-padded, long ones truncated.
    pub fn dense(&self, metric: Metric) -> DenseSeries {
        let mut out = [0.0; PERIODS];
        for (slot, v) in out.iter_mut().zip(self.values(metric)) {
            *slot = finite_or_zero(*v);
        }
        out
    }

    /// True when any metric has at least one budget value above zero.
    pub fn has_positive_value(&self) -> bool {
        Metric::ALL
            .iter()
            .any(|m| self.values(*m).iter().any(|v| *v > 0.0))
    }
}

/// Whether the optional profit overlays are shown. Sales are always shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToggleState {
    pub show_gross_profit: bool,
    pub show_operating_profit: bool,
}

impl ToggleState {
    pub fn new(show_gross_profit: bool, show_operating_profit: bool) -> Self {
        Self {
            show_gross_profit,
            show_operating_profit,
        }
    }
}

/// The page payload: summaries (newest year first, as delivered), labels and budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartInput {
    /// Entries without a usable year are dropped while parsing.
    #[serde(default, alias = "yearly_summaries", deserialize_with = "de_summaries")]
    pub monthly_summaries: Vec<YearlySummary>,
    #[serde(default, deserialize_with = "de_labels")]
    pub months_label: Option<Vec<String>>,
    #[serde(default)]
    pub budget: Option<BudgetSeries>,
    #[serde(default)]
    pub latest_year: Option<i32>,
    /// Closing month of the fiscal year, used to derive labels when `months_label` is absent.
    #[serde(default)]
    pub fiscal_month: Option<u32>,
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// `f64` that never fails to deserialize: non-numeric input becomes `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LenientF64(pub f64);

impl<'de> Deserialize<'de> for LenientF64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LenientVisitor;

        impl<'de> Visitor<'de> for LenientVisitor {
            type Value = LenientF64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a number, a numeric string, or null")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(LenientF64(finite_or_zero(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(LenientF64(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(LenientF64(v as f64))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
                let parsed = s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0);
                Ok(LenientF64(finite_or_zero(parsed)))
            }

            fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
                Ok(LenientF64(0.0))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(LenientF64(0.0))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(LenientF64(0.0))
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                LenientF64::deserialize(d)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(LenientF64(0.0))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(LenientF64(0.0))
            }
        }

        deserializer.deserialize_any(LenientVisitor)
    }
}

fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    LenientF64::deserialize(deserializer).map(|v| v.0)
}

fn de_lenient_vec<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<LenientF64>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.0)
        .collect())
}

/// Period as integer, integral float or numeric string. Anything else means "no period".
fn de_period<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = LenientF64::deserialize(deserializer)?.0;
    if raw >= 1.0 && raw.fract() == 0.0 && raw <= u32::MAX as f64 {
        Ok(Some(raw as u32))
    } else {
        Ok(None)
    }
}

/// Year as integer, integral float or numeric string. `null` and anything unparseable
/// yield `None`.
fn de_opt_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = Option<i32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a string or integer representing a year")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(i32::try_from(v).ok())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(i32::try_from(v).ok())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
                Ok(Some(v as i32))
            } else {
                Ok(None)
            }
        }

        fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
            Ok(s.trim().parse::<i32>().ok())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            de_opt_year(d)
        }
    }

    deserializer.deserialize_any(YearVisitor)
}

/// Serde helper: parse `i32` from either a JSON number or a string.
fn de_i32_from_string_or_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    de_opt_year(deserializer)?.ok_or_else(|| de::Error::custom("missing or invalid year"))
}

#[derive(Deserialize)]
struct RawSummary {
    #[serde(default, deserialize_with = "de_opt_year")]
    year: Option<i32>,
    #[serde(default, rename = "data", alias = "records")]
    records: Vec<MonthRecord>,
}

fn de_summaries<'de, D>(deserializer: D) -> Result<Vec<YearlySummary>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawSummary>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| match s.year {
            Some(year) => Some(YearlySummary::new(year, s.records)),
            None => {
                debug!("skipping summary without a usable year");
                None
            }
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Month labels may arrive as numbers (`[4, 5, ...]`) or strings.
fn de_labels<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawLabel>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|labels| {
        labels
            .into_iter()
            .map(|l| match l {
                RawLabel::Text(s) => s,
                RawLabel::Int(n) => n.to_string(),
                RawLabel::Float(x) => x.to_string(),
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_record_coerces_garbage_to_zero() {
        let r: MonthRecord = serde_json::from_str(
            r#"{"period":"3","sales":"1,200","gross_profit":null,"operating_profit":"n/a"}"#,
        )
        .unwrap();
        assert_eq!(r.period, Some(3));
        assert_eq!(r.sales, 1200.0);
        assert_eq!(r.gross_profit, 0.0);
        assert_eq!(r.operating_profit, 0.0);
    }

    #[test]
    fn month_record_without_period() {
        let r: MonthRecord = serde_json::from_str(r#"{"sales":10}"#).unwrap();
        assert_eq!(r.period, None);
        assert_eq!(r.slot(), None);

        let r: MonthRecord = serde_json::from_str(r#"{"period":null,"sales":10}"#).unwrap();
        assert_eq!(r.period, None);
    }

    #[test]
    fn out_of_range_period_has_no_slot() {
        assert_eq!(MonthRecord::new(13, 1.0, 1.0, 1.0).slot(), None);
        assert_eq!(MonthRecord::new(0, 1.0, 1.0, 1.0).slot(), None);
        assert_eq!(MonthRecord::new(12, 1.0, 1.0, 1.0).slot(), Some(11));
    }

    #[test]
    fn yearly_summary_accepts_data_or_records() {
        let a: YearlySummary =
            serde_json::from_str(r#"{"year":"2024","data":[{"period":1,"sales":5}]}"#).unwrap();
        let b: YearlySummary =
            serde_json::from_str(r#"{"year":2024,"records":[{"period":1,"sales":5}]}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.year, 2024);
    }

    #[test]
    fn year_accepts_integral_float() {
        let s: YearlySummary = serde_json::from_str(r#"{"year":2024.0,"data":[]}"#).unwrap();
        assert_eq!(s.year, 2024);
        assert!(serde_json::from_str::<YearlySummary>(r#"{"year":null}"#).is_err());
    }

    #[test]
    fn summaries_without_year_are_skipped() {
        let input: ChartInput = serde_json::from_str(
            r#"{"monthly_summaries":[
                {"year":2024.0,"data":[{"period":1,"sales":5}]},
                {"year":null,"data":[{"period":1,"sales":9}]},
                {"data":[]},
                {"year":"20x3","data":[]},
                {"year":"2023","data":[]}
            ]}"#,
        )
        .unwrap();
        let years: Vec<i32> = input.monthly_summaries.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2024, 2023]);
    }

    #[test]
    fn budget_dense_pads_and_truncates() {
        let budget = BudgetSeries {
            sales: vec![1.0, 2.0],
            gross_profit: vec![1.0; 14],
            operating_profit: vec![],
        };
        let s = budget.dense(Metric::Sales);
        assert_eq!(s[0], 1.0);
        assert_eq!(s[1], 2.0);
        assert!(s[2..].iter().all(|v| *v == 0.0));
        assert_eq!(budget.dense(Metric::GrossProfit), [1.0; PERIODS]);
        assert_eq!(budget.dense(Metric::OperatingProfit), [0.0; PERIODS]);
    }

    #[test]
    fn labels_accept_numbers() {
        let input: ChartInput =
            serde_json::from_str(r#"{"monthly_summaries":[],"months_label":[4,5,"Jun"]}"#).unwrap();
        assert_eq!(
            input.months_label,
            Some(vec!["4".to_string(), "5".to_string(), "Jun".to_string()])
        );
    }
}
