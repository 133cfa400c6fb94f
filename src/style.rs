//! Colors and year-based emphasis for chart datasets.
//!
//! Each metric has one base color. Within a metric, datasets are emphasized by their
//! position in the (oldest-first) list:
//!
//! - index 0: dashed border pattern, zero border width
//! - index 1: zero border width, fixed semi-transparent gray fill
//! - index 2 and later: bold border, fill equal to the border color
//!
//! The rule is positional. With two years the newest year sits at index 1 and gets the
//! gray fill, never the bold treatment.

use crate::dataset::ChartDataset;
use crate::models::Metric;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// RGBA color with an alpha channel in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ColorParseError {
    #[error("unrecognized color syntax: {0:?}")]
    Syntax(String),
    #[error("color channel out of range in {0:?}")]
    Channel(String),
}

static RGBA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
    )
    .expect("static regex")
});

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{6})([0-9a-fA-F]{2})?$").expect("static regex"));

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#RRGGBB` and `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let channel = |txt: &str| -> Result<u8, ColorParseError> {
            txt.parse::<u8>()
                .map_err(|_| ColorParseError::Channel(s.to_string()))
        };

        if let Some(c) = RGBA_RE.captures(s) {
            let a = match c.get(4) {
                Some(m) => m
                    .as_str()
                    .parse::<f64>()
                    .map_err(|_| ColorParseError::Channel(s.to_string()))?,
                None => 1.0,
            };
            if !(0.0..=1.0).contains(&a) {
                return Err(ColorParseError::Channel(s.to_string()));
            }
            return Ok(Rgba::new(channel(&c[1])?, channel(&c[2])?, channel(&c[3])?, a));
        }

        if let Some(c) = HEX_RE.captures(s) {
            let hex = &c[1];
            let byte = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| ColorParseError::Channel(s.to_string()))
            };
            let a = match c.get(2) {
                Some(m) => u8::from_str_radix(m.as_str(), 16)
                    .map_err(|_| ColorParseError::Channel(s.to_string()))?
                    as f64
                    / 255.0,
                None => 1.0,
            };
            return Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a));
        }

        Err(ColorParseError::Syntax(s.to_string()))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ------------------------ Palette ------------------------

pub const SALES_COLOR: Rgba = Rgba::rgb(75, 192, 192);
pub const GROSS_PROFIT_COLOR: Rgba = Rgba::rgb(255, 99, 132);
pub const OPERATING_PROFIT_COLOR: Rgba = Rgba::rgb(255, 206, 86);

/// Fill used for the second-oldest year.
pub const PREVIOUS_YEAR_FILL: Rgba = Rgba::new(90, 90, 90, 0.6);

pub const OLDEST_YEAR_DASH: [u32; 2] = [2, 3];
pub const CURRENT_YEAR_BORDER_WIDTH: u32 = 3;

/// Base border color for a metric.
pub fn metric_color(metric: Metric) -> Rgba {
    match metric {
        Metric::Sales => SALES_COLOR,
        Metric::GrossProfit => GROSS_PROFIT_COLOR,
        Metric::OperatingProfit => OPERATING_PROFIT_COLOR,
    }
}

// ------------------------ Emphasis ------------------------

/// Emphasis tier derived from a dataset's index in its list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Index 0.
    Oldest,
    /// Index 1.
    Previous,
    /// Index 2 and above.
    Current,
}

impl Emphasis {
    pub fn for_index(index: usize) -> Self {
        match index {
            0 => Emphasis::Oldest,
            1 => Emphasis::Previous,
            _ => Emphasis::Current,
        }
    }

    /// Apply this tier's overrides. Fields a tier does not touch keep their value.
    pub fn apply(self, dataset: &mut ChartDataset) {
        match self {
            Emphasis::Oldest => {
                dataset.border_dash = Some(OLDEST_YEAR_DASH.to_vec());
                dataset.border_width = 0;
            }
            Emphasis::Previous => {
                dataset.border_width = 0;
                dataset.background_color = Some(PREVIOUS_YEAR_FILL);
            }
            Emphasis::Current => {
                dataset.border_width = CURRENT_YEAR_BORDER_WIDTH;
                dataset.background_color = Some(dataset.border_color);
            }
        }
    }
}

/// Return a styled copy of `datasets`; the input is left untouched.
///
/// Styling is a pure function of the input list, so calling it on an already styled
/// list yields the same result.
pub fn style_series(datasets: &[ChartDataset]) -> Vec<ChartDataset> {
    datasets
        .iter()
        .enumerate()
        .map(|(idx, ds)| {
            let mut styled = ds.clone();
            Emphasis::for_index(idx).apply(&mut styled);
            styled
        })
        .collect()
}
