//! Formatters that turn provider snapshots into the JSON shapes served per domain.
//!
//! Each formatter is a pure function. Missing provider attributes are replaced
//! by a default or the `"N/A"` sentinel right here, so neither the HTTP layer nor
//! the dashboard has to guess.

pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod memory;
pub mod process;

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

pub use cpu::{CpuInfo, CpuReadings, format_cpu};
pub use disk::{DiskAggregation, DiskInfo, format_disk};
pub use gpu::{GpuInfo, format_gpu};
pub use memory::{MemoryInfo, SlotPolicy, format_memory};
pub use process::{PowerTier, ProcessSample, TOP_PROCESSES, format_processes};

pub const NOT_AVAILABLE: &str = "N/A";

pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Fixed-point rendering with `decimals` places. Rounds once, ties away from zero.
pub fn fixed(value: f64, decimals: usize) -> String {
    let scaled = (value * 10f64.powi(decimals as i32)).round();
    if !scaled.is_finite() || scaled.abs() >= 1e15 {
        return format!("{value:.decimals$}");
    }
    let digits = format!("{:0>width$}", scaled.abs() as u64, width = decimals + 1);
    let (int, frac) = digits.split_at(digits.len() - decimals);
    let sign = if scaled < 0.0 { "-" } else { "" };
    if decimals == 0 {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}.{frac}")
    }
}

/// Parses the leading number of strings such as `"37%"`, `"12.5 GB"` or `"0.2/3.9 GB"`.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}

/// A value that serializes as the `"N/A"` sentinel when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrNa<T>(pub Option<T>);

impl<T> OrNa<T> {
    pub fn known(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T> From<Option<T>> for OrNa<T> {
    fn from(value: Option<T>) -> Self {
        OrNa(value)
    }
}

impl<T: fmt::Display> fmt::Display for OrNa<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for OrNa<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrNa<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrNaVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrNaVisitor<T> {
            type Value = OrNa<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or a sentinel string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                T::deserialize(de::value::I64Deserializer::new(v)).map(|v| OrNa(Some(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                T::deserialize(de::value::U64Deserializer::new(v)).map(|v| OrNa(Some(v)))
            }

            fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
                Ok(OrNa(None))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrNa(None))
            }
        }

        deserializer.deserialize_any(OrNaVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_matches_one_decimal_rendering() {
        assert_eq!(fixed(0.0, 1), "0.0");
        assert_eq!(fixed(12.34, 1), "12.3");
        assert_eq!(fixed(2.25, 2), "2.25");
        assert_eq!(fixed(1.0 / 3.0, 2), "0.33");
        assert_eq!(fixed(12.0, 2), "12.00");
        assert_eq!(fixed(0.004, 2), "0.00");
    }

    #[test]
    fn fixed_rounds_exact_ties_up() {
        assert_eq!(fixed(0.25, 1), "0.3");
        assert_eq!(fixed(2.5, 0), "3");
        assert_eq!(fixed(-1.25, 1), "-1.3");
    }

    #[test]
    fn leading_number_strips_units() {
        assert_eq!(leading_number("37%"), Some(37.0));
        assert_eq!(leading_number("0.2/3.9 GB"), Some(0.2));
        assert_eq!(leading_number(" 12.5 GB"), Some(12.5));
        assert_eq!(leading_number("N/A"), None);
    }

    #[test]
    fn or_na_round_trips_through_json() {
        let known = serde_json::to_value(OrNa(Some(12u32))).unwrap();
        assert_eq!(known, serde_json::json!(12));
        let unknown = serde_json::to_value(OrNa::<u32>(None)).unwrap();
        assert_eq!(unknown, serde_json::json!("N/A"));

        let parsed: OrNa<i32> = serde_json::from_value(serde_json::json!(-5)).unwrap();
        assert_eq!(parsed, OrNa(Some(-5)));
        let parsed: OrNa<i32> = serde_json::from_value(serde_json::json!("N/A")).unwrap();
        assert_eq!(parsed, OrNa(None));
    }
}
