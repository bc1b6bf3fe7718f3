//! Per-timeframe summary statistics
//!
//! Sample values arrive as decimal strings and are summed as [`Decimal`]
//! so results match the upstream figures digit for digit.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{TimeframeSample, TimeframeSeries, TimeframeStats};

/// Fractional digits in every rendered statistic
const STAT_DECIMALS: u32 = 4;

impl TimeframeStats {
    /// Summarize one timeframe's histories.
    pub fn from_series(series: &TimeframeSeries) -> Self {
        let values = parse_history(&series.timeframe, &series.account_value_history);
        let pnls = parse_history(&series.timeframe, &series.pnl_history);

        Self {
            timeframe: series.timeframe.clone(),
            avg_account_value: render(mean(&series.timeframe, &values)),
            avg_pnl: render(mean(&series.timeframe, &pnls)),
            account_value_change: render(change(&series.timeframe, &values)),
            pnl_change: render(change(&series.timeframe, &pnls)),
        }
    }
}

/// Parse a sample value, accepting plain and scientific notation.
pub fn parse_value(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn parse_history(timeframe: &str, history: &[TimeframeSample]) -> Vec<Decimal> {
    history
        .iter()
        .map(|sample| {
            parse_value(sample.value()).unwrap_or_else(|| {
                tracing::warn!(
                    timeframe,
                    timestamp = sample.timestamp(),
                    value = sample.value(),
                    "Unparseable history value, counting as zero"
                );
                Decimal::ZERO
            })
        })
        .collect()
}

/// Arithmetic mean; zero for an empty history.
///
/// A value that would overflow the running sum is counted as zero.
fn mean(timeframe: &str, values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum = values.iter().fold(Decimal::ZERO, |sum, value| {
        sum.checked_add(*value).unwrap_or_else(|| {
            tracing::warn!(timeframe, %value, "History sum overflows, counting value as zero");
            sum
        })
    });
    sum / Decimal::from(values.len())
}

/// Newest minus oldest; zero with fewer than two points or on overflow.
fn change(timeframe: &str, values: &[Decimal]) -> Decimal {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() > 1 => {
            last.checked_sub(*first).unwrap_or_else(|| {
                tracing::warn!(timeframe, %first, %last, "History change overflows, using zero");
                Decimal::ZERO
            })
        }
        _ => Decimal::ZERO,
    }
}

/// Round half away from zero and render with exactly four fractional digits.
pub fn render(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(STAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    // A negative value that rounds away to nothing should read as plain zero.
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.*}", STAT_DECIMALS as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[&str], pnls: &[&str]) -> TimeframeSeries {
        let samples = |raw: &[&str]| {
            raw.iter()
                .enumerate()
                .map(|(i, v)| TimeframeSample::new(i as i64, *v))
                .collect()
        };
        TimeframeSeries {
            timeframe: "perpDay".to_string(),
            account_value_history: samples(values),
            pnl_history: samples(pnls),
        }
    }

    #[test]
    fn test_empty_history_is_zero() {
        let stats = TimeframeStats::from_series(&series(&[], &[]));
        assert_eq!(stats.avg_account_value, "0.0000");
        assert_eq!(stats.account_value_change, "0.0000");
        assert_eq!(stats.avg_pnl, "0.0000");
        assert_eq!(stats.pnl_change, "0.0000");
    }

    #[test]
    fn test_single_point_history() {
        let stats = TimeframeStats::from_series(&series(&["5.00"], &[]));
        assert_eq!(stats.avg_account_value, "5.0000");
        assert_eq!(stats.account_value_change, "0.0000");
    }

    #[test]
    fn test_histories_of_different_length() {
        let stats = TimeframeStats::from_series(&series(&["200.00", "210.00"], &["1.5"]));
        assert_eq!(stats.avg_account_value, "205.0000");
        assert_eq!(stats.account_value_change, "10.0000");
        assert_eq!(stats.avg_pnl, "1.5000");
        assert_eq!(stats.pnl_change, "0.0000");
    }

    #[test]
    fn test_change_uses_first_and_last_only() {
        let stats = TimeframeStats::from_series(&series(&[], &["10", "-40", "2.5"]));
        assert_eq!(stats.pnl_change, "-7.5000");
        assert_eq!(stats.avg_pnl, "-9.1667");
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let stats = TimeframeStats::from_series(&series(&["0.1", "0.2"], &[]));
        assert_eq!(stats.avg_account_value, "0.1500");
        assert_eq!(stats.account_value_change, "0.1000");
    }

    #[test]
    fn test_unparseable_value_counts_as_zero() {
        let stats = TimeframeStats::from_series(&series(&["4", "n/a"], &[]));
        assert_eq!(stats.avg_account_value, "2.0000");
        assert_eq!(stats.account_value_change, "-4.0000");
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let max = "79228162514264337593543950335";
        let min = "-79228162514264337593543950335";
        let stats = TimeframeStats::from_series(&series(&[min, max], &[max, max]));

        assert_eq!(stats.avg_account_value, "0.0000");
        assert_eq!(stats.account_value_change, "0.0000");
        assert_eq!(stats.pnl_change, "0.0000");
        // Second addend overflows and is dropped, leaving max / 2.
        assert!(stats.avg_pnl.starts_with("3961408125713216879677197516"));
    }

    #[test]
    fn test_parse_value_scientific() {
        assert_eq!(parse_value("1e-2"), Some(Decimal::new(1, 2)));
        assert_eq!(parse_value(" 3.25 "), Some(Decimal::new(325, 2)));
        assert_eq!(parse_value("abc"), None);
    }

    #[test]
    fn test_render_rounding() {
        assert_eq!(render(Decimal::new(123455, 5)), "1.2346");
        assert_eq!(render(Decimal::new(-123455, 5)), "-1.2346");
        assert_eq!(render(Decimal::new(-1, 6)), "0.0000");
        assert_eq!(render(Decimal::from(7)), "7.0000");
    }
}
