//! # Date Formatting
//!
//! Pure, total formatting of a calendar date into the five supported
//! footer styles, with locale-aware weekday handling.
//!
//! ## Formats
//!
//! | Format | Output (2025-11-28, en) | Output (2025-11-28, zh) |
//! |--------|-------------------------|-------------------------|
//! | `Iso` | `2025-11-28` | same |
//! | `MmDdYyyy` | `11/28/2025` | same |
//! | `DdMmYyyy` | `28/11/2025` | same |
//! | `Cn` | `2025年11月28日` | same |
//! | `CnWeekday` | `Friday, 2025-11-28` | `星期五，2025年11月28日` |
//!
//! `CnWeekday` is the only locale-sensitive format: outside Chinese it
//! degrades to an English weekday plus the ISO date, which is an explicit
//! fallback policy rather than a translation of the Chinese string.
//!
//! No timezone conversion happens here: the caller hands over the calendar
//! date it wants rendered.

use chrono::{Datelike, NaiveDate};

use super::DateFormat;
use crate::i18n::Locale;

/// Weekday names indexed by day-of-week, 0 = Sunday.
const WEEKDAYS_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday names indexed by day-of-week, 0 = Sunday.
const WEEKDAYS_ZH: [&str; 7] = [
    "星期日",
    "星期一",
    "星期二",
    "星期三",
    "星期四",
    "星期五",
    "星期六",
];

/// Format a calendar date in the given style.
///
/// Total for every `DateFormat` × `Locale` combination; never fails and
/// never consults the clock.
pub fn format_date(date: NaiveDate, format: DateFormat, locale: Locale) -> String {
    let yyyy = date.year();
    let mm = date.month();
    let dd = date.day();

    match format {
        DateFormat::Iso => format!("{yyyy:04}-{mm:02}-{dd:02}"),
        DateFormat::MmDdYyyy => format!("{mm:02}/{dd:02}/{yyyy:04}"),
        DateFormat::DdMmYyyy => format!("{dd:02}/{mm:02}/{yyyy:04}"),
        DateFormat::Cn => format!("{yyyy:04}年{mm:02}月{dd:02}日"),
        DateFormat::CnWeekday => {
            let dow = date.weekday().num_days_from_sunday() as usize;
            if locale.is_zh() {
                // Fullwidth comma, matching the Chinese typographic convention.
                format!("{}，{yyyy:04}年{mm:02}月{dd:02}日", WEEKDAYS_ZH[dow])
            } else {
                format!("{}, {yyyy:04}-{mm:02}-{dd:02}", WEEKDAYS_EN[dow])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nov_28() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 28).unwrap()
    }

    #[test]
    fn test_iso() {
        assert_eq!(format_date(nov_28(), DateFormat::Iso, Locale::En), "2025-11-28");
    }

    #[test]
    fn test_mm_dd_yyyy() {
        assert_eq!(
            format_date(nov_28(), DateFormat::MmDdYyyy, Locale::En),
            "11/28/2025"
        );
    }

    #[test]
    fn test_dd_mm_yyyy() {
        assert_eq!(
            format_date(nov_28(), DateFormat::DdMmYyyy, Locale::En),
            "28/11/2025"
        );
    }

    #[test]
    fn test_cn_ignores_locale() {
        assert_eq!(
            format_date(nov_28(), DateFormat::Cn, Locale::Zh),
            "2025年11月28日"
        );
        assert_eq!(
            format_date(nov_28(), DateFormat::Cn, Locale::En),
            "2025年11月28日"
        );
    }

    #[test]
    fn test_cn_weekday_zh() {
        assert_eq!(
            format_date(nov_28(), DateFormat::CnWeekday, Locale::Zh),
            "星期五，2025年11月28日"
        );
    }

    #[test]
    fn test_cn_weekday_fallback_en() {
        assert_eq!(
            format_date(nov_28(), DateFormat::CnWeekday, Locale::En),
            "Friday, 2025-11-28"
        );
    }

    #[test]
    fn test_zero_padding() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_date(d, DateFormat::Iso, Locale::En), "2026-03-05");
        assert_eq!(format_date(d, DateFormat::MmDdYyyy, Locale::En), "03/05/2026");
    }

    #[test]
    fn test_weekday_table_starts_on_sunday() {
        // 2025-11-30 is a Sunday.
        let d = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        assert_eq!(
            format_date(d, DateFormat::CnWeekday, Locale::En),
            "Sunday, 2025-11-30"
        );
        assert_eq!(
            format_date(d, DateFormat::CnWeekday, Locale::Zh),
            "星期日，2025年11月30日"
        );
    }
}
