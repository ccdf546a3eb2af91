//! Locale-aware text formatting for amounts and dates

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::locale::Calendar;

/// Round to the nearest integer, halves going up, without grouping
///
/// `1099.6` gives `"1100"`, `2.5` gives `"3"` and `-2.5` gives `"-2"`.
pub fn format_currency(amount: Decimal) -> String {
    // the shift can only overflow for whole amounts at `Decimal::MAX`
    let rounded = match amount.checked_add(Decimal::new(5, 1)) {
        Some(shifted) => shifted.floor(),
        None => amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
    };
    match rounded.to_i64() {
        Some(value) => value.to_string(),
        None => rounded.normalize().to_string(),
    }
}

/// A rounded amount followed by an optional currency suffix
pub fn format_amount(amount: Decimal, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{} {}", format_currency(amount), suffix),
        None => format_currency(amount),
    }
}

/// Day, abbreviated month and year, e.g. `1 sept. 2024`
pub fn format_day(date: NaiveDate, calendar: &Calendar) -> String {
    let month = calendar.short_months[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Format a service timestamp
///
/// The date is taken in the timestamp's own offset. Empty input stays
/// empty; input that is not a recognizable timestamp is returned verbatim.
pub fn format_date(raw: &str, calendar: &Calendar) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match parse_date(raw) {
        Some(date) => format_day(date, calendar),
        None => raw.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{ARABIC, FRENCH};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_currency_rounds_to_nearest() {
        assert_eq!(format_currency(dec("1099.6")), "1100");
        assert_eq!(format_currency(dec("1099.4")), "1099");
        assert_eq!(format_currency(dec("2.5")), "3");
        assert_eq!(format_currency(dec("1000")), "1000");
        assert_eq!(format_currency(dec("0")), "0");
    }

    #[test]
    fn test_currency_halves_go_up_for_negatives() {
        assert_eq!(format_currency(dec("-2.5")), "-2");
        assert_eq!(format_currency(dec("-0.4")), "0");
        assert_eq!(format_currency(dec("-2.6")), "-3");
    }

    #[test]
    fn test_currency_at_decimal_max() {
        assert_eq!(format_currency(Decimal::MAX), "79228162514264337593543950335");
        assert_eq!(format_amount(Decimal::MAX, Some("MRU")), "79228162514264337593543950335 MRU");
    }

    #[test]
    fn test_currency_has_no_grouping() {
        assert_eq!(format_currency(dec("1234567.2")), "1234567");
    }

    #[test]
    fn test_amount_suffix() {
        assert_eq!(format_amount(dec("1000"), Some("MRU")), "1000 MRU");
        assert_eq!(format_amount(dec("999.5"), None), "1000");
    }

    #[test]
    fn test_french_dates() {
        assert_eq!(format_date("2024-09-01T10:00:00", &FRENCH.calendar), "1 sept. 2024");
        assert_eq!(format_date("2025-02-14T08:30:00.123Z", &FRENCH.calendar), "14 févr. 2025");
        assert_eq!(format_date("2024-08-05", &FRENCH.calendar), "5 août 2024");
    }

    #[test]
    fn test_arabic_dates() {
        assert_eq!(format_date("2024-09-01T10:00:00", &ARABIC.calendar), "1 شتنبر 2024");
        assert_eq!(format_date("2024-01-20T00:00:00+00:00", &ARABIC.calendar), "20 يناير 2024");
    }

    #[test]
    fn test_offset_is_respected() {
        assert_eq!(
            format_date("2024-12-31T23:30:00-05:00", &FRENCH.calendar),
            "31 déc. 2024"
        );
    }

    #[test]
    fn test_unparseable_dates_pass_through() {
        assert_eq!(format_date("", &FRENCH.calendar), "");
        assert_eq!(format_date("yesterday", &FRENCH.calendar), "yesterday");
    }
}
