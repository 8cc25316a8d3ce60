use regex::Regex;
use std::sync::OnceLock;

use crate::record::Record;

fn trailing_digits_regex() -> &'static Regex {
    static TRAILING_DIGITS_REGEX: OnceLock<Regex> = OnceLock::new();
    TRAILING_DIGITS_REGEX
        .get_or_init(|| Regex::new(r"[0-9]+$").expect("trailing digits regex must compile"))
}

/// Numeric key taken from the trailing digit run of `name_field`.
///
/// `"Model 10"` yields 10; a missing field or a name without trailing digits
/// yields 0. Runs too long for `u64` saturate.
pub fn order_key(record: &Record, name_field: &str) -> u64 {
    let name = record.get(name_field).display();
    trailing_digits_regex()
        .find(&name)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Stable ascending sort by [`order_key`]; equal keys keep input order.
pub fn sort_by_order_key(records: &mut [Record], name_field: &str) {
    records.sort_by_cached_key(|record| order_key(record, name_field));
}
