//! Percentage conventions shared by every aggregate.

/// Period-over-period change in percent.
///
/// When `previous` is zero the change is 100 if `current` is positive and 0
/// otherwise.
pub fn percent_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    (current - previous) as f64 / previous as f64 * 100.0
}

/// `part` as a percentage of `whole`, 0 when `whole` is zero.
pub fn percent_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Change of a signed figure relative to the magnitude of its previous value,
/// 0 when the previous value is zero.
pub fn relative_change(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current - previous) as f64 / previous.unsigned_abs() as f64 * 100.0
}
