//! # Age Rule
//!
//! Decides whether a tested person signs the document themselves or a
//! legal guardian signs for them.
//!
//! Only calendar dates are compared. The caller strips time-of-day and time
//! zone before calling, so an evening submission can never shift the result
//! by a day.

use chrono::{Datelike, NaiveDate};

/// Returns the age in whole years on `today`, or `None` if `birth_date`
/// lies after `today`.
///
/// Uses the "has the anniversary occurred yet this year" rule. Someone born
/// on Feb 29 turns a year older on Mar 1 in non-leap years.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    if today < birth_date {
        return None;
    }

    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    u32::try_from(age).ok()
}

/// Returns true iff the person is at least `threshold_years` old on `today`.
///
/// A birth date in the future always yields false.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use intake_core::age::is_at_least;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(2006, 6, 15).unwrap();
/// let day_later = NaiveDate::from_ymd_opt(2006, 6, 16).unwrap();
///
/// assert!(is_at_least(birthday, 18, today));
/// assert!(!is_at_least(day_later, 18, today));
/// ```
pub fn is_at_least(birth_date: NaiveDate, threshold_years: u32, today: NaiveDate) -> bool {
    age_on(birth_date, today).is_some_and(|age| age >= threshold_years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_exact_eighteenth_birthday() {
        assert!(is_at_least(date(2006, 6, 15), 18, date(2024, 6, 15)));
    }

    #[test]
    fn test_one_day_short() {
        assert!(!is_at_least(date(2006, 6, 16), 18, date(2024, 6, 15)));
        assert_eq!(age_on(date(2006, 6, 16), date(2024, 6, 15)), Some(17));
    }

    #[test]
    fn test_future_birth_date() {
        assert_eq!(age_on(date(2030, 1, 1), date(2024, 6, 15)), None);
        assert!(!is_at_least(date(2030, 1, 1), 0, date(2024, 6, 15)));
    }

    #[test]
    fn test_born_today() {
        assert_eq!(age_on(date(2024, 6, 15), date(2024, 6, 15)), Some(0));
        assert!(is_at_least(date(2024, 6, 15), 0, date(2024, 6, 15)));
    }

    #[test]
    fn test_leap_day_birthday() {
        // 2022 and 2023 are not leap years
        assert_eq!(age_on(date(2004, 2, 29), date(2023, 2, 28)), Some(18));
        assert_eq!(age_on(date(2004, 2, 29), date(2022, 2, 28)), Some(17));
        assert_eq!(age_on(date(2004, 2, 29), date(2022, 3, 1)), Some(18));
    }

    #[test]
    fn test_child() {
        assert!(!is_at_least(date(2010, 1, 1), 18, date(2024, 6, 15)));
        assert_eq!(age_on(date(2010, 1, 1), date(2024, 6, 15)), Some(14));
    }
}
