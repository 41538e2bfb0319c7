use chrono::{Datelike, NaiveDate};

use super::domain::{FieldInput, UserRecord};

pub const NAME_MIN_LEN: usize = 5;
pub const NAME_MAX_LEN: usize = 16;
pub const PASSWORD_MIN_LEN: usize = 5;
pub const PASSWORD_MAX_LEN: usize = 16;
pub const PASSWORD_MIN_DIGITS: usize = 2;
/// Age in whole years a registrant must exceed.
pub const MINIMUM_AGE_EXCLUSIVE: i32 = 18;

fn length_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}

pub fn name_valid(name: &FieldInput) -> bool {
    name.as_text()
        .is_some_and(|name| length_within(name, NAME_MIN_LEN, NAME_MAX_LEN))
}

pub fn name_unique(existing: &[UserRecord], name: &str) -> bool {
    !existing.iter().any(|record| record.name == name)
}

pub fn date_valid(date_of_birth: &str) -> bool {
    parse_date_of_birth(date_of_birth).is_some()
}

pub fn age_sufficient(date_of_birth: &str, today: NaiveDate) -> bool {
    parse_date_of_birth(date_of_birth)
        .is_some_and(|dob| age_in_years(dob, today) > MINIMUM_AGE_EXCLUSIVE)
}

pub fn email_is_text(email: &FieldInput) -> bool {
    email.is_text()
}

pub fn email_format_valid(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

pub fn email_unique(existing: &[UserRecord], email: &str) -> bool {
    !existing.iter().any(|record| record.email == email)
}

pub fn password_is_text(password: &FieldInput) -> bool {
    password.is_text()
}

pub fn password_length_valid(password: &str) -> bool {
    length_within(password, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN)
}

pub fn password_has_uppercase(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
}

pub fn password_has_two_digits(password: &str) -> bool {
    password.chars().filter(char::is_ascii_digit).count() >= PASSWORD_MIN_DIGITS
}

/// Parse a date of birth written as `D/M/YYYY` or `YYYY-M-D`.
///
/// Separators may be `/`, `-` or `.` but must not be mixed. Day and month
/// accept one or two digits, the year exactly four. Surrounding whitespace is
/// ignored.
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let separator = ['/', '-', '.']
        .into_iter()
        .find(|separator| trimmed.contains(*separator))?;

    let parts: Vec<&str> = trimmed.split(separator).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };

    if ![first, second, third]
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let (year, month, day) = if first.len() == 4 {
        (*first, *second, *third)
    } else {
        (*third, *second, *first)
    };

    if year.len() != 4 || month.len() > 2 || day.len() > 2 {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Whole years elapsed between `date_of_birth` and `today`; negative for future dates.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years
}
