//! Day-first calendar dates as typed into spreadsheets.

use time::macros::format_description;
use time::{Date, Month};

use crate::error::{CoreError, Result};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

const SEPARATORS: [char; 3] = ['/', '-', '.'];

/// Parse `dd/mm/yyyy`, `dd-mm-yyyy` or `dd.mm.yyyy`.
///
/// Day and month may have one or two digits; the year must have four and lie
/// within [`MIN_YEAR`]..=[`MAX_YEAR`]. The same separator must be used twice.
pub fn parse_date(input: &str) -> Result<Date> {
    let input = input.trim();
    let invalid = || CoreError::invalid_date(input);

    let separator = input
        .chars()
        .find(|c| !c.is_ascii_digit())
        .filter(|c| SEPARATORS.contains(c))
        .ok_or_else(invalid)?;

    let parts: Vec<&str> = input.split(separator).collect();
    let &[day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(day) && all_digits(month) && all_digits(year))
        || day.len() > 2
        || month.len() > 2
        || year.len() != 4
    {
        return Err(invalid());
    }

    let day: u8 = day.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(CoreError::invalid_date(format!(
            "{input} (year must be between {MIN_YEAR} and {MAX_YEAR})"
        )));
    }
    let month = Month::try_from(month)
        .map_err(|_| CoreError::invalid_date(format!("{input} (month must be 1-12)")))?;

    Date::from_calendar_date(year, month, day).map_err(|_| {
        CoreError::invalid_date(format!("{input} (day out of range for {month} {year})"))
    })
}

/// Render as ISO `yyyy-mm-dd`, the form the backend stores.
pub fn to_iso(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format)
        .unwrap_or_else(|_| format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}

/// Parse a day-first date and return its ISO form.
pub fn normalize_date(input: &str) -> Result<String> {
    parse_date(input).map(to_iso)
}
