//! Date parsing and formatting in the two textual forms the application
//! exchanges: French `dd/mm/yyyy` on forms and import files, ISO
//! `yyyy-mm-dd` in the database.

use chrono::NaiveDate;

use crate::FormatError;

/// Canonical fallback for dates that cannot be represented: ISO text below
/// year 1900 cannot be rendered back through `format_date_fr` safely, so it
/// is normalized to this sentinel at the read boundary.
pub const FALLBACK_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => unreachable!(),
};

/// Parses a French `dd/mm/yyyy` date.
///
/// Empty input yields `Ok(None)`; anything else that does not form a valid
/// calendar date is a [`FormatError`].
pub fn parse_date_fr(text: &str) -> crate::Result<Option<NaiveDate>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = || FormatError::InvalidDate(trimmed.to_string());
    let mut parts = trimmed.split('/');
    let day: u32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    let month: u32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    let year: i32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(invalid)
}

/// Renders a date as French `dd/mm/yyyy`.
pub fn format_date_fr(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Reads an ISO `yyyy-mm-dd` string coming back from storage.
///
/// Missing values, calendrically invalid values and years below 1900 all
/// normalize to [`FALLBACK_DATE`]; this function never fails.
pub fn date_from_iso(text: Option<&str>) -> NaiveDate {
    let Some(raw) = text else {
        return FALLBACK_DATE;
    };
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) if date >= FALLBACK_DATE => date,
        _ => FALLBACK_DATE,
    }
}

/// Renders a date in the ISO storage form `yyyy-mm-dd`.
pub fn date_to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reverses the `-`-separated tokens of an ISO date string into a
/// `/`-joined one (`2011-07-12` becomes `12/07/2011`).
///
/// This is a purely textual rewrite, not calendar-aware: a stored fallback
/// or out-of-range date is reversed just the same. The CSV export relies on
/// that leniency.
pub fn naive_iso_to_fr(iso: &str) -> String {
    let mut parts: Vec<&str> = iso.split('-').collect();
    parts.reverse();
    parts.join("/")
}
