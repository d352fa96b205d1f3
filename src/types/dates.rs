use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::debug;

/// The ledger records dates in Argentina (UTC-3, no daylight saving).
const LEDGER_UTC_OFFSET_SECS: i32 = 3 * 3600;
const ANCHOR_HOUR: u32 = 12;

fn ledger_offset() -> Option<FixedOffset> {
    FixedOffset::west_opt(LEDGER_UTC_OFFSET_SECS)
}

/// Parses a ledger date, keeping only its calendar day.
///
/// Any time component is discarded and the day is pinned to noon at UTC-3,
/// so the calendar day survives conversion to any zone within twelve hours.
pub fn parse_ledger_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;

    date.and_hms_opt(ANCHOR_HOUR, 0, 0)?
        .and_local_timezone(ledger_offset()?)
        .single()
}

/// `2024-01-10T00:00:00` -> `10/01/2024`. Unparseable input comes back unchanged.
pub fn format_ledger_date(raw: &str) -> String {
    match parse_ledger_date(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => {
            debug!("Could not format ledger date [{raw}], keeping raw value");
            raw.to_string()
        }
    }
}

pub fn format_last_update(timestamp: DateTime<Utc>) -> String {
    match ledger_offset() {
        Some(offset) => timestamp.with_timezone(&offset).format("%d/%m/%Y %H:%M").to_string(),
        None => timestamp.format("%d/%m/%Y %H:%M").to_string(),
    }
}

/// Current calendar day at the ledger's offset.
pub fn today() -> NaiveDate {
    let now = Utc::now();

    match ledger_offset() {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}
