use crate::core::{Status, TicketId};
use crate::error::{DeskError, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parses a comma-separated status list such as `new,in_progress`
pub fn parse_statuses(input: &str) -> Result<Vec<Status>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

pub fn parse_ticket_id(input: &str) -> Result<TicketId> {
    TicketId::parse_str(input)
}

/// Which end of a day a bare date stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parses a `--since`/`--until` value
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `today` and `yesterday`.
/// Bare dates are local days, widened to their first or last instant.
pub fn parse_date_bound(input: &str, bound: DateBound) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }

    let day = match input {
        "today" => Local::now().date_naive(),
        "yesterday" => Local::now().date_naive() - Duration::days(1),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
            DeskError::InvalidInput(format!(
                "Invalid date: '{input}'. Use formats like 'today', 'yesterday', '2024-01-15' or '2024-01-15T09:30:00Z'"
            ))
        })?,
    };

    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| DeskError::custom("Invalid end of day"))?,
    };

    Local
        .from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| DeskError::InvalidInput(format!("Date does not exist locally: '{input}'")))
}
