// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime};

/// Parse an RFC 3339 date, a naive `YYYY-MM-DDTHH:MM:SS` date taken as UTC, or unix seconds
pub fn parse_timestamp(input: &str) -> Result<u64> {
    let input = input.trim();
    if let Ok(secs) = input.parse::<u64>() {
        return Ok(secs);
    }

    let secs = match DateTime::parse_from_rfc3339(input) {
        Ok(date) => date.timestamp(),
        Err(_) => NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S"))
            .with_context(|| {
                format!("'{input}' is neither unix seconds nor an RFC 3339 timestamp")
            })?
            .and_utc()
            .timestamp(),
    };

    if secs < 0 {
        bail!("'{input}' is before the unix epoch");
    }
    Ok(secs as u64)
}
