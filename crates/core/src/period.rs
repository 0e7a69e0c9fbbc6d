// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Period spec parsing for the periodic hook

use crate::config::ConfigError;
use std::time::Duration;

/// Parse a period spec: a bare integer is seconds; an `s`/`m`/`h`/`d` suffix
/// multiplies by 1, 60, 3600, 86400. Suffixes are case-insensitive. Zero
/// periods are rejected; they would fire continuously.
pub fn parse_period(spec: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidPeriod(spec.to_string());
    let trimmed = spec.trim();

    if let Ok(secs) = trimmed.parse::<u64>() {
        if secs == 0 {
            return Err(invalid());
        }
        return Ok(Duration::from_secs(secs));
    }

    let mut chars = trimmed.chars();
    let suffix = chars.next_back().ok_or_else(invalid)?;
    let num: u64 = chars.as_str().parse().map_err(|_| invalid())?;
    let mul = match suffix.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return Err(invalid()),
    };
    num.checked_mul(mul)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

#[cfg(test)]
#[path = "period_tests.rs"]
mod tests;
