//! Relative date normalization for workout payloads.
//!
//! The agent is allowed to pass `today`/`yesterday`/`tomorrow` as a
//! `workout_date`; everything else must already be `YYYY-MM-DD`. Input
//! that is neither is passed through untouched so the validation
//! pipeline rejects it with a date-specific message.

use chrono::{Days, Local, NaiveDate};

/// Normalize a date string against the current local date.
pub fn normalize_date_input(text: &str) -> String {
    normalize_with_today(text, Local::now().date_naive())
}

/// Pure form of [`normalize_date_input`]; `today` is injected for tests.
pub fn normalize_with_today(text: &str, today: NaiveDate) -> String {
    let raw = text.trim().to_lowercase();

    match raw.as_str() {
        "today" | "todays" | "today's" => iso(today),
        "yesterday" => iso(today - Days::new(1)),
        "tomorrow" => iso(today + Days::new(1)),
        _ if is_iso_shaped(&raw) => raw,
        _ => text.to_string(),
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `\d{4}-\d{2}-\d{2}` without pulling in a regex engine.
fn is_iso_shaped(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}
