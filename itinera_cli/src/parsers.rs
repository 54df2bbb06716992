use std::time::Duration;

use jiff::SpanRelativeTo;

/// Accepts ISO 8601 (`PT1S`), friendly spans (`500ms`, `1s`) or plain seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration.unsigned_abs());
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration.unsigned_abs());
    }

    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    Err(String::from("Invalid duration"))
}
