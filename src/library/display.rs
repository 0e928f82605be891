use std::time::Duration;

/// Format a `Duration` as `hh:mm:ss`.
///
/// Hours are not wrapped at 24; a 25 hour track renders as `25:00:00`.
pub fn format_hms(d: Duration) -> String {
    let secs = d.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

/// Parse `hh:mm:ss` (also accepts `mm:ss`) back into a `Duration`.
///
/// Returns `None` for empty or malformed input.
pub fn parse_hms(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let mut total: u64 = 0;
    for (i, part) in parts.iter().enumerate() {
        let value: u64 = part.trim().parse().ok()?;
        // Minutes and seconds must stay below 60; the leading field may not.
        if i > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
    }

    Some(Duration::from_secs(total))
}
