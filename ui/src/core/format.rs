//! Formatting helpers for presenting scores.

pub fn hole_label(hole: u8) -> String {
    format!("Hole {hole}")
}

pub fn total_label(total: u32) -> String {
    format!("Total Score: {total}")
}

/// File-name friendly UTC stamp, e.g. `20250928_143005`.
pub fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "capture".into())
}
