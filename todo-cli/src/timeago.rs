use chrono::{DateTime, Utc};

/// Render a timestamp relative to now, e.g. "a minute ago".
pub fn time_ago(t: DateTime<Utc>) -> String {
    time_ago_at(t, Utc::now())
}

// Bucket boundaries and truncating division are part of the CLI's output
// format; do not "fix" the rounding.
fn time_ago_at(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - t;
    let secs = diff.num_seconds();
    if secs < 1 {
        "a few seconds ago".to_string()
    } else if secs < 60 {
        format!("{secs} seconds ago")
    } else if secs < 120 {
        "a minute ago".to_string()
    } else if secs < 3_600 {
        format!("{} minutes ago", diff.num_minutes())
    } else if secs < 7_200 {
        "an hour ago".to_string()
    } else if secs < 86_400 {
        format!("{} hours ago", diff.num_hours())
    } else if secs < 172_800 {
        "yesterday".to_string()
    } else {
        format!("{} days ago", diff.num_days())
    }
}
