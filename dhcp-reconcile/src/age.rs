/// Literal emitted when no heartbeat age is available.
pub const NOT_APPLICABLE: &str = "N/A";

/// Render an elapsed number of seconds as a human-readable age.
///
/// The value is decomposed into days, hours, minutes, and seconds; only
/// non-zero components are emitted, each pluralized, joined by comma-space
/// and suffixed with "ago". `None` renders as [`NOT_APPLICABLE`], and an age
/// of zero renders as "0 seconds ago".
///
/// Ages are unsigned; the source system also rounds the seconds remainder
/// up, which is the identity once the input is an integer.
pub fn format_age(age: Option<u64>) -> String {
    let Some(age) = age else {
        return NOT_APPLICABLE.to_string();
    };

    let components = [
        (age / 86_400, "day"),
        ((age % 86_400) / 3_600, "hour"),
        ((age % 3_600) / 60, "minute"),
        (age % 60, "second"),
    ];

    let mut parts = Vec::new();
    for (value, unit) in components {
        if value == 0 {
            continue;
        }
        if value == 1 {
            parts.push(format!("1 {unit}"));
        } else {
            parts.push(format!("{value} {unit}s"));
        }
    }

    if parts.is_empty() {
        return "0 seconds ago".to_string();
    }
    format!("{} ago", parts.join(", "))
}
