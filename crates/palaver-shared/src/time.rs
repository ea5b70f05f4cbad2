//! Timestamp display helpers.
//!
//! Every function takes `now` explicitly so output is deterministic.

use chrono::{DateTime, FixedOffset, Utc};

use crate::models::{Presence, User};

/// Compact relative age: `"3d ago"`, `"2h ago"`, `"5m ago"` or `"now"`.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        "now".to_string()
    }
}

/// Long-form last-seen text, e.g. `"last seen 2 hours ago"`.
pub fn format_last_seen(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("last seen {days} {} ago", plural(days, "day"))
    } else if hours > 0 {
        format!("last seen {hours} {} ago", plural(hours, "hour"))
    } else if minutes > 0 {
        format!("last seen {minutes} {} ago", plural(minutes, "minute"))
    } else {
        "last seen recently".to_string()
    }
}

/// Wall-clock `HH:MM` in the given offset.
pub fn format_clock(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%H:%M").to_string()
}

/// Status line shown under a user's name.
pub fn presence_label(user: &User, now: DateTime<Utc>) -> String {
    match user.presence() {
        Presence::Online => "Online".to_string(),
        Presence::LastSeen(ts) => format_last_seen(ts, now),
        Presence::Offline => "Offline".to_string(),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{unit}s")
    } else {
        unit.to_string()
    }
}
