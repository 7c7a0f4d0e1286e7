//! Centralized display formatting utilities.
//!
//! Every countdown label shown next to a race goes through this module so the
//! list and any other surface render remaining time the same way.

pub const SECONDS_IN_MINUTE: i64 = 60;
pub const SECONDS_IN_HOUR: i64 = SECONDS_IN_MINUTE * 60;
pub const SECONDS_IN_DAY: i64 = SECONDS_IN_HOUR * 24;

/// Format the seconds left before a race jumps as a short label.
///
/// - Values >= 1 day: days, rounded up (`25h` shows as `2 d`)
/// - Values >= 1 hour: whole hours, rounded down
/// - Values in `61..=120`: always `2 m` so the label does not flicker
///   around the one minute mark
/// - Values >= 60: whole minutes, rounded down
/// - Anything else, including elapsed (negative) values: raw seconds
///
/// # Examples
/// ```
/// use nexttogo_types::formatting::format_time_remaining;
/// assert_eq!(format_time_remaining(90_000), "2 d");
/// assert_eq!(format_time_remaining(7_200), "2 h");
/// assert_eq!(format_time_remaining(61), "2 m");
/// assert_eq!(format_time_remaining(60), "1 m");
/// assert_eq!(format_time_remaining(-5), "-5 s");
/// ```
pub fn format_time_remaining(secs: i64) -> String {
    if secs >= SECONDS_IN_DAY {
        format!("{} d", ceil_div(secs, SECONDS_IN_DAY))
    } else if secs >= SECONDS_IN_HOUR {
        format!("{} h", secs / SECONDS_IN_HOUR)
    } else if (SECONDS_IN_MINUTE + 1..=SECONDS_IN_MINUTE * 2).contains(&secs) {
        "2 m".to_string()
    } else if secs >= SECONDS_IN_MINUTE {
        format!("{} m", secs / SECONDS_IN_MINUTE)
    } else {
        format!("{} s", secs)
    }
}

/// Ceiling division for non-negative values, safe up to `i64::MAX`.
#[inline]
fn ceil_div(n: i64, d: i64) -> i64 {
    n / d + i64::from(n % d != 0)
}

/// Format the headline shown for a race, e.g. `R7 Beverly Hills`.
///
/// # Examples
/// ```
/// use nexttogo_types::formatting::format_race_title;
/// assert_eq!(format_race_title(7, "Beverly Hills"), "R7 Beverly Hills");
/// ```
pub fn format_race_title(race_number: i32, meeting_name: &str) -> String {
    format!("R{} {}", race_number, meeting_name)
}
