//! Simulation clock.

use chrono::Duration;

/// Converts a time column value, in seconds, into a duration.
///
/// Time is kept to the millisecond. Returns `None` if the value does not fit in a duration.
///
/// # Examples
///
/// ```
/// # use vanet::timing::sim_time;
/// let time = sim_time(21631.5).unwrap();
/// assert_eq!(21_631_500, time.num_milliseconds());
/// ```
pub fn sim_time(seconds: f64) -> Option<Duration> {
    let milliseconds = (seconds * 1_000.).round();
    if !milliseconds.is_finite() || milliseconds.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(milliseconds as i64)
}

/// Formats a simulation time as `HH:MM:SS`.
///
/// Hours are not wrapped at midnight, and sub-second precision is truncated.
pub fn clock(time: Duration) -> String {
    let (sign, time) = if time < Duration::zero() {
        ("-", -time)
    } else {
        ("", time)
    };
    format!("{}{:02}:{:02}:{:02}",
            sign,
            time.num_hours(),
            time.num_minutes() % 60,
            time.num_seconds() % 60)
}

/// Returns a duration as fractional seconds.
pub fn seconds(time: Duration) -> f64 {
    time.num_milliseconds() as f64 / 1_000.
}
