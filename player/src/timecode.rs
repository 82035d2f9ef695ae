/// Formats a time in seconds as `minutes:seconds`, seconds zero-padded to two
/// digits, minutes unpadded. Fractional seconds are truncated, not rounded.
/// Negative or non-finite input renders as `0:00`.
pub fn to_timecode(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
