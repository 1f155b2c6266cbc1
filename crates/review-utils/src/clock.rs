//! Exchange clock helpers
//!
//! Report dates, data timestamps and log file names all follow the Shanghai
//! exchange calendar (UTC+8), regardless of the host time zone.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

const BEIJING_OFFSET_SECS: i32 = 8 * 3600;

/// The UTC+8 offset used for all report timestamps
pub fn beijing_offset() -> FixedOffset {
    FixedOffset::east_opt(BEIJING_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current time in Beijing
pub fn beijing_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&beijing_offset())
}

/// Current calendar date in Beijing
pub fn beijing_today() -> NaiveDate {
    beijing_now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_eight_hours() {
        assert_eq!(beijing_offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_now_carries_offset() {
        assert_eq!(beijing_now().offset().local_minus_utc(), 8 * 3600);
    }
}
