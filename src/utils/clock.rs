//! Wall-clock source in the feed's local time.
//!
//! The P2P-quake feed reports event times as JST local time with no offset,
//! so gate comparisons happen in naive JST throughout.

use chrono::{FixedOffset, NaiveDateTime, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Returns the JST (+09:00) offset.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("JST offset is in range")
}

/// Returns the current wall-clock time as naive JST.
pub fn jst_now() -> NaiveDateTime {
    Utc::now().with_timezone(&jst()).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jst_is_nine_hours_ahead_of_utc() {
        assert_eq!(jst().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_jst_now_tracks_utc() {
        let utc = Utc::now().naive_utc();
        let local = jst_now();
        let diff = (local - utc).num_seconds();
        // Allow a little slack for the two clock reads.
        assert!((diff - 9 * 3600).abs() < 5, "diff was {diff}");
    }
}
