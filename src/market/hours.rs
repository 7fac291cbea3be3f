//! Regular-session market hours check

use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::America::New_York;

/// True while the regular US equity session is open: Monday through Friday,
/// 09:30 to 16:00 Eastern, both ends inclusive. DST is handled by the
/// America/New_York zone conversion.
pub fn market_is_open(now: DateTime<Utc>) -> bool {
    let eastern = now.with_timezone(&New_York);

    let is_weekday = !matches!(eastern.weekday(), Weekday::Sat | Weekday::Sun);

    let t = eastern.time();
    let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
    let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap();

    is_weekday && t >= open && t <= close
}

/// Seconds-precision label used in routing logs.
pub fn eastern_clock(now: DateTime<Utc>) -> String {
    let eastern = now.with_timezone(&New_York);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} ET",
        eastern.year(),
        eastern.month(),
        eastern.day(),
        eastern.hour(),
        eastern.minute(),
        eastern.second()
    )
}
