use chrono::NaiveTime;

/// True when `now` falls between sunrise and sunset, both ends included.
/// All three are local wall-clock times of the same day.
pub fn is_daytime(now: NaiveTime, sunrise: NaiveTime, sunset: NaiveTime) -> bool {
    sunrise <= now && now <= sunset
}
