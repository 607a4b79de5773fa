//! Advice text derived from the current reading.
//!
//! Rules are evaluated top to bottom and the first match wins. The last rule
//! always matches.

use crate::model::{Advisory, ColorTag, Condition, CurrentReading};

const HEAVY_RAIN_MM: f64 = 5.0;
const HOT_C: f64 = 28.0;
const WARM_C: f64 = 22.0;
const CHILLY_C: f64 = 10.0;
const WINDY_KMH: f64 = 20.0;

pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&CurrentReading) -> bool,
    pub advisory: Advisory,
}

fn clear(r: &CurrentReading) -> bool {
    r.condition() == Condition::Clear
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "heavy-rain",
        applies: |r| r.condition().is_wet() && r.precipitation_mm > HEAVY_RAIN_MM,
        advisory: Advisory {
            icon: "🌂",
            text: "Heavy rain expected. Take an umbrella and wear waterproof clothing.",
            color: ColorTag::Danger,
        },
    },
    Rule {
        name: "light-rain",
        applies: |r| r.condition().is_wet(),
        advisory: Advisory {
            icon: "☔",
            text: "Light rain expected. Consider carrying an umbrella.",
            color: ColorTag::Info,
        },
    },
    Rule {
        name: "snow",
        applies: |r| r.condition() == Condition::Snowy,
        advisory: Advisory {
            icon: "🧣",
            text: "Snowy conditions. Bundle up and drive carefully.",
            color: ColorTag::Info,
        },
    },
    Rule {
        name: "fog",
        applies: |r| r.condition() == Condition::Foggy,
        advisory: Advisory {
            icon: "🚗",
            text: "Foggy conditions. Use fog lights and drive slowly.",
            color: ColorTag::Warning,
        },
    },
    Rule {
        name: "heat",
        applies: |r| clear(r) && r.temperature_c > HOT_C,
        advisory: Advisory {
            icon: "🥵",
            text: "Very hot today. Stay hydrated and avoid the midday sun.",
            color: ColorTag::Danger,
        },
    },
    Rule {
        name: "warm",
        applies: |r| clear(r) && r.temperature_c > WARM_C && r.temperature_c <= HOT_C,
        advisory: Advisory {
            icon: "😎",
            text: "Pleasantly warm. A great day to be outside.",
            color: ColorTag::Success,
        },
    },
    Rule {
        name: "chilly",
        applies: |r| clear(r) && r.temperature_c >= 0.0 && r.temperature_c < CHILLY_C,
        advisory: Advisory {
            icon: "🧥",
            text: "Chilly weather. Wear warm layers.",
            color: ColorTag::Info,
        },
    },
    Rule {
        name: "freezing",
        applies: |r| clear(r) && r.temperature_c < 0.0,
        advisory: Advisory {
            icon: "🥶",
            text: "Freezing temperatures. Watch out for ice and dress warmly.",
            color: ColorTag::Danger,
        },
    },
    Rule {
        name: "windy",
        applies: |r| r.wind_speed_kmh > WINDY_KMH,
        advisory: Advisory {
            icon: "💨",
            text: "Windy conditions. Secure loose objects outdoors.",
            color: ColorTag::Warning,
        },
    },
    Rule {
        name: "default",
        applies: |_| true,
        advisory: Advisory {
            icon: "🌤️",
            text: "Pleasant weather. Enjoy your day!",
            color: ColorTag::Success,
        },
    },
];

/// The first rule in [`RULES`] that applies to `reading`.
pub fn matching_rule(reading: &CurrentReading) -> &'static Rule {
    // The catch-all rule sits last, so `find` always succeeds.
    RULES
        .iter()
        .find(|rule| (rule.applies)(reading))
        .unwrap_or(&RULES[RULES.len() - 1])
}

pub fn advise(reading: &CurrentReading) -> Advisory {
    matching_rule(reading).advisory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use chrono::NaiveDate;

    fn reading(code: i32, temp: f64, wind: f64, precip: f64) -> CurrentReading {
        CurrentReading {
            observed_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .expect("valid timestamp"),
            temperature_c: temp,
            feels_like_c: temp,
            humidity_pct: 50,
            wind_speed_kmh: wind,
            precipitation_mm: precip,
            cloud_cover_pct: 20,
            classification: classify(code),
        }
    }

    fn rule_for(code: i32, temp: f64, wind: f64, precip: f64) -> &'static str {
        matching_rule(&reading(code, temp, wind, precip)).name
    }

    #[test]
    fn heavy_rain_preempts_wind() {
        let r = reading(95, 15.0, 35.0, 6.0);
        assert_eq!(matching_rule(&r).name, "heavy-rain");
        assert_eq!(advise(&r).color, ColorTag::Danger);
    }

    #[test]
    fn rain_threshold_is_strict() {
        assert_eq!(rule_for(61, 15.0, 0.0, 5.0), "light-rain");
        assert_eq!(rule_for(61, 15.0, 0.0, 5.1), "heavy-rain");
        assert_eq!(rule_for(81, 15.0, 0.0, 0.0), "light-rain");
    }

    #[test]
    fn snow_and_fog_ignore_temperature_and_wind() {
        assert_eq!(rule_for(73, -10.0, 50.0, 0.0), "snow");
        assert_eq!(rule_for(45, 35.0, 50.0, 0.0), "fog");
    }

    #[test]
    fn clear_temperature_bands() {
        assert_eq!(rule_for(0, 28.1, 0.0, 0.0), "heat");
        assert_eq!(rule_for(0, 28.0, 0.0, 0.0), "warm");
        assert_eq!(rule_for(0, 22.1, 0.0, 0.0), "warm");
        assert_eq!(rule_for(0, 22.0, 0.0, 0.0), "default");
        assert_eq!(rule_for(0, 10.0, 0.0, 0.0), "default");
        assert_eq!(rule_for(0, 9.9, 0.0, 0.0), "chilly");
        assert_eq!(rule_for(0, 0.0, 0.0, 0.0), "chilly");
        assert_eq!(rule_for(0, -0.1, 0.0, 0.0), "freezing");
    }

    #[test]
    fn wind_applies_only_when_nothing_earlier_matched() {
        assert_eq!(rule_for(0, 15.0, 20.1, 0.0), "windy");
        assert_eq!(rule_for(0, 15.0, 20.0, 0.0), "default");
        assert_eq!(rule_for(0, 30.0, 40.0, 0.0), "heat");
    }

    #[test]
    fn catch_all_is_last() {
        let last = RULES.last().expect("rules are not empty");
        assert_eq!(last.name, "default");
        assert!((last.applies)(&reading(2, 15.0, 5.0, 0.0)));
    }
}
