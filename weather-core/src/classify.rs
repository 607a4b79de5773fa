//! Weather-code classification.
//!
//! Codes follow the WMO table used by Open-Meteo. Anything outside the known
//! ranges is treated as clear sky.

use crate::model::{Classification, Condition};

/// Inclusive code ranges, checked in order.
const TABLE: &[(i32, i32, Condition)] = &[
    (0, 3, Condition::Clear),
    (45, 48, Condition::Foggy),
    (51, 67, Condition::Rainy),
    (71, 77, Condition::Snowy),
    (80, 99, Condition::Stormy),
];

pub fn classify(code: i32) -> Classification {
    let condition = TABLE
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
        .map(|(_, _, condition)| *condition)
        .unwrap_or(Condition::Clear);

    Classification { code, condition }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(code: i32) -> Condition {
        classify(code).condition
    }

    #[test]
    fn range_boundaries() {
        let cases = [
            (3, Condition::Clear),
            (4, Condition::Clear),
            (44, Condition::Clear),
            (45, Condition::Foggy),
            (48, Condition::Foggy),
            (49, Condition::Clear),
            (50, Condition::Clear),
            (51, Condition::Rainy),
            (67, Condition::Rainy),
            (68, Condition::Clear),
            (70, Condition::Clear),
            (71, Condition::Snowy),
            (77, Condition::Snowy),
            (78, Condition::Clear),
            (79, Condition::Clear),
            (80, Condition::Stormy),
            (99, Condition::Stormy),
            (100, Condition::Clear),
        ];

        for (code, expected) in cases {
            assert_eq!(cond(code), expected, "code {code}");
        }
    }

    #[test]
    fn unknown_codes_default_to_clear() {
        assert_eq!(cond(-1), Condition::Clear);
        assert_eq!(cond(i32::MIN), Condition::Clear);
        assert_eq!(cond(i32::MAX), Condition::Clear);
    }

    #[test]
    fn classification_carries_code_icon_and_theme() {
        let c = classify(95);
        assert_eq!(c.code, 95);
        assert_eq!(c.icon(), "⛈️");
        assert_eq!(c.theme(), "stormy");

        let c = classify(0);
        assert_eq!(c.icon(), "☀️");
        assert_eq!(c.theme(), "sunny");
    }
}
