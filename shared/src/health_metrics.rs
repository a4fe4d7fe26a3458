//! BMI calculation and classification
//!
//! Every stored measurement goes through [`BmiReading::assess`], so the
//! persisted `bmi` is always rounded exactly once and the category is always
//! derived from that rounded value.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// BMI Categories
// ============================================================================

/// Lower bound of the normal range
pub const NORMAL_BMI_MIN: f64 = 18.5;
/// Lower bound of the overweight range
pub const OVERWEIGHT_BMI_MIN: f64 = 25.0;
/// Lower bound of the obese range
pub const OBESE_BMI_MIN: f64 = 30.0;

/// BMI category classification
///
/// Serialized with the exact labels stored in the `category` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// All categories in ascending BMI order
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    /// Half-open BMI range `[min, max)` for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, NORMAL_BMI_MIN),
            BmiCategory::Normal => (NORMAL_BMI_MIN, OVERWEIGHT_BMI_MIN),
            BmiCategory::Overweight => (OVERWEIGHT_BMI_MIN, OBESE_BMI_MIN),
            BmiCategory::Obese => (OBESE_BMI_MIN, f64::INFINITY),
        }
    }

    /// Label as persisted and returned by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BmiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BmiCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown BMI category: {}", s))
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category (first match wins)
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < NORMAL_BMI_MIN {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_BMI_MIN {
        BmiCategory::Normal
    } else if bmi < OBESE_BMI_MIN {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Round to two decimal places, half away from zero
///
/// Rounds the exact binary value of `value`, so `1.005` (stored as
/// 1.00499999...) becomes `1.0`, the same answer `toFixed(2)` gives.
pub fn round_to_hundredths(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .or_else(|| Decimal::from_f64(value))
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

/// Rounded BMI with its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReading {
    /// BMI rounded to two decimals
    pub bmi: f64,
    /// Category of the rounded BMI
    pub category: BmiCategory,
}

impl BmiReading {
    /// Compute the reading for a weight (kg) and height (cm)
    pub fn assess(weight_kg: f64, height_cm: f64) -> Self {
        let bmi = round_to_hundredths(calculate_bmi(weight_kg, height_cm));
        Self {
            bmi,
            category: classify_bmi(bmi),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ≈ 22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.857).abs() < 0.01);
    }

    #[rstest]
    #[case(10.0, BmiCategory::Underweight)]
    #[case(18.49, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(24.99, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.99, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    #[case(55.0, BmiCategory::Obese)]
    fn test_bmi_category_boundaries(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[test]
    fn test_reading_for_75kg_180cm() {
        let reading = BmiReading::assess(75.0, 180.0);
        assert_eq!(reading.bmi, 23.15);
        assert_eq!(reading.category, BmiCategory::Normal);
    }

    #[test]
    fn test_reading_for_50kg_170cm() {
        let reading = BmiReading::assess(50.0, 170.0);
        assert_eq!(reading.bmi, 17.3);
        assert_eq!(reading.category, BmiCategory::Underweight);
    }

    #[test]
    fn test_category_follows_rounded_value() {
        // 24.996 rounds to 25.0, which must be labelled Overweight
        let height_cm = 200.0;
        let weight_kg = 24.996 * 4.0;
        let reading = BmiReading::assess(weight_kg, height_cm);
        assert_eq!(reading.bmi, 25.0);
        assert_eq!(reading.category, BmiCategory::Overweight);
    }

    #[rstest]
    #[case(23.148148148, 23.15)]
    #[case(17.301038, 17.3)]
    #[case(1.005, 1.0)]
    #[case(2.675, 2.67)]
    #[case(0.125, 0.13)]
    #[case(30.0, 30.0)]
    fn test_round_to_hundredths(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(round_to_hundredths(input), expected);
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in BmiCategory::ALL {
            assert_eq!(category.as_str().parse::<BmiCategory>().unwrap(), category);
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        assert!("Obese (Class I)".parse::<BmiCategory>().is_err());
    }

    #[test]
    fn test_ranges_are_contiguous() {
        for pair in BmiCategory::ALL.windows(2) {
            assert_eq!(pair[0].range().1, pair[1].range().0);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// BMI is positive for positive inputs
        #[test]
        fn prop_bmi_positive(weight in 1.0f64..500.0, height in 50.0f64..250.0) {
            let bmi = calculate_bmi(weight, height);
            prop_assert!(bmi > 0.0);
        }

        /// Stored bmi is the formula rounded to two decimals
        #[test]
        fn prop_reading_matches_formula(weight in 1.0f64..500.0, height in 50.0f64..250.0) {
            let reading = BmiReading::assess(weight, height);
            let raw = weight / ((height / 100.0) * (height / 100.0));
            prop_assert!((reading.bmi - raw).abs() <= 0.005 + 1e-9);
            prop_assert_eq!(reading.bmi, round_to_hundredths(raw));
        }

        /// Category is a pure function of the rounded bmi
        #[test]
        fn prop_category_matches_rounded_bmi(weight in 1.0f64..500.0, height in 50.0f64..250.0) {
            let reading = BmiReading::assess(weight, height);
            prop_assert_eq!(reading.category, classify_bmi(reading.bmi));
            let (min, max) = reading.category.range();
            prop_assert!(reading.bmi >= min && reading.bmi < max);
        }

        /// Heavier at the same height never lands in a lower category
        #[test]
        fn prop_category_monotonic_in_weight(
            weight in 20.0f64..300.0,
            delta in 0.1f64..50.0,
            height in 120.0f64..220.0
        ) {
            let lighter = BmiReading::assess(weight, height);
            let heavier = BmiReading::assess(weight + delta, height);
            prop_assert!(heavier.category >= lighter.category);
        }

        /// Rounding is idempotent
        #[test]
        fn prop_rounding_idempotent(value in 0.0f64..1000.0) {
            let once = round_to_hundredths(value);
            prop_assert_eq!(round_to_hundredths(once), once);
        }
    }
}
