//! Personal data and the daily calorie intake derived from it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Persisted under `calculation_personalData`. Unset inputs are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    #[serde(default)]
    pub age: Option<f64>,
    /// Kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Centimeters.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Activity multiplier (1.2 sedentary .. 1.9 very active).
    #[serde(default)]
    pub activity: Option<f64>,
    #[serde(default)]
    pub daily_intake: i64,
}

/// Fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PersonalDataPatch {
    pub age: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub sex: Option<Sex>,
    pub activity: Option<f64>,
}

impl PersonalData {
    pub fn apply(&mut self, patch: PersonalDataPatch) {
        self.age = patch.age.or(self.age);
        self.weight = patch.weight.or(self.weight);
        self.height = patch.height.or(self.height);
        self.sex = patch.sex.or(self.sex);
        self.activity = patch.activity.or(self.activity);
    }

    /// Mifflin-St Jeor resting energy times the activity multiplier,
    /// truncated to whole kcal. `None` while any input is missing.
    pub fn estimate_intake(&self) -> Option<i64> {
        let (age, weight, height) = (self.age?, self.weight?, self.height?);
        let offset = match self.sex? {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        };
        let base = 10.0 * weight + 6.25 * height - 5.0 * age + offset;
        Some((base * self.activity?) as i64)
    }

    /// Store the estimate in `daily_intake` and return it. Leaves the
    /// previous value untouched when inputs are missing.
    pub fn calculate_daily_intake(&mut self) -> i64 {
        if let Some(intake) = self.estimate_intake() {
            self.daily_intake = intake;
        }
        self.daily_intake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sex: Sex) -> PersonalData {
        PersonalData {
            age: Some(30.0),
            weight: Some(70.0),
            height: Some(175.0),
            sex: Some(sex),
            activity: Some(1.55),
            daily_intake: 0,
        }
    }

    #[test]
    fn male_intake() {
        // 700 + 1093.75 - 150 + 5 = 1648.75; * 1.55 = 2555.5625
        assert_eq!(sample(Sex::Male).calculate_daily_intake(), 2555);
    }

    #[test]
    fn female_intake() {
        // 1648.75 - 166 = 1482.75; * 1.55 = 2298.2625
        assert_eq!(sample(Sex::Female).calculate_daily_intake(), 2298);
    }

    #[test]
    fn missing_inputs_keep_previous_value() {
        let mut data = PersonalData {
            daily_intake: 1800,
            ..PersonalData::default()
        };
        assert_eq!(data.calculate_daily_intake(), 1800);
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut data = sample(Sex::Male);
        data.apply(PersonalDataPatch {
            weight: Some(72.5),
            ..PersonalDataPatch::default()
        });
        assert_eq!(data.weight, Some(72.5));
        assert_eq!(data.age, Some(30.0));
    }

    #[test]
    fn unset_fields_serialize_as_null() {
        let json = serde_json::to_value(PersonalData::default()).unwrap();
        assert!(json["sex"].is_null());
        assert_eq!(json["dailyIntake"], 0);
    }
}
