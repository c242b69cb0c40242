use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::error::ValidationError;

pub const DEFAULT_WATER_ML_PER_DAY: u32 = 3000;
pub const DEFAULT_KCAL_PER_DAY: u32 = 2200;

/// Daily targets. Both values are always positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    #[serde(default = "default_water", deserialize_with = "lenient_water")]
    pub water_ml_per_day: u32,
    #[serde(default = "default_kcal", deserialize_with = "lenient_kcal")]
    pub kcal_per_day: u32,
}

fn default_water() -> u32 {
    DEFAULT_WATER_ML_PER_DAY
}

fn default_kcal() -> u32 {
    DEFAULT_KCAL_PER_DAY
}

fn lenient_water<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_goal(deserializer, "waterMlPerDay", DEFAULT_WATER_ML_PER_DAY)
}

fn lenient_kcal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_goal(deserializer, "kcalPerDay", DEFAULT_KCAL_PER_DAY)
}

/// Stored goals may be null, negative or non-numeric when the dashboard's
/// form was cleared. Those fall back to the field default instead of
/// rejecting the whole snapshot.
fn lenient_goal<'de, D: Deserializer<'de>>(
    deserializer: D,
    field: &'static str,
    default: u32,
) -> Result<u32, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let goal = raw
        .as_f64()
        .map(f64::round)
        .filter(|value| *value >= 1.0 && *value <= f64::from(u32::MAX))
        .map(|value| value as u32);

    match goal {
        Some(goal) => Ok(goal),
        None => {
            warn!(field, value = %raw, default, "invalid stored goal, using default");
            Ok(default)
        }
    }
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            water_ml_per_day: DEFAULT_WATER_ML_PER_DAY,
            kcal_per_day: DEFAULT_KCAL_PER_DAY,
        }
    }
}

impl Goals {
    /// Returns these goals with every field present in `update` replaced.
    ///
    /// A single out-of-range field rejects the whole update.
    pub fn merged(&self, update: &GoalsUpdate) -> Result<Goals, ValidationError> {
        update.validate()?;

        let mut goals = *self;
        if let Some(ml) = update.water_ml_per_day {
            goals.water_ml_per_day = ml as u32;
        }
        if let Some(kcal) = update.kcal_per_day {
            goals.kcal_per_day = kcal as u32;
        }
        Ok(goals)
    }
}

impl fmt::Display for Goals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Water: {} ml/day", self.water_ml_per_day)?;
        write!(f, "Calories: {} kcal/day", self.kcal_per_day)
    }
}

/// Partial goal change. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalsUpdate {
    pub water_ml_per_day: Option<i64>,
    pub kcal_per_day: Option<i64>,
}

impl GoalsUpdate {
    pub fn with_water_ml_per_day(mut self, ml: i64) -> Self {
        self.water_ml_per_day = Some(ml);
        self
    }

    pub fn with_kcal_per_day(mut self, kcal: i64) -> Self {
        self.kcal_per_day = Some(kcal);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.water_ml_per_day.is_none() && self.kcal_per_day.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("waterMlPerDay", self.water_ml_per_day),
            ("kcalPerDay", self.kcal_per_day),
        ] {
            if let Some(value) = value {
                if value <= 0 || value > i64::from(u32::MAX) {
                    return Err(ValidationError::InvalidGoal { field, value });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_goals() {
        let goals = Goals::default();
        assert_eq!(goals.water_ml_per_day, 3000);
        assert_eq!(goals.kcal_per_day, 2200);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let goals = Goals::default()
            .merged(&GoalsUpdate::default().with_kcal_per_day(1800))
            .unwrap();

        assert_eq!(goals.water_ml_per_day, 3000);
        assert_eq!(goals.kcal_per_day, 1800);
    }

    #[test]
    fn test_merge_rejects_non_positive() {
        let update = GoalsUpdate::default()
            .with_water_ml_per_day(2500)
            .with_kcal_per_day(0);

        assert_eq!(
            Goals::default().merged(&update),
            Err(ValidationError::InvalidGoal {
                field: "kcalPerDay",
                value: 0
            })
        );
    }

    #[test]
    fn test_goals_json_uses_camel_case() {
        let json = serde_json::to_string(&Goals::default()).unwrap();
        assert_eq!(json, r#"{"waterMlPerDay":3000,"kcalPerDay":2200}"#);
    }

    #[test]
    fn test_invalid_stored_goals_fall_back_per_field() {
        let goals: Goals =
            serde_json::from_str(r#"{"waterMlPerDay": 2500, "kcalPerDay": null}"#).unwrap();
        assert_eq!(goals.water_ml_per_day, 2500);
        assert_eq!(goals.kcal_per_day, DEFAULT_KCAL_PER_DAY);

        let goals: Goals =
            serde_json::from_str(r#"{"waterMlPerDay": -5, "kcalPerDay": "abc"}"#).unwrap();
        assert_eq!(goals, Goals::default());

        let goals: Goals =
            serde_json::from_str(r#"{"waterMlPerDay": 1e12, "kcalPerDay": 1999.6}"#).unwrap();
        assert_eq!(goals.water_ml_per_day, DEFAULT_WATER_ML_PER_DAY);
        assert_eq!(goals.kcal_per_day, 2000);
    }

    #[test]
    fn test_missing_goal_fields_use_defaults() {
        let goals: Goals = serde_json::from_str(r#"{"kcalPerDay": 1800}"#).unwrap();
        assert_eq!(goals.water_ml_per_day, DEFAULT_WATER_ML_PER_DAY);
        assert_eq!(goals.kcal_per_day, 1800);
    }
}
