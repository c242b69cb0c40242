use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// A logged workout. A date may carry any number of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    #[serde(rename = "durationMin", alias = "durationMinutes")]
    pub duration_minutes: u32,
    pub kcal_burned: u32,
}

impl fmt::Display for WorkoutEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} min, {} kcal burned",
            self.name, self.duration_minutes, self.kcal_burned
        )
    }
}

/// Input for a new workout entry; the ledger assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkout {
    pub date: NaiveDate,
    pub name: String,
    pub duration_minutes: u32,
    pub kcal_burned: u32,
}

impl NewWorkout {
    pub fn new(
        date: NaiveDate,
        name: impl Into<String>,
        duration_minutes: u32,
        kcal_burned: u32,
    ) -> Self {
        Self {
            date,
            name: name.into(),
            duration_minutes,
            kcal_burned,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { kind: "workout" });
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::NonPositiveDuration);
        }
        Ok(())
    }

    pub(crate) fn into_entry(self, id: String) -> WorkoutEntry {
        WorkoutEntry {
            id,
            date: self.date,
            name: self.name.trim().to_string(),
            duration_minutes: self.duration_minutes,
            kcal_burned: self.kcal_burned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let workout = NewWorkout::new(date(), "Run", 0, 250);
        assert_eq!(
            workout.validate(),
            Err(ValidationError::NonPositiveDuration)
        );
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let workout = NewWorkout::new(date(), "", 30, 250);
        assert_eq!(
            workout.validate(),
            Err(ValidationError::EmptyName { kind: "workout" })
        );
    }

    #[test]
    fn test_workout_display() {
        let entry = NewWorkout::new(date(), "Run", 30, 250).into_entry("w1".to_string());
        assert_eq!(format!("{}", entry), "Run - 30 min, 250 kcal burned");
    }

    #[test]
    fn test_workout_wire_names() {
        let entry = NewWorkout::new(date(), "Yoga", 45, 150).into_entry("w1".to_string());
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"durationMin\":45"));
        assert!(json.contains("\"kcalBurned\":150"));
    }

    #[test]
    fn test_workout_accepts_duration_minutes_alias() {
        let json = r#"{"id":"w2","date":"2024-03-04","name":"Swim","durationMinutes":30,"kcalBurned":350}"#;
        let parsed: WorkoutEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.duration_minutes, 30);
    }
}
