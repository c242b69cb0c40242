use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::food::FoodEntry;
use super::goals::Goals;
use super::workout::WorkoutEntry;

/// The complete ledger state and the only structure that is persisted.
///
/// Field names on the wire follow the format the dashboard has always
/// written (`foods`, `workouts`); `nutrition` and `exercise` are accepted
/// on read. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Snapshot {
    /// Total millilitres per day.
    pub water: BTreeMap<NaiveDate, u32>,
    #[serde(rename = "foods", alias = "nutrition")]
    pub nutrition: Vec<FoodEntry>,
    #[serde(rename = "workouts", alias = "exercise")]
    pub exercise: Vec<WorkoutEntry>,
    pub goals: Goals,
}

impl Snapshot {
    /// A default snapshot carrying the given water totals.
    pub fn with_water(water: BTreeMap<NaiveDate, u32>) -> Self {
        Self {
            water,
            ..Self::default()
        }
    }

    pub fn has_food_id(&self, id: &str) -> bool {
        self.nutrition.iter().any(|food| food.id == id)
    }

    pub fn has_workout_id(&self, id: &str) -> bool {
        self.exercise.iter().any(|workout| workout.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.water.is_empty() && self.nutrition.is_empty() && self.exercise.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewFood, NewWorkout};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_default_snapshot_is_empty() {
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.goals, Goals::default());
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut snapshot = Snapshot::default();
        snapshot.water.insert(date(4), 750);
        snapshot.nutrition.push(
            NewFood::new(date(4), "Eggs", 300)
                .with_protein(20.0)
                .into_entry("f1".to_string()),
        );
        snapshot
            .exercise
            .push(NewWorkout::new(date(4), "Run", 30, 250).into_entry("w1".to_string()));

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_reads_dashboard_format() {
        let json = r#"{
            "water": {"2024-03-04": 1500},
            "foods": [{"id": "17094", "date": "2024-03-04", "name": "Rice", "kcal": 200}],
            "workouts": [],
            "goals": {"waterMlPerDay": 2500, "kcalPerDay": 2000}
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.water.get(&date(4)), Some(&1500));
        assert_eq!(snapshot.nutrition[0].name, "Rice");
        assert_eq!(snapshot.goals.water_ml_per_day, 2500);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"water": {}}"#).unwrap();
        assert!(snapshot.nutrition.is_empty());
        assert_eq!(snapshot.goals, Goals::default());
    }

    #[test]
    fn test_accepts_spec_list_names() {
        let json = r#"{"nutrition": [{"id": "a", "date": "2024-03-05", "name": "Tea", "kcal": 5}]}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.has_food_id("a"));
        assert!(!snapshot.has_workout_id("a"));
    }
}
