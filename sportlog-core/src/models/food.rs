use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// A logged food item. A date may carry any number of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodEntry {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub kcal: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}

impl fmt::Display for FoodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} kcal", self.name, self.kcal)?;

        let macros: Vec<String> = [
            self.protein.map(|g| format!("P {:.0}g", g)),
            self.carbs.map(|g| format!("C {:.0}g", g)),
            self.fat.map(|g| format!("F {:.0}g", g)),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !macros.is_empty() {
            write!(f, " ({})", macros.join(" | "))?;
        }
        Ok(())
    }
}

/// Input for a new food entry; the ledger assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub date: NaiveDate,
    pub name: String,
    pub kcal: u32,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl NewFood {
    pub fn new(date: NaiveDate, name: impl Into<String>, kcal: u32) -> Self {
        Self {
            date,
            name: name.into(),
            kcal,
            protein: None,
            carbs: None,
            fat: None,
        }
    }

    pub fn with_protein(mut self, grams: f64) -> Self {
        self.protein = Some(grams);
        self
    }

    pub fn with_carbs(mut self, grams: f64) -> Self {
        self.carbs = Some(grams);
        self
    }

    pub fn with_fat(mut self, grams: f64) -> Self {
        self.fat = Some(grams);
        self
    }

    /// Checks the entry the way the food form does: a name is required and
    /// macros, when given, are non-negative grams.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { kind: "food" });
        }
        for (field, value) in [
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            if let Some(grams) = value {
                if !grams.is_finite() || grams < 0.0 {
                    return Err(ValidationError::InvalidMacro {
                        field,
                        value: grams,
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn into_entry(self, id: String) -> FoodEntry {
        FoodEntry {
            id,
            date: self.date,
            name: self.name.trim().to_string(),
            kcal: self.kcal,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}
