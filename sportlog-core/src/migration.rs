//! One-time import of hydration history left behind by older dashboard
//! versions.
//!
//! Each old version wrote its own shape under its own key. The migrator
//! walks [`LEGACY_KEYS`] in order and stops at the first value that one of
//! the [`LegacyShape`] recognizers accepts. Legacy keys are never written.
//! Only water totals are imported; foods, workouts and goals have no
//! predecessor.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::models::Snapshot;
use crate::storage::KeyValueStore;

/// Keys used by older dashboard versions, in the order they are tried.
pub const LEGACY_KEYS: [&str; 4] = [
    "waterTrackerState",
    "VITE_WATER_TRACKER",
    "ayubi_water",
    "waterData",
];

/// `Date.prototype.toDateString()` output, e.g. `Mon Mar 04 2024`.
const LAST_RESET_FORMAT: &str = "%a %b %d %Y";

/// Legacy value layouts, in recognition priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyShape {
    /// `{ "current": 1800, "goal": 3000 }`: a single running total.
    ScalarGoal,
    /// `{ "water": { "2024-03-04": 750, ... } }`
    DateMap,
    /// `[ { "date": "2024-03-04", "ml": 750 }, ... ]`
    RecordArray,
}

impl LegacyShape {
    pub const PRIORITY: [LegacyShape; 3] = [
        LegacyShape::ScalarGoal,
        LegacyShape::DateMap,
        LegacyShape::RecordArray,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LegacyShape::ScalarGoal => "scalar-goal",
            LegacyShape::DateMap => "date-map",
            LegacyShape::RecordArray => "record-array",
        }
    }

    /// Normalizes `value` into daily totals if it has this shape.
    ///
    /// A value that matches structurally but carries no usable total is
    /// not recognized.
    pub fn normalize(&self, value: &Value, today: NaiveDate) -> Option<BTreeMap<NaiveDate, u32>> {
        let water = match self {
            LegacyShape::ScalarGoal => scalar_goal(value.as_object()?, today)?,
            LegacyShape::DateMap => date_map(value.as_object()?.get("water")?.as_object()?),
            LegacyShape::RecordArray => record_array(value.as_array()?),
        };

        if water.is_empty() {
            None
        } else {
            Some(water)
        }
    }
}

/// Tries every shape in priority order; first match wins.
pub fn recognize(value: &Value, today: NaiveDate) -> Option<(LegacyShape, BTreeMap<NaiveDate, u32>)> {
    LegacyShape::PRIORITY
        .iter()
        .find_map(|shape| shape.normalize(value, today).map(|water| (*shape, water)))
}

/// What a successful migration found and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub source_key: String,
    pub shape: LegacyShape,
    pub water: BTreeMap<NaiveDate, u32>,
}

impl MigrationOutcome {
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::with_water(self.water)
    }
}

/// Scans legacy keys for importable water history.
#[derive(Debug, Clone)]
pub struct LegacyMigrator {
    keys: Vec<String>,
    today: NaiveDate,
}

impl LegacyMigrator {
    /// `today` is the day a bare running total is attributed to.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            keys: LEGACY_KEYS.iter().map(|key| key.to_string()).collect(),
            today,
        }
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the first recognizable legacy value, or `None`.
    ///
    /// Unreadable or unparsable candidates are logged and skipped.
    pub fn resolve<K: KeyValueStore>(&self, backend: &K) -> Option<MigrationOutcome> {
        for key in &self.keys {
            let raw = match backend.get(key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to read legacy key");
                    continue;
                }
            };

            let value: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key = %key, error = %e, "legacy value is not valid JSON");
                    continue;
                }
            };

            match recognize(&value, self.today) {
                Some((shape, water)) => {
                    info!(
                        key = %key,
                        shape = shape.name(),
                        days = water.len(),
                        "migrating legacy water data"
                    );
                    return Some(MigrationOutcome {
                        source_key: key.clone(),
                        shape,
                        water,
                    });
                }
                None => debug!(key = %key, "legacy value has no recognized shape"),
            }
        }

        None
    }
}

fn scalar_goal(object: &Map<String, Value>, today: NaiveDate) -> Option<BTreeMap<NaiveDate, u32>> {
    let current = object
        .get("current")
        .and_then(millilitres)
        .filter(|ml| *ml > 0)?;
    object
        .get("goal")
        .and_then(Value::as_f64)
        .filter(|goal| *goal > 0.0)?;

    let date = object
        .get("lastReset")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, LAST_RESET_FORMAT).ok())
        .unwrap_or(today);

    Some(BTreeMap::from([(date, current)]))
}

fn date_map(water: &Map<String, Value>) -> BTreeMap<NaiveDate, u32> {
    let mut totals = BTreeMap::new();
    for (key, value) in water {
        match (parse_date(key), millilitres(value)) {
            (Some(date), Some(ml)) => {
                totals.insert(date, ml);
            }
            _ => debug!(date = %key, "skipping unusable legacy water total"),
        }
    }
    totals
}

fn record_array(records: &[Value]) -> BTreeMap<NaiveDate, u32> {
    let mut totals = BTreeMap::new();
    for record in records {
        let date = record.get("date").and_then(Value::as_str).and_then(parse_date);
        let ml = record
            .get("ml")
            .and_then(millilitres)
            .filter(|ml| *ml > 0);

        match (date, ml) {
            // Later records for the same day replace earlier ones.
            (Some(date), Some(ml)) => {
                totals.insert(date, ml);
            }
            _ => debug!(record = %record, "skipping unusable legacy water record"),
        }
    }
    totals
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Non-negative number of millilitres, rounded to the nearest integer.
fn millilitres(value: &Value) -> Option<u32> {
    let ml = value.as_f64()?;
    if !ml.is_finite() || ml < 0.0 || ml > f64::from(u32::MAX) {
        return None;
    }
    Some(ml.round() as u32)
}
