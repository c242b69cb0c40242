//! sportlog Core Library
//!
//! Activity ledger for hydration, nutrition and exercise: the snapshot
//! model, its persistence, one-time import of legacy water data, and the
//! derived daily and weekly views.

pub mod error;
pub mod ledger;
pub mod migration;
pub mod models;
pub mod projection;
pub mod storage;

pub use error::{LedgerError, LedgerResult, ValidationError};
pub use ledger::{LedgerStore, Outcome, SnapshotOrigin, StoreState};
pub use migration::{LegacyMigrator, LegacyShape, MigrationOutcome, LEGACY_KEYS};
pub use models::{FoodEntry, Goals, GoalsUpdate, NewFood, NewWorkout, Snapshot, WorkoutEntry};
pub use projection::{CalorieBalance, DaySummary, MacroTotals, WeeklyAverages};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SnapshotStore, StorageError, CANONICAL_KEY};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
