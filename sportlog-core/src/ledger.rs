//! The ledger store: sole owner and mutator of the [`Snapshot`].
//!
//! # Lifecycle
//!
//! 1. **Loading** - created with a placeholder default snapshot. Mutations
//!    are validated, then queued.
//! 2. **Ready** - [`LedgerStore::initialize`] loaded the canonical snapshot
//!    (or migrated legacy data, or fell back to the default) and replayed
//!    the queue in call order.
//!
//! The placeholder is never written, so an early mutation can't clobber
//! the data that is about to be loaded.
//!
//! # Writes
//!
//! Every mutation is applied to a copy of the snapshot. The copy is saved
//! in full and only then replaces the in-memory snapshot; a failed save
//! leaves memory as it was.

use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::migration::{LegacyMigrator, LegacyShape};
use crate::models::{FoodEntry, Goals, GoalsUpdate, NewFood, NewWorkout, Snapshot, WorkoutEntry};
use crate::projection;
use crate::storage::{KeyValueStore, SnapshotStore};

/// Store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Persisted data has not been loaded yet
    Loading,
    /// Snapshot is authoritative and mutations are written through
    Ready,
}

/// Where the current snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Nothing persisted and nothing to migrate
    Default,
    /// Loaded from the canonical key
    Persisted,
    /// Imported from a legacy key
    Migrated {
        source_key: String,
        shape: LegacyShape,
    },
}

/// Result of a mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Snapshot changed and was saved
    Applied,
    /// Nothing to change; nothing was saved
    Unchanged,
    /// Store is still loading; applied once it is ready
    Queued,
}

#[derive(Debug, Clone)]
enum Mutation {
    AddWater { date: NaiveDate, ml: u32 },
    SetWater { date: NaiveDate, ml: u32 },
    AddFood(FoodEntry),
    DeleteFood(String),
    AddWorkout(WorkoutEntry),
    DeleteWorkout(String),
    UpdateGoals(GoalsUpdate),
}

impl Mutation {
    /// Applies this mutation; returns `false` if the snapshot is unchanged.
    fn apply(&self, snapshot: &mut Snapshot) -> bool {
        match self {
            Mutation::AddWater { date, ml } => {
                let total = snapshot.water.entry(*date).or_insert(0);
                let before = *total;
                *total = total.saturating_add(*ml);
                *total != before
            }
            Mutation::SetWater { date, ml } => snapshot.water.insert(*date, *ml) != Some(*ml),
            Mutation::AddFood(entry) => {
                snapshot.nutrition.push(entry.clone());
                true
            }
            Mutation::DeleteFood(id) => remove_by_id(&mut snapshot.nutrition, id, |f| &f.id),
            Mutation::AddWorkout(entry) => {
                snapshot.exercise.push(entry.clone());
                true
            }
            Mutation::DeleteWorkout(id) => remove_by_id(&mut snapshot.exercise, id, |w| &w.id),
            Mutation::UpdateGoals(update) => match snapshot.goals.merged(update) {
                Ok(goals) if goals != snapshot.goals => {
                    snapshot.goals = goals;
                    true
                }
                // Validated before it was accepted; nothing else can fail here.
                _ => false,
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Mutation::AddWater { .. } => "add_water",
            Mutation::SetWater { .. } => "set_water",
            Mutation::AddFood(_) => "add_food",
            Mutation::DeleteFood(_) => "delete_food",
            Mutation::AddWorkout(_) => "add_workout",
            Mutation::DeleteWorkout(_) => "delete_workout",
            Mutation::UpdateGoals(_) => "update_goals",
        }
    }
}

/// Removes the single entry whose id matches.
fn remove_by_id<T>(entries: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &String) -> bool {
    match entries.iter().position(|entry| key(entry) == id) {
        Some(index) => {
            entries.remove(index);
            true
        }
        None => false,
    }
}

/// Activity ledger holding water totals, foods, workouts and goals.
///
/// Construct one per process and hand out references; it is the only
/// writer of the persisted snapshot.
#[derive(Debug)]
pub struct LedgerStore<K> {
    storage: SnapshotStore<K>,
    snapshot: Snapshot,
    state: StoreState,
    origin: SnapshotOrigin,
    pending: Vec<Mutation>,
    /// Ids deleted since this store was opened.
    retired: HashSet<String>,
}

impl<K: KeyValueStore> LedgerStore<K> {
    /// Creates a store in the `Loading` state. Call [`initialize`] before
    /// relying on reads.
    ///
    /// [`initialize`]: LedgerStore::initialize
    pub fn new(backend: K) -> Self {
        Self {
            storage: SnapshotStore::new(backend),
            snapshot: Snapshot::default(),
            state: StoreState::Loading,
            origin: SnapshotOrigin::Default,
            pending: Vec::new(),
            retired: HashSet::new(),
        }
    }

    /// Creates and initializes a store in one step.
    pub fn open(backend: K) -> LedgerResult<Self> {
        let mut store = Self::new(backend);
        store.initialize()?;
        Ok(store)
    }

    /// Loads the snapshot, using the local calendar day as "today" for
    /// legacy migration.
    pub fn initialize(&mut self) -> LedgerResult<()> {
        self.initialize_on(Local::now().date_naive())
    }

    /// Loads the canonical snapshot, else migrates legacy data, else uses
    /// the default, then replays queued mutations.
    ///
    /// Does nothing on a `Ready` store. If the canonical key can't be read
    /// the store stays `Loading` and nothing is written.
    pub fn initialize_on(&mut self, today: NaiveDate) -> LedgerResult<()> {
        if self.state == StoreState::Ready {
            return Ok(());
        }

        let (snapshot, origin) = match self.storage.load()? {
            Some(snapshot) => (snapshot, SnapshotOrigin::Persisted),
            None => match LegacyMigrator::new(today).resolve(self.storage.backend()) {
                Some(outcome) => {
                    let origin = SnapshotOrigin::Migrated {
                        source_key: outcome.source_key.clone(),
                        shape: outcome.shape,
                    };
                    let snapshot = outcome.into_snapshot();
                    self.storage.save(&snapshot)?;
                    (snapshot, origin)
                }
                None => (Snapshot::default(), SnapshotOrigin::Default),
            },
        };

        info!(origin = ?origin, queued = self.pending.len(), "ledger ready");
        self.snapshot = snapshot;
        self.origin = origin;
        self.state = StoreState::Ready;

        let mut first_error = None;
        for mutation in std::mem::take(&mut self.pending) {
            if let Err(e) = self.commit(mutation) {
                error!(error = %e, "failed to apply queued mutation");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == StoreState::Ready
    }

    pub fn origin(&self) -> &SnapshotOrigin {
        &self.origin
    }

    /// Number of mutations waiting for [`LedgerStore::initialize`].
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn goals(&self) -> &Goals {
        &self.snapshot.goals
    }

    pub fn backend(&self) -> &K {
        self.storage.backend()
    }

    // ==================== Water ====================

    /// Adds `ml` to the day's total. Zero is rejected.
    pub fn add_water(&mut self, date: NaiveDate, ml: u32) -> LedgerResult<Outcome> {
        if ml == 0 {
            return Err(ValidationError::NonPositiveWater.into());
        }
        self.commit(Mutation::AddWater { date, ml })
    }

    /// Overwrites the day's total. Negative totals are rejected.
    pub fn set_water(&mut self, date: NaiveDate, ml: i64) -> LedgerResult<Outcome> {
        if ml < 0 {
            return Err(ValidationError::NegativeWater(ml).into());
        }
        let ml = u32::try_from(ml).map_err(|_| ValidationError::WaterTooLarge(ml))?;
        self.commit(Mutation::SetWater { date, ml })
    }

    pub fn get_water(&self, date: NaiveDate) -> u32 {
        projection::water(&self.snapshot, date)
    }

    pub fn progress_water(&self, date: NaiveDate) -> f64 {
        projection::water_progress(&self.snapshot, date)
    }

    // ==================== Food ====================

    /// Validates and appends a food entry; returns its new id.
    pub fn add_food(&mut self, food: NewFood) -> LedgerResult<String> {
        food.validate()?;
        let id = self.fresh_id(|snapshot, id| snapshot.has_food_id(id));
        self.commit(Mutation::AddFood(food.into_entry(id.clone())))?;
        Ok(id)
    }

    /// Removes the food entry with `id`; `Unchanged` if there is none.
    pub fn delete_food(&mut self, id: &str) -> LedgerResult<Outcome> {
        self.commit(Mutation::DeleteFood(id.to_string()))
    }

    pub fn foods_for_date(&self, date: NaiveDate) -> Vec<&FoodEntry> {
        projection::foods_for_date(&self.snapshot, date)
    }

    // ==================== Workouts ====================

    /// Validates and appends a workout entry; returns its new id.
    pub fn add_workout(&mut self, workout: NewWorkout) -> LedgerResult<String> {
        workout.validate()?;
        let id = self.fresh_id(|snapshot, id| snapshot.has_workout_id(id));
        self.commit(Mutation::AddWorkout(workout.into_entry(id.clone())))?;
        Ok(id)
    }

    /// Removes the workout entry with `id`; `Unchanged` if there is none.
    pub fn delete_workout(&mut self, id: &str) -> LedgerResult<Outcome> {
        self.commit(Mutation::DeleteWorkout(id.to_string()))
    }

    pub fn workouts_for_date(&self, date: NaiveDate) -> Vec<&WorkoutEntry> {
        projection::workouts_for_date(&self.snapshot, date)
    }

    // ==================== Calories ====================

    pub fn total_kcal(&self, date: NaiveDate) -> i64 {
        projection::total_kcal(&self.snapshot, date)
    }

    pub fn total_burned(&self, date: NaiveDate) -> i64 {
        projection::total_burned(&self.snapshot, date)
    }

    pub fn net_kcal(&self, date: NaiveDate) -> i64 {
        projection::net_kcal(&self.snapshot, date)
    }

    // ==================== Goals ====================

    /// Merges the fields present in `update` into the goals.
    pub fn update_goals(&mut self, update: GoalsUpdate) -> LedgerResult<Outcome> {
        update.validate()?;
        self.commit(Mutation::UpdateGoals(update))
    }

    // ==================== Internals ====================

    fn commit(&mut self, mutation: Mutation) -> Result<Outcome, LedgerError> {
        if self.state == StoreState::Loading {
            debug!(mutation = mutation.name(), "store loading, queueing mutation");
            self.pending.push(mutation);
            return Ok(Outcome::Queued);
        }

        let mut next = self.snapshot.clone();
        if !mutation.apply(&mut next) {
            debug!(mutation = mutation.name(), "mutation changed nothing");
            return Ok(Outcome::Unchanged);
        }

        self.storage.save(&next)?;
        self.snapshot = next;
        debug!(mutation = mutation.name(), "mutation applied");
        if let Mutation::DeleteFood(id) | Mutation::DeleteWorkout(id) = mutation {
            self.retired.insert(id);
        }
        Ok(Outcome::Applied)
    }

    /// Generates an id not used by any current, queued or deleted entry.
    fn fresh_id(&self, taken: impl Fn(&Snapshot, &str) -> bool) -> String {
        self.fresh_id_from(|| Uuid::new_v4().to_string(), taken)
    }

    fn fresh_id_from(
        &self,
        mut generate: impl FnMut() -> String,
        taken: impl Fn(&Snapshot, &str) -> bool,
    ) -> String {
        loop {
            let id = generate();
            let queued = self.pending.iter().any(|mutation| match mutation {
                Mutation::AddFood(entry) => entry.id == id,
                Mutation::AddWorkout(entry) => entry.id == id,
                _ => false,
            });
            if !queued && !self.retired.contains(&id) && !taken(&self.snapshot, &id) {
                return id;
            }
        }
    }
}
