mod food;
mod goals;
mod snapshot;
mod workout;

pub use food::{FoodEntry, NewFood};
pub use goals::{Goals, GoalsUpdate, DEFAULT_KCAL_PER_DAY, DEFAULT_WATER_ML_PER_DAY};
pub use snapshot::Snapshot;
pub use workout::{NewWorkout, WorkoutEntry};
