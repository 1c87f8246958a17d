use crate::error::ArloResult;
use crate::workout::{DeletedWorkout, LoggedSet, SeriesPoint, SetEntry, StoreStats, Workout};

/// Persistence contract for workouts and their sets.
///
/// Every method is one atomic storage operation: committed on success,
/// rolled back on any failure. "Last" always means the workout with the
/// highest surrogate key (creation timestamp as tiebreak). Absence of any
/// workout is signalled with `None`, never with an empty structure.
pub trait WorkoutStore {
    /// Insert one workout row and return its assigned id.
    fn create_workout(&self, workout_date: &str, notes: Option<&str>) -> ArloResult<i64>;

    /// Insert one row per set under an already-committed workout.
    /// `set_number` falls back to the 1-based position within the slice.
    /// Returns the number of rows inserted.
    fn add_sets(&self, workout_id: i64, exercise_name: &str, sets: &[SetEntry])
        -> ArloResult<usize>;

    /// Date-ordered history for one exercise, matched case-insensitively.
    fn get_exercise_series(&self, exercise_name: &str, limit: usize)
        -> ArloResult<Vec<SeriesPoint>>;

    /// The most recent workout plus its sets in insertion order.
    fn get_last_workout_with_sets(&self) -> ArloResult<Option<(Workout, Vec<LoggedSet>)>>;

    /// Delete the most recent workout; its sets go with it via cascade.
    fn delete_last_workout_with_sets(&self) -> ArloResult<Option<DeletedWorkout>>;

    fn stats(&self) -> ArloResult<StoreStats>;
}
