use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One validated set within an exercise entry. Produced only by the
/// validation pipeline; `set_number` stays `None` until the store assigns
/// the 1-based position at insert time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetEntry {
    pub set_number: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

impl SetEntry {
    /// At least one metric must survive coercion for a set to be kept.
    pub fn has_metrics(&self) -> bool {
        self.reps.is_some()
            || self.weight.is_some()
            || self.duration_minutes.is_some()
            || self.distance_km.is_some()
    }
}

/// All sets logged under one exercise name within a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub exercise_name: String,
    pub sets: Vec<SetEntry>,
}

/// A fully validated logging request. Exists only between validation and
/// persistence; never partially filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Canonical `YYYY-MM-DD`.
    pub workout_date: String,
    pub notes: Option<String>,
    pub entries: Vec<ExerciseEntry>,
}

/// One persisted workout row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub workout_date: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One persisted set row, as read back alongside its workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedSet {
    pub exercise_name: String,
    pub set_number: i64,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

/// One point in an exercise's history, ordered by workout date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub workout_date: String,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub distance_km: Option<f64>,
}

/// Identifying info returned after deleting the most recent workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedWorkout {
    pub id: i64,
    pub workout_date: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_sets: usize,
}

#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_workouts: usize,
    pub total_sets: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
