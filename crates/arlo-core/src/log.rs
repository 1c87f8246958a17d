//! The log-workout operation: normalize, validate, persist, confirm.

use serde_json::Value;

use crate::dates::normalize_date_input;
use crate::error::ArloResult;
use crate::store::WorkoutStore;
use crate::validate::validate_workout;

/// Run one logging request end to end and return the confirmation line.
///
/// The `workout_date` field is normalized in place before validation so
/// relative keywords resolve against the current date. Persistence is one
/// workout insert followed by one `add_sets` call per exercise; a storage
/// fault partway through leaves the already-committed part in place and
/// propagates the error.
pub fn log_workout(store: &dyn WorkoutStore, payload: &Value) -> ArloResult<String> {
    let mut payload = payload.clone();
    if let Some(date) = payload.get("workout_date").and_then(Value::as_str) {
        let normalized = normalize_date_input(date);
        payload["workout_date"] = Value::String(normalized);
    }

    let log = validate_workout(&payload)?;

    let workout_id = store.create_workout(&log.workout_date, log.notes.as_deref())?;

    let mut exercise_count = 0usize;
    let mut set_count = 0usize;
    for entry in &log.entries {
        set_count += store.add_sets(workout_id, &entry.exercise_name, &entry.sets)?;
        exercise_count += 1;
    }

    Ok(format!(
        "Logged workout #{workout_id} on {} with {exercise_count} exercises and {set_count} sets.",
        log.workout_date
    ))
}
