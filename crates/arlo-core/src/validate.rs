//! Validation and normalization of model-produced workout payloads.
//!
//! The payload arrives as arbitrary JSON assembled by a language model, so
//! individual malformed items are tolerated and dropped, while systematic
//! emptiness (an exercise with no usable sets, a payload with no usable
//! exercises) is an error. The first violation encountered fails the whole
//! request; a [`WorkoutLog`] is never partially filled.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{ArloError, ArloResult};
use crate::workout::{ExerciseEntry, SetEntry, WorkoutLog};

const MAX_SET_NUMBER: i64 = 1000;
const MAX_REPS: i64 = 100;
const MAX_WEIGHT_KG: f64 = 500.0;
const MAX_DURATION_MIN: f64 = 600.0;
const MAX_DISTANCE_KM: f64 = 200.0;

pub fn validate_workout(payload: &Value) -> ArloResult<WorkoutLog> {
    let data = payload
        .as_object()
        .ok_or_else(|| invalid("Workout must be a JSON object."))?;

    let workout_date = scalar_text(data.get("workout_date"));
    let workout_date = workout_date.trim();
    if workout_date.is_empty() {
        return Err(invalid("Missing workout_date (YYYY-MM-DD)."));
    }
    if !is_calendar_date(workout_date) {
        return Err(invalid("workout_date must be YYYY-MM-DD."));
    }

    let entries_raw = data
        .get("entries")
        .and_then(Value::as_array)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| invalid("entries must be a non-empty list."))?;

    let mut entries: Vec<ExerciseEntry> = Vec::new();
    for ex in entries_raw {
        let Some(ex) = ex.as_object() else {
            // Tolerated noise: a stray string or number among the entries.
            continue;
        };

        let name = scalar_text(ex.get("exercise_name")).trim().to_string();
        if name.is_empty() {
            continue;
        }

        let sets_raw = ex
            .get("sets")
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| invalid(format!("Exercise '{name}' has no sets.")))?;

        let mut sets: Vec<SetEntry> = Vec::new();
        for s in sets_raw {
            let Some(s) = s.as_object() else {
                continue;
            };

            let set = SetEntry {
                set_number: coerce_int(s.get("set_number")),
                reps: coerce_int(s.get("reps")),
                weight: coerce_float(s.get("weight")),
                duration_minutes: coerce_float(s.get("duration_minutes")),
                distance_km: coerce_float(s.get("distance_km")),
                notes: opt_text(s.get("notes")),
            };

            check_range(&name, set.set_number, 1, MAX_SET_NUMBER, "set_number")?;
            check_range(&name, set.reps, 0, MAX_REPS, "reps")?;
            check_range_f(&name, set.weight, MAX_WEIGHT_KG, "weight")?;
            check_range_f(&name, set.duration_minutes, MAX_DURATION_MIN, "duration")?;
            check_range_f(&name, set.distance_km, MAX_DISTANCE_KM, "distance")?;

            if !set.has_metrics() {
                return Err(invalid(format!(
                    "A set in '{name}' is missing metrics (reps/weight/duration/distance)."
                )));
            }

            sets.push(set);
        }

        if sets.is_empty() {
            return Err(invalid(format!("Exercise '{name}' has no valid sets.")));
        }

        entries.push(ExerciseEntry {
            exercise_name: name,
            sets,
        });
    }

    if entries.is_empty() {
        return Err(invalid("No valid exercises found."));
    }

    Ok(WorkoutLog {
        workout_date: workout_date.to_string(),
        notes: opt_text(data.get("notes")),
        entries,
    })
}

fn invalid(msg: impl Into<String>) -> ArloError {
    ArloError::InvalidWorkout(msg.into())
}

/// Strict `YYYY-MM-DD`: zero-padded shape plus a real calendar date.
fn is_calendar_date(s: &str) -> bool {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string() == s,
        Err(_) => false,
    }
}

/// Integer coercion. Booleans are explicitly NOT integers, JSON floats
/// truncate toward zero, strings are trimmed and parsed. Anything that
/// does not coerce becomes `None`, never an error.
fn coerce_int(v: Option<&Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Real-number coercion under the same boolean-exclusion rule.
fn coerce_float(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Scalar stringification for name-like fields: absent, null, and
/// composite values all read as empty.
fn scalar_text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Free-text fields: stringified and trimmed, empty becomes absent.
fn opt_text(v: Option<&Value>) -> Option<String> {
    let s = scalar_text(v);
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn check_range(
    exercise: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
    field: &str,
) -> ArloResult<()> {
    match value {
        Some(v) if v < min || v > max => Err(invalid(format!(
            "Unreasonable {field} value in '{exercise}'."
        ))),
        _ => Ok(()),
    }
}

fn check_range_f(exercise: &str, value: Option<f64>, max: f64, field: &str) -> ArloResult<()> {
    match value {
        Some(v) if !(0.0..=max).contains(&v) => Err(invalid(format!(
            "Unreasonable {field} value in '{exercise}'."
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reason(payload: Value) -> String {
        match validate_workout(&payload) {
            Err(ArloError::InvalidWorkout(msg)) => msg,
            other => panic!("expected InvalidWorkout, got {other:?}"),
        }
    }

    fn minimal(sets: Value) -> Value {
        json!({
            "workout_date": "2024-01-05",
            "entries": [{"exercise_name": "Bench Press", "sets": sets}]
        })
    }

    #[test]
    fn test_rejects_non_object_payload() {
        assert_eq!(reason(json!([1, 2])), "Workout must be a JSON object.");
        assert_eq!(reason(json!("hi")), "Workout must be a JSON object.");
    }

    #[test]
    fn test_missing_or_empty_date() {
        assert_eq!(
            reason(json!({"entries": []})),
            "Missing workout_date (YYYY-MM-DD)."
        );
        assert_eq!(
            reason(json!({"workout_date": "   ", "entries": []})),
            "Missing workout_date (YYYY-MM-DD)."
        );
    }

    #[test]
    fn test_malformed_date() {
        for bad in ["next week", "2024/01/05", "2024-13-01", "2024-02-30", "2024-1-5"] {
            assert_eq!(
                reason(json!({"workout_date": bad, "entries": [{}]})),
                "workout_date must be YYYY-MM-DD.",
                "date {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_entries_required_non_empty_list() {
        let msg = "entries must be a non-empty list.";
        assert_eq!(reason(json!({"workout_date": "2024-01-05"})), msg);
        assert_eq!(
            reason(json!({"workout_date": "2024-01-05", "entries": []})),
            msg
        );
        assert_eq!(
            reason(json!({"workout_date": "2024-01-05", "entries": "squats"})),
            msg
        );
    }

    #[test]
    fn test_valid_minimal_payload() {
        let log = validate_workout(&minimal(json!([{"reps": 8, "weight": 60}]))).unwrap();
        assert_eq!(log.workout_date, "2024-01-05");
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].exercise_name, "Bench Press");
        let set = &log.entries[0].sets[0];
        assert_eq!(set.reps, Some(8));
        assert_eq!(set.weight, Some(60.0));
        assert_eq!(set.set_number, None);
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let log = validate_workout(&json!({
            "workout_date": "2024-01-05",
            "entries": [
                "warmup",
                42,
                {"exercise_name": "Squat", "sets": [{"reps": 5, "weight": 100}]}
            ]
        }))
        .unwrap();
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].exercise_name, "Squat");
    }

    #[test]
    fn test_empty_name_entry_dropped_then_no_valid_exercises() {
        let msg = reason(json!({
            "workout_date": "2024-01-05",
            "entries": [{"exercise_name": "  ", "sets": [{"reps": 5}]}]
        }));
        assert_eq!(msg, "No valid exercises found.");
    }

    #[test]
    fn test_kept_entry_needs_sets() {
        let payload = json!({
            "workout_date": "2024-01-05",
            "entries": [{"exercise_name": "Deadlift"}]
        });
        assert_eq!(reason(payload), "Exercise 'Deadlift' has no sets.");

        let payload = json!({
            "workout_date": "2024-01-05",
            "entries": [{"exercise_name": "Deadlift", "sets": []}]
        });
        assert_eq!(reason(payload), "Exercise 'Deadlift' has no sets.");
    }

    #[test]
    fn test_all_sets_skipped_is_an_error_not_a_drop() {
        // Non-mapping set items are tolerated individually, but an
        // exercise that loses every set is a systematic failure.
        let msg = reason(minimal(json!(["8x60", "8x60"])));
        assert_eq!(msg, "Exercise 'Bench Press' has no valid sets.");
    }

    #[test]
    fn test_set_without_metrics_fails_naming_exercise() {
        let msg = reason(minimal(json!([{"set_number": 1, "notes": "felt heavy"}])));
        assert_eq!(
            msg,
            "A set in 'Bench Press' is missing metrics (reps/weight/duration/distance)."
        );
    }

    #[test]
    fn test_booleans_are_not_numbers() {
        // true must not coerce to 1: with every metric boolean, the set
        // has no metrics at all.
        let msg = reason(minimal(json!([
            {"reps": true, "weight": false, "duration_minutes": true, "distance_km": false}
        ])));
        assert_eq!(
            msg,
            "A set in 'Bench Press' is missing metrics (reps/weight/duration/distance)."
        );
    }

    #[test]
    fn test_string_and_float_coercion() {
        let log = validate_workout(&minimal(json!([
            {"reps": " 8 ", "weight": "72.5", "set_number": 2.9}
        ])))
        .unwrap();
        let set = &log.entries[0].sets[0];
        assert_eq!(set.reps, Some(8));
        assert_eq!(set.weight, Some(72.5));
        // Float set_number truncates toward zero.
        assert_eq!(set.set_number, Some(2));
    }

    #[test]
    fn test_uncoercible_values_become_absent() {
        let log = validate_workout(&minimal(json!([
            {"reps": "eight", "weight": 60, "duration_minutes": [5]}
        ])))
        .unwrap();
        let set = &log.entries[0].sets[0];
        assert_eq!(set.reps, None);
        assert_eq!(set.weight, Some(60.0));
        assert_eq!(set.duration_minutes, None);
    }

    #[test]
    fn test_bounds_one_unit_out() {
        let cases = [
            (json!([{"reps": 101}]), "reps"),
            (json!([{"reps": -1}]), "reps"),
            (json!([{"weight": 500.01}]), "weight"),
            (json!([{"weight": -0.5}]), "weight"),
            (json!([{"duration_minutes": 600.5}]), "duration"),
            (json!([{"distance_km": 200.1}]), "distance"),
            (json!([{"reps": 5, "set_number": 0}]), "set_number"),
            (json!([{"reps": 5, "set_number": 1001}]), "set_number"),
        ];
        for (sets, field) in cases {
            assert_eq!(
                reason(minimal(sets)),
                format!("Unreasonable {field} value in 'Bench Press'."),
            );
        }
    }

    #[test]
    fn test_bounds_inclusive_edges_pass() {
        let log = validate_workout(&minimal(json!([
            {"set_number": 1000, "reps": 100, "weight": 500,
             "duration_minutes": 600, "distance_km": 200},
            {"set_number": 1, "reps": 0, "weight": 0,
             "duration_minutes": 0, "distance_km": 0}
        ])))
        .unwrap();
        assert_eq!(log.entries[0].sets.len(), 2);
    }

    #[test]
    fn test_notes_trimmed_empty_becomes_absent() {
        let log = validate_workout(&json!({
            "workout_date": "2024-01-05",
            "notes": "  push day  ",
            "entries": [{"exercise_name": "Bench Press",
                         "sets": [{"reps": 8, "notes": "   "}]}]
        }))
        .unwrap();
        assert_eq!(log.notes.as_deref(), Some("push day"));
        assert_eq!(log.entries[0].sets[0].notes, None);
    }

    #[test]
    fn test_null_notes_absent() {
        let log = validate_workout(&json!({
            "workout_date": "2024-01-05",
            "notes": null,
            "entries": [{"exercise_name": "Row", "sets": [{"reps": 10}]}]
        }))
        .unwrap();
        assert_eq!(log.notes, None);
    }

    #[test]
    fn test_first_violation_wins() {
        // Range violation in the first entry masks the no-sets error in
        // the second.
        let msg = reason(json!({
            "workout_date": "2024-01-05",
            "entries": [
                {"exercise_name": "Bench Press", "sets": [{"reps": 500}]},
                {"exercise_name": "Squat", "sets": []}
            ]
        }));
        assert_eq!(msg, "Unreasonable reps value in 'Bench Press'.");
    }

    #[test]
    fn test_entry_order_preserved() {
        let log = validate_workout(&json!({
            "workout_date": "2024-01-05",
            "entries": [
                {"exercise_name": "Squat", "sets": [{"reps": 5, "weight": 100}]},
                {"exercise_name": "Bench Press", "sets": [{"reps": 8, "weight": 60}]}
            ]
        }))
        .unwrap();
        let names: Vec<_> = log.entries.iter().map(|e| e.exercise_name.as_str()).collect();
        assert_eq!(names, ["Squat", "Bench Press"]);
    }
}
