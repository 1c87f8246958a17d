use chrono::SecondsFormat;
use serde_json::{json, Value};

use arlo_core::{log_workout, ArloError, LoggedSet, SeriesPoint, WorkoutStore};
use arlo_store::SqliteStore;

use crate::exports::ExportDir;
use crate::protocol::ToolResult;

// ---------------------------------------------------------------------------
// Tool schemas for tools/list
// ---------------------------------------------------------------------------

pub fn tool_definitions() -> Value {
    let set_schema = json!({
        "type": "object",
        "properties": {
            "set_number": {
                "type": "integer",
                "description": "Optional; assigned from position if omitted"
            },
            "reps": { "type": "integer" },
            "weight": { "type": "number", "description": "Kilograms" },
            "duration_minutes": { "type": "number" },
            "distance_km": { "type": "number" },
            "notes": { "type": "string" }
        }
    });

    let tools = vec![
        json!({
            "name": "log_workout",
            "description": "Log one workout. Every set needs at least one metric (reps/weight/duration/distance). Relative dates (today, yesterday, tomorrow) are allowed in workout_date.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "workout": {
                        "type": "object",
                        "properties": {
                            "workout_date": {
                                "type": "string",
                                "description": "YYYY-MM-DD, or today/yesterday/tomorrow"
                            },
                            "notes": { "type": "string" },
                            "entries": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "exercise_name": { "type": "string" },
                                        "sets": { "type": "array", "items": set_schema }
                                    },
                                    "required": ["exercise_name", "sets"]
                                }
                            }
                        },
                        "required": ["workout_date", "entries"]
                    }
                },
                "required": ["workout"]
            }
        }),
        json!({
            "name": "get_exercise_progress",
            "description": "Return date-ordered set history for one exercise, matched case-insensitively.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "exercise_name": {
                        "type": "string",
                        "description": "Exercise to look up"
                    },
                    "limit": {
                        "type": "integer",
                        "default": 200,
                        "minimum": 1,
                        "description": "Max number of sets to return"
                    }
                },
                "required": ["exercise_name"]
            }
        }),
        json!({
            "name": "get_last_workout",
            "description": "Return the most recent workout and all its sets in logged order.",
            "inputSchema": {
                "type": "object",
                "properties": {}
            }
        }),
        json!({
            "name": "delete_last_workout",
            "description": "Delete the most recent workout and all its sets. Destructive; requires confirm=true.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "confirm": {
                        "type": "boolean",
                        "description": "Must be true to actually delete"
                    }
                },
                "required": ["confirm"]
            }
        }),
        json!({
            "name": "save_to_md_file",
            "description": "Save Markdown content to a generated file. Returns the file path.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "Markdown content"
                    }
                },
                "required": ["content"]
            }
        }),
        json!({
            "name": "save_to_txt_file",
            "description": "Save plain-text content to a generated file. Returns the file path.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "Text content"
                    }
                },
                "required": ["content"]
            }
        }),
    ];

    json!({ "tools": tools })
}

// ---------------------------------------------------------------------------
// Tool dispatch
// ---------------------------------------------------------------------------

pub fn call_tool(store: &SqliteStore, exports: &ExportDir, name: &str, args: &Value) -> ToolResult {
    match name {
        "log_workout" => tool_log_workout(store, args),
        "get_exercise_progress" => tool_get_exercise_progress(store, args),
        "get_last_workout" => tool_get_last_workout(store),
        "delete_last_workout" => tool_delete_last_workout(store, args),
        "save_to_md_file" => tool_save_file(exports, args, "md"),
        "save_to_txt_file" => tool_save_file(exports, args, "txt"),
        _ => ToolResult::error(format!("unknown tool: {name}")),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn get_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn get_i64(args: &Value, key: &str, default: i64) -> i64 {
    args.get(key).and_then(|v| v.as_i64()).unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Tool handlers
// ---------------------------------------------------------------------------

fn tool_log_workout(store: &SqliteStore, args: &Value) -> ToolResult {
    let Some(workout) = args.get("workout") else {
        return ToolResult::error("missing required field: workout".into());
    };

    match log_workout(store, workout) {
        Ok(msg) => ToolResult::text(msg),
        Err(ArloError::InvalidWorkout(reason)) => {
            ToolResult::error(format!("Invalid workout payload: {reason}"))
        }
        Err(e) => ToolResult::error(format!("failed to log workout: {e}")),
    }
}

fn tool_get_exercise_progress(store: &SqliteStore, args: &Value) -> ToolResult {
    let Some(exercise_name) = get_str(args, "exercise_name") else {
        return ToolResult::error("missing required field: exercise_name".into());
    };
    let limit = get_i64(args, "limit", 200).max(0) as usize;

    let rows = match store.get_exercise_series(exercise_name, limit) {
        Ok(r) => r,
        Err(e) => return ToolResult::error(format!("failed to query progress: {e}")),
    };

    if rows.is_empty() {
        return ToolResult::text(format!("No logged sets found for {exercise_name}."));
    }

    let lines: Vec<String> = rows.iter().map(render_series_point).collect();
    ToolResult::text(lines.join("\n"))
}

fn tool_get_last_workout(store: &SqliteStore) -> ToolResult {
    match store.get_last_workout_with_sets() {
        Ok(Some((workout, sets))) => {
            let mut output = format!(
                "Workout #{} on {} (logged {})\n",
                workout.id,
                workout.workout_date,
                workout.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
            if let Some(notes) = &workout.notes {
                output.push_str(&format!("Notes: {notes}\n"));
            }
            if sets.is_empty() {
                output.push_str("(no sets)\n");
            }
            for set in &sets {
                output.push_str(&render_logged_set(set));
                output.push('\n');
            }
            ToolResult::text(output)
        }
        Ok(None) => ToolResult::text("No workouts logged yet.".into()),
        Err(e) => ToolResult::error(format!("failed to read last workout: {e}")),
    }
}

fn tool_delete_last_workout(store: &SqliteStore, args: &Value) -> ToolResult {
    if !args.get("confirm").and_then(Value::as_bool).unwrap_or(false) {
        return ToolResult::error(
            "Missing confirmation. Pass confirm=true to delete the last workout.".into(),
        );
    }

    match store.delete_last_workout_with_sets() {
        Ok(Some(deleted)) => ToolResult::text(format!(
            "Deleted workout #{} from {} and {} related sets.",
            deleted.id, deleted.workout_date, deleted.deleted_sets
        )),
        Ok(None) => ToolResult::text("No workouts logged yet.".into()),
        Err(e) => ToolResult::error(format!("failed to delete: {e}")),
    }
}

fn tool_save_file(exports: &ExportDir, args: &Value, extension: &str) -> ToolResult {
    let Some(content) = get_str(args, "content") else {
        return ToolResult::error("missing required field: content".into());
    };

    match exports.save(content, extension) {
        Ok(path) => ToolResult::text(path.display().to_string()),
        Err(e) => ToolResult::error(format!("failed to save file: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_series_point(p: &SeriesPoint) -> String {
    let reps = match p.reps {
        Some(r) => format!("{r} reps"),
        None => "reps n/a".into(),
    };
    let weight = match p.weight {
        Some(w) => format!("{w} kg"),
        None => "weight n/a".into(),
    };
    let duration = match p.duration_minutes {
        Some(d) => format!("{d} min"),
        None => "duration n/a".into(),
    };
    let distance = match p.distance_km {
        Some(d) => format!("{d} km"),
        None => "distance n/a".into(),
    };
    format!("{}: {reps}, {weight}, {duration}, {distance}", p.workout_date)
}

fn render_logged_set(set: &LoggedSet) -> String {
    let mut metrics: Vec<String> = Vec::new();
    if let Some(r) = set.reps {
        metrics.push(format!("{r} reps"));
    }
    if let Some(w) = set.weight {
        metrics.push(format!("{w} kg"));
    }
    if let Some(d) = set.duration_minutes {
        metrics.push(format!("{d} min"));
    }
    if let Some(d) = set.distance_km {
        metrics.push(format!("{d} km"));
    }

    let mut line = format!(
        "  {} set {}: {}",
        set.exercise_name,
        set.set_number,
        metrics.join(", ")
    );
    if let Some(notes) = &set.notes {
        line.push_str(&format!(" ({notes})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fixture() -> (SqliteStore, ExportDir, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let exports = ExportDir::new(dir.path().join("exports")).unwrap();
        (SqliteStore::in_memory().unwrap(), exports, dir)
    }

    fn bench_payload() -> Value {
        json!({
            "workout": {
                "workout_date": "2024-01-05",
                "entries": [
                    {"exercise_name": "Bench Press",
                     "sets": [{"reps": 8, "weight": 60}, {"reps": 6, "weight": 65}]}
                ]
            }
        })
    }

    #[test]
    fn test_definitions_list_all_tools() {
        let defs = tool_definitions();
        let names: Vec<&str> = defs["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            [
                "log_workout",
                "get_exercise_progress",
                "get_last_workout",
                "delete_last_workout",
                "save_to_md_file",
                "save_to_txt_file"
            ]
        );
    }

    #[test]
    fn test_log_then_read_back() {
        let (store, exports, _dir) = test_fixture();

        let result = call_tool(&store, &exports, "log_workout", &bench_payload());
        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            "Logged workout #1 on 2024-01-05 with 1 exercises and 2 sets."
        );

        let result = call_tool(&store, &exports, "get_last_workout", &json!({}));
        assert!(!result.is_error);
        let text = result.first_text();
        assert!(text.starts_with("Workout #1 on 2024-01-05"));
        assert!(text.contains("Bench Press set 1: 8 reps, 60 kg"));
        assert!(text.contains("Bench Press set 2: 6 reps, 65 kg"));
    }

    #[test]
    fn test_invalid_payload_is_tool_error() {
        let (store, exports, _dir) = test_fixture();

        let result = call_tool(
            &store,
            &exports,
            "log_workout",
            &json!({"workout": {"workout_date": "next week", "entries": [{}]}}),
        );
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            "Invalid workout payload: workout_date must be YYYY-MM-DD."
        );
        // Nothing persisted
        assert!(store.get_last_workout_with_sets().unwrap().is_none());
    }

    #[test]
    fn test_progress_rendering() {
        let (store, exports, _dir) = test_fixture();
        call_tool(&store, &exports, "log_workout", &bench_payload());

        let result = call_tool(
            &store,
            &exports,
            "get_exercise_progress",
            &json!({"exercise_name": "bench press"}),
        );
        assert!(!result.is_error);
        let lines: Vec<&str> = result.first_text().lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2024-01-05: 8 reps, 60 kg, duration n/a, distance n/a");

        let result = call_tool(
            &store,
            &exports,
            "get_exercise_progress",
            &json!({"exercise_name": "Deadlift"}),
        );
        assert_eq!(result.first_text(), "No logged sets found for Deadlift.");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (store, exports, _dir) = test_fixture();
        call_tool(&store, &exports, "log_workout", &bench_payload());

        let result = call_tool(&store, &exports, "delete_last_workout", &json!({}));
        assert!(result.is_error);
        assert!(store.get_last_workout_with_sets().unwrap().is_some());

        let result = call_tool(
            &store,
            &exports,
            "delete_last_workout",
            &json!({"confirm": true}),
        );
        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            "Deleted workout #1 from 2024-01-05 and 2 related sets."
        );

        // Deleting again reports the empty store, not an error
        let result = call_tool(
            &store,
            &exports,
            "delete_last_workout",
            &json!({"confirm": true}),
        );
        assert!(!result.is_error);
        assert_eq!(result.first_text(), "No workouts logged yet.");
    }

    #[test]
    fn test_save_tools_return_path() {
        let (store, exports, _dir) = test_fixture();

        let result = call_tool(
            &store,
            &exports,
            "save_to_md_file",
            &json!({"content": "# Plan"}),
        );
        assert!(!result.is_error);
        let path = std::path::PathBuf::from(result.first_text());
        assert!(path.is_file());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Plan");
    }

    #[test]
    fn test_unknown_tool() {
        let (store, exports, _dir) = test_fixture();
        let result = call_tool(&store, &exports, "bench_me", &json!({}));
        assert!(result.is_error);
    }
}
