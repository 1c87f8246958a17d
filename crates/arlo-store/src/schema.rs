use rusqlite::Connection;

use arlo_core::ArloError;

pub fn init_db(conn: &Connection) -> Result<(), ArloError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            exercise_name TEXT NOT NULL,
            set_number INTEGER NOT NULL,
            reps INTEGER,
            weight REAL,
            duration_minutes REAL,
            distance_km REAL,
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_sets_workout ON sets(workout_id);
        CREATE INDEX IF NOT EXISTS idx_sets_exercise ON sets(exercise_name COLLATE NOCASE);
        ",
    )
    .map_err(|e| ArloError::Database(e.to_string()))
}
