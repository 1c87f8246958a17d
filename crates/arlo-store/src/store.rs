use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use arlo_core::{
    ArloError, ArloResult, DeletedWorkout, LoggedSet, SeriesPoint, SetEntry, StoreStats, Workout,
    WorkoutStore,
};

use crate::schema::init_db;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(path: &Path) -> ArloResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ArloError::Database(format!("cannot create db directory: {e}")))?;
        }
        let conn = Connection::open(path)
            .map_err(|e| ArloError::Database(format!("cannot open database: {e}")))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| ArloError::Database(e.to_string()))?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> ArloResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ArloError::Database(format!("cannot open in-memory db: {e}")))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| ArloError::Database(e.to_string()))?;
        init_db(&conn)?;
        Ok(Self { conn })
    }
}

fn db_err(e: rusqlite::Error) -> ArloError {
    ArloError::Database(e.to_string())
}

fn row_to_workout(row: &rusqlite::Row) -> rusqlite::Result<Workout> {
    let created_at_str: String = row.get(3)?;
    Ok(Workout {
        id: row.get(0)?,
        workout_date: row.get(1)?,
        notes: row.get(2)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

const LAST_WORKOUT_SQL: &str = "SELECT id, workout_date, notes, created_at
     FROM workouts
     ORDER BY id DESC, created_at DESC
     LIMIT 1";

impl WorkoutStore for SqliteStore {
    fn create_workout(&self, workout_date: &str, notes: Option<&str>) -> ArloResult<i64> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn
            .execute(
                "INSERT INTO workouts (workout_date, notes, created_at) VALUES (?1, ?2, ?3)",
                params![workout_date, notes, created_at],
            )
            .map_err(db_err)?;

        let id = self.conn.last_insert_rowid();
        debug!(id, workout_date, "workout created");
        Ok(id)
    }

    fn add_sets(
        &self,
        workout_id: i64,
        exercise_name: &str,
        sets: &[SetEntry],
    ) -> ArloResult<usize> {
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO sets (
                         workout_id, exercise_name, set_number,
                         reps, weight, duration_minutes, distance_km, notes
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(db_err)?;

            for (i, set) in sets.iter().enumerate() {
                let set_number = set.set_number.unwrap_or(i as i64 + 1);
                stmt.execute(params![
                    workout_id,
                    exercise_name,
                    set_number,
                    set.reps,
                    set.weight,
                    set.duration_minutes,
                    set.distance_km,
                    set.notes,
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        debug!(workout_id, exercise_name, count = sets.len(), "sets added");
        Ok(sets.len())
    }

    fn get_exercise_series(
        &self,
        exercise_name: &str,
        limit: usize,
    ) -> ArloResult<Vec<SeriesPoint>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT w.workout_date, s.reps, s.weight, s.duration_minutes, s.distance_km
                 FROM sets s
                 JOIN workouts w ON w.id = s.workout_id
                 WHERE lower(s.exercise_name) = lower(?1)
                 ORDER BY w.workout_date ASC, s.set_number ASC
                 LIMIT ?2",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![exercise_name, limit as i64], |row| {
                Ok(SeriesPoint {
                    workout_date: row.get(0)?,
                    reps: row.get(1)?,
                    weight: row.get(2)?,
                    duration_minutes: row.get(3)?,
                    distance_km: row.get(4)?,
                })
            })
            .map_err(db_err)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(db_err)?);
        }
        Ok(results)
    }

    fn get_last_workout_with_sets(&self) -> ArloResult<Option<(Workout, Vec<LoggedSet>)>> {
        let workout = self
            .conn
            .query_row(LAST_WORKOUT_SQL, [], row_to_workout)
            .optional()
            .map_err(db_err)?;

        let Some(workout) = workout else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare(
                "SELECT exercise_name, set_number, reps, weight,
                        duration_minutes, distance_km, notes
                 FROM sets
                 WHERE workout_id = ?1
                 ORDER BY id ASC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![workout.id], |row| {
                Ok(LoggedSet {
                    exercise_name: row.get(0)?,
                    set_number: row.get(1)?,
                    reps: row.get(2)?,
                    weight: row.get(3)?,
                    duration_minutes: row.get(4)?,
                    distance_km: row.get(5)?,
                    notes: row.get(6)?,
                })
            })
            .map_err(db_err)?;

        let mut sets = Vec::new();
        for row in rows {
            sets.push(row.map_err(db_err)?);
        }
        Ok(Some((workout, sets)))
    }

    fn delete_last_workout_with_sets(&self) -> ArloResult<Option<DeletedWorkout>> {
        let tx = self.conn.unchecked_transaction().map_err(db_err)?;

        let workout = tx
            .query_row(LAST_WORKOUT_SQL, [], row_to_workout)
            .optional()
            .map_err(db_err)?;

        let Some(workout) = workout else {
            return Ok(None);
        };

        let deleted_sets: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM sets WHERE workout_id = ?1",
                params![workout.id],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        // Cascade removes the sets.
        tx.execute("DELETE FROM workouts WHERE id = ?1", params![workout.id])
            .map_err(db_err)?;
        tx.commit().map_err(db_err)?;

        debug!(id = workout.id, deleted_sets, "workout deleted");
        Ok(Some(DeletedWorkout {
            id: workout.id,
            workout_date: workout.workout_date,
            notes: workout.notes,
            created_at: workout.created_at,
            deleted_sets: deleted_sets as usize,
        }))
    }

    fn stats(&self) -> ArloResult<StoreStats> {
        let total_workouts: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))
            .map_err(db_err)?;

        let total_sets: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM sets", [], |row| row.get(0))
            .map_err(db_err)?;

        let (first_date, last_date) = self
            .conn
            .query_row(
                "SELECT MIN(workout_date), MAX(workout_date) FROM workouts",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(db_err)?;

        Ok(StoreStats {
            total_workouts,
            total_sets,
            first_date,
            last_date,
        })
    }
}
