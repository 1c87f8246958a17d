pub mod dates;
pub mod error;
pub mod log;
pub mod store;
pub mod validate;
pub mod workout;

pub use dates::normalize_date_input;
pub use error::{ArloError, ArloResult};
pub use log::log_workout;
pub use store::WorkoutStore;
pub use validate::validate_workout;
pub use workout::{
    DeletedWorkout, ExerciseEntry, LoggedSet, SeriesPoint, SetEntry, StoreStats, Workout,
    WorkoutLog,
};
