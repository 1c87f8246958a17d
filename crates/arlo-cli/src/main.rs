mod config;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use arlo_core::{log_workout, ArloError, WorkoutStore};
use arlo_mcp::{default_export_dir, ExportDir};
use arlo_store::SqliteStore;

#[derive(Parser)]
#[command(
    name = "arlo",
    version,
    about = "Arlo - workout logging assistant backend"
)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one workout from a JSON payload
    Log {
        /// Inline JSON payload
        #[arg(short, long)]
        json: Option<String>,

        /// Read the payload from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show date-ordered set history for one exercise
    Progress {
        /// Exercise name (matched case-insensitively)
        exercise: String,

        /// Maximum sets to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the most recent workout and its sets
    Last,

    /// Delete the most recent workout and all its sets
    DeleteLast {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show store totals
    Stats,

    /// Show current configuration
    Config,

    /// Launch MCP server (stdio transport)
    Serve,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("dev", "arlo", "arlo")
        .map(|dirs| dirs.data_dir().join("workouts.db"))
        .unwrap_or_else(|| PathBuf::from("workouts.db"))
}

fn resolve_db_path(flag: Option<PathBuf>, config: &config::Config) -> PathBuf {
    flag.or_else(|| config.store.path.clone().map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn resolve_export_dir(config: &config::Config) -> PathBuf {
    config
        .export
        .dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(default_export_dir)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config()?;
    let db_path = resolve_db_path(cli.db, &config);
    let store = SqliteStore::new(&db_path).context("failed to open database")?;

    match cli.command {
        Commands::Log { json, file } => cmd_log(&store, json, file),
        Commands::Progress { exercise, limit } => {
            cmd_progress(&store, &exercise, limit.unwrap_or(config.progress.limit))
        }
        Commands::Last => cmd_last(&store),
        Commands::DeleteLast { yes } => cmd_delete_last(&store, yes),
        Commands::Stats => cmd_stats(&store),
        Commands::Config => cmd_config(&config, &db_path),
        Commands::Serve => {
            let exports = ExportDir::new(resolve_export_dir(&config))?;
            arlo_mcp::run_server(&store, &exports)
        }
    }
}

fn cmd_log(store: &SqliteStore, json: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let raw = match (json, file) {
        (Some(_), Some(_)) => bail!("pass either --json or --file, not both"),
        (Some(j), None) => j,
        (None, Some(f)) => std::fs::read_to_string(&f)
            .with_context(|| format!("reading {}", f.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    // Model-produced JSON tends to carry trailing commas and comments;
    // parse leniently before the strict validation pass.
    let payload: Value =
        serde_json_lenient::from_str(&raw).context("payload is not valid JSON")?;

    match log_workout(store, &payload) {
        Ok(msg) => {
            println!("{msg}");
            Ok(())
        }
        Err(ArloError::InvalidWorkout(reason)) => bail!("invalid workout payload: {reason}"),
        Err(e) => Err(e.into()),
    }
}

fn cmd_progress(store: &SqliteStore, exercise: &str, limit: usize) -> Result<()> {
    let rows = store.get_exercise_series(exercise, limit)?;
    if rows.is_empty() {
        println!("No logged sets found for {exercise}.");
        return Ok(());
    }

    for p in &rows {
        let reps = p
            .reps
            .map(|r| format!("{r} reps"))
            .unwrap_or_else(|| "reps n/a".into());
        let weight = p
            .weight
            .map(|w| format!("{w} kg"))
            .unwrap_or_else(|| "weight n/a".into());
        let duration = p
            .duration_minutes
            .map(|d| format!("{d} min"))
            .unwrap_or_else(|| "duration n/a".into());
        let distance = p
            .distance_km
            .map(|d| format!("{d} km"))
            .unwrap_or_else(|| "distance n/a".into());
        println!("{}: {reps}, {weight}, {duration}, {distance}", p.workout_date);
    }
    Ok(())
}

fn cmd_last(store: &SqliteStore) -> Result<()> {
    let Some((workout, sets)) = store.get_last_workout_with_sets()? else {
        println!("No workouts logged yet.");
        return Ok(());
    };

    println!("Workout #{} on {}", workout.id, workout.workout_date);
    println!("Logged:  {}", workout.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(notes) = &workout.notes {
        println!("Notes:   {notes}");
    }
    if sets.is_empty() {
        println!("(no sets)");
    }
    for set in &sets {
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
        let notes = set
            .notes
            .as_ref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default();
        println!(
            "  {} set {}: {}{notes}",
            set.exercise_name,
            set.set_number,
            metrics.join(", ")
        );
    }
    Ok(())
}

fn cmd_delete_last(store: &SqliteStore, yes: bool) -> Result<()> {
    if !yes {
        bail!("refusing to delete without --yes");
    }

    match store.delete_last_workout_with_sets()? {
        Some(deleted) => println!(
            "Deleted workout #{} from {} and {} related sets.",
            deleted.id, deleted.workout_date, deleted.deleted_sets
        ),
        None => println!("No workouts logged yet."),
    }
    Ok(())
}

fn cmd_stats(store: &SqliteStore) -> Result<()> {
    let stats = store.stats()?;
    println!("Workouts: {}", stats.total_workouts);
    println!("Sets:     {}", stats.total_sets);
    if let Some(first) = &stats.first_date {
        println!("First:    {first}");
    }
    if let Some(last) = &stats.last_date {
        println!("Last:     {last}");
    }
    Ok(())
}

fn cmd_config(config: &config::Config, db_path: &Path) -> Result<()> {
    println!("Config: {}", config::show_config_path());
    println!("Store:  {}", db_path.display());
    println!("Export: {}", resolve_export_dir(config).display());
    Ok(())
}
