// Agrobot Command Line Interface
// Validate and inspect per-robot configuration bundles

use agrobot_core::circle_sight::is_flipped;
use agrobot_core::{ConfigEntry, Error, RobotCatalog, RuntimeSettings};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agrobot")]
#[command(about = "Agrobot robot configuration tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding one configuration bundle per robot
    #[arg(long, short, global = true)]
    dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every bundle in the directory, or only one robot's
    Validate {
        /// Robot identity (file stem of its bundle)
        robot: Option<String>,
    },

    /// Print a robot's validated configuration as JSON
    Show {
        /// Robot identity; defaults to AGROBOT_ROBOT_ID
        robot: Option<String>,
    },

    /// List robots with a valid bundle
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = RuntimeSettings::from_env();
    if let Some(dir) = cli.dir {
        settings.config_dir = dir;
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }

    init_logging(&settings.log_level);

    match cli.command {
        Commands::Validate { robot } => validate(&settings.config_dir, robot.as_deref()),
        Commands::Show { robot } => {
            let robot = robot
                .or(settings.robot_id)
                .context("No robot given and AGROBOT_ROBOT_ID is not set")?;
            show(&settings.config_dir, &robot)
        }
        Commands::List => list(&settings.config_dir),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn validate(dir: &Path, robot: Option<&str>) -> anyhow::Result<()> {
    if let Some(robot) = robot {
        RobotCatalog::load_robot(dir, robot).map_err(|e| report(robot, e))?;
        println!("✅ {}: valid", robot);
        return Ok(());
    }

    let paths = RobotCatalog::bundle_paths(dir)
        .with_context(|| format!("Cannot read bundle directory {}", dir.display()))?;
    let mut failed = 0usize;
    for path in &paths {
        let name = path.display().to_string();
        match RobotCatalog::load_file(path) {
            Ok((robot, _)) => println!("✅ {}: valid", robot),
            Err(e) => {
                let robot = RobotCatalog::robot_id(path).unwrap_or(name);
                println!("❌ {}", report(&robot, e));
                failed += 1;
            }
        }
    }

    info!("Checked {} bundle(s) in {}", paths.len(), dir.display());
    if failed > 0 {
        bail!("{} of {} bundle(s) invalid", failed, paths.len());
    }
    Ok(())
}

fn show(dir: &Path, robot: &str) -> anyhow::Result<()> {
    let entry = RobotCatalog::load_robot(dir, robot).map_err(|e| report(robot, e))?;
    println!("{}", serde_json::to_string_pretty(&describe(robot, &entry))?);
    Ok(())
}

fn list(dir: &Path) -> anyhow::Result<()> {
    let catalog = RobotCatalog::load_dir(dir)?;
    if catalog.is_empty() {
        println!("No robot bundles in {}", dir.display());
    }
    for (robot, entry) in catalog.iter() {
        let mut sections = Vec::new();
        if entry.camera().is_some() {
            sections.push("camera");
        }
        if entry.crop().is_some() {
            sections.push("crop");
        }
        if entry.circle_sight().is_some() {
            sections.push("circle_sight");
        }
        if entry.mechanical().is_some() {
            sections.push("mechanical");
        }
        println!("{}\t{}", robot, sections.join(","));
    }
    Ok(())
}

/// JSON view of an entry with the derived crop region and slot mountings
fn describe(robot: &str, entry: &ConfigEntry) -> Value {
    let mut out = json!({
        "robot": robot,
        "configuration": entry,
    });
    if let Some(region) = entry.crop_region() {
        out["crop_region"] = json!(region);
    }
    if let Some(table) = entry.circle_sight() {
        let mut slots = Map::new();
        for (slot, index) in table.iter() {
            slots.insert(
                slot.to_string(),
                json!({
                    "index": index,
                    "flipped": is_flipped(index),
                }),
            );
        }
        out["circle_sight_mountings"] = Value::Object(slots);
    }
    out
}

/// Log a load failure and turn it into a one-line error naming kind and path
fn report(robot: &str, err: Error) -> anyhow::Error {
    match err {
        Error::InvalidBundle { source, .. } => {
            error!(robot, kind = %source.kind, path = %source.path, "{}", source.message);
            anyhow::anyhow!("{}: {}", robot, source)
        }
        other => {
            error!(robot, "{}", other);
            anyhow::anyhow!("{}: {}", robot, other)
        }
    }
}
