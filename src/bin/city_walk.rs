//! City Walk - Headless Demo
//!
//! Run with: `cargo run --bin city_walk -- --seed 42`
//!
//! Generates a city, uploads it to a recording backend, prints a summary and
//! walks from the main road crossing down to the treasure chamber.
//!
//! Options:
//! - `--seed N`: Reproduce a city (random seed when omitted)
//! - `--config FILE`: Load a JSON city configuration
//! - `--export DIR`: Write facade, road and corridor bitmaps as PNG files
//! - `--script MOVES`: Replay direction steps (F/B/L/R/U/D) instead of the treasure route
//!
//! Set `RUST_LOG=debug` for per-facade and per-move output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use randcity_engine::error::{CityError, Result};
use randcity_engine::game::{City, CityConfig, RecordingBackend, RenderingBackend, generate_city};
use randcity_engine::player::{MoveDirection, PlayerMovementController};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed of the city
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the generated bitmaps as PNG files
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Direction steps to replay, e.g. "FFFLLB"
    #[arg(long)]
    script: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => CityConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => CityConfig::default(),
    };

    let city = generate_city(&config, args.seed)?;
    log_summary(&city);

    let mut backend = RecordingBackend::new();
    city.upload(&mut backend)?;
    info!(
        "uploaded {} meshes ({} triangles, {} KiB) and {} textures",
        backend.meshes.len(),
        backend.total_triangles(),
        backend.total_buffer_bytes() / 1024,
        backend.textures.len()
    );

    if let Some(dir) = &args.export {
        export_bitmaps(&city, dir)?;
    }

    let mut controller = PlayerMovementController::new(city.walk_world());
    controller.on_treasure_found(|eye| info!("*** treasure found at {eye} ***"));

    match &args.script {
        Some(script) => replay_script(&mut controller, &mut backend, script)?,
        None => walk_to_treasure(&city, &mut controller, &mut backend)?,
    }

    info!("{} frames submitted", backend.frames.len());
    if !controller.has_found_treasure() {
        warn!("walk ended without reaching the treasure");
    }
    Ok(())
}

fn log_summary(city: &City) {
    info!("seed: {}", city.seed);
    info!("buildings: {}", city.buildings.len());
    info!("treasure plot centre: {}", city.treasure_anchor);
    for (class, count) in city.texture_histogram() {
        info!("  {class}: {count}");
    }
}

fn export_bitmaps(city: &City, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    for (class, image) in &city.facades {
        image.save(dir.join(format!("facade_{class}.png")))?;
    }
    city.road_texture.save(dir.join("road.png"))?;
    city.corridor_texture.save(dir.join("corridor.png"))?;
    info!("bitmaps written to {}", dir.display());
    Ok(())
}

fn replay_script(
    controller: &mut PlayerMovementController,
    backend: &mut RecordingBackend,
    script: &str,
) -> Result<()> {
    for c in script.chars().filter(|c| !c.is_whitespace()) {
        let direction = match c.to_ascii_uppercase() {
            'F' => MoveDirection::Forward,
            'B' => MoveDirection::Backward,
            'L' => MoveDirection::Left,
            'R' => MoveDirection::Right,
            'U' => MoveDirection::Up,
            'D' => MoveDirection::Down,
            other => {
                return Err(CityError::InvalidArgument(format!(
                    "unknown move '{other}' in script"
                )));
            }
        };
        let outcome = controller.step(direction);
        if !outcome.free {
            info!("{direction:?} blocked ({:?})", outcome.zone);
        }
        backend.submit_frame(&controller.camera())?;
    }
    Ok(())
}

fn walk_to_treasure(
    city: &City,
    controller: &mut PlayerMovementController,
    backend: &mut RecordingBackend,
) -> Result<()> {
    for waypoint in city.treasure_route() {
        let report = controller.walk_to(waypoint);
        backend.submit_frame(&controller.camera())?;
        info!(
            "walked {} step(s) to ({:.0}, {:.0}), now at {}",
            report.steps,
            waypoint.x,
            waypoint.z,
            controller.state().eye
        );
        if !report.arrived {
            warn!("blocked before reaching the waypoint");
            break;
        }
    }
    Ok(())
}
