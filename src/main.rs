//! Headless demo: build a variant, run it, optionally script a drag

use std::path::PathBuf;

use clap::Parser;
use nalgebra::Point2;
use tracing::info;

use flexsim::{BodyKind, BodyParams, Result, Scene};

#[derive(Parser, Debug)]
#[command(name = "flexsim")]
#[command(about = "Interactive flexible-body simulation (headless demo)", long_about = None)]
struct Cli {
    /// Flexible-body variant to simulate
    #[arg(short, long, value_enum, default_value_t = BodyKind::Spring)]
    variant: BodyKind,

    /// Number of fixed 1/60 s ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,

    /// Optional YAML parameter file overriding the variant defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script a pointer drag on the body's midpoint partway through
    #[arg(long, default_value_t = false)]
    drag: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting flexsim");
    info!(variant = cli.variant.label(), ticks = cli.ticks, "demo run");

    let params = match &cli.config {
        Some(path) => {
            let params = BodyParams::from_yaml_file(path)?;
            info!(?params, "loaded parameter overrides");
            params
        }
        None => BodyParams::for_kind(cli.variant),
    };
    let mut scene = Scene::with_params(cli.variant, params)?;

    let drag_start = cli.ticks / 4;
    let drag_end = cli.ticks / 2;

    for tick in 0..cli.ticks {
        if cli.drag {
            script_drag(&mut scene, tick, drag_start, drag_end);
        }

        scene.advance();

        if tick % 60 == 0 {
            log_tip(&scene, tick);
        }
    }

    let tail = *scene.active().points().last().expect("at least two points");
    let position = scene.physics.bodies[tail].translation();
    info!(
        x = position.x,
        y = position.y,
        z = position.z,
        dragging = scene.interaction.is_dragging(),
        "final tip position"
    );
    Ok(())
}

/// Press on the midpoint, pull it sideways, release.
fn script_drag(scene: &mut Scene, tick: u32, start: u32, end: u32) {
    if tick == start {
        let mid = scene.active().points()[scene.active().points().len() / 2];
        let target = nalgebra::Point3::from(*scene.physics.bodies[mid].translation());
        if let Some(ndc) = scene.camera.project(&target) {
            scene.pointer_down(ndc);
            info!(dragging = scene.interaction.is_dragging(), "scripted press");
        }
    } else if tick > start && tick < end {
        if let Some(target) = scene.interaction.drag_target() {
            if let Some(ndc) = scene.camera.project(&target) {
                let shifted = Point2::new(ndc.x + 0.002 * (tick - start) as f32, ndc.y);
                scene.pointer_move(shifted);
            }
        }
    } else if tick == end {
        scene.pointer_up();
        info!("scripted release");
    }
}

fn log_tip(scene: &Scene, tick: u32) {
    let tail = *scene.active().points().last().expect("at least two points");
    let position = scene.physics.bodies[tail].translation();
    info!(tick, y = position.y, z = position.z, "tip");
}
