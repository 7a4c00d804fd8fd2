// src/main.rs
// Entry point for Beacon: loads settings and calibration, wires the
// measurement source and motors to the homing controller, and runs it until
// Ctrl-C or the optional tick limit.

use beacon::{BeaconError, CameraCalibration, HomingController, MovementGate, ReplaySource, Settings};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tag-homing controller
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about)]
struct Args {
    /// Settings file (YAML); defaults are used if it does not exist
    #[arg(short, long, default_value = "beacon.yaml")]
    config: PathBuf,

    /// Measurement script to replay instead of a live detector
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Restart the replay script when it runs out
    #[arg(long)]
    loop_replay: bool,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> beacon::Result<()> {
    info!("Starting Beacon homing controller...");

    let settings = Settings::load(&args.config)?;
    info!(
        "Camera {} at {}x{}, tag {} ({})",
        settings.camera.device_id,
        settings.camera.frame_width,
        settings.camera.frame_height,
        settings.tag.family,
        settings.tag.size
    );

    // No calibration, no motion
    let _calibration = CameraCalibration::load(&settings.camera.calibration_path)?;

    let source = match &args.replay {
        Some(path) => ReplaySource::load(path)?.looping(args.loop_replay),
        None => {
            return Err(BeaconError::Config(
                "no live detector is linked into this build, pass --replay <script>".to_string(),
            ));
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| BeaconError::Config(format!("Error setting Ctrl-C handler: {}", e)))?;

    let enable_movement = settings.motor.enable_movement;

    #[cfg(not(feature = "ros"))]
    let actuator = MovementGate::new(beacon::LoggingActuator::new(), enable_movement);

    #[cfg(feature = "ros")]
    let mut ros = beacon::ros_interface::RosInterface::new(&settings.ros)?;
    #[cfg(feature = "ros")]
    let actuator = MovementGate::new(ros.actuator()?, enable_movement);

    let mut controller = HomingController::new(source, actuator, settings.control.tolerance)?
        .with_tick_interval(settings.tick_interval());

    #[cfg(feature = "ros")]
    {
        let transitions = controller.subscribe();
        let publisher = ros.status_publisher()?;
        std::thread::spawn(move || publisher.forward(transitions));
    }

    let ticks = controller.run(&running, args.max_ticks)?;
    info!("Beacon stopped after {} ticks in {}", ticks, controller.status());
    Ok(())
}
