use anyhow::Result;
use buttons::sim::SimTouchSensor;
use clock::SystemClock;
use log::*;
use motion::sim::SimMotor;
use motion::{Drive, Sequence, SharedRunState};
use sensors::sim::{SimColorSensor, SimLightSensor};

mod config;
use config::Config;

fn main() -> Result<()> {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    info!(
        "Calibration: {:.1} counts/inch, white threshold {:.2}",
        config.counts_per_inch(),
        config.sensors.white_threshold
    );

    // ======== Bench rig ========
    // Scripted stand-ins for the drive base; swap for real device bindings
    // on the robot. The scripts stage a bump, two line crossings, and one
    // beacon of each color.
    let drive = Drive::new(
        SimMotor::new(50),
        SimMotor::new(50),
        config.counts_per_inch(),
    );
    let arm = SimMotor::new(50);
    let light = SimLightSensor::with_readings(&[
        0.05, 0.07, 0.08, 0.11, 0.16, 0.24, // first line
        0.06, 0.09, 0.14, 0.27, // second line
    ]);
    let color = SimColorSensor::with_samples(&[(2, 9), (9, 2)]);
    let front_touch =
        SimTouchSensor::with_script(&[false, false, false, true, false, false, true]);
    let arm_touch = SimTouchSensor::with_script(&[false, false, true]);

    let mut sequence = Sequence::new(
        drive,
        arm,
        light,
        color,
        front_touch,
        arm_touch,
        config.params(),
    );

    // ======== Run ========
    let run = SharedRunState::new();
    run.start();
    let mut clock = SystemClock::new();

    let trace = sequence.run(&run, &mut clock);
    info!("Executed steps: {:?}", trace);

    Ok(())
}
