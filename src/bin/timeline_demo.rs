//! Timeline Demo
//!
//! Two tasks sharing one clock:
//!   task1 runs on [0, 100] and [300, 500], paused in between
//!   task2 runs on [200, 400]
//!
//! Usage:
//!   cargo run --bin timeline_demo                         # offline, 60 fps
//!   cargo run --bin timeline_demo -- --mode realtime      # wall clock
//!   RUST_LOG=rust_timeline_lib=debug cargo run --bin timeline_demo

use clap::{Parser, ValueEnum};
use rust_timeline_lib::{
    launch_offline_with_config, launch_realtime_with_config, DriverConfig, HookResult, Runnable,
    Timeline,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Offline,
    Realtime,
}

#[derive(Parser)]
#[command(name = "timeline_demo")]
#[command(about = "Drive a two-task timeline and log what each task sees", long_about = None)]
struct Cli {
    /// Which clock drives the timeline
    #[arg(long, value_enum, default_value = "offline")]
    mode: Mode,

    /// Ticks per second
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Logical milliseconds per wall millisecond (realtime only)
    #[arg(long, default_value = "1")]
    rate: f64,

    /// Timeline speed multiplier
    #[arg(long, default_value = "1")]
    speed: f64,
}

/// Logs every lifecycle call it receives.
struct Narrator {
    name: &'static str,
}

impl Runnable for Narrator {
    fn start(&mut self) -> HookResult {
        info!(task = self.name, "start");
        Ok(())
    }

    fn pause(&mut self) -> HookResult {
        info!(task = self.name, "pause");
        Ok(())
    }

    fn resume(&mut self) -> HookResult {
        info!(task = self.name, "resume");
        Ok(())
    }

    fn stop(&mut self) -> HookResult {
        info!(task = self.name, "stop");
        Ok(())
    }

    fn update(&mut self, time: f64, delta: f64) -> HookResult {
        info!(task = self.name, time, delta, "update");
        Ok(())
    }
}

fn build_timeline(speed: f64) -> Result<Timeline, Box<dyn std::error::Error>> {
    let mut timeline = Timeline::new();
    timeline.set_speed(speed);
    timeline.add(Narrator { name: "task1" }, &[0.0, 100.0, 300.0, 500.0])?;
    timeline.add(Narrator { name: "task2" }, &[200.0, 400.0])?;
    timeline
        .on_start(|| info!("timeline started"))
        .on_stop(|| info!("timeline stopped"))
        .on_progress(|p| info!("progress {:.1}%", p));
    Ok(timeline)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let timeline = build_timeline(cli.speed)?;
    info!(duration = timeline.duration(), mode = ?cli.mode, "running demo");

    let config = DriverConfig {
        fps: cli.fps,
        rate: cli.rate,
        ..Default::default()
    };

    match cli.mode {
        Mode::Offline => {
            let mut runner = launch_offline_with_config(timeline, config);
            let frames = runner.run_to_completion();
            info!(frames, now = runner.now(), "done");
        }
        Mode::Realtime => {
            let mut runner = launch_realtime_with_config(timeline, config);
            let frames = runner.run_until_complete();
            info!(frames, elapsed = runner.timeline().elapsed(), "done");
        }
    }

    Ok(())
}
