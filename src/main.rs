use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use opc_bridge::frame_scheduler::frame_duration;
use opc_bridge::http::HttpServer;
use opc_bridge::opc::OpcClient;
use opc_bridge::startup::{TEST_PATTERN_HOLD, play_test_pattern};
use opc_bridge::{
    Arbitration, Bridge, CommandChannel, Config, FadeEngine, FrameHandle, FrameScheduler,
    PIXEL_COUNT, PowerController, PowerState, Renderer, WakeSignal,
};

/// Queue between the HTTP handlers and the render loop
static COMMANDS: CommandChannel = CommandChannel::new();

/// Raised by the HTTP handlers whenever work is queued
static WAKE: WakeSignal = WakeSignal::new();

/// Fading pixel renderer for Open Pixel Control sinks.
#[derive(Parser, Debug)]
#[command(name = "opc-bridge", version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "opc-bridge.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    info!(
        "server booted, {} fps, OPC sink at {}",
        config.frame_rate, config.opc.address
    );

    let mut power = config
        .psu
        .as_ref()
        .map(|psu| PowerController::new(psu.client()));
    if let Some(power) = power.as_mut() {
        power.request(PowerState::On);
    }

    let mut output = OpcClient::new(
        config.opc.address.clone(),
        config.opc.channel,
        config.opc.timeout(),
    );
    play_test_pattern(&mut output, PIXEL_COUNT, TEST_PATTERN_HOLD);

    let frames = FrameHandle::new(PIXEL_COUNT);
    let renderer = Renderer::<_, PIXEL_COUNT>::new(
        COMMANDS.receiver(),
        FadeEngine::new(config.frame_rate),
        power,
    );
    let scheduler = FrameScheduler::new(
        renderer,
        output,
        &WAKE,
        frame_duration(config.frame_rate),
    )
    .with_frames(frames.clone());

    thread::Builder::new()
        .name("render".to_string())
        .spawn(move || scheduler.run())
        .context("spawning render thread")?;

    let bridge = Bridge::new(
        COMMANDS.sender(),
        &WAKE,
        frames,
        Arc::new(Arbitration::new()),
    );
    let server = HttpServer::bind(&config.http.listen)
        .with_context(|| format!("binding HTTP listener on {}", config.http.listen))?;
    info!("listening on {}", server.local_addr()?);
    server.serve(bridge)?;

    Ok(())
}
