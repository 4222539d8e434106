//! RTSP player binary
//!
//! Usage:
//!   rtsp-player rtsp://192.168.1.10:554/stream
//!   rtsp-player rtsp://192.168.1.10:554/stream -c player.yaml

use gstreamer::prelude::*;
use rtsp_player::cli::{self, Args, FAILURE_EXIT_CODE};
use rtsp_player::controller::request_stop;
use rtsp_player::{MediaSubsystem, PlaybackController, PlayerConfig, PlayerPipeline, Termination};

fn main() {
    // Initialize logging
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let argv: Vec<String> = std::env::args().collect();
    let args = match cli::parse_args(&argv) {
        Ok(args) => args,
        Err(exit) => {
            eprintln!("{}", exit.output);
            std::process::exit(exit.code);
        }
    };

    // Everything GStreamer owns is released inside `run`
    std::process::exit(run(args));
}

fn run(args: Args) -> i32 {
    let config = match &args.config {
        Some(path) => match PlayerConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load config from '{}': {}", path, e);
                return FAILURE_EXIT_CODE;
            }
        },
        None => PlayerConfig::default(),
    };

    // SAFETY: `play` drops every strong GStreamer reference before returning.
    // The Ctrl+C handler keeps a `WeakRef<Pipeline>` for the rest of the
    // process, which holds no object alive and is never dropped since the
    // process exits right after the guard is released.
    let media = match unsafe { MediaSubsystem::acquire() } {
        Ok(m) => m,
        Err(e) => {
            log::error!("{}", e);
            return FAILURE_EXIT_CODE;
        }
    };

    let code = match play(&args.url, &config) {
        // Errors reported during playback still end in a clean shutdown
        Ok(_) => 0,
        Err(e) => {
            log::error!("{:#}", e);
            FAILURE_EXIT_CODE
        }
    };

    drop(media);
    code
}

fn play(url: &str, config: &PlayerConfig) -> anyhow::Result<Termination> {
    log::info!("Opening {}", url);

    let player = PlayerPipeline::build(url, config)?;
    let _handlers = player.connect_depayloaders();

    let mut controller = PlaybackController::new(player.into_pipeline())?;

    ctrlc::set_handler({
        let pipeline = controller.pipeline().downgrade();
        move || {
            log::info!("Received Ctrl+C, stopping playback...");
            if let Some(pipeline) = pipeline.upgrade() {
                request_stop(&pipeline);
            }
        }
    })?;

    controller.play()?;
    let termination = controller.run();
    controller.shutdown();

    Ok(termination)
}
