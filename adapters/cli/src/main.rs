#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Quakewave experience.

mod args;
mod config;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use quakewave_basemap::Basemap;
use quakewave_engine::{query, EngineConfig, SimulationEngine};
use quakewave_feed::{BackupFeed, FeedRouter, FeedWorker, UsgsFeed};
use quakewave_rendering::{FrameRecorder, RenderingBackend, TraceBackend};
use tracing::info;

use crate::{args::Args, config::AppConfig, session::Session};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

/// Entry point for the Quakewave command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    let trigger = args.trigger()?;

    let map_path = args.map.clone().or_else(|| config.map.path.clone());
    let basemap = match &map_path {
        Some(path) => Basemap::load(path, config.map.width, config.map.height)?,
        None => Basemap::open_water(config.map.width, config.map.height)
            .context("invalid map dimensions")?,
    };
    let (pixels, terrain) = basemap.into_parts();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, mode = ?args.mode, "starting");
    let engine = SimulationEngine::new(
        terrain,
        EngineConfig {
            playback: config.playback.clone(),
            waves: config.waves.clone(),
            interactive: config.interactive,
            seed,
        },
    );
    println!("{}", query::welcome_banner(&engine));

    let remote = UsgsFeed::new(config.feed.base_url.clone(), config.feed.timeout())
        .context("failed to build HTTP client")?;
    let backup_path = args
        .backup
        .clone()
        .unwrap_or_else(|| config.feed.backup_path.clone());
    let worker = FeedWorker::spawn(FeedRouter::new(remote, BackupFeed::new(backup_path)))
        .context("failed to start feed worker")?;

    let backend: Box<dyn RenderingBackend> = match &args.record_dir {
        Some(directory) => Box::new(FrameRecorder::new(directory, Some(pixels))?),
        None => Box::new(TraceBackend::default()),
    };

    let summary = Session::new(
        engine,
        worker,
        backend,
        args.frame_interval(),
        config.feed.timeout(),
        args.paced,
    )
    .run(trigger, args.frames, &args.taps)?;

    info!(
        frames = summary.frames,
        admitted = summary.admitted,
        live = summary.live,
        "session finished"
    );
    println!(
        "frames={} admitted={} live={}",
        summary.frames, summary.admitted, summary.live
    );
    Ok(())
}
