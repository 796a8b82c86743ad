//! Binary entry point: logging setup, config loading, command dispatch.

mod cli;
mod error_fmt;
mod render;

use std::fs;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use eyre::WrapErr;
use thermocam_config::{Config, SchemeKind};
use thermocam_core::{Camera, ColorScheme, InfernoScheme, ThresholdScheme, frame_stats};
use thermocam_hw::SimulatedSensor;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE, SchemeArg};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() -> ExitCode {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);

    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporting: {e}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if *JSON_MODE.get().unwrap_or(&false) {
                eprintln!("{}", format_error_json(&e));
            } else {
                eprintln!("{}", humanize(&e));
            }
            let code = exit_code_for_error(&e);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(args: &Cli) -> eyre::Result<()> {
    let (cfg, used_defaults) = load_config(args)?;
    init_logging(args, &cfg);
    if used_defaults {
        warn!(path = %args.config.display(), "config file not found, using defaults");
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::SeqCst);
        })
        .wrap_err("install Ctrl-C handler")?;
    }

    match &args.cmd {
        Commands::Live {
            frames,
            refresh_hz,
            scheme,
            fps,
        } => run_live(&cfg, *frames, *refresh_hz, *scheme, *fps, &shutdown),
        Commands::Capture {
            frames,
            output,
            grid,
        } => run_capture(&cfg, *frames, output.as_deref(), *grid, &shutdown),
        Commands::SelfCheck => run_self_check(&cfg),
    }
}

fn load_config(args: &Cli) -> eyre::Result<(Config, bool)> {
    if !args.config.exists() {
        return Ok((Config::default(), true));
    }
    let text = fs::read_to_string(&args.config)
        .wrap_err_with(|| format!("read config {}", args.config.display()))?;
    let cfg = thermocam_config::load_toml(&text)
        .wrap_err_with(|| format!("parse config {}", args.config.display()))?;
    cfg.validate()
        .wrap_err_with(|| format!("validate config {}", args.config.display()))?;
    Ok((cfg, false))
}

fn init_logging(args: &Cli, cfg: &Config) {
    let level = cfg.logging.level.as_deref().unwrap_or(&args.log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("thermocam={level},warn")));

    if let Some(path) = cfg.logging.file.as_deref() {
        let appender = match cfg.logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(".", path),
            Some("hourly") => tracing_appender::rolling::hourly(".", path),
            _ => tracing_appender::rolling::never(".", path),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        // File logs are always JSON lines for machine consumption.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .init();
    } else if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_camera(cfg: &Config) -> eyre::Result<Camera<SimulatedSensor>> {
    let mut cam = Camera::new(SimulatedSensor::new());
    if cfg.sensor.acquire_timeout_ms > 0 {
        cam = cam.with_acquire_timeout(Duration::from_millis(cfg.sensor.acquire_timeout_ms));
    }
    cam.set_refresh_rate(cfg.sensor.refresh_hz)?;
    cam.set_resolution(cfg.sensor.resolution)?;
    cam.set_emissivity(cfg.sensor.emissivity)?;
    cam.initialize()?;
    Ok(cam)
}

fn scheme_for(cfg: &Config, arg: Option<SchemeArg>) -> Box<dyn ColorScheme> {
    let kind = match arg {
        Some(SchemeArg::Inferno) => SchemeKind::Inferno,
        Some(SchemeArg::Threshold) => SchemeKind::Threshold,
        None => cfg.display.scheme,
    };
    match kind {
        SchemeKind::Inferno => Box::new(InfernoScheme::new(cfg.display.min_c, cfg.display.max_c)),
        SchemeKind::Threshold => Box::new(ThresholdScheme),
    }
}

fn run_live(
    cfg: &Config,
    frames: Option<u64>,
    refresh_hz: Option<u32>,
    scheme_arg: Option<SchemeArg>,
    show_fps: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<()> {
    let mut cfg = cfg.clone();
    if let Some(hz) = refresh_hz {
        cfg.sensor.refresh_hz = hz;
    }
    let mut cam = build_camera(&cfg)?;
    let scheme = scheme_for(&cfg, scheme_arg);
    info!(refresh_hz = cfg.sensor.refresh_hz, "live view started");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", render::CLEAR_SCREEN)?;

    let mut rendered = 0u64;
    let mut window_start = Instant::now();
    let mut window_frames = 0u32;
    let mut fps = None;
    while !shutdown.load(Ordering::SeqCst) {
        let field = cam.capture(
            cfg.sensor.interpolate_outliers,
            cfg.sensor.correct_bad_pixels,
        )?;
        let stats = frame_stats(field);
        let image = render::render_frame(field, scheme.as_ref(), cfg.display.scale);

        window_frames += 1;
        let elapsed = window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            fps = Some(window_frames as f32 / elapsed.as_secs_f32());
            window_start = Instant::now();
            window_frames = 0;
        }

        write!(out, "{}{}", render::CURSOR_HOME, image)?;
        writeln!(
            out,
            "{}",
            render::status_line(&stats, if show_fps { fps } else { None })
        )?;
        out.flush()?;

        rendered += 1;
        if frames.is_some_and(|n| rendered >= n) {
            break;
        }
    }

    cam.cleanup();
    info!(frames = rendered, "live view stopped");
    Ok(())
}

fn run_capture(
    cfg: &Config,
    frames: u64,
    output: Option<&std::path::Path>,
    grid: bool,
    shutdown: &AtomicBool,
) -> eyre::Result<()> {
    let mut cam = build_camera(cfg)?;

    let mut captured = Vec::new();
    for _ in 0..frames {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        let field = *cam.capture(
            cfg.sensor.interpolate_outliers,
            cfg.sensor.correct_bad_pixels,
        )?;
        captured.push(render::frame_to_json(&field, cam.current_subpage(), grid));
    }
    cam.cleanup();

    let doc = serde_json::to_string_pretty(&serde_json::json!({ "frames": captured }))?;
    match output {
        Some(path) => {
            fs::write(path, doc).wrap_err_with(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), frames = captured.len(), "capture written");
        }
        None => println!("{doc}"),
    }
    Ok(())
}

fn run_self_check(cfg: &Config) -> eyre::Result<()> {
    let mut cam = build_camera(cfg)?;

    cam.capture(true, true)?;
    let first = cam.current_subpage();
    let field = *cam.capture(true, true)?;
    let second = cam.current_subpage();
    let stats = frame_stats(&field);

    if first == second {
        eyre::bail!("self-check failed: subpage did not alternate ({first:?} then {second:?})");
    }
    if !stats.mean_c.is_finite() {
        eyre::bail!("self-check failed: non-finite frame statistics");
    }
    cam.cleanup();

    info!(?first, ?second, mean_c = stats.mean_c, "self-check passed");
    println!(
        "self-check ok: subpages {:?}/{:?}, mean {:.1} C",
        first, second, stats.mean_c
    );
    Ok(())
}
