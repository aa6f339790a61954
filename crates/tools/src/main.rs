use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use effects::EffectKind;
use registry::EntityRegistry;
use runtime::config::EngineConfig;
use tools::{ReplayOptions, parse_instructions, replay};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "replay" => cmd_replay(args),
        "kinds" => cmd_kinds(),
        _ => Err(usage()),
    }
}

fn cmd_replay(args: Vec<String>) -> Result<(), String> {
    // geopulse replay <batch.json> [--frames N] [--frame-ms MS] [--config PATH]
    let mut input: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut options = ReplayOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" => {
                i += 1;
                options.frames = flag_value(&args, i, "--frames")?
                    .parse()
                    .map_err(|e| format!("--frames: {e}"))?;
            }
            "--frame-ms" => {
                i += 1;
                options.frame_ms = flag_value(&args, i, "--frame-ms")?
                    .parse()
                    .map_err(|e| format!("--frame-ms: {e}"))?;
            }
            "--config" => {
                i += 1;
                config_path = Some(PathBuf::from(flag_value(&args, i, "--config")?));
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            s => {
                if input.is_some() {
                    return Err(format!("unexpected extra input: {s}"));
                }
                input = Some(PathBuf::from(s));
            }
        }
        i += 1;
    }

    let input = input.ok_or_else(usage)?;
    if !(options.frame_ms.is_finite() && options.frame_ms >= 0.0) {
        return Err(format!("--frame-ms must be a non-negative number, got {}", options.frame_ms));
    }

    let config = match config_path {
        Some(path) => EngineConfig::from_file(path),
        None => EngineConfig::discover(),
    }
    .map_err(|e| e.to_string())?;
    init_tracing(&config.logging.level);

    let json = fs::read_to_string(&input).map_err(|e| format!("read {input:?}: {e}"))?;
    let instructions = parse_instructions(&json).map_err(|e| format!("parse {input:?}: {e}"))?;

    let mut registry = EntityRegistry::new(config);
    let report = replay(&mut registry, instructions, options);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report).map_err(|e| format!("write report: {e}"))?;
    writeln!(out).map_err(|e| format!("write report: {e}"))?;
    Ok(())
}

fn cmd_kinds() -> Result<(), String> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for kind in EffectKind::ALL {
        let input = if kind.is_area() { "polygons" } else { "points" };
        let motion = if kind.is_animated() { "animated" } else { "static" };
        writeln!(out, "{:<18} {input:<9} {motion}", kind.as_str()).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

/// `RUST_LOG` wins; otherwise the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "geopulse".to_string());
    format!(
        "Usage:\n  {exe} replay <batch.json> [--frames N] [--frame-ms MS] [--config PATH]\n  {exe} kinds\n\nNotes:\n- The batch file is a JSON array of effect instructions ({{\"type\", \"data\", \"options\", \"id\"}}).\n- The report (batch outcomes, per-kind stats, samples at the final frame, metrics) is printed as JSON on stdout.\n- Config comes from --config, else $GEOPULSE_CONFIG, else ./config/geopulse.toml, else defaults.\n"
    )
}
