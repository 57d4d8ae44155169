//! Pose-driven render node
//!
//! Watches the pose message file and publishes one PNG per accepted pose.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use pose_render::foundation::logging;
use pose_render::prelude::*;

fn cli() -> Command {
    Command::new("render_node")
        .about("Renders a satellite scene every time a new pose message arrives")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Node configuration (.toml or .ron); built-in defaults when omitted"),
        )
        .arg(
            Arg::new("message")
                .short('m')
                .long("message")
                .value_name("FILE")
                .help("Pose message file, overrides the configuration"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Published image path, overrides the configuration"),
        )
        .arg(
            Arg::new("assets")
                .long("assets")
                .value_name("DIR")
                .help("Directory holding the sun and object meshes"),
        )
        .arg(
            Arg::new("quaternion-policy")
                .long("quaternion-policy")
                .value_name("POLICY")
                .help("Handling of non-unit quaternions")
                .value_parser(["as_is", "normalize", "reject"]),
        )
        .arg(
            Arg::new("poll")
                .long("poll")
                .help("Poll the message file instead of using OS notifications")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-cycles")
                .long("max-cycles")
                .value_name("N")
                .value_parser(clap::value_parser!(u64))
                .help("Stop cleanly after N wake-ups"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .help("Handle a single wake-up, then exit")
                .conflicts_with("max-cycles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log at debug level")
                .action(ArgAction::SetTrue),
        )
}

fn load_config(matches: &ArgMatches) -> Result<NodeConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let path = PathBuf::from(path);
            NodeConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => NodeConfig::default(),
    };

    if let Some(path) = matches.get_one::<String>("message") {
        config = config.with_message_path(path);
    }
    if let Some(path) = matches.get_one::<String>("output") {
        config = config.with_output_path(path);
    }
    if let Some(dir) = matches.get_one::<String>("assets") {
        config = config.with_asset_dir(dir);
    }
    if let Some(policy) = matches.get_one::<String>("quaternion-policy") {
        config = config.with_quaternion_policy(match policy.as_str() {
            "as_is" => QuaternionPolicy::AsIs,
            "reject" => QuaternionPolicy::Reject,
            _ => QuaternionPolicy::Normalize,
        });
    }
    if matches.get_flag("poll") {
        config = config.with_watcher_backend(WatcherBackend::Poll);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init_with_level(level);

    let config = load_config(&matches)?;
    log::info!(
        "Watching {} -> {}",
        config.message_path.display(),
        config.output_path.display()
    );

    let max_cycles = if matches.get_flag("once") {
        Some(1)
    } else {
        matches.get_one::<u64>("max-cycles").copied()
    };

    let mut pipeline = node_pipeline(&config).context("Failed to start watcher")?;
    pipeline.preflight().context("Scene assets are not usable")?;

    let stop = pipeline.stop_token();
    ctrlc::set_handler(move || {
        log::info!("Stop requested");
        stop.stop();
    })
    .context("Failed to install signal handler")?;

    let summary = pipeline.run_limited(max_cycles)?;
    log::info!(
        "Exiting after {} cycles: {} published, {} skipped",
        summary.cycles,
        summary.published,
        summary.skipped
    );
    Ok(())
}
