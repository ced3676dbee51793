use anyhow::Context;
use clap::{Arg, Command};
use std::fs;
use std::path::PathBuf;
use structure_maker::config::Config;
use structure_maker::maker::StructureMaker;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let matches = Command::new("make-structure")
        .about("Create a new application structure")
        .long_about("Walks through the model, permission group, permissions, menu and files sections, then generates the configured files from templates")
        .arg(Arg::new("root-segment")
            .long("root-segment")
            .help("Base path for front-end artifacts such as form templates")
            .value_name("PATH")
            .num_args(1))
        .arg(Arg::new("base-path")
            .long("base-path")
            .help("Project root for back-end artifacts")
            .value_name("PATH")
            .num_args(1))
        .arg(Arg::new("stubs-dir")
            .long("stubs-dir")
            .help("Directory with <name>.stub files overriding the built-in templates")
            .value_name("DIR")
            .num_args(1))
        .arg(Arg::new("replay")
            .long("replay")
            .help("Configure from a JSON file instead of prompting")
            .value_name("FILE")
            .num_args(1))
        .arg(Arg::new("strict")
            .long("strict")
            .help("Fail when a rendered file still contains ${...} placeholders")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("no-pause")
            .long("no-pause")
            .help("Do not pause after warnings")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .long("verbose")
            .short('v')
            .help("Log progress to stderr")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("config")
            .long("config")
            .help("Show configuration information")
            .action(clap::ArgAction::SetTrue))
        .get_matches();

    let default_level = if matches.get_flag("verbose") { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;

    // Command line flags override config file and environment
    if let Some(root_segment) = matches.get_one::<String>("root-segment") {
        config.root_segment = PathBuf::from(root_segment);
    }
    if let Some(base_path) = matches.get_one::<String>("base-path") {
        config.base_path = PathBuf::from(base_path);
    }
    if let Some(stubs_dir) = matches.get_one::<String>("stubs-dir") {
        config.stubs_dir = Some(PathBuf::from(stubs_dir));
    }
    if matches.get_flag("strict") {
        config.strict_placeholders = true;
    }
    if matches.get_flag("no-pause") {
        config.pause_ms = 0;
    }

    if matches.get_flag("config") {
        config.show_config_info()?;
        return Ok(());
    }

    let maker = StructureMaker::new(config);

    let written = match matches.get_one::<String>("replay") {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("Failed to read replay file {}", path))?;
            maker.replay(&json, &mut std::io::stdout())?
        }
        None => maker.run()?,
    };

    info!("Generated {} file(s)", written.len());

    Ok(())
}
