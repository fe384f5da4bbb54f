//! FKey Mode - Entry Point
//!
//! Command-line front end for reading and switching the Fn-key mode of the
//! built-in keyboard.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fkey_mode::core::config::Config;
use fkey_mode::hid::error::status_of;
use fkey_mode::hid::{FnKeyManager, FnMode, HidRegistry};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "fkey-mode", about = "Read or switch the keyboard Fn-key mode")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current mode
    Get {
        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Media and brightness keys first
    Apple,
    /// Standard F1-F12 keys first
    Other,
    /// Switch to the opposite of the current mode
    Toggle,
    /// Switch to the configured default mode
    Apply,
    /// Print the config file location
    ConfigPath {
        /// Write a default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Loaded config from {:?}", config_path);

    #[cfg(feature = "mock-hid")]
    let manager = FnKeyManager::with_service_class(
        fkey_mode::hid::MemoryRegistry::with_mode(FnMode::Apple),
        config.hid.service_class.clone(),
    );

    #[cfg(all(not(feature = "mock-hid"), target_os = "macos"))]
    let manager = FnKeyManager::with_service_class(
        fkey_mode::hid::IoKitRegistry::new(),
        config.hid.service_class.clone(),
    );

    #[cfg(all(not(feature = "mock-hid"), not(target_os = "macos")))]
    let manager = FnKeyManager::with_service_class(
        fkey_mode::hid::UnsupportedRegistry,
        config.hid.service_class.clone(),
    );

    run(&cli, &config_path, &config, &manager)
}

fn run<R: HidRegistry>(
    cli: &Cli,
    config_path: &Path,
    config: &Config,
    manager: &FnKeyManager<R>,
) -> Result<ExitCode> {
    let code = match &cli.command {
        Commands::Get { json } => {
            let result = manager.read_mode();
            let mode = result.clone().unwrap_or(FnMode::Unknown);

            if *json {
                let value = serde_json::json!({
                    "mode": mode,
                    "error": result.err().map(|e| e.to_string()),
                });
                println!("{}", value);
            } else {
                if let Err(e) = &result {
                    error!("{}", e);
                }
                println!("{}", mode);
            }

            if mode.is_known() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Apple => switch(manager, FnMode::Apple),
        Commands::Other => switch(manager, FnMode::Other),
        Commands::Apply => switch(manager, config.behavior.default_mode),
        Commands::Toggle => match manager.toggle() {
            Ok(mode) => {
                info!("Fn keys toggled to {}", mode);
                println!("{}", mode);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Toggle failed: {}", e);
                println!("{}", e.status_code());
                ExitCode::FAILURE
            }
        },
        Commands::ConfigPath { init } => {
            if *init && !config_path.exists() {
                match &cli.config {
                    Some(path) => Config::default().save_to(path)?,
                    None => Config::default().save()?,
                }
                info!("Wrote default config to {:?}", config_path);
            }
            println!("{}", config_path.display());
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

/// Switch to `target` and print the numeric status
fn switch<R: HidRegistry>(manager: &FnKeyManager<R>, target: FnMode) -> ExitCode {
    let result = manager.set_mode(target);
    let status = status_of(&result);

    match &result {
        Ok(()) => info!("Fn keys switched to {}", target),
        Err(e) => error!("Switching Fn keys to {} failed: {}", target, e),
    }

    println!("{}", status);
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fkey_mode::hid::MemoryRegistry;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("fkey-mode").chain(args.iter().copied()))
    }

    #[test]
    fn test_config_path_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();
        let cli = parse(&["--config", path_str, "config-path", "--init"]);
        let manager = FnKeyManager::new(MemoryRegistry::with_mode(FnMode::Apple));

        run(&cli, &path, &Config::default(), &manager).unwrap();

        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.behavior.default_mode, FnMode::Other);
        assert_eq!(manager.registry().opens(), 0);
    }

    #[test]
    fn test_config_path_without_init_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();
        let cli = parse(&["--config", path_str, "config-path"]);
        let manager = FnKeyManager::new(MemoryRegistry::with_mode(FnMode::Apple));

        run(&cli, &path, &Config::default(), &manager).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_apply_uses_configured_mode() {
        let mut config = Config::default();
        config.behavior.default_mode = FnMode::Apple;
        let cli = parse(&["apply"]);
        let manager = FnKeyManager::new(MemoryRegistry::with_mode(FnMode::Other));

        run(&cli, Path::new("unused.toml"), &config, &manager).unwrap();

        assert_eq!(manager.current_fn_key_state(), FnMode::Apple);
        assert_eq!(manager.registry().opens(), manager.registry().closes());
    }
}
