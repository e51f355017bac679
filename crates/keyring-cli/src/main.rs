//! keyring-bridge CLI - read and write credentials in the native keyring
//!
//! Picks the first enabled backend from the settings (KDE Wallet, then the
//! OS keychain by default) unless `--backend` names one explicitly.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use keyring_bridge::{
    BackendKind, KeyringProvider, ProviderRegistry, SecretBytes, SettingsManager,
};

/// keyring-bridge - credential access through KDE Wallet or the OS keychain
#[derive(Parser, Debug)]
#[command(name = "keyring-bridge")]
#[command(version)]
#[command(about = "Read and write credentials in the native keyring")]
struct Args {
    /// Directory holding settings.json (default: platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Use only this backend instead of the configured preference order
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    #[command(flatten)]
    Keyring(KeyringCommand),
}

/// Commands that need a keyring backend
#[derive(Subcommand, Debug)]
enum KeyringCommand {
    /// Show which backend would be used
    Status,
    /// Print the secret stored under KEY
    Read { key: String },
    /// Store a secret under KEY (from $KEYRING_BRIDGE_SECRET or a prompt)
    Save {
        key: String,
        /// Accepted for compatibility; backends do not store it
        #[arg(long, default_value = "")]
        description: String,
        /// Secret to store; prompted for when absent
        #[arg(long, env = "KEYRING_BRIDGE_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },
    /// Remove the entry stored under KEY
    Delete { key: String },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print effective settings as JSON
    Show,
    /// Write default settings if no file exists yet
    Init,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so `read` output stays clean
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let settings_manager = match &args.config_dir {
        Some(dir) => SettingsManager::with_dir(dir),
        None => SettingsManager::new(),
    }
    .map_err(|e| format!("Failed to load settings: {}", e))?;

    match args.command {
        Command::Config { action } => run_config(&settings_manager, action),
        Command::Keyring(command) => {
            let settings = settings_manager.get();
            let registry = match args.backend {
                Some(kind) => ProviderRegistry::single(kind, settings),
                None => ProviderRegistry::from_settings(settings),
            };

            let Some(provider) = registry.select() else {
                eprintln!("No keyring backend is available");
                return Ok(ExitCode::FAILURE);
            };

            run(provider.as_ref(), command)
        }
    }
}

fn run(
    provider: &dyn KeyringProvider,
    command: KeyringCommand,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        KeyringCommand::Status => {
            println!("{}", provider.backend_name());
        }
        KeyringCommand::Read { key } => {
            let Some(secret) = provider.read(&key) else {
                eprintln!("No entry for '{}'", key);
                return Ok(ExitCode::FAILURE);
            };
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(secret.expose())?;
            stdout.write_all(b"\n")?;
        }
        KeyringCommand::Save {
            key,
            description,
            secret,
        } => {
            let secret = read_secret(secret)?;
            provider.save(&key, &secret, &description);
            debug!("Saved '{}' via {}", key, provider.backend_name());
        }
        KeyringCommand::Delete { key } => {
            provider.delete(&key);
            debug!("Deleted '{}' via {}", key, provider.backend_name());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_config(
    manager: &SettingsManager,
    action: ConfigAction,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            println!("# {}", manager.path().display());
            println!("{}", serde_json::to_string_pretty(manager.get())?);
        }
        ConfigAction::Init => {
            if manager.path().exists() {
                println!("Settings already exist at {}", manager.path().display());
            } else {
                manager.save()?;
                println!("Wrote default settings to {}", manager.path().display());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_secret(secret: Option<String>) -> Result<SecretBytes, Box<dyn std::error::Error>> {
    let value = match secret {
        Some(value) => value,
        None => rpassword::prompt_password("Secret: ")?,
    };
    Ok(SecretBytes::from(value))
}
