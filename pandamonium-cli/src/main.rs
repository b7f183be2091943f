//! PANDAMONIUM command line tools
//!
//! `pandamonium reset-db [--dev]` reinitializes the database, optionally
//! seeding the development defaults, and confirms in the same words the
//! old Flask command used.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pandamonium_app::AppConfig;
use pandamonium_core::PandaResult;
use pandamonium_storage::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "pandamonium", about = "PANDAMONIUM administration tools")]
struct Cli {
    /// Configuration file; development defaults apply when absent.
    #[arg(long, global = true, default_value = "pandamonium.yml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Réinitialise les données de la base de données.
    ResetDb {
        /// Générer la base de données en mode dev (valeurs par défaut).
        #[arg(short, long)]
        dev: bool,
    },
}

fn load_config(path: &PathBuf) -> PandaResult<AppConfig> {
    if path.exists() {
        AppConfig::load(path)
    } else {
        tracing::debug!(path = %path.display(), "no configuration file, using dev defaults");
        Ok(AppConfig::dev())
    }
}

fn reset_confirmation(dev: bool) -> String {
    if dev {
        "[PANDAMONIUM] Reset de la base de données effectué avec les valeurs par défaut."
            .to_string()
    } else {
        "[PANDAMONIUM] Reset de la base de données effectué sans valeurs par défaut.".to_string()
    }
}

fn run(cli: Cli) -> PandaResult<()> {
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::ResetDb { dev } => {
            let store = SqliteStore::open(&config.database.path)?;
            store.reset(dev)?;
            println!("{}", reset_confirmation(dev));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_mentions_seeding() {
        assert!(reset_confirmation(true).contains("avec"));
        assert!(reset_confirmation(false).contains("sans"));
    }

    #[test]
    fn test_cli_parses_reset_db() {
        let cli = Cli::try_parse_from(["pandamonium", "reset-db", "--dev"]).unwrap();
        assert!(matches!(cli.command, Commands::ResetDb { dev: true }));

        let cli = Cli::try_parse_from(["pandamonium", "reset-db"]).unwrap();
        assert!(matches!(cli.command, Commands::ResetDb { dev: false }));
    }

    #[test]
    fn test_missing_config_falls_back_to_dev_defaults() {
        let config = load_config(&PathBuf::from("/nonexistent/pandamonium.yml")).unwrap();
        assert_eq!(config, AppConfig::dev());
    }
}
