//! pm-settings
//!
//! Resolves the service configuration once at startup, starts logging from
//! its `logging` section and reports the result. Any resolution failure is
//! fatal and nothing partial is printed.

use anyhow::Result;
use clap::Parser;
use pm_settings::cli::{Cli, Command};
use pm_settings::config::{
    self, ConfigResolver, EmbeddedDocument, FileDocument, Schema, Settings, flatten,
};
use pm_settings::config::source::DEFAULT_ENV_FILE;
use pm_settings::error::ConfigError;
use pm_settings::format::{OutputFormat, format_settings, format_variables};
use pm_settings::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ConfigError>() {
                Some(config_err) => eprintln!("error[{}]: {}", config_err.code(), config_err),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(mut cli: Cli) -> Result<()> {
    match cli.command.take().unwrap_or(Command::Check) {
        Command::Vars(args) => {
            let fields = flatten(Settings::schema());
            let format = args.format.unwrap_or(OutputFormat::Markdown);
            print!("{}", format_variables(&fields, format)?);
        }
        Command::Show(args) => {
            let settings = load_settings(&cli)?;
            let format = args.format.unwrap_or(OutputFormat::Yaml);
            print!("{}", format_settings(&settings, format)?);
        }
        Command::Check => {
            let settings = load_settings(&cli)?;
            let _guard = init_logging(&settings.logging)?;
            info!(
                app = %settings.app.name,
                host = %settings.app.host,
                port = settings.app.port,
                workers = settings.app.workers,
                "configuration ready"
            );
        }
    }

    Ok(())
}

/// Resolve settings, honoring `--config` and `--env-file` when given.
fn load_settings(cli: &Cli) -> Result<Arc<Settings>, ConfigError> {
    if cli.uses_defaults() {
        return config::resolve();
    }

    let env_file = cli
        .env_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    let resolver: ConfigResolver<Settings> = match &cli.config {
        Some(path) => ConfigResolver::with_env_file(FileDocument::new(path), env_file),
        None => ConfigResolver::with_env_file(EmbeddedDocument, env_file),
    };
    resolver.resolve()
}
