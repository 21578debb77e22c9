//! nowmeeting CLI entry point.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use nowmeeting_core::{OutputFormatter, TracingConfig, init_tracing};
use nowmeeting_providers::FileSource;
use tracing::{debug, warn};

use nowmeeting_client::actions;
use nowmeeting_client::cli::{Cli, Command, ConfigAction};
use nowmeeting_client::commands::{self, show::View};
use nowmeeting_client::config::ClientConfig;
use nowmeeting_client::error::{ClientError, ClientResult};
use nowmeeting_client::watch;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config),
        None => ClientConfig::load().map_err(ClientError::Config),
    };

    let debug_enabled = cli.debug || loaded.as_ref().is_ok_and(|config| config.debug);
    let tracing_config = if debug_enabled {
        TracingConfig::cli_debug()
    } else if cli.watch {
        TracingConfig::watch()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable default config");
            ClientConfig::default()
        }
    };

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, mut config: ClientConfig) -> ClientResult<()> {
    if let Some(ref timezone) = cli.timezone {
        config.timezone = timezone.clone();
    }
    if let Some(ref data) = cli.data {
        config.data.path = data.clone();
    }
    if let Some(max) = cli.max_title_length {
        config.display.max_title_length = Some(max);
    }
    if cli.no_hyperlinks || !std::io::stdout().is_terminal() {
        config.display.hyperlinks = false;
    }

    // Handle subcommands
    match cli.command {
        #[cfg(feature = "bmlt")]
        Some(Command::Fetch {
            ref output,
            ref root,
        }) => {
            let output = output.as_ref().unwrap_or(&config.data.path);
            commands::fetch::run(&config, output, root).await
        }
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config, &config.data.path),
            ConfigAction::Path => commands::config::path(),
        },
        None => show(&cli, &config).await,
    }
}

async fn show(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let source = FileSource::new(&config.data.path);
    let view = View {
        format: cli.output_format(),
        zone: config.zone(),
        at: cli.at,
    };
    let formatter = OutputFormatter::new(config.to_format_options());
    debug!(path = %source.path().display(), zone = view.zone.name(), "showing meetings");

    if cli.watch {
        return watch::run(&source, &view, &formatter, config.refresh.every_minutes).await;
    }

    let (text, meetings) = commands::show::render(&source, &view, &formatter).await;
    println!("{}", text);
    let meetings = meetings?;
    if !cli.has_action() {
        return Ok(());
    }

    if cli.open_link {
        actions::open_link(&meetings)?;
    }
    if cli.copy_link {
        actions::copy_link(&meetings)?;
    }
    Ok(())
}
