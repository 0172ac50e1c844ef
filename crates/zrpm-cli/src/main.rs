use std::path::PathBuf;

use clap::Parser;
use cli::{Args, Commands};
use error::ZrpmResult;
use list::{list_repositories, search_packages, show_packages};
use logging::setup_logging;
use state::AppState;
use tracing::{debug, info};
use utils::Theme;
use zrpm_config::config::{config_path, generate_default_config, Config};
use zrpm_utils::path::resolve_path;

mod cli;
mod error;
mod exec;
mod list;
mod logging;
mod state;
mod utils;

/// The `--config` file made absolute, or the default location.
fn config_file(args: &Args) -> ZrpmResult<PathBuf> {
    match args.config {
        Some(ref c) => Ok(resolve_path(c)?),
        None => Ok(config_path()),
    }
}

async fn handle_cli() -> ZrpmResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    let path = config_file(&args)?;
    debug!(path = %path.display(), "using configuration file");

    if let Commands::DefConfig = args.command {
        generate_default_config(&path)?;
        return Ok(());
    }

    let config = Config::load(&path)?;
    let theme = Theme::new(&config.display(), args.no_color);
    let state = AppState::new(config, theme);

    match args.command {
        Commands::Repo {
            all,
        } => list_repositories(&state, all)?,
        Commands::Search(query) => search_packages(&state, &query).await?,
        Commands::Show(query) => show_packages(&state, &query).await?,
        Commands::Install {
            packages,
        } => exec::install(&state, &packages)?,
        Commands::Remove {
            packages,
        } => exec::remove(&state, &packages)?,
        Commands::Update => exec::update(&state)?,
        Commands::Upgrade => exec::upgrade(&state)?,
        Commands::Download {
            packages,
        } => exec::download(&packages)?,
        Commands::Source {
            packages,
        } => exec::source(&packages)?,
        Commands::Files {
            packages,
        } => exec::files(&packages)?,
        Commands::Config => {
            let content = toml::to_string_pretty(state.config())?;
            info!("{content}");
        }
        Commands::DefConfig => unreachable!(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
