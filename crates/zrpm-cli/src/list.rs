use nu_ansi_term::{
    Color::{Green, Yellow},
    Style,
};
use tracing::{debug, info};
use zrpm_index::{Package, PackageState, Search};
use zrpm_utils::bytes::format_bytes;

use crate::{
    cli::QueryArgs,
    error::ZrpmResult,
    state::AppState,
    utils::{format_time, highlight, pad, Theme},
};

const NAME_WIDTH: usize = 40;
const VERSION_WIDTH: usize = 15;
const ARCH_WIDTH: usize = 8;

async fn find<'a>(state: &'a AppState, args: &QueryArgs) -> ZrpmResult<Search<'a>> {
    let archs = state.resolve_arch(args.arch.as_deref()).await?;
    let latest_only = !(args.show_duplicates || state.config().show_duplicates());
    debug!(
        query = ?args.query,
        archs = ?archs,
        latest_only = latest_only,
        "searching packages"
    );

    let catalog = state.catalog().await?;
    Ok(catalog.search(args.query.as_slice(), archs.as_slice(), latest_only)?)
}

fn state_marker(state: PackageState, theme: &Theme) -> String {
    match state {
        PackageState::Installed => theme.paint(Green, "I").to_string(),
        PackageState::Upgradable => theme.paint(Yellow, "U").to_string(),
        PackageState::NotInstalled => " ".to_string(),
    }
}

/// One search result line: state, name, version, arch and summary.
pub fn format_search_line<S: AsRef<str>>(pkg: &Package, terms: &[S], theme: &Theme) -> String {
    let name = highlight(&pkg.name, terms, theme);
    format!(
        "{}  {} {:<vw$} {:<aw$} {}",
        state_marker(pkg.state(), theme),
        pad(&name, &pkg.name, NAME_WIDTH),
        pkg.version,
        pkg.arch,
        pkg.summary,
        vw = VERSION_WIDTH,
        aw = ARCH_WIDTH,
    )
}

pub async fn search_packages(state: &AppState, args: &QueryArgs) -> ZrpmResult<()> {
    let theme = state.theme();

    for pkg in find(state, args).await? {
        info!(
            name = pkg.name,
            version = pkg.version,
            arch = pkg.arch,
            repository = pkg.repository,
            installed = pkg.installed_version,
            summary = pkg.summary,
            "{}",
            format_search_line(pkg, args.query.as_slice(), theme)
        );
    }

    Ok(())
}

/// The detailed description block of a package.
pub fn format_details(pkg: &Package, theme: &Theme) -> Vec<String> {
    let bold = Style::new().bold();
    let mut lines = vec![
        format!("Name        : {}", theme.paint(bold, &pkg.name)),
        format!("Summary     : {}", pkg.summary),
        format!("Version     : {:<10} {:<10}", pkg.version, pkg.arch),
    ];

    match pkg.state() {
        PackageState::NotInstalled => lines.push("Not installed".to_string()),
        PackageState::Installed => {
            lines.push(format!(
                "Installed   : {}",
                theme.paint(Green, &pkg.installed_version)
            ))
        }
        PackageState::Upgradable => {
            lines.push(format!(
                "Installed   : {}",
                theme.paint(Yellow, &pkg.installed_version)
            ))
        }
    }

    lines.extend([
        format!("Group       : {}", pkg.group),
        format!(
            "Size        : RPM: {}     Files: {}",
            format_bytes(pkg.package_size, 1),
            format_bytes(pkg.installed_size, 1)
        ),
        format!("Source RPM  : {}", pkg.source_rpm),
        format!("URL         : {}", pkg.url),
        format!("License     : {}", pkg.license),
        format!("Repository  : {}", pkg.repository),
    ]);

    let description = pkg.description.trim_start_matches('\n');
    if !description.is_empty() {
        lines.push(description.to_string());
    }
    lines
}

pub async fn show_packages(state: &AppState, args: &QueryArgs) -> ZrpmResult<()> {
    let theme = state.theme();

    for pkg in find(state, args).await? {
        for line in format_details(pkg, theme) {
            info!("{line}");
        }
        info!("");
    }

    Ok(())
}

pub fn list_repositories(state: &AppState, all: bool) -> ZrpmResult<()> {
    let theme = state.theme();
    let bold = Style::new().bold();

    for repo in state.repositories()? {
        if !repo.is_active() && !all {
            continue;
        }

        let last_update = match (repo.is_active(), repo.last_update) {
            (true, Some(time)) => format_time(time),
            _ => "-".to_string(),
        };

        info!(
            name = repo.name,
            url = repo.url,
            ignore = repo.ignore,
            "{}\n    last update: {}\n    URL: {}\n",
            theme.paint(bold, &repo.name),
            last_update,
            repo.url
        );
    }

    Ok(())
}
