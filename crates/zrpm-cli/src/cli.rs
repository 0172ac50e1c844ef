use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Force black and white output
    #[arg(long, global = true, visible_alias = "nocolor")]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(ClapArgs, Clone, Debug)]
pub struct QueryArgs {
    /// Package names or glob patterns
    #[arg(required = true, value_name = "QUERY")]
    pub query: Vec<String>,

    /// Comma-separated list of architectures (i586, x86_64, noarch).
    /// Use 'all' to search every architecture
    #[arg(required = false, long)]
    pub arch: Option<String>,

    /// Don't limit packages to their latest versions
    #[arg(required = false, long, visible_alias = "showduplicates")]
    pub show_duplicates: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display information about the repositories
    #[clap(name = "repo")]
    Repo {
        /// Show disabled repositories too
        #[arg(required = false, short, long)]
        all: bool,
    },

    /// Search for a package by name
    #[command(arg_required_else_help = true)]
    #[clap(name = "search", visible_alias = "s")]
    Search(QueryArgs),

    /// Display detailed information about a package
    #[command(arg_required_else_help = true)]
    #[clap(name = "show", visible_alias = "info")]
    Show(QueryArgs),

    /// Install or upgrade packages
    #[command(arg_required_else_help = true)]
    #[clap(name = "install", visible_alias = "i")]
    Install {
        /// Packages to install
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Remove packages
    #[command(arg_required_else_help = true)]
    #[clap(name = "remove")]
    Remove {
        /// Packages to remove
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Download lists of new/upgradable packages
    #[clap(name = "update")]
    Update,

    /// Perform an upgrade, possibly installing and removing packages
    #[clap(name = "upgrade", visible_alias = "u")]
    Upgrade,

    /// Download binary RPMs
    #[command(arg_required_else_help = true)]
    #[clap(name = "download")]
    Download {
        /// Packages to download
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Download the source RPMs (SRPMs)
    #[command(arg_required_else_help = true)]
    #[clap(name = "source")]
    Source {
        /// Packages to download sources for
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// List files in package or which package has installed file
    #[command(arg_required_else_help = true)]
    #[clap(name = "files")]
    Files {
        /// Packages or files
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// Print the effective configuration
    #[clap(name = "config")]
    Config,

    /// Generate default config with documentation
    #[clap(name = "defconfig")]
    DefConfig,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let args =
            Args::try_parse_from(["zrpm", "s", "boomaga", "qt*", "--arch", "all", "--showduplicates"])
                .unwrap();

        match args.command {
            Commands::Search(query) => {
                assert_eq!(query.query, vec!["boomaga", "qt*"]);
                assert_eq!(query.arch.as_deref(), Some("all"));
                assert!(query.show_duplicates);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_package_arguments_required() {
        assert!(Args::try_parse_from(["zrpm", "install"]).is_err());
        assert!(Args::try_parse_from(["zrpm", "remove"]).is_err());
        assert!(Args::try_parse_from(["zrpm", "files"]).is_err());
        assert!(Args::try_parse_from(["zrpm", "update"]).is_ok());
    }

    #[test]
    fn test_global_flags() {
        let args = Args::try_parse_from(["zrpm", "repo", "--all", "-vv", "--nocolor"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.no_color);
        assert!(matches!(args.command, Commands::Repo { all: true }));
    }
}
