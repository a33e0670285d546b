use crate::config::ReporterKind;
use crate::progress::ProgressLogRouter;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Where the catalog and the archives are, shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CatalogArgs {
    pub config_path: Option<String>,
    pub catalog_path: Option<String>,
    pub output_dir: Option<String>,
    pub base_url: Option<String>,
    pub extension: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Command {
    Sync {
        catalog: CatalogArgs,
        reporter: Option<ReporterKind>,
        download_parallelism: Option<usize>,
        checking_parallelism: Option<usize>,
        request_timeout_secs: Option<u64>,
        verify_downloads: Option<bool>,
    },
    Check {
        catalog: CatalogArgs,
        checking_parallelism: Option<usize>,
    },
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "gamesync",
    version,
    author = "Nick Guletskii",
    about = "Verify a local collection of game archives against known checksums and fetch whatever is missing or corrupted"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, ClapArgs)]
struct CliCatalogArgs {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional settings file (TOML, YAML or JSON)"
    )]
    config: Option<String>,

    #[arg(
        short = 'i',
        long = "catalog",
        value_name = "FILE",
        help = "Game catalog to verify against [default: games.json]"
    )]
    catalog: Option<String>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory holding the archives [default: bin]"
    )]
    output_dir: Option<String>,

    #[arg(
        long = "base-url",
        value_name = "URL",
        help = "Base URL archives are fetched from"
    )]
    base_url: Option<String>,

    #[arg(
        long = "extension",
        value_name = "EXT",
        help = "Archive file extension [default: zip]"
    )]
    extension: Option<String>,
}

impl From<CliCatalogArgs> for CatalogArgs {
    fn from(args: CliCatalogArgs) -> Self {
        Self {
            config_path: args.config,
            catalog_path: args.catalog,
            output_dir: args.output_dir,
            base_url: args.base_url,
            extension: args.extension,
        }
    }
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Verify every archive and download the missing or corrupted ones
    Sync {
        #[command(flatten)]
        catalog: CliCatalogArgs,

        #[arg(
            short = 'r',
            long = "reporter",
            value_name = "KIND",
            help = "How progress is displayed [default: terminal]"
        )]
        reporter: Option<ReporterKind>,

        #[arg(
            long = "download-parallelism",
            value_name = "N",
            help = "Maximum number of simultaneous downloads [default: 16]"
        )]
        download_parallelism: Option<usize>,

        #[arg(
            long = "checking-parallelism",
            value_name = "N",
            help = "Maximum number of concurrent file digest checks [default: 128]"
        )]
        checking_parallelism: Option<usize>,

        #[arg(
            long = "request-timeout",
            value_name = "SECS",
            help = "Give up on a download after this many seconds"
        )]
        request_timeout: Option<u64>,

        #[arg(
            long = "no-verify-downloads",
            help = "Do not check downloaded archives against their expected digest",
            action = ArgAction::SetTrue
        )]
        no_verify_downloads: bool,
    },

    /// Verify every archive without downloading anything
    Check {
        #[command(flatten)]
        catalog: CliCatalogArgs,

        #[arg(
            long = "checking-parallelism",
            value_name = "N",
            help = "Maximum number of concurrent file digest checks [default: 128]"
        )]
        checking_parallelism: Option<usize>,
    },
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    for directive in ["hyper_util=warn", "reqwest=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_writer(ProgressLogRouter::global())
        .with_env_filter(filter)
        .init();

    let command = match cli.command {
        CliCommand::Sync {
            catalog,
            reporter,
            download_parallelism,
            checking_parallelism,
            request_timeout,
            no_verify_downloads,
        } => Command::Sync {
            catalog: catalog.into(),
            reporter,
            download_parallelism,
            checking_parallelism,
            request_timeout_secs: request_timeout,
            verify_downloads: no_verify_downloads.then_some(false),
        },
        CliCommand::Check {
            catalog,
            checking_parallelism,
        } => Command::Check {
            catalog: catalog.into(),
            checking_parallelism,
        },
    };

    Args { command, log_level }
}
