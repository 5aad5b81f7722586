pub mod commands;
pub mod http_source;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use basket_core::config::{CatalogSourceKind, ConfigOverrides, LoadOptions, LogFormat};
use basket_core::{Category, SortOrder};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "basket",
    about = "Shopping basket demo CLI",
    long_about = "Browse the product catalog, run scripted basket sessions, and inspect configuration.",
    after_help = "Examples:\n  basket catalog --category fruits --sort price\n  basket shop session.txt\n  basket check"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a basket.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog source (static|remote)")]
    catalog_source: Option<CatalogSourceKind>,
    #[arg(long, global = true, help = "Fetch the catalog from this URL instead of the bundled one")]
    catalog_url: Option<String>,
    #[arg(long, global = true, help = "Catalog fetch timeout in seconds (1..=300)")]
    catalog_timeout_secs: Option<u64>,
    #[arg(long, global = true, help = "Log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Log format (compact|pretty|json)")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Load the catalog and list products, optionally for one category")]
    Catalog {
        #[arg(long, help = "Only list this category (vegetables|flowers|fruits)")]
        category: Option<Category>,
        #[arg(long, default_value = "name", help = "Ordering: name|price")]
        sort: SortOrder,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run a scripted shopping session (one command per line)")]
    Shop {
        #[arg(default_value = "-", help = "Script file, or `-` for stdin")]
        script: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and catalog readiness, returning a JSON report")]
    Check,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_source: self.catalog_source,
                catalog_url: self.catalog_url.clone(),
                catalog_timeout_secs: self.catalog_timeout_secs,
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    logging::init(&options);

    let result = match cli.command {
        Command::Catalog { category, sort, json } => {
            commands::catalog::run(&options, category, sort, json)
        }
        Command::Shop { script } => commands::shop::run(&options, &script),
        Command::Config => commands::config::run(&options),
        Command::Check => commands::check::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
