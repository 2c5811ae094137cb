use clap::{Parser, Subcommand};
use leadsift::cli::{self as prog_cli, Command};
use leadsift::config::{AppConfig, Backend, load_config};
use leadsift::filter::EmailExclusion;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leadsift", version, about = "Lead search service", long_about = None)]
struct Cli {
    #[arg(long, help = "Path to a config file (TOML). Searched before LEADSIFT_CONFIG and the default locations.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Store backend: mongo|memory. Overrides config and LEADSIFT_STORE.")]
    backend: Option<Backend>,
    #[arg(long, help = "NDJSON or JSON-array file for the memory backend")]
    data_file: Option<PathBuf>,
    #[arg(long, help = "Owner email exclusion: always|when-requested")]
    email_exclusion: Option<EmailExclusion>,
    #[arg(long, help = "Log directory (default: current directory)")]
    log_dir: Option<PathBuf>,
    #[arg(long, help = "Log level: error|warn|info|debug|trace")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Serve the search API and page over HTTP")]
    Serve {
        #[arg(long, help = "Listen address, e.g. 0.0.0.0:3000")]
        bind: Option<String>,
    },
    #[command(about = "Run one search and print the JSON payload")]
    Search {
        #[arg(help = "Filter options as JSON, e.g. {\"minFollowers\":1000,\"positiveKeywords\":[\"food\"]}")]
        filters: Option<String>,
        #[arg(long, help = "Print only the results array")]
        array: bool,
    },
    #[command(about = "Print the aggregation pipeline the filters compile to")]
    Pipeline {
        #[arg(help = "Filter options as JSON")]
        filters: Option<String>,
    },
    #[command(about = "Show compiled features and the effective configuration")]
    Features,
}

fn apply_cli(cfg: &mut AppConfig, cli: &Cli) {
    if let Some(b) = cli.backend {
        cfg.store.backend = b;
    }
    if let Some(p) = &cli.data_file {
        cfg.store.data_file = Some(p.clone());
    }
    if let Some(e) = cli.email_exclusion {
        cfg.email_exclusion = e;
    }
    if let Some(d) = &cli.log_dir {
        cfg.log_dir = Some(d.clone());
    }
    if let Some(l) = &cli.log_level {
        cfg.log_level = Some(l.clone());
    }
    if let Commands::Serve { bind: Some(b) } = &cli.command {
        cfg.bind = b.clone();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut cfg = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    apply_cli(&mut cfg, &cli);
    if let Err(e) = leadsift::logger::configure_from_env(cfg.log_dir.as_deref(), cfg.log_level.as_deref()) {
        eprintln!("warning: logging disabled: {e}");
    }

    let cmd = match cli.command {
        Commands::Serve { .. } => Command::Serve,
        Commands::Search { filters, array } => Command::Search { filters, array },
        Commands::Pipeline { filters } => Command::Pipeline { filters },
        Commands::Features => Command::Features,
    };
    if let Err(e) = prog_cli::run(&cfg, cmd).await {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
