//! bookfetch CLI
//!
//! Searches the catalog and downloads books from the command line.

use std::path::PathBuf;

use bookfetch::{
    error::{AppError, Result},
    models::{BookRecord, Config, DownloadRequest, SECRET_KEY_ENV},
    services::{BookSearcher, DownloadResolver},
    utils::http,
};
use clap::{Parser, Subcommand};

/// bookfetch - search and download books
#[derive(Parser, Debug)]
#[command(name = "bookfetch", version, about = "Search and download books")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "bookfetch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a book by its hash, overwriting a file of the same name
    Download {
        /// Record hash from the search results
        hash: String,

        /// Title used for the file name
        #[arg(long)]
        title: String,

        /// File format used as the extension
        #[arg(long, default_value = "")]
        format: String,

        /// Destination directory (default: config or ANNAS_DOWNLOAD_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fast download API key (default: config or ANNAS_SECRET_KEY)
        #[arg(long)]
        key: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_books(books: &[BookRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books found.");
        return Ok(());
    }

    let blocks: Vec<String> = books.iter().map(BookRecord::to_string).collect();
    println!("{}", blocks.join("\n\n"));
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    config.apply_env();
    init_logging(cli.verbose, &config.logging.level);

    log::debug!("Using configuration from {}", cli.config.display());

    match cli.command {
        Command::Search { query, json } => {
            config.validate()?;
            let client = http::create_async_client(&config.http)?;
            let searcher = BookSearcher::new(client, &config)?;

            let books = searcher.search(&query.join(" ")).await?;
            print_books(&books, json)?;
        }

        Command::Download {
            hash,
            title,
            format,
            output,
            key,
        } => {
            config.validate()?;
            let secret_key = key.or(config.download.secret_key.clone()).ok_or_else(|| {
                AppError::config(format!(
                    "No download key given. Pass --key or set {SECRET_KEY_ENV}"
                ))
            })?;
            let dest_dir = output.unwrap_or_else(|| PathBuf::from(&config.download.directory));

            let client = http::create_async_client(&config.http)?;
            let resolver = DownloadResolver::new(client, config.endpoints.clone());
            let request = DownloadRequest::new(hash, title, format);

            let path = resolver.download(&request, &secret_key, &dest_dir).await?;
            println!("Downloaded to {}", path.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
