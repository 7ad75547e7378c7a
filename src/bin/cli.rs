//! AccessiScan CLI
//!
//! Local execution entry point. For AWS Lambda, use `accessiscan-lambda`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use accessiscan::{
    error::{AppError, Result},
    models::{Config, ScanMode, ScanRequest, ScanResult},
    pipeline::{self, Scanner},
    report,
    services::HttpFetcher,
    utils::url::normalize_input,
};
use clap::{Parser, Subcommand, ValueEnum};

/// AccessiScan - Web Accessibility Checker
#[derive(Parser, Debug)]
#[command(
    name = "accessiscan",
    version,
    about = "Scans web pages for common accessibility issues"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "accessiscan.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and scan a page, or a bounded set of same-site pages
    Scan {
        /// Page to scan; `https://` is assumed when no scheme is given
        url: String,

        /// Also scan same-site pages linked from the first page
        #[arg(long)]
        full: bool,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan a saved HTML file without touching the network
    Analyze {
        /// HTML file to scan
        file: PathBuf,

        /// URL to report the file under (defaults to the file path)
        #[arg(long)]
        url: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    Text,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn render(result: &ScanResult, format: Format, pretty: bool) -> Result<String> {
    Ok(match format {
        Format::Text => report::render_text(result),
        Format::Json if pretty => serde_json::to_string_pretty(result)?,
        Format::Json => serde_json::to_string(result)?,
    })
}

async fn emit(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, report).await?;
            log::info!("Report saved to {}", path.display());
        }
        None => println!("{report}"),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Scan {
            url,
            full,
            format,
            output,
        } => {
            config.validate()?;
            let mode = if full { ScanMode::Full } else { ScanMode::Single };
            let request = ScanRequest::new(normalize_input(&url), mode);

            let fetcher = HttpFetcher::new(&config.scanner)?;
            let scanner = Scanner::new(fetcher, config.scanner.clone());
            let result = scanner.scan(&request).await?;

            let report = render(&result, format, config.output.pretty_json)?;
            emit(&report, output.as_deref()).await?;
        }

        Command::Analyze { file, url, format } => {
            let html = tokio::fs::read_to_string(&file).await?;
            let label = url.unwrap_or_else(|| file.display().to_string());
            log::info!("Analyzing {} ({} bytes)", file.display(), html.len());

            let page = pipeline::scan_document(&label, &html);
            let result = pipeline::build_scan_result(&label, ScanMode::Single, vec![page]);

            let report = render(&result, format, config.output.pretty_json)?;
            emit(&report, None).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", cli.config.display());
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_failure(e: &AppError) {
    let kind = e.kind();
    eprintln!("error [{}]: {}", kind, kind.user_message());
}
