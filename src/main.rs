//! lang-redirect
//!
//! Redirects each visitor to the landing page matching their browser's
//! `Accept-Language` preferences.
//!
//! ```text
//!     Client Request ──▶ request id ──▶ Accept-Language ──▶ resolver ──▶ 302 Location
//!                                                              │
//!                                                        site map (TOML,
//!                                                        hot reloaded)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lang_redirect::config::{load_config, ConfigError};
use lang_redirect::lifecycle::startup;
use lang_redirect::negotiation::resolve_with;

#[derive(Parser)]
#[command(name = "lang-redirect")]
#[command(about = "Redirect visitors to their preferred language's landing page", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "lang-redirect.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the redirect server (default)
    Serve,
    /// Validate the configuration and list supported languages
    Check,
    /// Print the landing page a given Accept-Language value resolves to
    Resolve {
        /// Accept-Language header value; omit to simulate a missing header
        #[arg(long)]
        header: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => startup::run(&cli.config).await.map_err(Into::into),
        Commands::Check => check(&cli.config).map_err(Into::into),
        Commands::Resolve { header } => resolve_header(&cli.config, header.as_deref()).map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn check(path: &std::path::Path) -> Result<(), ConfigError> {
    let config = load_config(path)?;
    let sites = config.site_map()?;
    println!("{}: ok", path.display());
    for language in sites.languages() {
        println!("  {language} -> {}", sites.get(language).unwrap_or_default());
    }
    Ok(())
}

fn resolve_header(path: &std::path::Path, header: Option<&str>) -> Result<(), ConfigError> {
    let config = load_config(path)?;
    let sites = config.site_map()?;
    let resolution = resolve_with(header, &sites, config.negotiation.invalid_weight);
    println!("{}", resolution.location);
    if resolution.fallback {
        eprintln!("(fallback: no supported language matched)");
    }
    Ok(())
}
