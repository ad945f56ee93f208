//! Heartify CLI: render two names around a heart.
//!
//! Usage:
//!   heartify render --first A --second B   Export `A-B.png`
//!   heartify bundle [--first A --second B] Package `heartify-project.zip`
//!   heartify session                       Interactive input/result session
//!   heartify check                         Report fonts and configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "heartify",
    about = "Two names, one heart, exported as a shareable image",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the name pair as a PNG
    Render {
        /// First name
        #[arg(long)]
        first: String,

        /// Second name
        #[arg(long)]
        second: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Upscale factor (1-8)
        #[arg(long)]
        scale: Option<u32>,

        /// Regular-weight font file
        #[arg(long)]
        font: Option<PathBuf>,

        /// Bold font file
        #[arg(long)]
        bold_font: Option<PathBuf>,

        /// Print a data URL instead of writing a file
        #[arg(long)]
        data_url: bool,
    },

    /// Package the static project as a ZIP archive
    Bundle {
        /// First name for the README (placeholder when omitted)
        #[arg(long, default_value = "")]
        first: String,

        /// Second name for the README (placeholder when omitted)
        #[arg(long, default_value = "")]
        second: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run an interactive session with a live clock
    Session {
        /// Output directory for downloads
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print notices as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Check fonts and configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = commands::load_config(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    heartify_common::logging::init_logging(&config.logging);

    let outcome = match cli.command {
        Commands::Render {
            first,
            second,
            output,
            scale,
            font,
            bold_font,
            data_url,
        } => {
            let overrides = commands::Overrides {
                output,
                scale,
                font,
                bold_font,
            };
            commands::render::run(overrides.apply(config), first, second, data_url).await
        }
        Commands::Bundle {
            first,
            second,
            output,
        } => {
            let overrides = commands::Overrides {
                output,
                ..Default::default()
            };
            commands::bundle::run(overrides.apply(config), first, second)
        }
        Commands::Session { output, json } => {
            let overrides = commands::Overrides {
                output,
                ..Default::default()
            };
            commands::session::run(overrides.apply(config), json).await
        }
        Commands::Check => commands::check::run(&config, cli.config.as_deref()),
    };

    Ok(outcome?)
}
