//! forms CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "forms")]
#[command(version)]
#[command(about = "Resolve form control themes into component rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a YAML theme into one rule per variant and component
    Resolve {
        /// Theme file (YAML)
        file: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Resolve only this variant
        #[arg(long)]
        variant: Option<String>,

        /// Dotted path of the theme inside the file (e.g. customForms)
        #[arg(long, default_value = "")]
        theme_path: String,

        /// Also print the per-component reset rules
        #[arg(long)]
        base: bool,
    },

    /// Print the built-in option trees
    Defaults {
        /// Only print this component
        kind: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// List the known components
    Kinds,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forms=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            file,
            format,
            variant,
            theme_path,
            base,
        } => commands::resolve::execute(commands::resolve::ResolveArgs {
            file,
            format,
            variant,
            theme_path,
            base,
        }),
        Commands::Defaults { kind, format } => commands::defaults::execute(kind, format),
        Commands::Kinds => commands::defaults::list_kinds(),
    }
}
