use std::process::ExitCode;

use cli::{Cli, Commands};
use log::info;
use tankobon::error::Result;
use tankobon::hierarchy::load_book_config;
use tankobon::prelude::*;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    if let Err(e) = try_main().await {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Flat {
            input,
            title,
            author,
            output,
            language,
        } => {
            let metadata = EbookMetadata {
                title,
                authors: vec![author],
                language,
                ..Default::default()
            };
            let mut builder = ConverterConfig::builder();
            builder.metadata(metadata).source_path(input);
            if let Some(output) = output {
                builder.output_path(output);
            }
            builder.build()?
        }
        Commands::Tree {
            input,
            config,
            output,
        } => {
            let book = load_book_config(&config).await?;
            ConverterConfig::from_book_config(book, input, output)?
        }
    };
    config.preflight_check()?;

    info!("Input folder: {}", config.source_path.display());
    info!("Output file: {}", config.output_file().display());
    info!("Title: {}", config.metadata.title);

    config.convert(&mut StderrProgress::default()).await?;
    info!("✓ Successfully created EPUB file!");
    Ok(())
}
