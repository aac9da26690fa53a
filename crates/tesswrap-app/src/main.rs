use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tesswrap_config::{OcrConfig, load_config};
use tesswrap_ocr::{Client, Extension, OcrInput};

pub mod cli;
pub mod render;

use self::cli::{Cli, Commands, Output};

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

/// Defaults, then the config file, then `TESSERACT_*` env, then flags
fn build_config(cli: &Cli) -> Result<OcrConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => OcrConfig::default(),
    };
    config
        .apply_lookup(|key| std::env::var(key).ok())
        .context("Invalid TESSERACT_* environment")?;
    cli.apply(&mut config);
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let client = Client::new(config)
        .await
        .context("Failed to initialize OCR client")?;
    tracing::debug!("tesseract {} ready", client.version());

    match cli.command {
        Commands::Version => {
            println!("tesseract {}", client.version());
        }
        Commands::Langs => {
            let langs = client
                .available_languages()
                .await
                .context("Failed to list languages")?;
            for lang in langs {
                println!("{lang}");
            }
        }
        Commands::Ocr {
            image, output, out, ..
        } => {
            let input = OcrInput::from_path(&image);
            let bytes = recognize(&client, &input, output).await?;
            tracing::info!("{} produced {} bytes", image.display(), bytes.len());
            write_result(out.as_deref(), &bytes)?;
        }
    }
    Ok(())
}

/// Run the requested operation and render it for writing.
/// The language comes from the client config, already merged with `--lang`.
async fn recognize(client: &Client, input: &OcrInput, output: Output) -> Result<Vec<u8>> {
    let bytes = match output {
        Output::Text => client
            .image_to_string(input, None)
            .await
            .context("OCR failed")?
            .into_bytes(),
        Output::Bytes => match client
            .image_to_output(input, None, tesswrap_ocr::OutputType::Bytes)
            .await
            .context("OCR failed")?
        {
            tesswrap_ocr::OcrOutput::Bytes(bytes) => bytes,
            other => anyhow::bail!("unexpected output {:?}", other.output_type()),
        },
        Output::Tsv => extension(client, input, Extension::Tsv).await?,
        Output::Hocr => extension(client, input, Extension::Hocr).await?,
        Output::Xml => extension(client, input, Extension::Xml).await?,
        Output::Pdf => extension(client, input, Extension::Pdf).await?,
        Output::Boxes => {
            let boxes = client
                .image_to_boxes(input, None)
                .await
                .context("Box extraction failed")?;
            render::format_boxes(&boxes).into_bytes()
        }
        Output::Data => {
            let table = client
                .image_to_data(input, None)
                .await
                .context("TSV extraction failed")?;
            let mut json = render::format_data(&table)?;
            json.push('\n');
            json.into_bytes()
        }
    };
    Ok(bytes)
}

async fn extension(client: &Client, input: &OcrInput, extension: Extension) -> Result<Vec<u8>> {
    client
        .image_to_extension(input, None, extension)
        .await
        .with_context(|| format!("{} extraction failed", extension.as_str().to_uppercase()))
}

fn write_result(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Saved result to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
