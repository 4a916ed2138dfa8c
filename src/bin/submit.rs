use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docgen::client::{
    DirectoryDownloader, FileUpload, HttpTransport, SubmissionController, SubmissionOutcome, view,
};
use std::{io::Read, path::PathBuf, sync::Arc};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(version, about = "Submit text or a document to the docgen relay and save the result")]
struct CliArguments {
    /// Address of the docgen relay
    #[arg(long, default_value = "http://127.0.0.1:8080", value_name = "url")]
    proxy_url: String,
    /// Where generated documents are saved
    #[arg(short = 'o', long = "output-dir", default_value = ".", value_name = "dir")]
    output_dir: PathBuf,
    /// Output filename; empty means generated_document.docx
    #[arg(short = 'f', long, default_value = "", value_name = "name")]
    filename: String,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Generate from text given inline, read from a file, or piped on stdin
    Text {
        #[arg(short = 't', long, conflicts_with = "input")]
        text: Option<String>,
        #[arg(short = 'i', long, value_name = "path")]
        input: Option<PathBuf>,
    },
    /// Generate from a .docx or .pdf; only the first accepted file is used
    File {
        #[arg(required = true, value_name = "path")]
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match fallible_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether a document was generated.
async fn fallible_main() -> Result<bool> {
    let arguments = CliArguments::parse();
    debug!("{:?}", arguments);

    let downloader = Arc::new(DirectoryDownloader::new(arguments.output_dir.clone()));
    let controller = SubmissionController::new(
        Arc::new(HttpTransport::new(arguments.proxy_url.clone())),
        downloader.clone(),
    );
    controller.set_filename(arguments.filename.clone()).await?;

    let outcome = match arguments.mode {
        Mode::Text { text, input } => {
            let text = match (text, input) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read text from stdin")?;
                    buffer
                }
            };
            controller.set_text(text).await?;

            eprintln!("{}", view::SUBMITTING_MESSAGE);
            Some(controller.submit_text().await?)
        }
        Mode::File { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                let file = FileUpload::from_path(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                files.push(file);
            }

            if files.iter().any(FileUpload::is_accepted) {
                eprintln!("{}", view::SUBMITTING_MESSAGE);
            }
            controller.drop_files(files).await?
        }
    };

    let state = controller.snapshot().await;
    match outcome {
        None => {
            eprintln!("No .docx or .pdf file to submit");
            Ok(false)
        }
        Some(outcome) => {
            if let Some(line) = view::status_line(&state) {
                println!("{}", line);
            }
            if let SubmissionOutcome::Generated { filename } = &outcome {
                if let Ok(path) = downloader.target_path(filename) {
                    println!("Saved to {}", path.display());
                }
            }
            Ok(matches!(outcome, SubmissionOutcome::Generated { .. }))
        }
    }
}
