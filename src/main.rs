// src/main.rs
mod config;
mod document;
mod extractors;
mod storage;
mod utils;

use clap::Parser;
use config::ExtractionRules;
use document::{download, PdfDocument};
use extractors::RecordExtractor;
use std::path::PathBuf;
use storage::StorageManager;
use utils::page_debug::PageDumper;
use utils::AppError;

/// Command Line Interface for the cosmetic annex ingredient extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the annex PDF
    #[arg(short, long, default_value = "Technical Documents.pdf")]
    input: PathBuf,

    /// Download the PDF from this URL instead of reading --input
    #[arg(long)]
    url: Option<String>,

    /// Where to write the extracted records (JSON)
    #[arg(short, long, default_value = "cosmetic_safety_data_final.json")]
    output: PathBuf,

    /// JSON rules file overriding section patterns, columns and denylists
    /// (falls back to the ANNEX_RULES_PATH environment variable)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Write annotated page text dumps into this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Skip writing the <output>_meta.json sidecar
    #[arg(long)]
    no_metadata: bool,
}

#[tokio::main]
async fn main() {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction for args: {:?}", args);

    // Any failure ends the run here without output; the exit status stays 0.
    match run(&args).await {
        Ok(count) => {
            println!("\nSuccess! Extracted {} validated ingredients.", count);
            println!("Saved to {}", args.output.display());
        }
        Err(e) => {
            tracing::error!("Extraction failed: {}", e);
            println!("Error: {}", e);
        }
    }
}

async fn run(args: &Args) -> Result<usize, AppError> {
    // 3. Load extraction rules
    let rules_path = config::resolve_rules_path(args.rules.as_deref());
    let rules = ExtractionRules::load(rules_path.as_deref())?;

    // 4. Open the document, downloading it first if a URL was given
    let (document, source) = match &args.url {
        Some(url) => {
            let bytes = download::fetch_pdf(url).await?;
            (PdfDocument::from_bytes(&bytes)?, url.clone())
        }
        None => (PdfDocument::open_file(&args.input)?, args.input.display().to_string()),
    };
    tracing::info!("Processing {} ({} pages)", source, document.page_count());

    // 5. Run the extraction pass
    let mut extractor = RecordExtractor::new(&rules);
    if let Some(dir) = &args.debug_dir {
        extractor = extractor.with_page_dumps(PageDumper::new(dir)?);
        tracing::info!("Writing page dumps to {}", dir.display());
    }
    let report = extractor.run(document.pages())?;

    // 6. Persist records and metadata
    let storage = StorageManager::new(&args.output)?;
    storage.save_records(&report.records)?;
    if !args.no_metadata {
        storage.save_metadata(&report, &source)?;
    }

    Ok(report.records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arguments() {
        let args = Args::parse_from(["annex_extractor"]);
        assert_eq!(args.input, PathBuf::from("Technical Documents.pdf"));
        assert_eq!(args.output, PathBuf::from("cosmetic_safety_data_final.json"));
        assert!(args.url.is_none());
        assert!(!args.no_metadata);
    }

    #[test]
    fn test_missing_input_fails_before_writing() {
        let dir = std::env::temp_dir().join(format!("annex_extractor_main_{}", std::process::id()));
        let output = dir.join("out.json");
        let args = Args::parse_from([
            "annex_extractor",
            "--input",
            dir.join("missing.pdf").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);

        let result = tokio_test::block_on(run(&args));
        assert!(matches!(result, Err(AppError::Document(_))));
        assert!(!output.exists());
    }
}
