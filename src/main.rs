//! abstract-triage - Biomedical Abstract Triage Assistant
//!
//! Classifies a biomedical abstract into one of five Friedreich's Ataxia
//! research categories using a hosted LLM.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! abstract-triage classify --file abstract.txt
//! abstract-triage classify --example --json
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! abstract-triage serve --port 8501
//! ```

use abstract_triage::{
    config::{ConfigSources, TriageConfig},
    gemini::GeminiClient,
    labels::Label,
    prompts::{build_prompt, EXAMPLE_ABSTRACT},
    server, ClassificationRequest, Classifier,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Biomedical Abstract Triage Assistant
#[derive(Parser)]
#[command(name = "abstract-triage")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Google API key
    #[arg(long, global = true, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Secrets TOML file containing `google_api_key` (default: ./secrets.toml)
    #[arg(long, global = true, env = "TRIAGE_SECRETS_FILE")]
    secrets: Option<PathBuf>,

    /// Gemini API base URL (for proxies/gateways)
    #[arg(long, global = true, env = "GEMINI_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one abstract
    Classify {
        #[command(flatten)]
        input: AbstractInput,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Treat labels outside the five fixed labels as an error
        #[arg(long)]
        strict_labels: bool,
    },

    /// Run the triage web page and JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Treat labels outside the five fixed labels as an error
        #[arg(long)]
        strict_labels: bool,
    },

    /// Print the prompt that would be sent for an abstract (no API call)
    Prompt {
        #[command(flatten)]
        input: AbstractInput,
    },

    /// List the triage labels and their definitions
    Labels,
}

/// Where the abstract text comes from
#[derive(Args)]
struct AbstractInput {
    /// Abstract text, or "-" to read from stdin
    text: Option<String>,

    /// Read the abstract from a file
    #[arg(long, conflicts_with_all = ["text", "example"])]
    file: Option<PathBuf>,

    /// Use the built-in example abstract
    #[arg(long, conflicts_with = "text")]
    example: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_json);

    let sources = ConfigSources {
        api_key: cli.api_key,
        secrets_file: cli.secrets,
        base_url: cli.base_url,
        request_timeout_secs: cli.timeout_secs,
        strict_labels: false,
    };

    match cli.command {
        Commands::Classify {
            input,
            json,
            strict_labels,
        } => {
            let sources = ConfigSources {
                strict_labels,
                ..sources
            };
            run_classify(&sources, &input, json).await
        }
        Commands::Serve {
            port,
            host,
            strict_labels,
        } => {
            let sources = ConfigSources {
                strict_labels,
                ..sources
            };
            run_server(&sources, host, port).await
        }
        Commands::Prompt { input } => {
            let abstract_text = read_abstract(&input)?;
            print!("{}", build_prompt(&abstract_text));
            Ok(())
        }
        Commands::Labels => {
            for (idx, label) in Label::ALL.iter().enumerate() {
                println!("{}. {}", idx + 1, label);
                println!("   {}", label.definition());
            }
            Ok(())
        }
    }
}

fn init_logging(debug: bool, json: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    // stderr keeps `classify --json` output clean
    if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load configuration and build the Gemini-backed classifier. Fails fast
/// when the API key is missing.
fn build_classifier(sources: &ConfigSources) -> Result<Classifier> {
    let config = TriageConfig::load(sources).context("Configuration error")?;
    let client = GeminiClient::new(&config).context("Configuration error")?;
    info!(endpoint = %client.endpoint(), "Gemini client ready");

    Ok(Classifier::new(Arc::new(client)).with_strict_labels(config.strict_labels))
}

// ============================================================================
// Classify
// ============================================================================

async fn run_classify(sources: &ConfigSources, input: &AbstractInput, json: bool) -> Result<()> {
    // Input is checked before configuration so an empty abstract reports the
    // empty-input notice even when no API key is set.
    let request = prepare_request(input)?;
    let classifier = build_classifier(sources)?;

    let result = classifier
        .classify_request(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if result.known_label().is_none() {
        warn!(label = %result.label, "Label is not one of the five triage labels");
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        println!("Classification Result");
        println!("Label: {}", result.label);
        println!("Reasoning: {}", result.reason);
    }

    Ok(())
}

/// Read the abstract and reject empty or whitespace-only text.
fn prepare_request(input: &AbstractInput) -> Result<ClassificationRequest> {
    let abstract_text = read_abstract(input)?;
    ClassificationRequest::new(abstract_text).map_err(|e| anyhow::anyhow!(e.user_message()))
}

/// Resolve the abstract text from the positional argument, a file, stdin or the example.
fn read_abstract(input: &AbstractInput) -> Result<String> {
    if input.example {
        return Ok(EXAMPLE_ABSTRACT.to_string());
    }

    if let Some(ref path) = input.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read abstract from {}", path.display()));
    }

    match input.text.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read abstract from stdin")?;
            Ok(text)
        }
        Some(text) => Ok(text.to_string()),
        None => {
            anyhow::bail!("No abstract given: pass TEXT, --file PATH, --example, or - for stdin")
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(sources: &ConfigSources, host: String, port: u16) -> Result<()> {
    let classifier = build_classifier(sources)?;

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    server::serve(classifier, addr)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text_input(text: &str) -> AbstractInput {
        AbstractInput {
            text: Some(text.to_string()),
            file: None,
            example: false,
        }
    }

    #[test]
    fn test_prepare_request_rejects_blank_text() {
        for text in ["", "  \n\t "] {
            let err = prepare_request(&text_input(text)).unwrap_err();
            assert_eq!(err.to_string(), "Please enter an abstract to classify.");
        }
    }

    #[test]
    fn test_prepare_request_sources() {
        let request = prepare_request(&text_input("Frataxin and iron.")).unwrap();
        assert_eq!(request.abstract_text(), "Frataxin and iron.");

        let example = AbstractInput {
            text: None,
            file: None,
            example: true,
        };
        let request = prepare_request(&example).unwrap();
        assert_eq!(request.abstract_text(), EXAMPLE_ABSTRACT);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Omaveloxolone phase 2 results.\n").unwrap();
        let from_file = AbstractInput {
            text: None,
            file: Some(file.path().to_path_buf()),
            example: false,
        };
        let request = prepare_request(&from_file).unwrap();
        assert_eq!(request.abstract_text(), "Omaveloxolone phase 2 results.\n");
    }

    #[test]
    fn test_prepare_request_without_input() {
        let none = AbstractInput {
            text: None,
            file: None,
            example: false,
        };
        let err = prepare_request(&none).unwrap_err();
        assert!(err.to_string().starts_with("No abstract given"));
    }

    #[tokio::test]
    async fn test_empty_abstract_reported_before_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let sources = ConfigSources {
            api_key: None,
            secrets_file: Some(dir.path().join("absent.toml")),
            ..Default::default()
        };

        let err = run_classify(&sources, &text_input("   "), false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter an abstract to classify.");

        // The same sources fail on configuration once the abstract is valid.
        let err = run_classify(&sources, &text_input("Frataxin."), false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error");
    }
}
