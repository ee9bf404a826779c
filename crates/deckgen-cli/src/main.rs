//! Deckgen CLI: command-line client for the deck generation service.
//!
//! Set DECKGEN_API_URL (and optionally DECKGEN_POLL_INTERVAL_MS,
//! DECKGEN_POLL_MAX_ATTEMPTS, DECKGEN_SESSION_PATH). `generate` uploads a
//! lecture recording and waits for the generated deck; the browse commands
//! are one-shot queries.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use deckgen_api_client::ApiClient;
use deckgen_cli::{format_size_mb, init_tracing};
use deckgen_core::models::{Deck, UploadRequest};
use deckgen_core::{ClientConfig, MediaKind, Session, SessionStore, UserProfile};
use deckgen_workflow::{GenerationState, Generator, PollConfig};

#[derive(Parser)]
#[command(name = "deckgen", about = "Deck generation service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a lecture recording and generate a flashcard deck
    Generate {
        /// Path to the video/audio file (.mp4, .wav, .mp3, .flac, .ogg)
        file: PathBuf,
        /// Name for the generated deck
        #[arg(long)]
        deck: String,
    },
    /// Query the generation status of a deck once
    Status {
        /// Deck name
        deck: String,
    },
    /// Fetch a completed deck and print its flashcards
    Show {
        /// Deck name
        deck: String,
    },
    /// List deck categories
    Categories,
    /// List the decks in a category
    Decks {
        /// Category name
        category: String,
    },
    /// Export a completed deck to a file or stdout
    Export {
        /// Deck name
        deck: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Tsv)]
        format: ExportFormat,
        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Store an auth session (token + profile) for later requests
    Login {
        /// Bearer token
        #[arg(long)]
        token: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// Remove the stored auth session
    Logout,
    /// Print the stored auth profile
    Whoami,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// answer<TAB>question, one card per line (bulk-import shape)
    Tsv,
    /// A:/Q: blocks for printing
    Sheet,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()
        .context("Failed to load configuration. Set DECKGEN_API_URL")?;
    let sessions = SessionStore::new(config.session_path.clone());

    // Session commands never touch the network.
    match &cli.command {
        Commands::Login { token, email, name } => {
            let session = Session {
                token: token.clone(),
                user: UserProfile {
                    email: email.clone(),
                    name: name.clone(),
                    picture: None,
                },
            };
            sessions.save(&session)?;
            println!("Logged in as {}", session.user.email);
            return Ok(());
        }
        Commands::Logout => {
            sessions.clear()?;
            println!("Logged out");
            return Ok(());
        }
        Commands::Whoami => {
            match sessions.load()? {
                Some(session) => print_json(&session.user)?,
                None => println!("Not logged in"),
            }
            return Ok(());
        }
        _ => {}
    }

    let token = sessions.load()?.map(|session| session.token);
    let client = ApiClient::from_config(&config, token)?;

    match cli.command {
        Commands::Generate { file, deck } => {
            let deck_result = run_generate(&config, client, &file, &deck).await?;
            print_json(&deck_result)?;
        }
        Commands::Status { deck } => {
            let status = client.check_deck_status(&deck).await?;
            print_json(&status)?;
        }
        Commands::Show { deck } => {
            let status = client.fetch_deck(&deck).await?;
            let payload = status.data.unwrap_or_default();
            print_json(&Deck::parse_tsv(&deck, &payload))?;
        }
        Commands::Categories => {
            let categories = client.fetch_categories().await?;
            print_json(&categories)?;
        }
        Commands::Decks { category } => {
            let groups = client.fetch_deck_list(&category).await?;
            print_json(&groups)?;
        }
        Commands::Export {
            deck,
            format,
            output,
        } => {
            let status = client.fetch_deck(&deck).await?;
            let payload = status.data.unwrap_or_default();
            let parsed = Deck::parse_tsv(&deck, &payload);
            let rendered = match format {
                ExportFormat::Tsv => parsed.to_tsv(),
                ExportFormat::Sheet => parsed.to_study_sheet(),
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported {} cards to {}", parsed.len(), path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => unreachable!(),
    }

    Ok(())
}

/// Run the full generation workflow for one file, logging progress as the
/// state machine advances. Ctrl-C cancels the in-flight attempt.
async fn run_generate(
    config: &ClientConfig,
    client: ApiClient,
    file: &PathBuf,
    deck: &str,
) -> anyhow::Result<Deck> {
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let kind = MediaKind::from_extension(extension)?;

    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    info!(file = %file_name, size = %format_size_mb(bytes.len()), "Uploading");

    let request = UploadRequest::new(file_name, kind.content_type(), Bytes::from(bytes))?;
    let generator = Generator::new(
        Arc::new(client),
        PollConfig::from_client_config(config),
    );

    let mut progress = generator.subscribe();
    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let state = progress.borrow_and_update().clone();
            match &state {
                GenerationState::Polling { attempt } => {
                    info!(attempt, "Waiting for deck generation");
                }
                GenerationState::Succeeded { .. } | GenerationState::Failed { .. } => break,
                _ => info!(state = state.name(), "Generation progress"),
            }
        }
    });

    let result = tokio::select! {
        result = generator.generate(deck, request) => result,
        _ = tokio::signal::ctrl_c() => {
            generator.cancel();
            Err(deckgen_core::AppError::Cancelled)
        }
    };
    watcher.abort();

    match result {
        Ok(deck) => Ok(deck),
        Err(err) => {
            // Every workflow failure surfaces one generic notification; the
            // specific cause is already in the logs.
            Err(anyhow::Error::new(err).context("Deck generation failed"))
        }
    }
}
