use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bouquet::api::{create_router, AppState};
use bouquet::config::Config;
use bouquet::llm::{LlmProvider, TextGenerator};
use bouquet::models::{ArtifactReport, ConversationState, ExtractionResult, UploadedArtifact};
use bouquet::processing::{ContentExtractor, PlanningPipeline, TimelineRequest, UploadIntake};
use bouquet::services::ChatService;
use bouquet::storage::OutputStore;
use bouquet::transcription::{Transcriber, TranscriptionProvider};

#[derive(Parser)]
#[command(name = "bouquet")]
#[command(about = "Self-hostable wedding planner assistant")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Chat with the planner assistant in the terminal
    Chat,
    /// Generate a day-of timeline from local files
    Timeline {
        /// Documents to read (pdf, docx, txt, csv)
        files: Vec<PathBuf>,
        /// Meeting recording to transcribe (mp3, wav, m4a)
        #[arg(long)]
        audio: Vec<PathBuf>,
        /// Extra instruction appended to the context
        #[arg(long, default_value = "")]
        instruction: String,
        /// Existing timeline to model the formatting on
        #[arg(long)]
        reference: Option<PathBuf>,
        /// Keep the generated timeline in the output directory
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();

    tracing::info!(
        "Initializing transcription provider: {}...",
        config.transcription.model
    );
    let transcription = TranscriptionProvider::new(&config.transcription);
    if !transcription.is_available() {
        tracing::warn!("Transcription unavailable - audio uploads will be reported as failures");
    }

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - timeline generation and chat are disabled");
    }

    let transcriber: Arc<dyn Transcriber> = Arc::new(transcription);
    let generator: Arc<dyn TextGenerator> = Arc::new(llm);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, transcriber, generator).await,
        Command::Chat => chat_loop(config, transcriber, generator).await,
        Command::Timeline {
            files,
            audio,
            instruction,
            reference,
            save,
        } => {
            let request = TimelineCli {
                files,
                audio,
                instruction,
                reference,
                save,
            };
            timeline(config, transcriber, generator, request).await
        }
    }
}

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bouquet=info,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn serve(
    config: Config,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn TextGenerator>,
) -> anyhow::Result<()> {
    if config.server.api_keys.is_empty() {
        tracing::warn!("BOUQUET_API_KEYS is not set - the API is open to anyone who can reach it");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, transcriber, generator);

    let cancel_token = CancellationToken::new();

    tracing::info!("Starting chat session sweeper...");
    let sessions = state.sessions.clone();
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Chat session sweeper shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(sessions.sweep_interval_secs())) => {
                    sessions.sweep_expired().await;
                }
            }
        }
    });

    let app = create_router(state);

    tracing::info!("Bouquet starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn chat_loop(
    config: Config,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn TextGenerator>,
) -> anyhow::Result<()> {
    if !generator.is_available() {
        anyhow::bail!("No LLM configured. Set LLM_MODEL (and LLM_API_KEY) to chat.");
    }

    let intake = UploadIntake::new(&config.storage.upload_dir, transcriber);
    let chat = ChatService::new(intake, generator);
    let mut session = ConversationState::new();

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Wedding planner assistant. Type 'exit' to leave.\n")
        .await?;

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            stdout.write_all(b"Goodbye, and congratulations!\n").await?;
            break;
        }

        match chat.reply(&mut session, message).await {
            Ok(reply) => {
                stdout
                    .write_all(format!("\nPlanner: {reply}\n").as_bytes())
                    .await?;
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat reply failed");
                stdout
                    .write_all(format!("\n[error] {e}\n").as_bytes())
                    .await?;
            }
        }
    }

    Ok(())
}

struct TimelineCli {
    files: Vec<PathBuf>,
    audio: Vec<PathBuf>,
    instruction: String,
    reference: Option<PathBuf>,
    save: bool,
}

async fn read_artifact(path: &Path) -> anyhow::Result<UploadedArtifact> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedArtifact::new(name, bytes))
}

fn print_report(report: &ArtifactReport) {
    match &report.result {
        ExtractionResult::Success { text } => {
            println!("  [ok]    {} ({} chars)", report.name, text.chars().count());
        }
        ExtractionResult::Failure(failure) => {
            println!(
                "  [{}] {}: {}",
                failure.kind, report.name, failure.message
            );
        }
    }
}

async fn timeline(
    config: Config,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn TextGenerator>,
    cli: TimelineCli,
) -> anyhow::Result<()> {
    if cli.files.is_empty() && cli.audio.is_empty() && cli.instruction.trim().is_empty() {
        anyhow::bail!("Nothing to plan from: pass at least one file, --audio or --instruction");
    }

    let mut artifacts = Vec::with_capacity(cli.files.len() + cli.audio.len());
    for path in cli.files.iter().chain(cli.audio.iter()) {
        artifacts.push(read_artifact(path).await?);
    }

    let reference_example = match &cli.reference {
        Some(path) => {
            let artifact = read_artifact(path).await?;
            let text = ContentExtractor::new()
                .extract_upload(&artifact)
                .await
                .with_context(|| format!("failed to read reference {}", path.display()))?;
            Some(text)
        }
        None => None,
    };

    let intake = UploadIntake::new(&config.storage.upload_dir, transcriber);
    let pipeline = PlanningPipeline::new(
        intake,
        generator,
        OutputStore::new(&config.storage.output_dir),
    );

    let outcome = pipeline
        .generate_timeline(TimelineRequest {
            artifacts,
            instruction: cli.instruction,
            reference_example,
            save_output: cli.save,
        })
        .await?;

    println!("Files:");
    for report in &outcome.reports {
        print_report(report);
    }
    println!("\n{}", outcome.timeline);

    if let Some(output) = &outcome.output {
        println!(
            "\nSaved as {} in {}",
            output.id,
            pipeline.outputs().root().display()
        );
    }

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
