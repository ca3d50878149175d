//! CLI binary for murmur.

use clap::{Parser, Subcommand};
use murmur::vault::resolver;
use murmur::{DialogController, MurmurConfig, SessionEvent, Vault};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Murmur: voice conversation companion for a markdown note vault.
#[derive(Parser)]
#[command(name = "murmur", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Start a voice conversation with the agent.
    Chat,

    /// Read a note by title.
    Read {
        /// Note title (not the filename).
        title: String,
    },

    /// List note titles in the vault.
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Tracing goes to stderr so stdout stays clean for note content.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("murmur=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => MurmurConfig::from_file(path)?,
        None => {
            let path = MurmurConfig::default_config_path();
            if path.exists() {
                MurmurConfig::from_file(&path)?
            } else {
                MurmurConfig::default()
            }
        }
    };

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(config).await,
        Command::Read { title } => read_note(&config, &title),
        Command::List => list_notes(&config),
    }
}

async fn run_chat(config: MurmurConfig) -> anyhow::Result<()> {
    if config.agent.agent_id.is_empty() {
        anyhow::bail!(
            "no agent id configured; set `agent.agent_id` in {}",
            MurmurConfig::default_config_path().display()
        );
    }

    println!("Murmur v{}", env!("CARGO_PKG_VERSION"));

    let mut controller = DialogController::new(config)?;
    controller.start().await;
    if !controller.is_active() {
        anyhow::bail!("could not start the conversation session");
    }

    println!("\nSession started. Press Ctrl+C to stop.\n");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, ending session...");
                controller.stop();
            }
            event = controller.next_event() => {
                let Some(event) = event else { break };
                let [connection, agent] = controller.status();
                println!("{connection} | {agent}");
                if matches!(event, SessionEvent::Disconnected) {
                    break;
                }
            }
        }
    }

    println!("Session ended.");
    Ok(())
}

fn read_note(config: &MurmurConfig, title: &str) -> anyhow::Result<()> {
    let vault = Vault::open(&config.vault.root_dir)?;
    match resolver::read_note(&vault, title) {
        Some(content) => {
            println!("{content}");
            Ok(())
        }
        None => anyhow::bail!("note not found: {title}"),
    }
}

fn list_notes(config: &MurmurConfig) -> anyhow::Result<()> {
    let vault = Vault::open(&config.vault.root_dir)?;
    let titles = resolver::list_note_titles(&vault);
    if titles.is_empty() {
        println!("(vault is empty)");
    } else {
        println!("{titles}");
    }
    Ok(())
}
