//! Bookcard CLI - AI summary cards for books
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, setting up logging and handling top-level errors.

use bookcard::app::EMPTY_TITLE_NOTICE;
use bookcard::{ui, BookCard, CardService, Config};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookcard")]
#[command(author, version, about = "Turn a book title into an AI summary card", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single card and print it
    Card {
        /// Title of the book
        title: String,
        /// Print the card as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Print shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "bookcard", &mut std::io::stdout());
        }
        Some(Commands::Card { title, json }) => {
            let config = Config::load()?;
            init_stderr_logging(&config);

            let title = title.trim();
            if title.is_empty() {
                anyhow::bail!(EMPTY_TITLE_NOTICE);
            }

            let service = CardService::from_config(&config)?;
            let card = service.generate_card(title).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                print_card(&card);
            }
        }
        None => {
            // Default: Launch the TUI
            let config = Config::load()?;
            let _guard = init_file_logging(&config)?;

            let service = CardService::from_config(&config)?;
            ui::run(Arc::new(service)).await?;
        }
    }

    Ok(())
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level))
}

/// Log to stderr for one-shot commands
fn init_stderr_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Log to a file while the TUI owns the terminal
fn init_file_logging(config: &Config) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log.directory)?;
    let file_appender = tracing_appender::rolling::never(&config.log.directory, "bookcard.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(guard)
}

fn print_card(card: &BookCard) {
    let (r, g, b) = card.accent_rgb();

    println!("{}", format!("=== {} ===", card.title).truecolor(r, g, b).bold());
    if !card.author.is_empty() {
        println!("by {}\n", card.author.dimmed());
    }

    println!("📖 Summary:");
    println!("  {}\n", card.summary);

    println!("📌 Key takeaways:");
    for (i, takeaway) in card.takeaways.iter().enumerate() {
        println!("  {}. {}", i + 1, takeaway);
    }

    println!("\n💬 Quote:");
    println!("  {}\n", format!("\"{}\"", card.quote).italic());

    println!("🔍 Detailed analysis:");
    let total = card.detailed_analysis.len();
    for (i, page) in card.detailed_analysis.iter().enumerate() {
        println!("  {}", format!("[{} / {}]", i + 1, total).truecolor(r, g, b));
        println!("  {}\n", page);
    }
}
