//! Q&A Board - Entry Point

use clap::{Parser, Subcommand};
use qaboard::config::ResolvedConfig;
use qaboard::model::AppError;
use qaboard::state::Route;
use qaboard::store::{JsonFileStore, RecordStore};
use qaboard::view::{ColorConfig, LaunchOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Q&A Board - terminal client for a tagged question and answer board
#[derive(Parser, Debug)]
#[command(name = "qaboard")]
#[command(version)]
#[command(about = "Browse, search and edit a Q&A board from the terminal")]
pub struct Args {
    /// Maintenance command; without one the TUI starts
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the record store document
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Questions per list page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Initial screen: "/", "/question/ID" or "/ask"
    #[arg(long, default_value = "/")]
    pub open: String,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

/// One-shot maintenance commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Delete every answer and question, then load the built-in seed set
    Reset,

    /// Insert one question with its answers
    AddQuestion {
        /// JSON file with one question (built-in sample when omitted)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Insert a single question and print the stored row as JSON
    Insert {
        /// Question title
        title: String,
        /// Question body (markdown)
        content: String,
        /// Author name; blank means anonymous
        author: String,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = qaboard::config::resolve(args.config.clone(), args.store.clone(), args.page_size)
        .map_err(AppError::from)?;

    match args.command.take() {
        Some(command) => run_command(command, &config)?,
        None => run_tui(&args, config)?,
    }
    Ok(())
}

fn run_tui(args: &Args, config: ResolvedConfig) -> Result<(), AppError> {
    let _log_guard = qaboard::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let key_bindings = config.key_bindings()?;
    let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::open(&config.store_path)?);

    let options = LaunchOptions {
        settings: config.to_settings(),
        key_bindings,
        colors: ColorConfig::from_env_and_args(args.no_color),
        board_title: config.board_title.clone(),
        initial_route: Route::parse(&args.open),
    };
    qaboard::view::run_with_store(store, options)?;
    Ok(())
}

fn run_command(command: Command, config: &ResolvedConfig) -> Result<(), AppError> {
    let _log_guard = qaboard::logging::init_stderr()?;
    let store = JsonFileStore::open(&config.store_path)?;

    match command {
        Command::Reset => {
            let report = qaboard::maintenance::reset_data(&store)?;
            println!(
                "Reset complete: removed {} answers and {} questions, inserted {} questions with {} answers",
                report.answers_deleted,
                report.questions_deleted,
                report.questions_inserted,
                report.answers_inserted
            );
            for title in &report.skipped {
                println!("Skipped: {title}");
            }
        }
        Command::AddQuestion { file } => {
            let inserted = qaboard::maintenance::add_question(&store, file.as_deref())?;
            println!(
                "Added question {} with {} answers",
                inserted.question.id, inserted.answers
            );
        }
        Command::Insert {
            title,
            content,
            author,
            tags,
        } => {
            let row = qaboard::maintenance::insert_question(&store, &title, &content, &author, tags)?;
            let json = serde_json::to_string_pretty(&row)
                .map_err(qaboard::maintenance::MaintenanceError::from)?;
            println!("{json}");
        }
    }
    Ok(())
}
