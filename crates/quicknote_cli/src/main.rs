//! Command-line front end for the QuickNote core.
//!
//! # Responsibility
//! - Stand in for the list/editor screens: list, show, add, edit, delete.
//! - Treat a store that cannot be opened as fatal.
//!
//! Positions on the command line are 1-based, as printed by `list`.

use clap::{Parser, Subcommand};
use log::error;
use quicknote_core::{
    core_version, init_logging, CoreConfig, EditorState, MutationOutcome, Note, NotesRepository,
    SqliteNoteGateway,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const DELETE_PROMPT: &str = "Are you sure you want to delete note?";

#[derive(Debug, Parser)]
#[command(name = "quicknote", version, about = "Keep short notes in a local store")]
struct Cli {
    /// Note store file (overrides QUICKNOTE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for log files (overrides QUICKNOTE_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides QUICKNOTE_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all notes.
    List,
    /// Print one note.
    Show { position: usize },
    /// Create a note.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Edit a note; omitted fields keep their current text.
    Edit {
        position: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete {
        position: usize,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Failure reported to the user with its exit code.
enum CliError {
    Fatal(String),
    Rejected(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Fatal(_) => 1,
            Self::Rejected(_) => 2,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Fatal(message) | Self::Rejected(message) => message,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quicknote: {}", err.message());
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }

    if let Some(log_dir) = &config.log_dir {
        // Logging is best effort; the notes still work without it.
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("quicknote: logging disabled: {err}");
        }
    }

    let gateway = SqliteNoteGateway::open(&config.db_path).map_err(|err| {
        error!(
            "event=cli_start module=cli status=error version={} error={err}",
            core_version()
        );
        CliError::Fatal(format!(
            "cannot open note store `{}`: {err}",
            config.db_path.display()
        ))
    })?;
    let mut notes = NotesRepository::new(gateway);

    match cli.command {
        Command::List => {
            list(&notes);
            Ok(())
        }
        Command::Show { position } => {
            let (_, note) = resolve(&notes, position)?;
            print_note(position, &note);
            Ok(())
        }
        Command::Add { title, content } => {
            let commit = EditorState::creating()
                .commit(&title, &content)
                .map_err(|err| CliError::Rejected(format!("note not saved: {err}")))?;
            report(notes.save(&commit), "Note created.")
        }
        Command::Edit {
            position,
            title,
            content,
        } => {
            let (index, note) = resolve(&notes, position)?;
            let editor = EditorState::editing(note, index);
            let title = title.unwrap_or_else(|| editor.title().to_string());
            let content = content.unwrap_or_else(|| editor.content().to_string());
            let commit = editor
                .commit(&title, &content)
                .map_err(|err| CliError::Rejected(format!("note not saved: {err}")))?;
            report(notes.save(&commit), "Note updated.")
        }
        Command::Delete { position, yes } => {
            let (index, note) = resolve(&notes, position)?;
            if !yes && !confirm(&note)? {
                println!("Cancelled.");
                return Ok(());
            }
            report(notes.delete(index), "Note deleted.")
        }
    }
}

fn list(notes: &NotesRepository<SqliteNoteGateway>) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }
    for (index, note) in notes.notes().iter().enumerate() {
        println!("{:>3}. {}  ({})", index + 1, note.title, note.timestamp);
    }
}

fn print_note(position: usize, note: &Note) {
    println!("#{position} {}", note.title);
    println!("created: {}", note.timestamp);
    println!();
    println!("{}", note.content);
}

fn resolve(
    notes: &NotesRepository<SqliteNoteGateway>,
    position: usize,
) -> Result<(usize, Note), CliError> {
    position
        .checked_sub(1)
        .and_then(|index| notes.note_at(index).map(|note| (index, note)))
        .ok_or_else(|| {
            CliError::Rejected(format!(
                "no note at position {position} ({} note(s) stored)",
                notes.count()
            ))
        })
}

fn confirm(note: &Note) -> Result<bool, CliError> {
    print!("{DELETE_PROMPT} \"{}\" [y/N] ", note.title);
    io::stdout()
        .flush()
        .map_err(|err| CliError::Fatal(err.to_string()))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|err| CliError::Fatal(err.to_string()))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Delete" | "delete"))
}

fn report(outcome: MutationOutcome, success: &str) -> Result<(), CliError> {
    match outcome {
        MutationOutcome::Applied => {
            println!("{success}");
            Ok(())
        }
        MutationOutcome::NoOp => Err(CliError::Rejected(
            "note no longer exists; nothing changed".to_string(),
        )),
        MutationOutcome::Failed => Err(CliError::Fatal(
            "the note store rejected the change".to_string(),
        )),
    }
}
