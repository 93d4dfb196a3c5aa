mod domain;
mod error;
mod repo;
mod table;
mod timeago;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use repo::TaskRepository;
use repo::sqlite::SqliteTaskRepo;

#[derive(Parser, Debug)]
#[command(author, version, about = "todo — minimal SQLite-backed task list", long_about = None)]
struct Cli {
    /// Path to SQLite DB file (default: OS data dir)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new task
    Add {
        title: String,
    },
    /// List pending tasks
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Toggle completion of a task
    Complete {
        id: i64,
    },
    /// Delete a task (hidden from listings but kept on disk unless --hard)
    Delete {
        id: i64,
        /// Remove the row permanently
        #[arg(short = 'f', long)]
        hard: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut repo = match cli.db_path.as_ref() {
        Some(path) => SqliteTaskRepo::open(path)?,
        None => SqliteTaskRepo::open_default()?,
    };

    print!("{}", execute(cli.command, &mut repo)?);
    Ok(())
}

/// Run one command against the repository and return the text to print.
fn execute(command: Commands, repo: &mut impl TaskRepository) -> Result<String> {
    match command {
        Commands::Add { title } => {
            if title.trim().is_empty() {
                bail!("task title must not be empty");
            }
            let task = repo.add(&title)?;
            Ok(format!("Task '{}' added!\n", task.title))
        }
        Commands::List { all } => {
            let tasks = if all {
                repo.show_all()?
            } else {
                repo.show_pending()?
            };
            Ok(table::render(&tasks, all))
        }
        // The message stays "completed!" even when the toggle moved the
        // task back to pending; output compatibility with the original.
        Commands::Complete { id } => {
            let task = repo.toggle(id)?;
            Ok(format!("Task '{}' completed!\n", task.title))
        }
        Commands::Delete { id, hard } => {
            let task = if hard {
                repo.delete(id)?
            } else {
                repo.soft_delete(id)?
            };
            Ok(format!("Task '{}' deleted!\n", task.title))
        }
    }
}
