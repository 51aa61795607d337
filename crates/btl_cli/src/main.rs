//! `btl` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the task store once.
//! - Inject the store into `TaskService` and dispatch subcommands.
//! - Map any command failure to a non-zero exit code.

mod commands;

use btl_core::{flush_logging, init_logging, JsonTaskStore, TaskService, TrackerConfig};
use clap::{CommandFactory, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const BANNER: &str = r"
 _                _               _            _         _ _     _
| |__   ___  _ __(_)_ __   __ _  | |_ ___   __| | ___   | (_)___| |_
| '_ \ / _ \| '__| | '_ \ / _` | | __/ _ \ / _` |/ _ \  | | / __| __|
| |_) | (_) | |  | | | | | (_| | | || (_) | (_| | (_) | | | \__ \ |_
|_.__/ \___/|_|  |_|_| |_|\__, |  \__\___/ \__,_|\___/  |_|_|___/\__|
                          |___/

so you can never leave your terminal
----------------------------------------------------------------
";

/// A boring todo list.
#[derive(Debug, Parser)]
#[command(name = "btl", version, about = "A boring todo list")]
struct Cli {
    /// Path of the tasks JSON file [default: $BTL_DATA_FILE or ~/.task-tracker/tasks.json]
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error [default: $BTL_LOG_LEVEL]
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a new task (deleted at end of day unless --keep is given)
    #[command(visible_alias = "a")]
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        notes: String,
        /// high, medium or low; anything else means medium
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Keep the task after the end of the day
        #[arg(short, long)]
        keep: bool,
    },
    /// List all tasks
    #[command(visible_aliases = ["l", "ls"])]
    List,
    /// Mark a task as completed
    #[command(visible_aliases = ["c", "done"])]
    Complete {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Delete one or more tasks by ID
    #[command(visible_aliases = ["d", "rm"])]
    Delete {
        #[arg(value_name = "TASK_ID", required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Show task statistics
    #[command(visible_alias = "s")]
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print!("{BANNER}");
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    // Flags win over the environment, which `TrackerConfig` already applied.
    let mut config = TrackerConfig::from_env();
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if config.home_fallback {
        eprintln!("Warning: could not determine home directory; using current directory for storage");
    }

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: file logging disabled: {err}");
    }

    let store = match JsonTaskStore::open(&config.data_file) {
        Ok(store) => store,
        Err(err) => {
            eprintln!(
                "Failed to initialize storage at {}: {err}",
                config.data_file.display()
            );
            flush_logging();
            return ExitCode::FAILURE;
        }
    };
    let service = TaskService::new(store);

    let result = match command {
        Command::Add {
            title,
            notes,
            priority,
            keep,
        } => commands::add(&service, title, notes, &priority, keep),
        Command::List => commands::list(&service),
        Command::Complete { id } => commands::complete(&service, &id),
        Command::Delete { ids } => commands::delete(&service, &ids),
        Command::Stats => commands::stats(&service),
    };

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            info!("event=command_failed module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    };
    flush_logging();
    code
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand_and_default_to_unset() {
        let cli = Cli::try_parse_from(["btl", "list", "--data-file", "/tmp/tasks.json"]).unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/tasks.json")));
        assert_eq!(cli.log_level, None);
        assert!(matches!(cli.command, Some(Command::List)));

        // Environment values are applied by `TrackerConfig`, never by the parser.
        let bare = Cli::try_parse_from(["btl", "rm", "1", "2"]).unwrap();
        assert_eq!(bare.data_file, None);
        assert!(matches!(bare.command, Some(Command::Delete { ids }) if ids == ["1", "2"]));
    }
}
