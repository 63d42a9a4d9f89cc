//! University CLI
//!
//! Opens a university store, seeds it on demand and runs the repository
//! demonstrations or simple listings.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "university")]
#[command(about = "University persistence demos", long_about = None)]
struct Cli {
    /// SQLite database file; an in-memory store is used when omitted
    #[arg(long, env = "UNIVERSITY_DB", global = true)]
    db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "UNIVERSITY_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, env = "UNIVERSITY_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed the store and run every repository demonstration
    Demo,
    /// List students
    Students(commands::list::ListArgs),
    /// List courses
    Courses(commands::list::ListArgs),
    /// List departments
    Departments(commands::list::ListArgs),
    /// Check core linkage
    Ping,
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(config) = log_config(&cli)? {
        university_core::init_logging(&config)?;
    }

    let context = commands::Context {
        db: cli.db,
        json: cli.json,
    };

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => commands::demo::execute(&context),
        Commands::Students(args) => commands::list::students(&context, &args),
        Commands::Courses(args) => commands::list::courses(&context, &args),
        Commands::Departments(args) => commands::list::departments(&context, &args),
        Commands::Ping => commands::ping::execute(&context),
    }
}

/// File logging is enabled only when a log directory is configured.
fn log_config(cli: &Cli) -> Result<Option<university_core::LogConfig>, String> {
    let Some(log_dir) = &cli.log_dir else {
        return Ok(None);
    };
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(university_core::default_log_level());
    university_core::LogConfig::new(level, log_dir).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{log_config, Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn demo_is_the_default_command() {
        let cli = Cli::try_parse_from(["university"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "university",
            "students",
            "--seed",
            "--sort",
            "age",
            "--desc",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::Students(args)) => {
                assert!(args.seed);
                assert!(args.desc);
                assert_eq!(args.sort.as_deref(), Some("age"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_level_falls_back_to_the_build_default() {
        let log_dir = std::env::temp_dir().join("university-cli-logs");
        let cli = Cli::try_parse_from([
            "university".to_string(),
            "--log-dir".to_string(),
            log_dir.display().to_string(),
            "ping".to_string(),
        ])
        .unwrap();
        let config = log_config(&Cli {
            log_level: None,
            ..cli
        })
        .unwrap()
        .expect("log dir enables logging");
        assert_eq!(config.level(), university_core::default_log_level());
        assert_eq!(config.log_dir(), log_dir.as_path());
    }

    #[test]
    fn explicit_log_level_wins_and_no_dir_disables_logging() {
        let log_dir = std::env::temp_dir().join("university-cli-logs");
        let cli = Cli::try_parse_from([
            "university".to_string(),
            "--log-dir".to_string(),
            log_dir.display().to_string(),
            "--log-level".to_string(),
            "WARN".to_string(),
        ])
        .unwrap();
        assert_eq!(log_config(&cli).unwrap().unwrap().level(), "warn");

        let without_dir = Cli {
            log_dir: None,
            ..cli
        };
        assert!(log_config(&without_dir).unwrap().is_none());
    }

    #[test]
    fn desc_requires_sort() {
        assert!(Cli::try_parse_from(["university", "courses", "--desc"]).is_err());
    }
}
