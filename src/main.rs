//! # Scriptdeck: The Main Entry Point
//!
//! Parses the command line, sets up logging, and wires the pieces together:
//! locate the script folder, scan it once, then either show the menu, print the
//! list, or launch one script by name.
//!
//! Scriptdeck itself runs as the current user. Only scripts the classifier flags
//! go through UAC, one consent prompt per launch.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use log::{debug, error, info, warn, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

mod classifier;
mod elevation;
mod error;
mod invariant_ppt;
mod launcher;
mod menu;
mod scanner;
mod system;

use classifier::{Classifier, KeywordSet};
use launcher::Launcher;
use scanner::ScriptDescriptor;

/// The primary Command Line Interface (CLI) configuration.
#[derive(Parser)]
#[command(name = "scriptdeck")]
#[command(
    about = "Launch the PowerShell scripts that sit next to this executable",
    long_about = None
)]
struct Cli {
    /// The sub-command to execute. Defaults to the interactive menu.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Scan this folder instead of the executable's own folder.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Turn on verbose logging.
    ///
    /// - `-v`: Debug
    /// - `-vv`: Trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the numbered script list and launch whatever is picked.
    Menu,
    /// Print every script and whether it needs administrator rights.
    List {
        /// Print the entries as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Launch a single script by name (case-insensitive, without `.ps1`).
    Run {
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    init_logging(log_level);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Terminal log lines go to stderr; stdout carries only program output (`list --json`).
const LOG_TERMINAL_MODE: TerminalMode = TerminalMode::Stderr;

/// Logs to stderr, and to `scriptdeck.log` in the local data folder when it can be created.
///
/// Logging failures never stop the application.
fn init_logging(level: LevelFilter) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        LOG_TERMINAL_MODE,
        ColorChoice::Auto,
    )];

    if let Some(dirs) = ProjectDirs::from("", "", "scriptdeck") {
        let log_dir = dirs.data_local_dir();
        let file = std::fs::create_dir_all(log_dir)
            .and_then(|_| File::create(log_dir.join("scriptdeck.log")));
        if let Ok(file) = file {
            loggers.push(WriteLogger::new(level, Config::default(), file));
        }
    }

    let _ = CombinedLogger::init(loggers);
}

/// The folder holding the running executable. Scripts are expected next to it.
fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    exe.parent()
        .map(PathBuf::from)
        .context("executable has no parent directory")
}

fn run(cli: Cli) -> Result<()> {
    let dir = match cli.dir {
        Some(d) => d,
        None => executable_dir()?,
    };

    if elevation::is_elevated() {
        info!("Running elevated; flagged scripts will not need another prompt.");
    } else {
        debug!("Running as a standard user.");
    }

    let classifier = Classifier::new(KeywordSet::default());
    debug!("Classifying with {} admin keywords", classifier.keywords().len());
    let scripts = scanner::scan(&dir, &classifier);
    let launcher = Launcher::native();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            menu::run(&dir, &scripts, stdin.lock(), &mut io::stdout(), |s| launcher.launch(s))?;
        }
        Commands::List { json } => print_list(&mut io::stdout(), &scripts, json)?,
        Commands::Run { name } => {
            let Some(script) = find_script(&scripts, &name) else {
                bail!("no script named {:?} in {}", name, dir.display());
            };
            if let Err(e) = launcher.try_launch(script) {
                // The launch itself failing is not fatal to the tool.
                warn!("Could not launch {:?}: {}", script.name(), e);
            }
        }
    }

    Ok(())
}

fn find_script<'a>(scripts: &'a [ScriptDescriptor], name: &str) -> Option<&'a ScriptDescriptor> {
    scripts.iter().find(|s| s.name().eq_ignore_ascii_case(name))
}

fn print_list<W: Write>(out: &mut W, scripts: &[ScriptDescriptor], json: bool) -> Result<()> {
    let entries = menu::entries(scripts);
    if json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(out, "No .ps1 scripts found.")?;
        return Ok(());
    }
    menu::render(out, &entries)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let args = ["scriptdeck", "-vv", "--dir", "C:\\tools", "run", "Fix Spooler"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.dir, Some(PathBuf::from("C:\\tools")));
        assert!(matches!(cli.command, Some(Commands::Run { ref name }) if name == "Fix Spooler"));

        let cli = Cli::try_parse_from(["scriptdeck"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["scriptdeck", "list", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }

    #[test]
    fn test_find_script_is_case_insensitive() {
        let scripts = vec![
            ScriptDescriptor::new("Cleanup", "/s/Cleanup.ps1", false),
            ScriptDescriptor::new("reset", "/s/reset.ps1", true),
        ];
        assert_eq!(find_script(&scripts, "cleanup").map(|s| s.name()), Some("Cleanup"));
        assert_eq!(find_script(&scripts, "RESET").map(|s| s.name()), Some("reset"));
        assert!(find_script(&scripts, "missing").is_none());
    }

    #[test]
    fn test_terminal_logs_stay_off_stdout() {
        assert!(matches!(LOG_TERMINAL_MODE, TerminalMode::Stderr));
    }

    #[test]
    fn test_list_json_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let cleanup = "Remove-Item $env:TEMP\\* -Recurse";
        std::fs::write(dir.path().join("cleanup.ps1"), cleanup).unwrap();
        std::fs::write(dir.path().join("spooler.ps1"), "Stop-Service Spooler").unwrap();
        let scripts = scanner::scan(dir.path(), &Classifier::new(KeywordSet::default()));

        let mut out = Vec::new();
        print_list(&mut out, &scripts, true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["label"], "cleanup");
        assert_eq!(entries[0]["elevated"], false);
        assert_eq!(entries[1]["label"], "spooler (requires administrator)");
        assert_eq!(entries[1]["elevated"], true);
    }

    #[test]
    fn test_list_json_empty_is_empty_array() {
        let mut out = Vec::new();
        print_list(&mut out, &[], true).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }

    #[test]
    fn test_executable_dir_exists() {
        assert!(executable_dir().unwrap().is_dir());
    }
}
