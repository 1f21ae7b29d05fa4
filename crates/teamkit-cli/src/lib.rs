//! Teamkit command line
//!
//! `teamkit check` reports role/template pairs without a template body;
//! `teamkit patch` inserts the shared fallback templates. Both exit with a
//! status that tells "nothing found/changed" apart from "found/changed".

#![warn(unreachable_pub)]

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::PathBuf;
use teamkit_audit::report::{render_patch, render_scan, render_scan_json};
use teamkit_audit::{AuditConfig, Outcome, PatchMode, RecipeBatch, TargetSelection};
use tracing_subscriber::EnvFilter;

/// Exit code for runs that could not complete
pub const EXIT_FAILURE: u8 = 1;

/// Build the command line definition
#[must_use]
pub fn command() -> Command {
    Command::new("teamkit")
        .version(teamkit_audit::VERSION)
        .about("Check and patch template coverage of team recipes")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("recipe-dir")
                .long("recipe-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the recipe documents"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Process documents in parallel"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
        .subcommand(
            Command::new("check")
                .about("Report roles missing a template for a scaffolded file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("text")
                        .value_parser(["text", "json"])
                        .help("Report format"),
                )
                .arg(
                    Arg::new("targets-only")
                        .long("targets-only")
                        .action(ArgAction::SetTrue)
                        .help("Check the configured targets instead of discovering recipes"),
                ),
        )
        .subcommand(
            Command::new("patch")
                .about("Insert shared tools/status/notes templates where missing")
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Report what would change without writing"),
                ),
        )
}

/// Install the tracing subscriber; `RUST_LOG` overrides the verbosity
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve the audit configuration from flags and the optional config file
///
/// # Errors
/// Fails when the config file cannot be read or parsed.
pub fn load_config(matches: &ArgMatches) -> Result<AuditConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AuditConfig::load(path)?,
        None => AuditConfig::new(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("recipe-dir") {
        config.recipe_dir.clone_from(dir);
    }
    if matches.get_flag("parallel") {
        config.parallel = true;
    }
    Ok(config)
}

/// Run the parsed command, writing the report to `out`
///
/// # Errors
/// Fails on configuration errors, an unreadable recipe directory, or when
/// the report cannot be written.
pub fn run(matches: &ArgMatches, out: &mut impl Write) -> Result<Outcome> {
    let config = load_config(matches)?;
    tracing::debug!(?config, "resolved configuration");
    let batch = RecipeBatch::new(config);

    match matches.subcommand() {
        Some(("check", args)) => {
            let selection = if args.get_flag("targets-only") {
                TargetSelection::Fixed
            } else {
                TargetSelection::Discover
            };
            let report = batch.scan(selection)?;

            let rendered = match args.get_one::<String>("format").map(String::as_str) {
                Some("json") => {
                    let mut json = render_scan_json(&report).context("rendering JSON report")?;
                    json.push('\n');
                    json
                }
                _ => render_scan(&report),
            };
            out.write_all(rendered.as_bytes())
                .context("writing report")?;
            Ok(report.outcome())
        }
        Some(("patch", args)) => {
            let mode = if args.get_flag("dry-run") {
                PatchMode::DryRun
            } else {
                PatchMode::Write
            };
            let report = batch.patch(mode)?;
            out.write_all(render_patch(&report).as_bytes())
                .context("writing report")?;
            Ok(report.outcome())
        }
        _ => anyhow::bail!("no subcommand given"),
    }
}
