//! Command-line interface for failsnip
//! Pulls the failure excerpt out of a CI job log, ready to read or to hand to a summarizer.
//!
//! Usage:
//!   failsnip extract `<path>` [--format `<format>`] [--config `<file>`]  - Print the failure excerpt
//!   failsnip prompt `<path>` [--config `<file>`]                       - Print the summarizer prompt for it
//!   failsnip rules [--config `<file>`]                                 - List the active rules in tier order
//!
//! `<path>` may be `-` to read the log from stdin. Diagnostics go to stderr; raise them with
//! `--verbose` or `RUST_LOG`.
mod formats;

use clap::{Arg, ArgAction, ArgMatches, Command};
use failsnip_config::{ConfigError, FailsnipConfig, Loader};
use failsnip_core::{render_prompt, Extractor, RuleSet, SnippetLoader, Tier};
use formats::{FormatRegistry, Report};
use std::process;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let formats = FormatRegistry::with_defaults();
    let matches = Command::new("failsnip")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Find the part of a CI job log that explains the failure")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log which tier matched and why (stderr)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in configuration")
                .global(true),
        )
        .subcommand(
            log_args(Command::new("extract").about("Print the failure excerpt of a log")).arg(
                Arg::new("format")
                    .long("format")
                    .short('f')
                    .help(format!(
                        "Output format ({})",
                        formats.list_formats().join(", ")
                    ))
                    .long_help(format!(
                        "Output format, defaults to output.format from the config\n{}",
                        formats.describe_formats()
                    )),
            ),
        )
        .subcommand(log_args(
            Command::new("prompt").about("Print the summarizer prompt for the failure excerpt"),
        ))
        .subcommand(Command::new("rules").about("List the active extraction rules in tier order"))
        .get_matches();

    init_tracing(matches.get_flag("verbose"));

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });
    let rules = config.rules().unwrap_or_else(|e| {
        eprintln!("Invalid extraction rules: {}", e);
        process::exit(1);
    });

    match matches.subcommand() {
        Some(("extract", sub)) => {
            let format = sub
                .get_one::<String>("format")
                .cloned()
                .unwrap_or_else(|| config.output.format.clone());
            handle_extract_command(&formats, rules, &config, sub, &format);
        }
        Some(("prompt", sub)) => handle_prompt_command(rules, &config, sub),
        Some(("rules", _)) => handle_rules_command(&rules),
        _ => unreachable!("subcommand is required"),
    }
}

/// Arguments shared by every command that reads a log.
fn log_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("path")
                .help("Path to the job log, or - for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("context")
                .long("context")
                .help("Lines of context around a matched line")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("tail")
                .long("tail")
                .help("Lines returned from the end of the log when nothing matches")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("max-bytes")
                .long("max-bytes")
                .help("Only examine the last N bytes of the log")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,failsnip_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Defaults, then the --config file, then per-command flags.
fn load_config(matches: &ArgMatches) -> Result<FailsnipConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some((_, sub)) = matches.subcommand() {
        let overrides = [
            ("context", "extraction.context_lines"),
            ("tail", "extraction.fallback_lines"),
            ("max-bytes", "input.max_bytes"),
        ];
        for (arg, key) in overrides {
            let value = sub.try_get_one::<u64>(arg).ok().flatten();
            if let Some(value) = value {
                loader = loader.set_override(key, *value)?;
            }
        }
    }
    loader.build()
}

fn load_report(config: &FailsnipConfig, extractor: &Extractor, path: &str) -> Report {
    let loaded = if path == "-" {
        SnippetLoader::from_reader(std::io::stdin().lock())
    } else {
        SnippetLoader::from_path(path)
    };
    let loader = loaded
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        })
        .with_max_bytes(config.input.max_bytes);
    if loader.is_truncated() {
        warn!(
            source = path,
            max_bytes = config.input.max_bytes,
            "log exceeds size cap, only its tail was examined"
        );
    }

    Report {
        source: path.to_string(),
        truncated: loader.is_truncated(),
        excerpt: loader.extract(extractor),
    }
}

/// Handle the extract command
fn handle_extract_command(
    formats: &FormatRegistry,
    rules: RuleSet,
    config: &FailsnipConfig,
    matches: &ArgMatches,
    format: &str,
) {
    // Reject a bad format before reading a possibly large log
    if let Err(e) = formats.get(format) {
        eprintln!("{}", e);
        eprintln!("Available formats: {}", formats.list_formats().join(", "));
        process::exit(1);
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let report = load_report(config, &Extractor::new(rules), path);

    let output = formats.render(&report, format).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    print!("{}", output);
}

/// Handle the prompt command
fn handle_prompt_command(rules: RuleSet, config: &FailsnipConfig, matches: &ArgMatches) {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let report = load_report(config, &Extractor::new(rules), path);

    match &report.excerpt {
        Some(excerpt) => print!("{}", render_prompt(excerpt.text())),
        None => println!("{}", report.text()),
    }
}

/// Handle the rules command
fn handle_rules_command(rules: &RuleSet) {
    for tier in Tier::ALL {
        println!("{}", tier);
        match tier {
            Tier::Summary => {
                let summary = rules.summary();
                println!("    header:    {}", summary.header);
                println!("    delimiter: {}", summary.delimiter);
                println!("    failure:   {}", summary.failure_marker);
            }
            Tier::HighConfidence => {
                for (i, pattern) in rules.patterns().iter().enumerate() {
                    println!("    {}. {}  /{}/", i + 1, pattern.name(), pattern.as_str());
                }
                for case in rules.special_cases() {
                    println!(
                        "    when line contains '{}': {} before, {} after",
                        case.marker, case.before, case.after
                    );
                }
                println!("    context:   {} lines", rules.context_lines());
            }
            Tier::Keyword => {
                println!("    keywords:  {}", rules.keywords().join(", "));
                for exclusion in rules.exclusions() {
                    println!("    exclude    /{}/i", exclusion.as_str());
                }
            }
            Tier::Fallback => println!("    last {} lines", rules.fallback_lines()),
        }
    }
}
