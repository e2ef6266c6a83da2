// Command-line interface for blockmark
//
// This binary converts documents between Markdown and block trees, and exposes
// the standalone table extractor for scripting.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  blockmark <input> --to <format> [--from <format>] [--output <file>]          - Convert between formats (default)
//  blockmark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  blockmark tables <input>                                                      - Print table segments as JSON lines
//  blockmark --list-formats                                                      - List available formats
//
// Extra Parameters:
//
// Configuration keys can be overridden per run using --extra-<parameter-name> <value>.
// Example:
//  blockmark post.json --to markdown --extra-bullet-marker '*' --extra-pad-columns false

use blockmark::{extract_tables_from_document, FormatRegistry};
use blockmark_config::{BlockmarkConfig, ConfigError, Loader};
use clap::{Arg, ArgAction, Command, ValueHint};
use std::collections::HashMap;
use std::fs;

const SUBCOMMANDS: &[&str] = &["convert", "tables", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            // A lone "-" is a value (a bullet marker), not a flag.
            let has_value = args
                .get(i + 1)
                .is_some_and(|next| next == "-" || !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("blockmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and block trees")
        .long_about(
            "blockmark converts Markdown documents into block trees and back.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (markdown, blocks)\n  \
            - tables:  Extract GitHub-style tables from a Markdown document\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override a configuration key.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            blockmark post.md --to blocks                 # Markdown to JSON block tree (stdout)\n  \
            blockmark post.json --to markdown -o post.md  # Block tree to Markdown file\n  \
            blockmark tables README.md                    # One JSON segment per line",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available conversion formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a blockmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown with GitHub tables (.md, .markdown)\n  \
                    - blocks:   JSON block tree (.json)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    blockmark convert post.md --to blocks            # Markdown to JSON (stdout)\n  \
                    blockmark convert post.json --to markdown -o p.md\n  \
                    blockmark post.md --to blocks                    # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: markdown, blocks\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("tables")
                .about("Extract tables from a Markdown document")
                .long_about(
                    "Scan a Markdown document for GitHub-style tables without parsing\n\
                    the rest of the document.\n\n\
                    Each segment is printed as one JSON object per line, either\n\
                    {\"kind\":\"literal\",...} or {\"kind\":\"table\",...}, in document order.",
                )
                .arg(
                    Arg::new("input")
                        .help("Markdown file to scan")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A leading file argument means the user skipped `convert`.
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
    );
    let registry = FormatRegistry::with_options(config.into());

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches.get_one::<String>("to").expect("to is required");

            let from = match sub_matches.get_one::<String>("from") {
                Some(f) => f.to_string(),
                None => match registry.detect_format_from_filename(input) {
                    Some(detected) => detected,
                    None => {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        eprintln!("Please specify --from explicitly");
                        std::process::exit(1);
                    }
                },
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output);
        }
        Some(("tables", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_tables_command(input);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    for name in [from, to] {
        if let Err(e) = registry.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    let source = read_input(input);
    log::debug!("converting {input} from {from} to {to}");

    let blocks = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let text = registry.serialize(&blocks, to).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => fs::write(path, text).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => print!("{text}"),
    }
}

/// Handle the tables command
fn handle_tables_command(input: &str) {
    let source = read_input(input);
    for segment in extract_tables_from_document(&source) {
        match serde_json::to_string(&segment) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Serialization error: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Conversion formats:");
    let registry = FormatRegistry::default();
    for format in registry.formats() {
        println!(
            "  {:<10} {} (.{})",
            format.name(),
            format.description(),
            format.file_extensions().join(", .")
        );
    }
}

fn load_cli_config(
    explicit_path: Option<&str>,
    extra_params: &HashMap<String, String>,
) -> BlockmarkConfig {
    let loader = Loader::new().with_optional_file("blockmark.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    apply_config_overrides(loader, extra_params)
        .and_then(Loader::build)
        .unwrap_or_else(|err| {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        })
}

fn apply_config_overrides(
    mut loader: Loader,
    extra_params: &HashMap<String, String>,
) -> Result<Loader, ConfigError> {
    for (key, raw) in extra_params {
        loader = match key.as_str() {
            "opaque-language" => loader.set_override("markdown.opaque_language", raw.as_str())?,
            "bullet-marker" => loader.set_override("markdown.bullet_marker", raw.as_str())?,
            "pad-columns" => {
                loader.set_override("tables.pad_columns", parse_bool_arg(key, raw))?
            }
            other => {
                log::warn!("ignoring unknown parameter --extra-{other}");
                loader
            }
        };
    }
    Ok(loader)
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
