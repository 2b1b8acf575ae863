//! Command-line interface for the CDL compiler.
//!
//! Usage:
//!   cdl lex <path>                        - Tokenize a CDL file
//!   cdl parse <path>                      - Parse a CDL file to an AST
//!   cdl compile <path> [--pipeline <p>]   - Full compile with a pipeline
//!   cdl --list-stages                     - List registered pipeline stages
//!
//! A path of `-` reads from stdin. Output is the canonical JSON shape on
//! stdout, the same the compilation service returns.

use cdl_parser::cdl::compiler::{compile, lex, parse, CompileMode, CompileOptions};
use cdl_parser::cdl::pipeline::{registered_stages, StageList};
use clap::{Arg, ArgAction, Command};
use std::io::Read;

fn main() {
    let matches = Command::new("cdl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile CDL configuration sources to tokens, ASTs and diagnostics")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-stages")
                .long("list-stages")
                .help("List registered pipeline stages")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("lex")
                .about("Tokenize a CDL file")
                .arg(Arg::new("path").help("CDL file, or - for stdin").required(true)),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a CDL file to an AST with embedded diagnostics")
                .arg(Arg::new("path").help("CDL file, or - for stdin").required(true)),
        )
        .subcommand(
            Command::new("compile")
                .about("Run the full compile: lex, parse, pipeline")
                .arg(Arg::new("path").help("CDL file, or - for stdin").required(true))
                .arg(
                    Arg::new("pipeline")
                        .long("pipeline")
                        .short('p')
                        .help("Pipeline: a preset name or comma-separated stage names")
                        .default_value("full"),
                ),
        )
        .get_matches();

    if matches.get_flag("list-stages") {
        handle_list_stages();
        return;
    }

    match matches.subcommand() {
        Some(("lex", sub)) => {
            let source = read_source(sub.get_one::<String>("path").expect("path is required"));
            print_json(&lex(&source));
        }
        Some(("parse", sub)) => {
            let source = read_source(sub.get_one::<String>("path").expect("path is required"));
            print_json(&parse(&source));
        }
        Some(("compile", sub)) => {
            let source = read_source(sub.get_one::<String>("path").expect("path is required"));
            let pipeline = sub
                .get_one::<String>("pipeline")
                .expect("pipeline has a default");
            let options = CompileOptions {
                pipeline: parse_pipeline_spec(pipeline),
                mode: CompileMode::Full,
            };
            print_json(&compile(&source, &options));
        }
        _ => unreachable!("arg_required_else_help"),
    }
}

fn handle_list_stages() {
    for stage in registered_stages() {
        println!("  {} - {}", stage.name, stage.description);
    }
}

/// `full` (or any other bare preset name) stays a preset; anything with a
/// comma or a known stage name is an explicit list. An empty value is the
/// empty pipeline.
fn parse_pipeline_spec(spec: &str) -> StageList {
    if spec.is_empty() {
        return StageList::empty();
    }
    if !spec.contains(',') && cdl_parser::cdl::pipeline::lookup(spec).is_none() {
        return StageList::Preset(spec.to_string());
    }
    StageList::Stages(
        spec.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn read_source(path: &str) -> String {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .unwrap_or_else(|e| {
                eprintln!("Error reading stdin: {}", e);
                std::process::exit(1);
            });
        return buffer;
    }
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    })
}

fn print_json<T: serde::Serialize>(value: &T) {
    let formatted = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error formatting output: {}", e);
        std::process::exit(1);
    });
    println!("{}", formatted);
}
