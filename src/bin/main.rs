use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::{bail, Result};
use walkdir::WalkDir;

use ttc::ast::{Item, Member, TypeDecl};
use ttc::parser::{parse_template, Lexer};
use ttc::{Config, IdentityTransformer, TableResolver};

#[derive(Parser)]
#[command(name = "ttc")]
#[command(about = "Test Template Compiler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a template file (or every template in a directory)
    Rewrite {
        /// Input template file or directory
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Marker suffix for template-only names
        #[arg(long, value_name = "SUFFIX")]
        suffix: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a template file and show the tree
    Parse {
        /// Input template file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show detailed node information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Lexically analyze a template file
    Lex {
        /// Input template file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Rewrite { input, output, suffix, verbose } => {
            let mut config = Config::new();
            config.verbose = *verbose;
            if let Some(suffix) = suffix {
                config = config.with_marker_suffix(suffix.clone());
            }

            let resolver = TableResolver::mstest();
            let transformer = IdentityTransformer;

            if input.is_dir() {
                let templates = collect_templates(input, &config)?;
                if templates.is_empty() {
                    bail!("no template files found under {}", input.display());
                }
                let generated = ttc::rewrite_files(
                    &templates,
                    output.as_deref(),
                    &resolver,
                    &transformer,
                    &config,
                )?;
                println!("Generated {} file(s)", generated.len());
            } else {
                let generated = ttc::rewrite_file(
                    input,
                    output.as_deref(),
                    &resolver,
                    &transformer,
                    &config,
                )?;
                println!("Generated {}", generated.display());
            }
        }

        Commands::Parse { input, detailed } => {
            let source = std::fs::read_to_string(input)?;
            let unit = parse_template(&source)?;
            print_items(&unit.items, 0, *detailed);
        }

        Commands::Lex { input, locations } => {
            let source = std::fs::read_to_string(input)?;
            let tokens = Lexer::new(&source)
                .tokenize()
                .map_err(|message| anyhow::anyhow!(message))?;
            for token in tokens.iter().filter(|t| !t.token.is_trivia()) {
                if *locations {
                    println!("{}:{}\t{:?}\t{:?}", token.location.line, token.location.column, token.token, token.lexeme);
                } else {
                    println!("{:?}\t{:?}", token.token, token.lexeme);
                }
            }
        }
    }

    Ok(())
}

/// Find template sources under a directory, skipping generated output
fn collect_templates(dir: &PathBuf, config: &Config) -> Result<Vec<PathBuf>> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".cs") && !name.ends_with(&config.generated_suffix) {
            templates.push(entry.path().to_path_buf());
        }
    }
    templates.sort();
    Ok(templates)
}

fn print_items(items: &[Item], depth: usize, detailed: bool) {
    let pad = "  ".repeat(depth);
    for item in items {
        match item {
            Item::Import(import) => {
                if detailed {
                    println!("{}import {} [{}]", pad, import.name, import.span);
                } else {
                    println!("{}import {}", pad, import.name);
                }
            }
            Item::Namespace(ns) => {
                println!("{}namespace", pad);
                print_items(&ns.items, depth + 1, detailed);
            }
            Item::Type(ty) => print_type(ty, depth, detailed),
        }
    }
}

fn print_type(ty: &TypeDecl, depth: usize, detailed: bool) {
    let pad = "  ".repeat(depth);
    if detailed {
        println!("{}class {} ({} attribute(s)) [{}]", pad, ty.name, ty.attributes.len(), ty.span);
    } else {
        println!("{}class {}", pad, ty.name);
    }
    for member in &ty.members {
        match member {
            Member::Constructor(ctor) => println!("{}  constructor {}", pad, ctor.name),
            Member::Method(method) => {
                if detailed {
                    println!(
                        "{}  method ({} attribute(s), {} statement(s))",
                        pad,
                        method.attributes.len(),
                        method.body.statements.len()
                    );
                } else {
                    println!("{}  method", pad);
                }
            }
            Member::Type(nested) => print_type(nested, depth + 1, detailed),
            Member::Raw(_) => println!("{}  member", pad),
        }
    }
}
