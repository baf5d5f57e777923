//! Command-line interface.
//!
//! Two subcommands: `compile` is the transpiler proper, `ast` dumps the
//! parsed tree as JSON for inspection. Both read a file argument or, when
//! it is absent, all of standard input.

use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};

use crate::errors::{print_error, JoError, SourceContext};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "jolang",
    version,
    about = "Transpiles the Jo S-expression language to Go source."
)]
pub struct JoArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Transpile Jo source to Go source on stdout.
    Compile {
        /// The Jo file to compile; stdin when omitted.
        file: Option<PathBuf>,
    },
    /// Parse Jo source and print the Go-shaped AST as JSON.
    Ast {
        /// The Jo file to parse; stdin when omitted.
        file: Option<PathBuf>,
    },
}

/// The main entry point for the CLI.
pub fn run() {
    let args = JoArgs::parse();

    match args.command {
        ArgsCommand::Compile { file } => {
            let context = read_source_or_exit(file.as_deref());
            match crate::compile(&context.content) {
                Ok(output) => print!("{output}"),
                Err(e) => {
                    print_error(JoError::from_parse(e, &context));
                    process::exit(1);
                }
            }
        }

        ArgsCommand::Ast { file } => {
            let context = read_source_or_exit(file.as_deref());
            let ast = match crate::parse(&context.content) {
                Ok(ast) => ast,
                Err(e) => {
                    print_error(JoError::from_parse(e, &context));
                    process::exit(1);
                }
            };
            match serde_json::to_string_pretty(&ast) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: cannot serialize AST: {e}");
                    process::exit(1);
                }
            }
        }
    }
}

fn read_source_or_exit(file: Option<&Path>) -> SourceContext {
    match file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => SourceContext::from_file(path.display().to_string(), content),
            Err(e) => {
                eprintln!("error: cannot read {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("error reading from stdin: {e}");
                process::exit(1);
            }
            SourceContext::from_file("<stdin>", buffer)
        }
    }
}
