use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{command_batch_compile, command_compile, command_info};

mod commands;

#[derive(Parser)]
#[command(version, about, arg_required_else_help(true))]
struct Cli {
    /// Directory to search for `.aidl`/`.java`/`.json` units. Repeatable.
    #[arg(short = 'I', global = true)]
    search_path: Vec<PathBuf>,

    #[command(subcommand)]
    commands: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a qualified name and print a short summary.
    Info {
        qname: String,
        /// Print the full compiled definition as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Compile one qualified name to `<out>/<qname>.json`.
    Compile {
        qname: String,
        #[arg(short = 'o')]
        out: PathBuf,
        /// Overwrite `<out>/<qname>.json` if it already exists.
        #[arg(short = 'f')]
        force: bool,
    },
    /// Compile every `.aidl`/`.java` unit found on the search path.
    BatchCompile {
        #[arg(short = 'o')]
        out: PathBuf,
        /// Walk search path directories recursively.
        #[arg(short = 'r')]
        recursive: bool,
        /// Overwrite existing `<out>/<qname>.json` files.
        #[arg(short = 'f')]
        force: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.commands {
        Some(Commands::Info { qname, json }) => {
            if let Err(err) = command_info(&cli.search_path, qname, *json) {
                eprintln!("{err:#}");
                std::process::exit(1);
            }
        }
        Some(Commands::Compile { qname, out, force }) => {
            if let Err(err) = command_compile(&cli.search_path, qname, out, *force) {
                eprintln!("{err:#}");
                std::process::exit(1);
            }
        }
        Some(Commands::BatchCompile { out, recursive, force }) => {
            match command_batch_compile(&cli.search_path, out, *recursive, *force) {
                Ok((succeeded, total)) => {
                    if total > 0 && succeeded == 0 {
                        std::process::exit(1);
                    }
                }
                Err(err) => {
                    eprintln!("{err:#}");
                    std::process::exit(1);
                }
            }
        }
        None => {}
    }
}
