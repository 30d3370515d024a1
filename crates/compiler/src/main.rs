//! Staq Compiler CLI
//!
//! Command-line interface for type-checking and compiling Staq programs,
//! handed off as JSON (see `staqc::ir`).

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use staqc::CompilerConfig;
use staqc::ir::load_program;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "staqc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Staq compiler - type-check and compile Staq programs to ARM64/Darwin assembly", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type-check a program only; prints OK and exits 0 on success.
    Check {
        /// Input JSON program file
        input: PathBuf,
    },

    /// Type-check then compile a program to ARM64/Darwin assembly text.
    Build {
        /// Input JSON program file
        input: PathBuf,

        /// Output assembly file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit debug comments (banner, per-operator origin, epilogue commentary)
        #[arg(long)]
        debug_comments: bool,

        /// Load additional configuration (currently: debug_comments) from a TOML file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { input } => run_check(&input),
        Commands::Build {
            input,
            output,
            debug_comments,
            config,
        } => run_build(&input, output, debug_comments, config),
        Commands::Completions { shell } => {
            run_completions(shell);
            Ok(())
        }
    };

    if let Err(message) = result {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "staqc", &mut io::stdout());
}

fn run_check(input: &PathBuf) -> Result<(), String> {
    let program = load_program(input)?;
    staqc::check(&program).map_err(|e| e.to_string())?;
    println!("OK");
    Ok(())
}

fn run_build(
    input: &PathBuf,
    output: Option<PathBuf>,
    debug_comments: bool,
    config_path: Option<PathBuf>,
) -> Result<(), String> {
    let program = load_program(input)?;

    let mut config = match config_path {
        Some(path) => CompilerConfig::from_toml_file(&path)?,
        None => CompilerConfig::default(),
    };
    config.debug_comments = config.debug_comments || debug_comments;

    // Fail-fast, no partial-output recovery (spec.md §7): a structural
    // codegen error never touches the output path.
    let assembly = staqc::build(&program, &config).map_err(|e| e.to_string())?;

    match output {
        Some(path) => {
            std::fs::write(&path, assembly)
                .map_err(|e| format!("failed to write '{}': {e}", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(assembly.as_bytes())
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
        }
    }
    Ok(())
}
