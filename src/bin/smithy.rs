//! smithy CLI
//!
//! Assembles Smithy IDL and JSON AST files and regenerates them as IDL,
//! JSON AST, or SADL.
//!
//! Exit codes: 0 success, 1 no input files, 2 assembly failed,
//! 4 generation failed (including an unknown generator).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use smithy::assembly::Assembler;
use smithy::generate::{GENERATORS, GeneratorConfig, generator_for};
use tracing::{debug, error};

const EXIT_USAGE: u8 = 1;
const EXIT_ASSEMBLY: u8 = 2;
const EXIT_GENERATE: u8 = 4;

#[derive(Parser, Debug)]
#[command(name = "smithy")]
#[command(about = "Smithy IDL toolchain: assemble models and regenerate IDL, JSON AST, or SADL")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Show the tool version and exit
    #[arg(short = 'v')]
    version: bool,

    /// Only list the assembled shape ids
    #[arg(short = 'l')]
    list: bool,

    /// Overwrite existing output files
    #[arg(short = 'f')]
    force: bool,

    /// The generator for output
    #[arg(short = 'g', default_value = "idl", help = "Generator: idl, ast or sadl")]
    generator: String,

    /// Directory to write output into (defaults to stdout)
    #[arg(short = 'o')]
    out_dir: Option<PathBuf>,

    /// Additional generator argument, `key=value` or a bare `key`
    #[arg(short = 'a', value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Keep only shapes with this tag (and their dependencies)
    #[arg(short = 't')]
    tags: Vec<String>,

    /// Model files or directories
    files: Vec<PathBuf>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty generator argument".to_string());
    }
    Ok(match s.split_once('=') {
        Some((key, value)) => (key.to_string(), value.to_string()),
        None => (s.to_string(), "true".to_string()),
    })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smithy=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if cli.version {
        println!("Smithy tool {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let generator = match generator_for(&cli.generator) {
        Ok(generator) => generator,
        Err(e) => {
            error!(generator = %cli.generator, "unknown generator");
            eprintln!("*** {e} (expected one of: {})", GENERATORS.join(", "));
            return ExitCode::from(EXIT_GENERATE);
        }
    };

    if cli.files.is_empty() {
        eprintln!("usage: smithy [-v] [-l] [-f] [-g generator] [-o outdir] [-a key=val]* [-t tag]* file ...");
        return ExitCode::from(EXIT_USAGE);
    }

    let ast = match Assembler::new().assemble(&cli.files, &cli.tags) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_ASSEMBLY);
        }
    };

    if cli.list {
        for id in ast.shapes.keys() {
            println!("{id}");
        }
        return ExitCode::SUCCESS;
    }

    let config = GeneratorConfig {
        out_dir: cli.out_dir,
        force: cli.force,
        params: cli.params.into_iter().collect(),
    };
    debug!(generator = generator.name(), ?config, "generating");
    match generator.generate(&ast, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("*** {e}");
            ExitCode::from(EXIT_GENERATE)
        }
    }
}
