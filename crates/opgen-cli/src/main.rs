//! opgen CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use opgen_codegen::{
    read_table, write_all_atomically, write_atomically, Generator, GeneratorConfig, Mode,
};
use opgen_tables::{parse_binary_table, parse_instructions, parse_unary_table, TableKind};
use tracing::{error, info};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opgen")]
#[command(about = "Generate interpreter boilerplate from descriptor tables")]
struct Cli {
    /// Generator configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every generation stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the instruction class hierarchy
    Instructions {
        /// Instruction descriptor table
        table: PathBuf,

        /// Directory the header and source files are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Also generate the visitor interface
        #[arg(long)]
        visitor: bool,
    },

    /// Binary operator result types for the type checker
    BinaryDecls(TableArgs),

    /// Binary operator lambdas for the interpreter
    BinaryDefs(TableArgs),

    /// Unary operator result types for the type checker
    UnaryDecls(TableArgs),

    /// Unary operator lambdas for the interpreter
    UnaryDefs(TableArgs),

    /// Parse a table and print its records as JSON
    Dump {
        /// Table format: instructions, binary or unary
        kind: TableKind,

        /// Table file
        table: PathBuf,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Operator table
    table: PathBuf,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("opgen: invalid log filter: {}", err);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> Result<(), ParseError> {
    let directive = if verbose { "opgen=debug" } else { "opgen=info" };
    // Generated tables go to stdout, so logs stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => {
            info!("Using config {}", path.display());
            GeneratorConfig::from_file(path)?
        }
        None => GeneratorConfig::default(),
    };

    match cli.command {
        Commands::Instructions {
            table,
            out_dir,
            visitor,
        } => {
            let generator = Generator::new(config).with_visitor(visitor);
            let artifacts = generator
                .generate_file(Mode::Instructions, &table)?
                .into_artifacts();
            for path in write_all_atomically(&artifacts, &out_dir)? {
                println!("{} -> {}", table.display(), path.display());
            }
        }

        Commands::BinaryDecls(args) => run_operators(config, Mode::BinaryDeclarations, args)?,
        Commands::BinaryDefs(args) => run_operators(config, Mode::BinaryDefinitions, args)?,
        Commands::UnaryDecls(args) => run_operators(config, Mode::UnaryDeclarations, args)?,
        Commands::UnaryDefs(args) => run_operators(config, Mode::UnaryDefinitions, args)?,

        Commands::Dump { kind, table } => dump(kind, &table)?,
    }

    Ok(())
}

fn run_operators(
    config: GeneratorConfig,
    mode: Mode,
    args: TableArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Generating {} from {} table {}",
        mode,
        mode.table_kind(),
        args.table.display()
    );

    let generation = Generator::new(config).generate_file(mode, &args.table)?;
    for artifact in &generation.into_artifacts() {
        match &args.out {
            Some(path) => write_atomically(path, &artifact.contents)?,
            None => print!("{}", artifact.contents),
        }
    }

    Ok(())
}

fn dump(kind: TableKind, table: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_table(table)?;
    let json = match kind {
        TableKind::Instructions => serde_json::to_string_pretty(&parse_instructions(&source)?)?,
        TableKind::Binary => serde_json::to_string_pretty(&parse_binary_table(&source)?)?,
        TableKind::Unary => serde_json::to_string_pretty(&parse_unary_table(&source)?)?,
    };
    println!("{}", json);
    Ok(())
}
