use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use opt_table_core::{
    EmitMode, GeneratorConfig, MemoryStore, OptionTable, ensure_valid, escape_c_string,
};
use tracing::{Level, debug};

/// CLI-specific emit mode enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliEmitMode {
    Definitions,
    Table,
}

impl From<CliEmitMode> for EmitMode {
    fn from(mode: CliEmitMode) -> Self {
        match mode {
            CliEmitMode::Definitions => Self::Definitions,
            CliEmitMode::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "opt-tablegen")]
#[command(about = "Compile declarative option records into option tables")]
#[command(version)]
struct Cli {
    /// Log progress to stderr (repeat for more detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the option table include file.
    Generate(GenerateArgs),
    /// Validate and order a record file without emitting a table.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Record file (JSON, or YAML by .yaml/.yml extension).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Artifact to produce.
    #[arg(long)]
    mode: Option<CliEmitMode>,
    /// YAML generator config; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Record file (JSON, or YAML by .yaml/.yml extension).
    #[arg(long)]
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let config = config.with_overrides(args.mode.map(EmitMode::from), args.input, args.output);

    let input = config
        .input
        .as_deref()
        .ok_or_else(|| "No input record file: pass --input or set `input` in --config".to_string())?;
    let table = load_table(input)?;

    // Nothing is written until the whole table has rendered.
    let text = table.render(config.mode);

    match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, &text)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            debug!(output = %path.display(), bytes = text.len(), "Wrote option table");
            eprintln!(
                "Generated {} option(s) in {} group(s) into '{}'.",
                table.entries().len(),
                table.groups().len(),
                path.display()
            );
        }
        None => print!("{text}"),
    }

    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let table = load_table(&args.input)?;

    for entry in table.entries() {
        let option = &entry.option;
        println!(
            "{:<10} \"{}\" {} (kind {}, precedence {})",
            entry.prefix_id,
            escape_c_string(&option.name),
            option.identifier(),
            option.kind.name,
            option.kind.precedence
        );
    }
    println!(
        "Checked {} option(s), {} group(s), {} prefix group(s).",
        table.entries().len(),
        table.groups().len(),
        table.prefix_groups().len()
    );

    Ok(())
}

fn load_table(input: &Path) -> Result<OptionTable, String> {
    let store = MemoryStore::load(input)
        .map_err(|err| format!("Failed to load '{}': {err}", input.display()))?;
    ensure_valid(&store).map_err(|err| format!("'{}': {err}", input.display()))?;
    OptionTable::from_store(&store).map_err(|err| err.to_string())
}
