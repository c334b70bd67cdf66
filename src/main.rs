//! @ai:module:intent CLI entry point for generating stubs and tests from design-recipe outlines
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on generate, config, output

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use drcop_parser::{config::DEFAULT_CONFIG_FILE, generate, output, Config, Error, OutputFormat};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "drcop")]
#[command(author, version, about = "DRCOP - design recipe code outline processor")]
struct Cli {
    /// Log debug details from the parser
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate function stubs and unit tests from outline files
    Generate {
        /// An .oln.py file, or a directory searched for them
        path: PathBuf,

        /// Directory for generated files (defaults to the outline's directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Overwrite existing files without asking
        #[arg(long)]
        force: bool,

        /// Output format for diagnostics
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Parse outline files and report diagnostics without writing anything
    Check {
        /// An .oln.py file, or a directory searched for them
        path: PathBuf,

        /// Path to configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Write the default configuration
    Init {
        /// Output path for config file
        #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

/// How a batch of outlines went, mapped to the process exit code.
#[derive(Default)]
struct Outcome {
    aborted: usize,
}

impl Outcome {
    fn exit_code(&self) -> ExitCode {
        if self.aborted == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            path,
            output,
            config,
            force,
            format,
        } => run_generate(&path, output.as_deref(), config.as_deref(), force, format.into()),
        Commands::Check {
            path,
            config,
            format,
        } => run_check(&path, config.as_deref(), format.into()),
        Commands::Init { output } => run_init(&output).map(|()| Outcome::default()),
    };

    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "drcop=debug" } else { "drcop=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Expands a directory into the outlines under it.
fn collect_outlines(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let found = generate::discover_outlines(path);
        if found.is_empty() {
            tracing::warn!(dir = %path.display(), "no .oln.py files found");
        }
        Ok(found)
    } else if path.is_file() {
        Ok(vec![path.to_path_buf()])
    } else {
        anyhow::bail!("{} does not exist", path.display())
    }
}

fn run_generate(
    path: &Path,
    output_dir: Option<&Path>,
    config_path: Option<&Path>,
    force: bool,
    format: OutputFormat,
) -> anyhow::Result<Outcome> {
    let config = Config::load_or_default(config_path).context("loading configuration")?;
    let mut outcome = Outcome::default();

    for outline in collect_outlines(path)? {
        let generation = match generate::generate_file(&outline, &config, output_dir) {
            Ok(generation) => generation,
            Err(Error::Aborted {
                critical,
                diagnostics,
            }) => {
                report_abort(&outline, critical, diagnostics, format);
                outcome.aborted += 1;
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("processing {}", outline.display())),
        };

        eprint!(
            "{}",
            output::format_diagnostics(&outline, &generation.diagnostics, format)
        );

        for artifact in [&generation.stub, &generation.tests] {
            if artifact.exists() && !force && !confirm_overwrite(&artifact.path)? {
                tracing::info!(path = %artifact.path.display(), "skipped existing file");
                continue;
            }
            artifact
                .write()
                .with_context(|| format!("writing {}", artifact.path.display()))?;
        }
    }

    Ok(outcome)
}

fn run_check(path: &Path, config_path: Option<&Path>, format: OutputFormat) -> anyhow::Result<Outcome> {
    let config = Config::load_or_default(config_path).context("loading configuration")?;
    let mut outcome = Outcome::default();

    for outline in collect_outlines(path)? {
        match generate::parse_file(&outline, &config.parser) {
            Ok(parsed) => {
                eprint!(
                    "{}",
                    output::format_diagnostics(&outline, &parsed.diagnostics, format)
                );
                println!(
                    "{}",
                    output::format_functions(&outline, &parsed.functions, format)
                );
            }
            Err(Error::Aborted {
                critical,
                diagnostics,
            }) => {
                report_abort(&outline, critical, diagnostics, format);
                outcome.aborted += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("checking {}", outline.display())),
        }
    }

    Ok(outcome)
}

fn run_init(path: &Path) -> anyhow::Result<()> {
    Config::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn report_abort(
    outline: &Path,
    critical: drcop_parser::Diagnostic,
    mut diagnostics: Vec<drcop_parser::Diagnostic>,
    format: OutputFormat,
) {
    diagnostics.push(critical);
    eprint!("{}", output::format_diagnostics(outline, &diagnostics, format));
    tracing::warn!(outline = %outline.display(), "aborted, no files generated");
}

/// Asks on stdin; anything other than `y` keeps the existing file.
fn confirm_overwrite(path: &Path) -> anyhow::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} already exists. Overwrite? [y/N] ", path.display())?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
