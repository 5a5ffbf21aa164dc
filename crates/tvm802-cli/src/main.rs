mod convert;
mod error;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use tvm802_core::{Layout, MachineProfile};

use crate::error::{CliError, ErrorCode};

#[derive(Parser)]
#[command(
    name = "tvm802-mdgen",
    version,
    about = "TVM802 pick and place machine data generator from KiCad POS files"
)]
struct Cli {
    /// KiCad POS CSV input file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// TVM802 machine data output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Feeders CSV config file
    #[arg(short, long, value_name = "FILE")]
    feeders: Option<PathBuf>,

    /// Generate a template feeders file (requires -i and -f, overwrites the feeders file)
    #[arg(short = 'g', long = "gen_feeders", visible_alias = "gen-feeders")]
    gen_feeders: bool,

    /// Machine profile (YAML) overriding template defaults and trailer constants
    #[arg(short, long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Write LF-terminated data rows only, without the mark trailer
    #[arg(long)]
    plain: bool,

    /// Be verbose
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        if err.code == ErrorCode::Usage {
            eprintln!("\n{}", Cli::command().render_usage());
        }
        std::process::exit(err.exit_code());
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    tracing::debug!(
        input = ?cli.input,
        output = ?cli.output,
        feeders = ?cli.feeders,
        gen_feeders = cli.gen_feeders,
        "arguments"
    );

    if cli.gen_feeders {
        let Some(feeders) = cli.feeders else {
            return Err(CliError::usage("Feeders file missing."));
        };
        let Some(input) = cli.input else {
            return Err(CliError::usage("Input file missing."));
        };
        let profile = load_profile(cli.profile.as_deref())?;
        return convert::run_gen_feeders(&input, &feeders, &profile);
    }

    let (Some(input), Some(output), Some(feeders)) = (cli.input, cli.output, cli.feeders) else {
        return Err(CliError::usage(
            "--input, --output and --feeders are required to generate machine data",
        ));
    };
    let profile = load_profile(cli.profile.as_deref())?;
    let layout = if cli.plain {
        Layout::Plain
    } else {
        Layout::Machine
    };
    convert::run_convert(&input, &output, &feeders, &profile, layout)
}

fn load_profile(path: Option<&Path>) -> Result<MachineProfile, CliError> {
    let Some(path) = path else {
        return Ok(MachineProfile::default());
    };
    MachineProfile::from_path(path)
        .with_context(|| format!("Could not load machine profile {}", path.display()))
        .map_err(|e| CliError::input(format!("{e:#}")))
}
