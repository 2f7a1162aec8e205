use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use bstviz_core::{Discipline, EventSink};
use bstviz_runtime::config::{DisciplineName, ModeName};
use bstviz_runtime::{Session, TrainerConfig};
use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::logging;
use crate::repl::{Controller, HELP, Line};

#[derive(Debug, Parser)]
#[command(
    name = "bstviz",
    about = "Step through binary search tree and AVL operations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Log filter (e.g. `debug`, `bstviz_core=trace`). Overrides BSTVIZ_LOG.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read commands from stdin.
    Repl(ReplArgs),

    /// Run commands from a file and print the final tree.
    Run(RunArgs),

    /// Walk through the classic AVL rotation scenarios.
    Demo(DemoArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ReplArgs {
    /// Trainer config (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start as an AVL tree.
    #[arg(long)]
    pub avl: bool,

    /// Start in manual step mode.
    #[arg(long)]
    pub manual: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Script with one command per line.
    pub script: PathBuf,

    /// Trainer config (TOML). Without one, every pause is instant.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct DemoArgs {
    /// Trainer config (TOML). Without one, every pause is instant.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Scenarios shown by `demo`: name and insertion order.
pub const DEMO_SCENARIOS: [(&str, &[i64]); 4] = [
    ("right-right: one left rotation", &[1, 2, 3]),
    ("already balanced: no rotation", &[5, 3, 8, 1, 4]),
    ("left-right: double rotation", &[3, 1, 2]),
    ("right-left: double rotation", &[1, 3, 2]),
];

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_json)?;
    run(cli.command, &mut io::stdout().lock())
}

pub fn run(command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Repl(args) => run_repl(args, out),
        Commands::Run(args) => run_script(args, out),
        Commands::Demo(args) => run_demo(args, out),
    }
}

fn run_repl(args: ReplArgs, out: &mut impl Write) -> Result<()> {
    let mut config = TrainerConfig::load(args.config.as_deref())?;
    if args.avl {
        config.start.discipline = DisciplineName::Avl;
    }
    if args.manual {
        config.start.mode = ModeName::Manual;
    }
    tracing::info!(discipline = ?config.start.discipline, mode = ?config.start.mode, "repl started");

    writeln!(out, "{HELP}")?;
    let mut controller = start(&config, out);
    controller.run_lines(io::stdin().lock(), None)?;
    controller.into_output();
    Ok(())
}

fn run_script(args: RunArgs, out: &mut impl Write) -> Result<()> {
    let config = load_or_instant(args.config)?;
    let file = std::fs::File::open(&args.script)?;
    tracing::info!(script = %args.script.display(), "running script");

    let mut controller = start(&config, out);
    controller.run_lines(BufReader::new(file), Some(&args.script))?;
    controller.into_output();
    Ok(())
}

fn run_demo(args: DemoArgs, out: &mut impl Write) -> Result<()> {
    let mut config = load_or_instant(args.config)?;
    config.start.mode = ModeName::Auto;

    let mut controller = start(&config, &mut *out);
    controller.execute(Line::Discipline(Discipline::Avl))?;
    for (name, keys) in DEMO_SCENARIOS {
        controller.execute(Line::Clear)?;
        let out = controller.output();
        writeln!(out, "== {name}: insert {keys:?}")?;
        for &key in keys {
            controller.execute(Line::Insert(key))?;
        }
        controller.show()?;
        writeln!(controller.output())?;
    }
    controller.into_output();
    Ok(())
}

fn load_or_instant(path: Option<PathBuf>) -> Result<TrainerConfig> {
    Ok(match path {
        Some(path) => TrainerConfig::load(Some(&path))?,
        None => TrainerConfig::instant(),
    })
}

fn start<W: Write>(config: &TrainerConfig, out: W) -> Controller<W> {
    let (events, rx) = EventSink::channel();
    Controller::new(Session::start(config, events), rx, out)
}
