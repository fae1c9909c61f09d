mod logging;
mod script;
mod sink;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use canvas::doc::ElementKind;
use canvas::factory;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::logging::LoggingError;
use crate::script::{ScriptError, Session, SimulatedSurface};
use crate::sink::JsonLinesSink;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "coachboard", about = "Coaching canvas session runner")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, env = "COACHBOARD_LOG", default_value = "info")]
    log_level: String,

    /// Viewport x of the canvas surface's left edge.
    #[arg(long, env = "COACHBOARD_SURFACE_LEFT", default_value_t = 0.0)]
    surface_left: f64,

    /// Viewport y of the canvas surface's top edge.
    #[arg(long, env = "COACHBOARD_SURFACE_TOP", default_value_t = 0.0)]
    surface_top: f64,

    /// Title attached to saved snapshots.
    #[arg(long, env = "COACHBOARD_TITLE", default_value = canvas::consts::DEFAULT_TITLE)]
    title: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a JSON-lines intent script; each `save` emits one snapshot.
    Replay {
        /// Script path, or `-` for stdin.
        script: PathBuf,
        /// Write snapshots here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Pretty-print each snapshot.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the defaults a new element of each kind starts with.
    Defaults,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match cli.command {
        Command::Replay { ref script, ref out, pretty } => run_replay(&cli, script, out.as_deref(), pretty),
        Command::Defaults => run_defaults(),
    }
}

fn run_replay(cli: &Cli, script: &Path, out: Option<&Path>, pretty: bool) -> Result<(), CliError> {
    let writer: Box<dyn Write> = match out {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::Open { path: path.to_path_buf(), source })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = JsonLinesSink::new(writer, pretty);
    let surface = SimulatedSurface::mounted(cli.surface_left, cli.surface_top);
    let mut session = Session::new(&cli.title, surface, &mut sink);

    if script.as_os_str() == "-" {
        session.replay(io::stdin().lock())?;
    } else {
        let file = File::open(script).map_err(|source| CliError::Open { path: script.to_path_buf(), source })?;
        session.replay(BufReader::new(file))?;
    }

    let report = session.report();
    let remaining = session.engine().core.elements().len();
    info!(saves = report.saves, elements = remaining, "session closed");
    Ok(())
}

fn run_defaults() -> Result<(), CliError> {
    let defaults: Vec<_> = ElementKind::ALL.into_iter().map(factory::defaults).collect();
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &defaults)?;
    writeln!(stdout)?;
    Ok(())
}
