use anyhow::{bail, Context, Result};
use clap::Parser;
use ntm::parser::{parse_line, Line};
use ntm::session::run_input;
use ntm::{
    encode, Machine, Mode, ProgramLoader, ProgramManager, Record, RunConfig, RunReport, Session,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Runs transition-table scripts on a (possibly nondeterministic) Turing machine.
///
/// A script is a list of `t <state> <read> <next> <write> <dir>` and `f <state>...` lines;
/// every `i <input>` line runs the table built so far on its input and then resets it.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  ntm machine.tm
  ntm scripts/
  cat machine.tm | ntm --json
  ntm --program anbn --input aabb --input aab")]
struct Cli {
    /// Script files, or directories of `.tm` scripts. Reads stdin when omitted.
    scripts: Vec<PathBuf>,

    /// Run a built-in table (or a table file) on the given inputs instead of a script
    #[clap(short, long, conflicts_with = "scripts")]
    program: Option<String>,

    /// Input for `--program`; may be repeated
    #[clap(short, long, requires = "program")]
    input: Vec<String>,

    /// List the built-in tables and exit
    #[clap(short, long)]
    list: bool,

    /// Only accept L/R directions and fail on unrecognized lines
    #[clap(long)]
    strict: bool,

    /// Stop a run with an error after this many transitions
    #[clap(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Print one JSON report per run
    #[clap(long)]
    json: bool,

    /// Print the table each input runs against
    #[clap(long)]
    dump: bool,

    /// Log analysis findings for each table before it runs
    #[clap(long)]
    check: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> RunConfig {
        RunConfig {
            mode: if self.strict {
                Mode::Strict
            } else {
                Mode::Normal
            },
            step_limit: self.max_steps,
            analyze: self.check,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        for (name, description) in ProgramManager::list_programs() {
            println!("{name:<20} {description}");
        }
        return Ok(());
    }

    let config = cli.config();

    if let Some(program) = &cli.program {
        let machine = load_program(program, config.mode)?;
        for input in &cli.input {
            if cli.dump {
                print!("{}", encode(&machine));
            }
            let report = run_input(&machine, input.clone(), &config)
                .with_context(|| format!("run on input '{input}' failed"))?;
            emit(&report, cli.json)?;
        }
        return Ok(());
    }

    if cli.scripts.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            bail!("no script given; pass a file or pipe a table on stdin (see --help)");
        }
        return run_lines(io::stdin().lock(), "<stdin>", &cli, &config);
    }

    for path in &cli.scripts {
        let scripts = if path.is_dir() {
            ProgramLoader::script_paths(path)?
        } else {
            vec![path.clone()]
        };

        for script in scripts {
            let file = File::open(&script)
                .with_context(|| format!("failed to open {}", script.display()))?;
            run_lines(
                BufReader::new(file),
                &script.display().to_string(),
                &cli,
                &config,
            )?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Resolves `--program` to a built-in table, or to a table file when no built-in matches.
fn load_program(name: &str, mode: Mode) -> Result<Machine> {
    match ProgramManager::get_program_by_name(name) {
        Ok(program) => Ok(program.machine),
        Err(_) if Path::new(name).is_file() => {
            ProgramLoader::load_machine(Path::new(name), mode).map_err(Into::into)
        }
        Err(e) => Err(e.into()),
    }
}

/// Streams a script line by line, printing each run's result as soon as it finishes.
fn run_lines(reader: impl BufRead, source: &str, cli: &Cli, config: &RunConfig) -> Result<()> {
    info!(source, "running script");
    let mut session = Session::new(config.clone());

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {source}"))?;

        let record = match parse_line(index + 1, &line, config.mode)
            .with_context(|| format!("invalid table in {source}"))?
        {
            Line::Record(record) => record,
            Line::Skipped => continue,
            Line::End => {
                debug!(source, line = index + 1, "blank line, stopping");
                break;
            }
        };

        if cli.dump && matches!(record, Record::Input(_)) {
            print!("{}", encode(session.machine()));
        }

        if let Some(report) = session
            .apply(record)
            .with_context(|| format!("{source}:{}", index + 1))?
        {
            emit(&report, cli.json)?;
        }
    }

    Ok(())
}

fn emit(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
