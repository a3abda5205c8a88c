use std::path::PathBuf;

use clap::{builder::BoolishValueParser, Parser, Subcommand};
use colored::Colorize;
use miette::Result;

use lmc::{load_file, Output, RunState, StdChannel};

/// Cycle-accurate simulator for the Little Man Computer.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a program file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Load a program file and run it until it halts
    Run {
        /// Program file to run
        name: PathBuf,
        /// Address of the first instruction
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u16).range(0..=999))]
        start: u16,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Print every executed cycle to stderr
        #[arg(short, long, env = "LMC_TRACE", value_parser = BoolishValueParser::new())]
        trace: bool,
        /// Fail if the program has not halted after this many cycles
        #[arg(long)]
        max_cycles: Option<u64>,
    },
    /// Load a program file without running it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(lmc::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run {
                name,
                start,
                minimal,
                trace,
                max_cycles,
            } => run(
                &name,
                RunOptions {
                    start,
                    minimal,
                    trace,
                    max_cycles,
                },
            ),
            Command::Check { name } => {
                file_message(Green, "Checking", &name);
                let mem = load_file(&name)?;
                message(Green, "Success", &format!("{} cells loaded", mem.len()));
                Ok(())
            }
        }
    } else if let Some(path) = args.path {
        run(&path, RunOptions::default())
    } else {
        println!("\n~ lmc v{VERSION} ~");
        println!("{}", LOGO.truecolor(255, 183, 197).bold());
        println!("{SHORT_INFO}");
        std::process::exit(0);
    }
}

#[derive(Default)]
struct RunOptions {
    start: u16,
    minimal: bool,
    trace: bool,
    max_cycles: Option<u64>,
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &PathBuf) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

fn message(color: MsgColor, left: &str, right: &str) {
    if Output::is_minimal() {
        return;
    }
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn run(name: &PathBuf, opts: RunOptions) -> Result<()> {
    Output::set_minimal(opts.minimal);

    file_message(MsgColor::Green, "Loading", name);
    let mem = load_file(name)?;

    let mut state = RunState::new(mem);
    state.set_trace(opts.trace);
    state.set_max_cycles(opts.max_cycles);

    message(MsgColor::Green, "Running", &format!("from address {:03}", opts.start));
    let mut chan = StdChannel::new();
    if let Err(e) = state.run(opts.start, &mut chan) {
        Output::Normal.start_new_line();
        return Err(e.report(state.pc()));
    }

    Output::Normal.start_new_line();
    message(
        MsgColor::Cyan,
        "Halted",
        &format!("after {} cycles", state.cycles()),
    );
    file_message(MsgColor::Green, "Completed", name);
    Ok(())
}

const LOGO: &str = r#"
 _
| |_ __ ___   ___
| | '_ ` _ \ / __|
| | | | | | | (__
|_|_| |_| |_|\___|"#;

const SHORT_INFO: &str = r"
Welcome to lmc, a simulator for the Little Man Computer:
one accumulator, one B register and a thousand decimal words of memory.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
