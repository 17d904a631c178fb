//! Bitcoin Script Simulator - CLI
//!
//! Runs a script through the stepwise interpreter and prints the trace.

use std::io::{self, BufRead, Write};
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use bsim_core::config::{SimConfig, DEFAULT_MAX_SCRIPT_LEN};
use bsim_core::{Interpreter, PlaceholderVerifier, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Plain,
    Json,
}

#[derive(Parser)]
#[command(name = "bsim")]
#[command(about = "Step through a Bitcoin Script and show the stack after every instruction")]
struct Cli {
    /// Script tokens, e.g. `1 1 OP_ADD`. Read from stdin when omitted
    #[arg(allow_negative_numbers = true)]
    script: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Plain)]
    format: Format,

    /// Reject scripts with more instructions than this
    #[arg(long, default_value_t = DEFAULT_MAX_SCRIPT_LEN)]
    max_script_len: usize,

    /// Exit with status 2 when the script is invalid
    #[arg(long)]
    strict: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let env_filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("bsim_core=debug"),
        _ => EnvFilter::new("bsim_core=trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Prompt for a single line on stdin
fn read_script() -> io::Result<String> {
    print!("Enter Script: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn render(sim: &Simulation, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Plain => Ok(sim.to_string()),
        Format::Json => serde_json::to_string_pretty(sim),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let raw = if cli.script.is_empty() {
        match read_script() {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: failed to read script: {}", e);
                process::exit(1);
            }
        }
    } else {
        cli.script.join(" ")
    };

    let config = SimConfig::new().with_max_script_len(cli.max_script_len);
    let interpreter = Interpreter::with_verifier(config, PlaceholderVerifier);

    let sim = match interpreter.run(&raw) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    match render(&sim, cli.format) {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("error: failed to serialize trace: {}", e);
            process::exit(1);
        }
    }

    if cli.strict && !sim.valid {
        process::exit(2);
    }
}
