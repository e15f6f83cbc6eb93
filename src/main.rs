use std::io;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use pmon::config::{Options, parse_interval};
use pmon::error::Error;
use pmon::util::configured_processors;
use pmon::util::msr::MsrReader;
use raw_cpuid::CpuId;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Reports package, per-core and DRAM power from the CPU's energy counters
#[derive(Parser)]
#[command(name = "pmon", version)]
struct Cli {
	/// More detail: -v adds the core sum or DRAM figure, -vv the per-core table
	#[arg(short, action = ArgAction::Count)]
	verbose: u8,

	/// Sampling period in seconds
	#[arg(default_value = "1", value_parser = parse_interval)]
	interval: f64,
}

/// Diagnostics go to stderr so stdout carries nothing but the report
fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
		.with(filter)
		.init();
}

fn report(err: &Error) {
	if err.to_stdout() {
		println!("{err}");
	} else {
		eprintln!("{err}");
	}

	if let Some(hint) = err.hint() {
		println!("{hint}");
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing();

	let options = Options {
		verbosity: cli.verbose,
		interval: cli.interval,
	};

	let result = pmon::start(&CpuId::new(), &MsrReader, configured_processors(), options)
		.and_then(|mut monitor| pmon::monitor_cpu_power(&mut monitor, &mut io::stdout().lock()));

	exit_code(result)
}

/// Every failure exits with status 1 after its diagnostic
fn exit_code(result: Result<(), Error>) -> ExitCode {
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			report(&err);
			ExitCode::FAILURE
		},
	}
}
