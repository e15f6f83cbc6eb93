use std::io::{self, Write};

use crate::config::Configuration;
use crate::constants::{CORES_PER_ROW, RULE_LINE};
use crate::policy::EnergyUnits;
use crate::power::PowerReading;

/// Startup summary, only at verbosity 2 and above
pub fn write_banner<W: Write>(out: &mut W, config: &Configuration) -> io::Result<()> {
	if config.verbosity() < 2 {
		return Ok(());
	}

	let topology = &config.topology;
	writeln!(out, "{} threads, {} CPUs", topology.threads(), topology.physical_units)?;

	match config.units {
		EnergyUnits::Amd { exponent } => writeln!(out, "energy_units {exponent}"),
		EnergyUnits::Intel { energy, .. } => writeln!(out, "energy_units {energy:.6}"),
	}
}

/// Renders one tick
///
/// - verbosity 0: the bare package figure
/// - verbosity 1: `pkg:` with the core sum (AMD) or DRAM figure (Intel)
/// - verbosity 2+: the per-core table, eight cores to a row, above the `pkg:` line
pub fn write_reading<W: Write>(out: &mut W, reading: &PowerReading, verbosity: u8) -> io::Result<()> {
	if verbosity >= 2 && !reading.cores.is_empty() {
		write_core_table(out, &reading.cores)?;
	}

	if verbosity == 0 {
		return writeln!(out, "{:4.2}", reading.package);
	}

	write!(out, "pkg: {:4.2}", reading.package)?;
	if let Some(core_sum) = reading.core_sum {
		write!(out, "  core sum={core_sum:4.2}")?;
	}
	if let Some(dram) = reading.dram {
		write!(out, "\tdram: {dram:4.2}")?;
	}
	writeln!(out)
}

fn write_core_table<W: Write>(out: &mut W, cores: &[f64]) -> io::Result<()> {
	writeln!(out, "{RULE_LINE}")?;

	for (row, chunk) in cores.chunks(CORES_PER_ROW).enumerate() {
		write!(out, "core {:3}:\t", row * CORES_PER_ROW)?;
		for power in chunk {
			write!(out, "{power:3.2}\t")?;
		}
		writeln!(out)?;
	}

	writeln!(out, "{RULE_LINE}")
}
