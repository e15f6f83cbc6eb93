pub mod config;
pub mod constants;
pub mod cpu_type;
pub mod display;
pub mod energy;
pub mod error;
pub mod monitor;
pub mod policy;
pub mod power;
pub mod topology;
pub mod util;

#[cfg(test)]
mod testing;

use std::io::Write;
use std::thread;

use raw_cpuid::{CpuId, CpuIdReader};
use tracing::info;

use crate::config::{Configuration, Options};
use crate::cpu_type::identify;
use crate::error::Result;
use crate::monitor::{PowerMonitor, open_handles, read_energy_units};
use crate::policy::RegisterPolicy;
use crate::topology::{CpuTopology, share_count};
use crate::util::msr::{RegisterHandle, RegisterReader};

/// Identifies the CPU, opens every register handle and decodes the energy units
///
/// Any failure here is fatal; the returned monitor is ready to sample.
pub fn start<C, R>(cpuid: &CpuId<C>, reader: &R, configured: usize, options: Options) -> Result<PowerMonitor<R::Handle>>
where
	C: CpuIdReader,
	R: RegisterReader,
{
	let identity = identify(cpuid)?;
	let policy = RegisterPolicy::lookup(&identity)?;
	let topology = CpuTopology::resolve(share_count(cpuid), configured)?;

	let slots = open_handles(reader, &topology, identity.cpu_type)?;
	let units = read_energy_units(&slots, &topology, &policy, identity.cpu_type)?;

	info!(
		vendor = %identity.vendor,
		family = format_args!("{:#x}", identity.family),
		model = format_args!("{:#x}", identity.model),
		units = topology.physical_units,
		"monitoring power"
	);

	let config = Configuration {
		identity,
		policy,
		topology,
		units,
		options,
	};

	Ok(PowerMonitor::new(config, slots))
}

/// Samples forever, writing one report per tick
///
/// Only returns on a register or output error.
pub fn monitor_cpu_power<H: RegisterHandle, W: Write>(monitor: &mut PowerMonitor<H>, out: &mut W) -> Result<()> {
	display::write_banner(out, monitor.config())?;
	out.flush()?;

	let interval = monitor.config().interval();
	let verbosity = monitor.config().verbosity();

	loop {
		if let Some(reading) = monitor.tick()? {
			display::write_reading(out, &reading, verbosity)?;
		}
		out.flush()?;

		thread::sleep(interval);
	}
}
