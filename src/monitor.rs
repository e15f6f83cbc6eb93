use tracing::{debug, warn};

use crate::config::Configuration;
use crate::cpu_type::CpuType;
use crate::energy::Domain;
use crate::error::{Error, Result};
use crate::policy::{EnergyUnits, RegisterPolicy};
use crate::power::PowerReading;
use crate::topology::CpuTopology;
use crate::util::msr::{RegisterHandle, RegisterReader};

/// Per-slot sampling state
#[derive(Debug)]
pub struct SampleState<H> {
	/// `None` for slots that are never read (Intel core slots)
	pub handle: Option<H>,
	/// Last converted reading, the base for the next delta
	pub last: f64,
}

/// Opens one register handle per slot
///
/// Intel has no per-core counter, so only the first core slot is opened there. Package and
/// DRAM slots always go through processor 0.
pub fn open_handles<R: RegisterReader>(
	reader: &R,
	topology: &CpuTopology,
	cpu_type: CpuType,
) -> Result<Vec<SampleState<R::Handle>>> {
	let count = topology.handle_count();
	let mut slots = Vec::new();
	slots
		.try_reserve_exact(count)
		.map_err(|_| Error::ResourceExhaustion { slots: count })?;

	for slot in 0..count {
		let skip = cpu_type == CpuType::Intel && slot != 0 && slot < topology.physical_units;
		let handle = if skip {
			None
		} else {
			Some(reader.open(topology.logical_cpu(slot))?)
		};
		slots.push(SampleState { handle, last: 0.0 });
	}

	Ok(slots)
}

/// Reads the energy unit register once through the first core slot's handle
pub fn read_energy_units<H: RegisterHandle>(
	slots: &[SampleState<H>],
	topology: &CpuTopology,
	policy: &RegisterPolicy,
	cpu_type: CpuType,
) -> Result<EnergyUnits> {
	let handle = slots
		.first()
		.and_then(|slot| slot.handle.as_ref())
		.ok_or(Error::NoPhysicalUnits {
			configured: topology.configured,
			share_count: topology.share_count,
		})?;

	let units = EnergyUnits::decode(cpu_type, handle.read(policy.unit)?);
	debug!(?units, "decoded energy units");
	Ok(units)
}

/// Turns successive counter reads into per-interval power
///
/// Only exists once every handle is open and the units are known; from then on each
/// call to [`PowerMonitor::tick`] reads, converts and diffs the counters.
#[derive(Debug)]
pub struct PowerMonitor<H> {
	config: Configuration,
	slots: Vec<SampleState<H>>,
	first: bool,
}

impl<H: RegisterHandle> PowerMonitor<H> {
	pub fn new(config: Configuration, slots: Vec<SampleState<H>>) -> Self {
		Self {
			config,
			slots,
			first: true,
		}
	}

	pub fn config(&self) -> &Configuration {
		&self.config
	}

	pub fn slots(&self) -> &[SampleState<H>] {
		&self.slots
	}

	/// Registers read this tick, in report order: cores, package, DRAM
	fn plan(&self) -> Vec<(usize, u32, Domain)> {
		let topology = &self.config.topology;
		let policy = &self.config.policy;
		let verbose = self.config.verbosity() >= 1;
		let mut reads = Vec::with_capacity(topology.handle_count());

		if let Some(core) = policy.core.filter(|_| verbose) {
			reads.extend((0..topology.physical_units).map(|slot| (slot, core, Domain::Core)));
		}
		reads.push((topology.package_slot(), policy.package, Domain::Package));
		if let Some(dram) = policy.dram.filter(|_| verbose) {
			reads.push((topology.dram_slot(), dram, Domain::Dram));
		}

		reads
	}

	/// Takes one sample
	///
	/// Returns `None` on the first tick unless verbosity is 2 or more: without an earlier
	/// reading the first delta is just the counter's absolute value.
	pub fn tick(&mut self) -> Result<Option<PowerReading>> {
		let scale = self.config.scale();
		let units = self.config.units;
		let suppress = self.first && self.config.verbosity() < 2;

		let mut reading = PowerReading {
			package: 0.0,
			cores: Vec::new(),
			core_sum: None,
			dram: None,
		};
		let mut core_sum = 0.0;

		for (slot, address, domain) in self.plan() {
			let state = &mut self.slots[slot];
			let Some(handle) = state.handle.as_ref() else {
				continue;
			};

			let watts = units.to_watts(domain, handle.read(address)?);
			let delta = watts - state.last;
			state.last = watts;

			// Counters are finite width; a wrap shows up as a negative delta and is reported as is
			if delta < 0.0 && !self.first {
				warn!(slot, address = format_args!("{address:#x}"), delta, "energy counter went backwards");
			}

			if suppress {
				continue;
			}

			match domain {
				Domain::Core => {
					reading.cores.push(delta * scale);
					core_sum += delta;
				},
				Domain::Package => reading.package = delta * scale,
				Domain::Dram => reading.dram = Some(delta * scale),
			}
		}

		if !reading.cores.is_empty() {
			reading.core_sum = Some(core_sum * scale);
		}

		self.first = false;
		Ok(if suppress { None } else { Some(reading) })
	}
}
