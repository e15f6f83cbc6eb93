use crate::constants::MICROJOULES_PER_JOULE;
use crate::policy::EnergyUnits;

/// Which counter a reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
	Core,
	Package,
	Dram,
}

/// AMD counters are scaled to microjoules by `2^-exponent`, then back to joules
pub fn amd_watts(raw: u64, exponent: u32) -> f64 {
	let energy_uj = raw as f64 * MICROJOULES_PER_JOULE / f64::from(1u32 << exponent);
	energy_uj / MICROJOULES_PER_JOULE
}

pub fn intel_watts(raw: u64, unit: f64) -> f64 {
	raw as f64 * unit
}

impl EnergyUnits {
	/// Converts a raw counter value using the unit of its domain
	///
	/// The result is accumulated energy, not power: it becomes watts only once the sampler
	/// takes a delta and scales it by the interval.
	pub fn to_watts(&self, domain: Domain, raw: u64) -> f64 {
		match *self {
			EnergyUnits::Amd { exponent } => amd_watts(raw, exponent),
			EnergyUnits::Intel { energy, dram } => match domain {
				Domain::Dram => intel_watts(raw, dram),
				Domain::Core | Domain::Package => intel_watts(raw, energy),
			},
		}
	}
}
