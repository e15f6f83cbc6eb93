use crate::constants::*;
use crate::cpu_type::{CpuType, ProcessorIdentity};
use crate::error::{Error, Result};

/// Where the energy counters live for one supported processor line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPolicy {
	/// Package energy status register
	pub package: u32,

	/// Per-core energy status register (AMD only)
	pub core: Option<u32>,

	/// DRAM energy status register (Intel only)
	pub dram: Option<u32>,

	/// Register holding the energy status unit
	pub unit: u32,
}

const AMD_POLICY: RegisterPolicy = RegisterPolicy {
	package: AMD_ENERGY_PKG_MSR,
	core: Some(AMD_ENERGY_CORE_MSR),
	dram: None,
	unit: AMD_ENERGY_UNIT_MSR,
};

const INTEL_POLICY: RegisterPolicy = RegisterPolicy {
	package: INTEL_PKG_ENERGY_MSR,
	core: None,
	dram: Some(INTEL_DRAM_ENERGY_MSR),
	unit: INTEL_POWER_UNIT_MSR,
};

struct PolicyEntry {
	cpu_type: CpuType,
	family: u32,
	/// `None` accepts every model of the family
	models: Option<&'static [u32]>,
	policy: RegisterPolicy,
}

static POLICY_TABLE: &[PolicyEntry] = &[
	PolicyEntry {
		cpu_type: CpuType::Amd,
		family: 0x17,
		models: Some(&[0x08, 0x31]),
		policy: AMD_POLICY,
	},
	PolicyEntry {
		cpu_type: CpuType::Amd,
		family: 0x19,
		models: Some(&[0x01, 0x10, 0x11, 0x19, 0x30, 0xa0]),
		policy: AMD_POLICY,
	},
	PolicyEntry {
		cpu_type: CpuType::Amd,
		family: 0x1a,
		models: Some(&[0x02, 0x10, 0x11]),
		policy: AMD_POLICY,
	},
	PolicyEntry {
		cpu_type: CpuType::Intel,
		family: 0x6,
		models: None,
		policy: INTEL_POLICY,
	},
];

impl RegisterPolicy {
	/// Looks up the register layout for a processor, failing for anything off the allow-list
	pub fn lookup(identity: &ProcessorIdentity) -> Result<Self> {
		POLICY_TABLE
			.iter()
			.find(|entry| {
				entry.cpu_type == identity.cpu_type
					&& entry.family == identity.family
					&& entry.models.is_none_or(|models| models.contains(&identity.model))
			})
			.map(|entry| entry.policy)
			.ok_or(Error::UnsupportedModel {
				family: identity.family,
				model: identity.model,
			})
	}
}

/// Scale factors turning raw counter values into joules
///
/// Decoded once from the unit register and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyUnits {
	/// Raw exponent, applied as a `2^exponent` divisor
	Amd { exponent: u32 },
	/// Precomputed multipliers for package/core and for DRAM
	Intel { energy: f64, dram: f64 },
}

impl EnergyUnits {
	pub fn decode(cpu_type: CpuType, raw: u64) -> Self {
		let exponent = ((raw & ENERGY_UNIT_MASK) >> ENERGY_UNIT_SHIFT) as u32;

		match cpu_type {
			CpuType::Amd => EnergyUnits::Amd { exponent },
			CpuType::Intel => EnergyUnits::Intel {
				energy: 0.5_f64.powi(exponent as i32),
				dram: 0.5_f64.powi(INTEL_DRAM_UNIT_EXPONENT),
			},
		}
	}
}
