use raw_cpuid::{CpuId, CpuIdReader};
use tracing::debug;

use crate::constants::CPUID_TOPOLOGY_LEAF;
use crate::error::{Error, Result};

/// How logical processors group into the physical units that own an energy counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuTopology {
	/// Logical threads sharing one physical energy domain
	pub share_count: usize,

	/// Logical processors configured on the host
	pub configured: usize,

	/// Distinct physical units, `configured / share_count`
	pub physical_units: usize,
}

/// Threads per physical unit, from CPUID leaf 0x8000001E
///
/// The leaf is AMD-only, so Intel parts always get one thread per unit. Intel reads every
/// counter through processor 0, which leaves this visible only in the `-vv` banner's thread
/// count, where it equals the configured processor count.
pub fn share_count<R: CpuIdReader>(cpuid: &CpuId<R>) -> usize {
	match cpuid.get_processor_topology_info() {
		Some(info) => usize::from(info.threads_per_core()),
		None => {
			debug!("CPUID leaf {CPUID_TOPOLOGY_LEAF:#x} not reported (Intel), assuming one thread per unit");
			1
		},
	}
}

impl CpuTopology {
	pub fn resolve(share_count: usize, configured: usize) -> Result<Self> {
		let share_count = share_count.max(1);
		let physical_units = configured / share_count;

		if physical_units == 0 {
			return Err(Error::NoPhysicalUnits {
				configured,
				share_count,
			});
		}

		debug!("{configured} logical processors, {share_count} per unit, {physical_units} units");

		Ok(Self {
			share_count,
			configured,
			physical_units,
		})
	}

	/// Sampling slots: one per physical unit, then package, then DRAM
	pub fn handle_count(&self) -> usize {
		self.physical_units + 2
	}

	pub fn package_slot(&self) -> usize {
		self.physical_units
	}

	pub fn dram_slot(&self) -> usize {
		self.physical_units + 1
	}

	/// Logical processor whose register handle backs `slot`
	///
	/// Core slots use the first thread of each unit, skipping hyperthread siblings.
	/// Package and DRAM are read through processor 0.
	pub fn logical_cpu(&self, slot: usize) -> usize {
		if slot < self.physical_units {
			slot * self.share_count
		} else {
			0
		}
	}

	/// Threads covered by the physical units
	pub fn threads(&self) -> usize {
		self.physical_units * self.share_count
	}
}
