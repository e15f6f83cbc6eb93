use raw_cpuid::{CpuId, CpuIdReader};
use tracing::debug;

use crate::constants::{AMD_VENDOR, CPUID_FEATURE_LEAF, CPUID_VENDOR_LEAF, INTEL_VENDOR};
use crate::error::{Error, Result};

/// CPU manufacturers with energy counters we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuType {
	Amd,
	Intel,
}

impl CpuType {
	/// Matches the 12 byte CPUID vendor string exactly
	pub fn from_vendor(vendor: &str) -> Option<Self> {
		match vendor.trim_end_matches('\0') {
			AMD_VENDOR => Some(CpuType::Amd),
			INTEL_VENDOR => Some(CpuType::Intel),
			_ => None,
		}
	}
}

/// Vendor, family and model of the processor we are running on
///
/// Determined once at startup; every register decision afterwards derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorIdentity {
	pub cpu_type: CpuType,
	pub family: u32,
	pub model: u32,
	pub vendor: String,
}

/// Reads the vendor string and the family/model signature
///
/// Family and model always include the extended fields, whatever the base family is.
pub fn identify<R: CpuIdReader>(cpuid: &CpuId<R>) -> Result<ProcessorIdentity> {
	let vendor = cpuid
		.get_vendor_info()
		.ok_or(Error::MissingCpuidLeaf { leaf: CPUID_VENDOR_LEAF })?
		.as_str()
		.to_string();

	let cpu_type = CpuType::from_vendor(&vendor).ok_or_else(|| Error::UnsupportedVendor { vendor: vendor.clone() })?;

	let features = cpuid
		.get_feature_info()
		.ok_or(Error::MissingCpuidLeaf { leaf: CPUID_FEATURE_LEAF })?;

	let family = u32::from(features.base_family_id()) + u32::from(features.extended_family_id());
	let model = u32::from(features.base_model_id()) | (u32::from(features.extended_model_id()) << 4);

	debug!(vendor = %vendor, family = format_args!("{family:#x}"), model = format_args!("{model:#x}"), "identified processor");

	if cpu_type == CpuType::Intel {
		match intel_model_name(model) {
			Some(name) => debug!("Intel model {model:#x}: {name}"),
			None => debug!("Intel model {model:#x} not in the known list, using family 0x6 registers"),
		}
	}

	Ok(ProcessorIdentity {
		cpu_type,
		family,
		model,
		vendor,
	})
}

/// Intel family 0x6 models that have been checked by hand
///
/// Purely informational: all family 0x6 parts share the same package and DRAM registers.
pub fn intel_model_name(model: u32) -> Option<&'static str> {
	match model {
		0x4f => Some("Broadwell-EP (Xeon E5 v4)"),
		// Xeon Gold 6122 and Xeon D-2143IT report the same model
		0x55 => Some("Skylake-SP (Xeon Scalable, Xeon D-2100)"),
		// Xeon D-1518 and D-1541 report the same model
		0x56 => Some("Broadwell-DE (Xeon D-1500)"),
		_ => None,
	}
}
