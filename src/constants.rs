// AMD RAPL MSR addresses
pub const AMD_ENERGY_UNIT_MSR: u32 = 0xC001_0299;
pub const AMD_ENERGY_CORE_MSR: u32 = 0xC001_029A;
pub const AMD_ENERGY_PKG_MSR: u32 = 0xC001_029B;

// Intel RAPL MSR addresses
pub const INTEL_POWER_UNIT_MSR: u32 = 0x606;
pub const INTEL_PKG_ENERGY_MSR: u32 = 0x611;
pub const INTEL_DRAM_ENERGY_MSR: u32 = 0x619;

// Energy status unit, bits 12:8 of the power unit register on both vendors
pub const ENERGY_UNIT_MASK: u64 = 0x1F00;
pub const ENERGY_UNIT_SHIFT: u32 = 8;

// DRAM energy status unit is fixed on Intel server parts
pub const INTEL_DRAM_UNIT_EXPONENT: i32 = 16;

// CPUID leaves
pub const CPUID_VENDOR_LEAF: u32 = 0x0;
pub const CPUID_FEATURE_LEAF: u32 = 0x1;
pub const CPUID_TOPOLOGY_LEAF: u32 = 0x8000_001E;

pub const AMD_VENDOR: &str = "AuthenticAMD";
pub const INTEL_VENDOR: &str = "GenuineIntel";

pub const MICROJOULES_PER_JOULE: f64 = 1_000_000.0;

// Per-core table layout
pub const CORES_PER_ROW: usize = 8;
pub const RULE_LINE: &str = "============================================================================";
