use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the sampler
///
/// None of these are recoverable: reporting partial telemetry would be worse than stopping.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	#[error("Support for CPU vendor {vendor} not implemented")]
	UnsupportedVendor { vendor: String },

	#[error("unsupported CPU 0x{family:x} 0x{model:x}")]
	UnsupportedModel { family: u32, model: u32 },

	#[error("CPUID leaf {leaf:#x} not available")]
	MissingCpuidLeaf { leaf: u32 },

	#[error("{configured} configured processors cannot hold one group of {share_count} threads")]
	NoPhysicalUnits { configured: usize, share_count: usize },

	#[error("open {}: {source}", .path.display())]
	RegisterAccessDenied {
		cpu: usize,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("rdmsr {address:#x} on cpu {cpu}: {source}")]
	RegisterReadFailure {
		cpu: usize,
		address: u32,
		#[source]
		source: io::Error,
	},

	#[error("cannot allocate {slots} sampling slots")]
	ResourceExhaustion { slots: usize },

	#[error("writing report: {0}")]
	Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Remediation text printed after the diagnostic, if there is any
	pub fn hint(&self) -> Option<&'static str> {
		match self {
			Error::RegisterAccessDenied { .. } => Some(if cfg!(target_os = "freebsd") {
				"Did you remember to kldload cpuctl?"
			} else {
				"Did you remember to modprobe msr?"
			}),
			_ => None,
		}
	}

	/// Identification failures are reported on standard output, everything else on standard error
	pub fn to_stdout(&self) -> bool {
		matches!(self, Error::UnsupportedVendor { .. } | Error::UnsupportedModel { .. })
	}
}
