use std::time::Duration;

use crate::cpu_type::ProcessorIdentity;
use crate::policy::{EnergyUnits, RegisterPolicy};
use crate::topology::CpuTopology;

/// What the user asked for on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
	pub verbosity: u8,
	/// Sampling period in seconds
	pub interval: f64,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			verbosity: 0,
			interval: 1.0,
		}
	}
}

/// Everything decided at startup, fixed for the rest of the run
#[derive(Debug, Clone)]
pub struct Configuration {
	pub identity: ProcessorIdentity,
	pub policy: RegisterPolicy,
	pub topology: CpuTopology,
	pub units: EnergyUnits,
	pub options: Options,
}

impl Configuration {
	pub fn verbosity(&self) -> u8 {
		self.options.verbosity
	}

	pub fn interval(&self) -> Duration {
		Duration::from_secs_f64(self.options.interval)
	}

	/// Turns energy accumulated over one interval into a per-second rate
	pub fn scale(&self) -> f64 {
		1.0 / self.options.interval
	}
}

/// Accepts a positive, finite number of seconds
pub fn parse_interval(value: &str) -> Result<f64, String> {
	let interval: f64 = value
		.trim()
		.parse()
		.map_err(|_| format!("`{value}` is not a number of seconds"))?;

	if !(interval.is_finite() && interval > 0.0) {
		return Err(format!("interval must be greater than zero, got `{value}`"));
	}

	// The sleep needs a Duration, so anything it cannot hold is rejected here
	Duration::try_from_secs_f64(interval).map_err(|err| format!("interval `{value}` out of range: {err}"))?;

	Ok(interval)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intervals() {
		assert_eq!(parse_interval("1"), Ok(1.0));
		assert_eq!(parse_interval("2"), Ok(2.0));
		assert_eq!(parse_interval("0.25"), Ok(0.25));
		assert!(parse_interval("0").is_err());
		assert!(parse_interval("-1").is_err());
		assert!(parse_interval("inf").is_err());
		assert!(parse_interval("NaN").is_err());
		assert!(parse_interval("fast").is_err());
		assert!(parse_interval("1e20").is_err());
		assert!(parse_interval(&f64::MAX.to_string()).is_err());
	}

	#[test]
	fn accepted_intervals_convert_to_duration() {
		for value in ["1", "0.001", "3600", "1e9"] {
			let interval = parse_interval(value).unwrap();
			assert!(Duration::try_from_secs_f64(interval).is_ok(), "{value}");
		}
	}

	#[test]
	fn scale_is_reciprocal_of_interval() {
		let options = Options {
			verbosity: 0,
			interval: 2.0,
		};
		let config = Configuration {
			identity: ProcessorIdentity {
				cpu_type: crate::cpu_type::CpuType::Intel,
				family: 0x6,
				model: 0x55,
				vendor: "GenuineIntel".to_string(),
			},
			policy: RegisterPolicy {
				package: 0x611,
				core: None,
				dram: Some(0x619),
				unit: 0x606,
			},
			topology: CpuTopology::resolve(1, 4).unwrap(),
			units: EnergyUnits::Intel { energy: 1.0, dram: 1.0 },
			options,
		};

		assert_eq!(config.scale(), 0.5);
		assert_eq!(config.interval(), Duration::from_secs(2));
		assert_eq!(config.verbosity(), 0);
	}
}
