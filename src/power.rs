/// One tick's worth of power figures, already scaled to watts
#[derive(Debug, Clone, PartialEq)]
pub struct PowerReading {
	/// Package power
	pub package: f64,

	/// Per physical unit power, in slot order; empty unless per-core counters were read
	pub cores: Vec<f64>,

	/// Sum of the per-core figures, present whenever per-core counters were read
	pub core_sum: Option<f64>,

	/// DRAM power, present whenever the DRAM counter was read
	pub dram: Option<f64>,
}
