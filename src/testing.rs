//! In-memory stand-ins for CPUID and the msr device, shared by the unit tests

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

use raw_cpuid::{CpuIdReader, CpuIdResult};

use crate::error::{Error, Result};
use crate::util::msr::{RegisterHandle, RegisterReader};

/// Answers the handful of CPUID leaves the identifier and topology resolver ask for
#[derive(Debug, Clone)]
pub struct FakeCpuid {
	vendor: [u8; 12],
	signature: u32,
	threads_per_unit: Option<u32>,
}

impl FakeCpuid {
	pub fn new(vendor: [u8; 12], family: u32, model: u32, threads_per_unit: Option<u32>) -> Self {
		let (base_family, extended_family) = if family >= 0xf { (0xf, family - 0xf) } else { (family, 0) };
		let signature = ((model & 0xf) << 4) | (base_family << 8) | ((model >> 4) << 16) | (extended_family << 20);

		Self {
			vendor,
			signature,
			threads_per_unit,
		}
	}

	pub fn amd(family: u32, model: u32, threads_per_unit: u32) -> Self {
		Self::new(*b"AuthenticAMD", family, model, Some(threads_per_unit))
	}

	pub fn intel(family: u32, model: u32) -> Self {
		Self::new(*b"GenuineIntel", family, model, None)
	}

	fn vendor_word(&self, index: usize) -> u32 {
		let start = index * 4;
		u32::from_le_bytes([
			self.vendor[start],
			self.vendor[start + 1],
			self.vendor[start + 2],
			self.vendor[start + 3],
		])
	}
}

impl CpuIdReader for FakeCpuid {
	fn cpuid2(&self, eax: u32, _ecx: u32) -> CpuIdResult {
		let mut result = CpuIdResult {
			eax: 0,
			ebx: 0,
			ecx: 0,
			edx: 0,
		};

		match eax {
			0x0 => {
				result.eax = 0x10;
				result.ebx = self.vendor_word(0);
				result.edx = self.vendor_word(1);
				result.ecx = self.vendor_word(2);
			},
			0x1 => result.eax = self.signature,
			0x8000_0000 => {
				result.eax = if self.threads_per_unit.is_some() {
					0x8000_0020
				} else {
					0x8000_0008
				};
			},
			0x8000_001E => {
				if let Some(threads) = self.threads_per_unit {
					result.ebx = (threads - 1) << 8;
				}
			},
			_ => {},
		}

		result
	}
}

type Queues = HashMap<(usize, u32), VecDeque<u64>>;

/// Register reader that hands out queued values per (logical cpu, register)
///
/// A read with nothing queued fails like a short read would.
#[derive(Debug, Clone, Default)]
pub struct FakeRegisters {
	queues: Rc<RefCell<Queues>>,
	opened: Rc<RefCell<Vec<usize>>>,
	deny: Option<usize>,
}

#[derive(Debug)]
pub struct FakeHandle {
	cpu: usize,
	queues: Rc<RefCell<Queues>>,
}

impl FakeRegisters {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fails `open` for one logical cpu
	pub fn deny(mut self, cpu: usize) -> Self {
		self.deny = Some(cpu);
		self
	}

	pub fn push(&self, cpu: usize, address: u32, values: &[u64]) {
		self.queues
			.borrow_mut()
			.entry((cpu, address))
			.or_default()
			.extend(values.iter().copied());
	}

	pub fn opened(&self) -> Vec<usize> {
		self.opened.borrow().clone()
	}

	pub fn remaining(&self, cpu: usize, address: u32) -> usize {
		self.queues.borrow().get(&(cpu, address)).map_or(0, VecDeque::len)
	}
}

impl RegisterReader for FakeRegisters {
	type Handle = FakeHandle;

	fn open(&self, cpu: usize) -> Result<FakeHandle> {
		if self.deny == Some(cpu) {
			return Err(Error::RegisterAccessDenied {
				cpu,
				path: format!("/dev/cpu/{cpu}/msr").into(),
				source: io::Error::from(io::ErrorKind::PermissionDenied),
			});
		}

		self.opened.borrow_mut().push(cpu);
		Ok(FakeHandle {
			cpu,
			queues: Rc::clone(&self.queues),
		})
	}
}

impl RegisterHandle for FakeHandle {
	fn read(&self, address: u32) -> Result<u64> {
		self.queues
			.borrow_mut()
			.get_mut(&(self.cpu, address))
			.and_then(VecDeque::pop_front)
			.ok_or_else(|| Error::RegisterReadFailure {
				cpu: self.cpu,
				address,
				source: io::Error::from(io::ErrorKind::UnexpectedEof),
			})
	}
}
