use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

/// An open register-access handle for one logical processor
pub trait RegisterHandle {
	/// Reads the 64 bit Model-Specific Register at `address`
	fn read(&self, address: u32) -> Result<u64>;
}

/// Opens register-access handles
///
/// Handles are opened once at startup and held for the life of the process.
pub trait RegisterReader {
	type Handle: RegisterHandle;

	fn open(&self, cpu: usize) -> Result<Self::Handle>;
}

/// Reads MSRs through the kernel's per-cpu device files
///
/// `/dev/cpu/<n>/msr` on Linux (the `msr` module), `/dev/cpuctl<n>` on FreeBSD (`cpuctl`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MsrReader;

#[derive(Debug)]
pub struct MsrHandle {
	cpu: usize,
	file: File,
}

impl MsrReader {
	pub fn device_path(cpu: usize) -> PathBuf {
		if cfg!(target_os = "freebsd") {
			PathBuf::from(format!("/dev/cpuctl{cpu}"))
		} else {
			PathBuf::from(format!("/dev/cpu/{cpu}/msr"))
		}
	}
}

impl RegisterReader for MsrReader {
	type Handle = MsrHandle;

	fn open(&self, cpu: usize) -> Result<MsrHandle> {
		let path = Self::device_path(cpu);
		let file = OpenOptions::new()
			.read(true)
			.open(&path)
			.map_err(|source| Error::RegisterAccessDenied { cpu, path: path.clone(), source })?;

		debug!("opened {}", path.display());
		Ok(MsrHandle { cpu, file })
	}
}

impl RegisterHandle for MsrHandle {
	fn read(&self, address: u32) -> Result<u64> {
		read_msr(&self.file, address).map_err(|source| Error::RegisterReadFailure {
			cpu: self.cpu,
			address,
			source,
		})
	}
}

/// The msr device maps the register address onto the file offset
#[cfg(not(target_os = "freebsd"))]
fn read_msr(file: &File, address: u32) -> io::Result<u64> {
	use std::os::unix::fs::FileExt;

	let mut data = [0u8; size_of::<u64>()];
	file.read_exact_at(&mut data, u64::from(address))?;
	Ok(u64::from_ne_bytes(data))
}

#[cfg(target_os = "freebsd")]
#[repr(C)]
struct CpuctlMsrArgs {
	msr: libc::c_int,
	data: u64,
}

// _IOWR('c', 1, cpuctl_msr_args_t)
#[cfg(target_os = "freebsd")]
const CPUCTL_RDMSR: libc::c_ulong = 0xc010_6301;

#[cfg(target_os = "freebsd")]
fn read_msr(file: &File, address: u32) -> io::Result<u64> {
	use std::os::fd::AsRawFd;

	let mut args = CpuctlMsrArgs {
		msr: address as libc::c_int,
		data: 0,
	};

	// SAFETY: args is a live cpuctl_msr_args_t for the duration of the call
	let ret = unsafe { libc::ioctl(file.as_raw_fd(), CPUCTL_RDMSR, &mut args as *mut CpuctlMsrArgs) };
	if ret != 0 {
		return Err(io::Error::last_os_error());
	}

	Ok(args.data)
}
