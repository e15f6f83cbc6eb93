pub mod msr;

use tracing::debug;

/// Number of logical processors configured on the host
///
/// Counts offline processors too, so the per-core register layout does not shift when a
/// core is taken offline. Falls back to the online count if the query fails.
pub fn configured_processors() -> usize {
	// SAFETY: sysconf only reads a system constant
	let configured = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_CONF) };

	if configured > 0 {
		configured as usize
	} else {
		let online = num_cpus::get();
		debug!("sysconf(_SC_NPROCESSORS_CONF) failed, using {online} online processors");
		online
	}
}
